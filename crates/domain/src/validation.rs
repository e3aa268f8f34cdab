// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Input validation shared by the ledger operations.

use crate::error::DomainError;
use rust_decimal::Decimal;
use time::Date;
use time::format_description::well_known::Iso8601;

/// Parses an ISO 8601 date string (e.g., `2026-03-31`).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_iso_date(s: &str) -> Result<Date, DomainError> {
    Date::parse(s, &Iso8601::DATE).map_err(|e| DomainError::DateParseError {
        date_string: s.to_string(),
        error: e.to_string(),
    })
}

/// Validates a lot's user-supplied fields.
///
/// # Errors
///
/// Returns an error if the name is empty or a quantity/price is negative.
pub fn validate_lot_fields(
    name: &str,
    planned_quantity: Decimal,
    unit_price: Decimal,
) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "lot name cannot be empty",
        )));
    }
    validate_quantity("planned_quantity", planned_quantity)?;
    validate_quantity("unit_price", unit_price)?;
    Ok(())
}

/// Validates that a quantity or price is non-negative.
///
/// # Errors
///
/// Returns `DomainError::NegativeQuantity` if the value is below zero.
pub fn validate_quantity(field: &'static str, value: Decimal) -> Result<(), DomainError> {
    if value < Decimal::ZERO {
        return Err(DomainError::NegativeQuantity { field, value });
    }
    Ok(())
}

/// Validates a document period: both dates must parse and the end must
/// not precede the start.
///
/// # Errors
///
/// Returns a `DateParseError` or `InvalidPeriod` error.
pub fn validate_period(period_start: &str, period_end: &str) -> Result<(), DomainError> {
    let start = parse_iso_date(period_start)?;
    let end = parse_iso_date(period_end)?;
    if end < start {
        return Err(DomainError::InvalidPeriod {
            start: period_start.to_string(),
            end: period_end.to_string(),
        });
    }
    Ok(())
}

/// Validates that a payment amount is strictly positive.
///
/// # Errors
///
/// Returns `DomainError::NonPositiveAmount` if the amount is zero or below.
pub fn validate_payment_amount(amount: Decimal) -> Result<(), DomainError> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::NonPositiveAmount { value: amount });
    }
    Ok(())
}

/// Validates a VAT rate percentage.
///
/// # Errors
///
/// Returns `DomainError::InvalidVatRate` unless `0 <= rate <= 100`.
pub fn validate_vat_rate(vat_rate: Decimal) -> Result<(), DomainError> {
    if vat_rate < Decimal::ZERO || vat_rate > Decimal::ONE_HUNDRED {
        return Err(DomainError::InvalidVatRate { value: vat_rate });
    }
    Ok(())
}
