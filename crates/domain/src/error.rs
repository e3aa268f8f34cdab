// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal::Decimal;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Measurement unit string is not a known unit.
    InvalidUnit(String),
    /// Snapshot status string is not a known status.
    InvalidSnapshotStatus(String),
    /// Invoice status string is not a known status.
    InvalidInvoiceStatus(String),
    /// Payment method string is not a known method.
    InvalidPaymentMethod(String),
    /// A status transition was attempted that the lifecycle does not permit.
    InvalidStatusTransition {
        /// The entity kind ("snapshot" or "invoice").
        entity: &'static str,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// Lot name is empty or invalid.
    InvalidName(String),
    /// A quantity or price that must be non-negative was negative.
    NegativeQuantity {
        /// The field that was negative.
        field: &'static str,
        /// The offending value.
        value: Decimal,
    },
    /// A payment amount that must be strictly positive was not.
    NonPositiveAmount {
        /// The offending value.
        value: Decimal,
    },
    /// VAT rate outside the permitted 0..=100 range.
    InvalidVatRate {
        /// The offending rate.
        value: Decimal,
    },
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Period end precedes period start.
    InvalidPeriod {
        /// The period start date.
        start: String,
        /// The period end date.
        end: String,
    },
    /// Cumulative realized quantity fell below the approved baseline.
    ProgressRegression {
        /// The lot whose quantity regressed.
        lot_id: i64,
        /// The last approved cumulative quantity.
        baseline: Decimal,
        /// The requested cumulative quantity.
        requested: Decimal,
    },
    /// Invoice submitted without any billed quantity.
    EmptyInvoice,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUnit(unit) => write!(f, "Invalid measurement unit: '{unit}'"),
            Self::InvalidSnapshotStatus(status) => {
                write!(f, "Invalid snapshot status: '{status}'")
            }
            Self::InvalidInvoiceStatus(status) => {
                write!(f, "Invalid invoice status: '{status}'")
            }
            Self::InvalidPaymentMethod(method) => {
                write!(f, "Invalid payment method: '{method}'")
            }
            Self::InvalidStatusTransition { entity, from, to } => {
                write!(f, "Invalid {entity} status transition from '{from}' to '{to}'")
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::NegativeQuantity { field, value } => {
                write!(f, "Field '{field}' must be >= 0, got {value}")
            }
            Self::NonPositiveAmount { value } => {
                write!(f, "Payment amount must be > 0, got {value}")
            }
            Self::InvalidVatRate { value } => {
                write!(f, "VAT rate must be between 0 and 100, got {value}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidPeriod { start, end } => {
                write!(f, "Period end {end} precedes period start {start}")
            }
            Self::ProgressRegression {
                lot_id,
                baseline,
                requested,
            } => {
                write!(
                    f,
                    "Realized quantity {requested} for lot {lot_id} is below the approved baseline {baseline}"
                )
            }
            Self::EmptyInvoice => {
                write!(f, "Invoice has no line with a billed quantity greater than zero")
            }
        }
    }
}

impl std::error::Error for DomainError {}
