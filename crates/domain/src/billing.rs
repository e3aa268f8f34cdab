// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Invoices: numbered, approval-gated bills of billable quantities per lot.
//!
//! Billing is decoupled from recorded progress: advance billing is
//! legitimate in this domain. The reconciler surfaces
//! over-billing as a warning instead of blocking it here.

use crate::error::DomainError;
use crate::status::InvoiceStatus;
use crate::work_lot::{MeasurementUnit, WorkLot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One lot's row on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// The lot being billed.
    pub lot_id: i64,
    /// Lot name, copied at seeding time.
    pub name: String,
    /// Lot measurement unit, copied at seeding time.
    pub unit: MeasurementUnit,
    /// Contracted unit price, copied at seeding time.
    pub unit_price: Decimal,
    /// Quantity billed on this invoice.
    pub billed_quantity: Decimal,
    /// `billed_quantity × unit_price`.
    pub amount: Decimal,
}

impl InvoiceLine {
    /// Seeds a zero-quantity row for a lot.
    #[must_use]
    pub fn seed(lot: &WorkLot) -> Self {
        Self {
            lot_id: lot.lot_id,
            name: lot.name.clone(),
            unit: lot.unit,
            unit_price: lot.unit_price,
            billed_quantity: Decimal::ZERO,
            amount: Decimal::ZERO,
        }
    }

    /// Replaces the billed quantity and recomputes the line amount.
    pub fn set_billed(&mut self, billed_quantity: Decimal) {
        self.billed_quantity = billed_quantity;
        self.amount = line_amount(billed_quantity, self.unit_price);
    }
}

/// Line amount for a quantity at a unit price.
#[must_use]
pub fn line_amount(quantity: Decimal, unit_price: Decimal) -> Decimal {
    (quantity * unit_price).round_dp(2)
}

/// VAT amount for an ex-VAT total at a percentage rate.
#[must_use]
pub fn invoice_vat_amount(amount_ex_vat: Decimal, vat_rate: Decimal) -> Decimal {
    (amount_ex_vat * vat_rate / Decimal::ONE_HUNDRED).round_dp(2)
}

/// A dated, numbered, approval-gated bill (the "facturation").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Canonical identifier assigned by the database.
    pub invoice_id: i64,
    /// The site this invoice bills.
    pub site_id: i64,
    /// Per-site sequential number, independent of the snapshot counter.
    pub number: i32,
    /// Document date (ISO 8601).
    pub date: String,
    /// Billed period start (ISO 8601).
    pub period_start: String,
    /// Billed period end (ISO 8601).
    pub period_end: String,
    /// Workflow status.
    pub status: InvoiceStatus,
    /// VAT rate as a percentage (e.g., 19 for 19%).
    pub vat_rate: Decimal,
    /// One row per lot, in lot display order.
    pub lines: Vec<InvoiceLine>,
    /// Sum of line amounts.
    pub amount_ex_vat: Decimal,
    /// `amount_ex_vat × vat_rate / 100`.
    pub vat_amount: Decimal,
    /// `amount_ex_vat + vat_amount`.
    pub amount_inc_vat: Decimal,
    /// Acting user who created the invoice.
    pub created_by: i64,
}

impl Invoice {
    /// Recomputes the three totals from the lines.
    ///
    /// Idempotent: totals depend only on the final line values.
    pub fn recompute_totals(&mut self) {
        self.amount_ex_vat = self.lines.iter().map(|line| line.amount).sum();
        self.vat_amount = invoice_vat_amount(self.amount_ex_vat, self.vat_rate);
        self.amount_inc_vat = self.amount_ex_vat + self.vat_amount;
    }

    /// Validates that the invoice bills something.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyInvoice` if no line has a billed
    /// quantity greater than zero.
    pub fn validate_non_empty(&self) -> Result<(), DomainError> {
        if self
            .lines
            .iter()
            .any(|line| line.billed_quantity > Decimal::ZERO)
        {
            Ok(())
        } else {
            Err(DomainError::EmptyInvoice)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_invoice(lines: Vec<InvoiceLine>, vat_rate: Decimal) -> Invoice {
        Invoice {
            invoice_id: 1,
            site_id: 1,
            number: 1,
            date: String::from("2026-04-30"),
            period_start: String::from("2026-04-01"),
            period_end: String::from("2026-04-30"),
            status: InvoiceStatus::Draft,
            vat_rate,
            lines,
            amount_ex_vat: Decimal::ZERO,
            vat_amount: Decimal::ZERO,
            amount_inc_vat: Decimal::ZERO,
            created_by: 1,
        }
    }

    fn test_line(lot_id: i64, unit_price: Decimal, billed: Decimal) -> InvoiceLine {
        let mut line = InvoiceLine {
            lot_id,
            name: format!("Lot {lot_id}"),
            unit: MeasurementUnit::CubicMeter,
            unit_price,
            billed_quantity: Decimal::ZERO,
            amount: Decimal::ZERO,
        };
        line.set_billed(billed);
        line
    }

    #[test]
    fn test_vat_math() {
        // 70 m³ @ 50 with 19% VAT: 3500 ex, 665 VAT, 4165 inc.
        let mut invoice = test_invoice(vec![test_line(1, dec!(50), dec!(70))], dec!(19));
        invoice.recompute_totals();
        assert_eq!(invoice.amount_ex_vat, dec!(3500));
        assert_eq!(invoice.vat_amount, dec!(665));
        assert_eq!(invoice.amount_inc_vat, dec!(4165));
    }

    #[test]
    fn test_zero_vat_rate() {
        let mut invoice = test_invoice(vec![test_line(1, dec!(10), dec!(3))], Decimal::ZERO);
        invoice.recompute_totals();
        assert_eq!(invoice.vat_amount, Decimal::ZERO);
        assert_eq!(invoice.amount_inc_vat, dec!(30));
    }

    #[test]
    fn test_totals_recomputation_idempotent() {
        let mut invoice = test_invoice(
            vec![test_line(1, dec!(50), dec!(10)), test_line(2, dec!(7), dec!(4))],
            dec!(20),
        );
        invoice.recompute_totals();
        let first = (
            invoice.amount_ex_vat,
            invoice.vat_amount,
            invoice.amount_inc_vat,
        );

        invoice.lines[0].set_billed(dec!(99));
        invoice.recompute_totals();
        invoice.lines[0].set_billed(dec!(10));
        invoice.recompute_totals();

        assert_eq!(
            (
                invoice.amount_ex_vat,
                invoice.vat_amount,
                invoice.amount_inc_vat,
            ),
            first
        );
    }

    #[test]
    fn test_empty_invoice_rejected() {
        let mut line = test_line(1, dec!(50), dec!(0));
        line.set_billed(Decimal::ZERO);
        let invoice = test_invoice(vec![line], dec!(19));
        assert_eq!(invoice.validate_non_empty(), Err(DomainError::EmptyInvoice));

        let billed = test_invoice(vec![test_line(1, dec!(50), dec!(1))], dec!(19));
        assert!(billed.validate_non_empty().is_ok());
    }
}
