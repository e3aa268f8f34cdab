// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The financial reconciler: a pure read-side fold over the three
//! ledgers producing one consistent snapshot per site.
//!
//! Nothing here mutates state. Soft invariants (overpayment,
//! billing ahead of progress) are reported as warning flags,
//! never as errors.

use crate::billing::Invoice;
use crate::payment::Payment;
use crate::progress::{ProgressBaseline, progress_percent};
use crate::status::InvoiceStatus;
use crate::work_lot::{MeasurementUnit, WorkLot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-lot planned / realized / billed recap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotRecap {
    /// The lot.
    pub lot_id: i64,
    /// Lot name.
    pub name: String,
    /// Lot measurement unit.
    pub unit: MeasurementUnit,
    /// Contracted quantity.
    pub planned_quantity: Decimal,
    /// Contracted amount.
    pub planned_amount: Decimal,
    /// Cumulative approved realized quantity.
    pub realized_quantity: Decimal,
    /// Realized quantity valued at the contracted unit price.
    pub realized_amount: Decimal,
    /// Total quantity billed across counted invoices.
    pub billed_quantity: Decimal,
    /// Billed quantity valued at the contracted unit price.
    pub billed_amount: Decimal,
    /// Completion percentage, capped at 100.
    pub percent: Decimal,
    /// Soft-invariant flag: billed quantity exceeds realized quantity.
    pub over_billed: bool,
}

/// Per-invoice settlement view derived from linked payments.
///
/// `settled` is computed, not stored: it can disagree with the manual
/// `paid` status, and that disagreement is the point: drift between
/// confirmation and cash is made visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSettlement {
    /// The invoice.
    pub invoice_id: i64,
    /// The invoice's per-site number.
    pub number: i32,
    /// Stored workflow status.
    pub status: InvoiceStatus,
    /// Amount including VAT.
    pub amount_inc_vat: Decimal,
    /// Sum of payments linked to this invoice.
    pub paid_amount: Decimal,
    /// Whether linked payments cover the invoice amount.
    pub settled: bool,
}

/// The derived reconciliation of a site: budget vs billed vs paid vs due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSituation {
    /// The site this situation reconciles.
    pub site_id: i64,
    /// Site-level budget figure, sourced from the site registry.
    pub planned_budget: Decimal,
    /// Sum of `amount_inc_vat` over approved and paid invoices.
    pub total_invoiced: Decimal,
    /// Sum of all payments for the site, linked or not.
    pub total_paid: Decimal,
    /// `total_invoiced − total_paid`.
    pub remaining_due: Decimal,
    /// Soft-invariant flag: payments exceed the invoiced total.
    pub overpaid: bool,
    /// Per-lot recap, in lot display order.
    pub lots: Vec<LotRecap>,
    /// Per-invoice settlement views, counted invoices only.
    pub invoices: Vec<InvoiceSettlement>,
}

/// Computes the financial situation of a site from its three ledgers.
///
/// Only invoices whose status counts as invoiced (approved or paid)
/// contribute to totals and recaps; draft, submitted and rejected
/// invoices are invisible here. Payments all count, linked or not.
#[must_use]
pub fn compute_situation(
    site_id: i64,
    planned_budget: Decimal,
    lots: &[WorkLot],
    baselines: &[ProgressBaseline],
    invoices: &[Invoice],
    payments: &[Payment],
) -> FinancialSituation {
    let counted: Vec<&Invoice> = invoices
        .iter()
        .filter(|invoice| invoice.status.counts_as_invoiced())
        .collect();

    let total_invoiced: Decimal = counted.iter().map(|invoice| invoice.amount_inc_vat).sum();
    let total_paid: Decimal = payments.iter().map(|payment| payment.amount).sum();

    let lot_recaps = lots
        .iter()
        .map(|lot| {
            let realized_quantity = baselines
                .iter()
                .find(|b| b.lot_id == lot.lot_id)
                .map_or(Decimal::ZERO, |b| b.realized_quantity);
            let billed_quantity: Decimal = counted
                .iter()
                .flat_map(|invoice| &invoice.lines)
                .filter(|line| line.lot_id == lot.lot_id)
                .map(|line| line.billed_quantity)
                .sum();
            LotRecap {
                lot_id: lot.lot_id,
                name: lot.name.clone(),
                unit: lot.unit,
                planned_quantity: lot.planned_quantity,
                planned_amount: lot.planned_amount,
                realized_quantity,
                realized_amount: (realized_quantity * lot.unit_price).round_dp(2),
                billed_quantity,
                billed_amount: (billed_quantity * lot.unit_price).round_dp(2),
                percent: progress_percent(lot.planned_quantity, realized_quantity),
                over_billed: billed_quantity > realized_quantity,
            }
        })
        .collect();

    let settlements = counted
        .iter()
        .map(|invoice| {
            let paid_amount: Decimal = payments
                .iter()
                .filter(|payment| payment.invoice_id == Some(invoice.invoice_id))
                .map(|payment| payment.amount)
                .sum();
            InvoiceSettlement {
                invoice_id: invoice.invoice_id,
                number: invoice.number,
                status: invoice.status,
                amount_inc_vat: invoice.amount_inc_vat,
                paid_amount,
                settled: paid_amount >= invoice.amount_inc_vat,
            }
        })
        .collect();

    FinancialSituation {
        site_id,
        planned_budget,
        total_invoiced,
        total_paid,
        remaining_due: total_invoiced - total_paid,
        overpaid: total_paid > total_invoiced,
        lots: lot_recaps,
        invoices: settlements,
    }
}
