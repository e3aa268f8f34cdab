// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod billing;
mod error;
mod payment;
mod progress;
mod situation;
mod status;
mod validation;
mod work_lot;

#[cfg(test)]
mod tests;

pub use billing::{Invoice, InvoiceLine, invoice_vat_amount, line_amount};
pub use error::DomainError;
pub use payment::{Payment, PaymentMethod};
pub use progress::{
    LotProgress, ProgressBaseline, ProgressSnapshot, global_percent, progress_percent,
};
pub use situation::{FinancialSituation, InvoiceSettlement, LotRecap, compute_situation};
pub use status::{InvoiceStatus, SnapshotStatus};
pub use validation::{
    parse_iso_date, validate_lot_fields, validate_payment_amount, validate_period,
    validate_quantity, validate_vat_rate,
};
pub use work_lot::{MeasurementUnit, WorkLot};
