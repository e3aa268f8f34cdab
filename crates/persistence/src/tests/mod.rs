// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod billing_tests;
mod initialization_tests;
mod payment_tests;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::Persistence;
use site_ledger_domain::{
    Invoice, InvoiceLine, InvoiceStatus, LotProgress, MeasurementUnit, ProgressSnapshot,
    SnapshotStatus, WorkLot, invoice_vat_amount,
};

pub fn test_db() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn seed_site(db: &mut Persistence) -> i64 {
    db.create_site("Riverside depot", dec!(5000))
        .expect("create site")
}

/// Inserts a lot and returns it with its assigned ID.
pub fn seed_lot(
    db: &mut Persistence,
    site_id: i64,
    name: &str,
    planned_quantity: Decimal,
    unit_price: Decimal,
) -> WorkLot {
    let mut lot = WorkLot {
        lot_id: 0,
        site_id,
        name: name.to_string(),
        unit: MeasurementUnit::CubicMeter,
        planned_quantity,
        unit_price,
        planned_amount: WorkLot::planned_amount(planned_quantity, unit_price),
        position: 0,
        active: true,
    };
    lot.lot_id = db.insert_lot(&lot).expect("insert lot");
    lot
}

pub fn draft_snapshot(site_id: i64, lines: Vec<LotProgress>) -> ProgressSnapshot {
    let mut snapshot = ProgressSnapshot {
        snapshot_id: 0,
        site_id,
        number: 0,
        date: String::from("2026-03-31"),
        period_start: String::from("2026-03-01"),
        period_end: String::from("2026-03-31"),
        status: SnapshotStatus::Draft,
        lines,
        global_percent: Decimal::ZERO,
        cumulative_amount: Decimal::ZERO,
        created_by: 1,
        approved_at: None,
        approved_by: None,
    };
    snapshot.recompute_totals();
    snapshot
}

pub fn draft_invoice(site_id: i64, vat_rate: Decimal, lines: Vec<InvoiceLine>) -> Invoice {
    let amount_ex_vat: Decimal = lines.iter().map(|line| line.amount).sum();
    let vat_amount = invoice_vat_amount(amount_ex_vat, vat_rate);
    Invoice {
        invoice_id: 0,
        site_id,
        number: 0,
        date: String::from("2026-04-05"),
        period_start: String::from("2026-03-01"),
        period_end: String::from("2026-03-31"),
        status: InvoiceStatus::Draft,
        vat_rate,
        lines,
        amount_ex_vat,
        vat_amount,
        amount_inc_vat: amount_ex_vat + vat_amount,
        created_by: 1,
    }
}
