// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared helpers for the API tests. Everything goes through the
//! operation functions so the tests exercise the same paths callers do.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use site_ledger_domain::{Invoice, ProgressSnapshot, WorkLot};
use site_ledger_persistence::Persistence;

use crate::request_response::{
    CreateLotRequest, CreateSiteRequest, OpenInvoiceRequest, OpenSnapshotRequest,
    RecordPaymentRequest,
};
use crate::{billing, catalog, progress};

pub fn test_db() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn create_test_site(db: &mut Persistence) -> i64 {
    catalog::create_site(
        db,
        &CreateSiteRequest {
            name: String::from("Riverside depot"),
            planned_budget: dec!(5000),
        },
    )
    .expect("create site")
    .site_id
}

pub fn create_test_lot(
    db: &mut Persistence,
    site_id: i64,
    name: &str,
    planned_quantity: Decimal,
    unit_price: Decimal,
) -> WorkLot {
    catalog::create_lot(
        db,
        &CreateLotRequest {
            site_id,
            name: name.to_string(),
            unit: String::from("m3"),
            planned_quantity,
            unit_price,
            position: 0,
        },
    )
    .expect("create lot")
}

pub fn open_test_snapshot(db: &mut Persistence, site_id: i64) -> ProgressSnapshot {
    progress::open_draft_snapshot(
        db,
        &OpenSnapshotRequest {
            site_id,
            date: String::from("2026-03-31"),
            period_start: String::from("2026-03-01"),
            period_end: String::from("2026-03-31"),
            created_by: 1,
        },
    )
    .expect("open snapshot")
}

pub fn open_test_invoice(db: &mut Persistence, site_id: i64, vat_rate: Decimal) -> Invoice {
    billing::open_draft_invoice(
        db,
        &OpenInvoiceRequest {
            site_id,
            date: String::from("2026-04-30"),
            period_start: String::from("2026-04-01"),
            period_end: String::from("2026-04-30"),
            vat_rate,
            created_by: 1,
        },
    )
    .expect("open invoice")
}

pub fn payment_request(site_id: i64, amount: Decimal, invoice_id: Option<i64>) -> RecordPaymentRequest {
    RecordPaymentRequest {
        site_id,
        date: String::from("2026-05-10"),
        amount,
        method: String::from("transfer"),
        invoice_id,
        reference: Some(String::from("TRF-2026-0420")),
        comment: None,
    }
}
