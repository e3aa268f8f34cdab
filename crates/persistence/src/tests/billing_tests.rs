// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Billing ledger persistence tests.

use rust_decimal_macros::dec;

use crate::PersistenceError;
use crate::tests::{draft_invoice, seed_lot, seed_site, test_db};
use site_ledger_domain::{InvoiceLine, InvoiceStatus};

#[test]
fn test_invoice_round_trip() {
    let mut db = test_db();
    let site_id = seed_site(&mut db);
    let lot = seed_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));

    let mut line = InvoiceLine::seed(&lot);
    line.set_billed(dec!(70));
    let invoice = draft_invoice(site_id, dec!(19), vec![line]);
    let (invoice_id, number) = db.create_invoice(&invoice).unwrap();

    let loaded = db.get_invoice(invoice_id).unwrap().unwrap();
    assert_eq!(loaded.number, number);
    assert_eq!(loaded.status, InvoiceStatus::Draft);
    assert_eq!(loaded.vat_rate, dec!(19));
    assert_eq!(loaded.amount_ex_vat, dec!(3500));
    assert_eq!(loaded.vat_amount, dec!(665));
    assert_eq!(loaded.amount_inc_vat, dec!(4165));
    assert_eq!(loaded.lines.len(), 1);
    assert_eq!(loaded.lines[0].name, "Earthworks");
    assert_eq!(loaded.lines[0].billed_quantity, dec!(70));
}

#[test]
fn test_line_unit_price_survives_lot_repricing() {
    let mut db = test_db();
    let site_id = seed_site(&mut db);
    let mut lot = seed_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));

    let mut line = InvoiceLine::seed(&lot);
    line.set_billed(dec!(10));
    let invoice = draft_invoice(site_id, dec!(19), vec![line]);
    let (invoice_id, _) = db.create_invoice(&invoice).unwrap();

    // Repricing the lot later must not rewrite history.
    lot.unit_price = dec!(99);
    lot.planned_amount = dec!(9900);
    db.update_lot(&lot).unwrap();

    let loaded = db.get_invoice(invoice_id).unwrap().unwrap();
    assert_eq!(loaded.lines[0].unit_price, dec!(50));
    assert_eq!(loaded.lines[0].amount, dec!(500));
}

#[test]
fn test_update_line_and_totals() {
    let mut db = test_db();
    let site_id = seed_site(&mut db);
    let lot = seed_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));

    let invoice = draft_invoice(site_id, dec!(19), vec![InvoiceLine::seed(&lot)]);
    let (invoice_id, _) = db.create_invoice(&invoice).unwrap();

    let mut line = invoice.lines[0].clone();
    line.set_billed(dec!(70));
    db.update_invoice_line_and_totals(
        invoice_id,
        &line,
        dec!(19),
        dec!(3500),
        dec!(665),
        dec!(4165),
    )
    .unwrap();

    let loaded = db.get_invoice(invoice_id).unwrap().unwrap();
    assert_eq!(loaded.lines[0].billed_quantity, dec!(70));
    assert_eq!(loaded.amount_inc_vat, dec!(4165));
}

#[test]
fn test_update_for_unknown_lot_rolls_back_totals() {
    let mut db = test_db();
    let site_id = seed_site(&mut db);
    let lot = seed_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));

    let invoice = draft_invoice(site_id, dec!(19), vec![InvoiceLine::seed(&lot)]);
    let (invoice_id, _) = db.create_invoice(&invoice).unwrap();

    let mut stray = invoice.lines[0].clone();
    stray.lot_id = 999;
    let result = db.update_invoice_line_and_totals(
        invoice_id,
        &stray,
        dec!(19),
        dec!(9999),
        dec!(1899.81),
        dec!(11898.81),
    );
    assert!(matches!(result, Err(PersistenceError::NotFound(_))));

    // The failed line write must take the totals write down with it.
    let loaded = db.get_invoice(invoice_id).unwrap().unwrap();
    assert_eq!(loaded.amount_ex_vat, invoice.amount_ex_vat);
    assert_eq!(loaded.amount_inc_vat, invoice.amount_inc_vat);
}

#[test]
fn test_status_stamping() {
    let mut db = test_db();
    let site_id = seed_site(&mut db);
    let lot = seed_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));

    let invoice = draft_invoice(site_id, dec!(19), vec![InvoiceLine::seed(&lot)]);
    let (invoice_id, _) = db.create_invoice(&invoice).unwrap();

    db.set_invoice_status(invoice_id, InvoiceStatus::Submitted)
        .unwrap();
    db.set_invoice_status(invoice_id, InvoiceStatus::Approved)
        .unwrap();
    db.set_invoice_status(invoice_id, InvoiceStatus::Paid).unwrap();

    let loaded = db.get_invoice(invoice_id).unwrap().unwrap();
    assert_eq!(loaded.status, InvoiceStatus::Paid);
}

#[test]
fn test_set_status_on_missing_invoice_is_not_found() {
    let mut db = test_db();
    let result = db.set_invoice_status(404, InvoiceStatus::Submitted);
    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_delete_invoice_removes_lines() {
    let mut db = test_db();
    let site_id = seed_site(&mut db);
    let lot = seed_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));

    let invoice = draft_invoice(site_id, dec!(19), vec![InvoiceLine::seed(&lot)]);
    let (invoice_id, _) = db.create_invoice(&invoice).unwrap();

    db.delete_invoice(invoice_id).unwrap();
    assert!(db.get_invoice(invoice_id).unwrap().is_none());
    assert!(!db.lot_is_referenced(lot.lot_id).unwrap());
}

#[test]
fn test_list_invoices_ordered_by_number() {
    let mut db = test_db();
    let site_id = seed_site(&mut db);
    let lot = seed_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));

    let invoice = draft_invoice(site_id, dec!(19), vec![InvoiceLine::seed(&lot)]);
    db.create_invoice(&invoice).unwrap();
    db.create_invoice(&invoice).unwrap();

    let invoices = db.list_invoices(site_id).unwrap();
    assert_eq!(invoices.len(), 2);
    assert_eq!(invoices[0].number, 1);
    assert_eq!(invoices[1].number, 2);
}
