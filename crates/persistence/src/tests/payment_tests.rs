// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment ledger persistence tests.

use rust_decimal_macros::dec;

use crate::PersistenceError;
use crate::tests::{draft_invoice, seed_lot, seed_site, test_db};
use site_ledger_domain::{InvoiceLine, Payment, PaymentMethod};

fn test_payment(site_id: i64, invoice_id: Option<i64>) -> Payment {
    Payment {
        payment_id: 0,
        site_id,
        date: String::from("2026-04-20"),
        amount: dec!(2000),
        method: PaymentMethod::Transfer,
        invoice_id,
        reference: Some(String::from("TRF-2026-0420")),
        comment: None,
    }
}

#[test]
fn test_payment_round_trip() {
    let mut db = test_db();
    let site_id = seed_site(&mut db);

    let payment = test_payment(site_id, None);
    let payment_id = db.insert_payment(&payment).unwrap();

    let loaded = db.get_payment(payment_id).unwrap().unwrap();
    assert_eq!(loaded.amount, dec!(2000));
    assert_eq!(loaded.method, PaymentMethod::Transfer);
    assert_eq!(loaded.invoice_id, None);
    assert_eq!(loaded.reference.as_deref(), Some("TRF-2026-0420"));
}

#[test]
fn test_list_payments_with_invoice_filter() {
    let mut db = test_db();
    let site_id = seed_site(&mut db);
    let lot = seed_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));

    let invoice = draft_invoice(site_id, dec!(19), vec![InvoiceLine::seed(&lot)]);
    let (invoice_id, _) = db.create_invoice(&invoice).unwrap();

    db.insert_payment(&test_payment(site_id, Some(invoice_id)))
        .unwrap();
    db.insert_payment(&test_payment(site_id, None)).unwrap();

    let all = db.list_payments(site_id, None).unwrap();
    assert_eq!(all.len(), 2);

    let linked = db.list_payments(site_id, Some(invoice_id)).unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].invoice_id, Some(invoice_id));
}

#[test]
fn test_payment_with_unknown_invoice_rejected() {
    let mut db = test_db();
    let site_id = seed_site(&mut db);

    // Foreign key enforcement rejects the dangling invoice link.
    let result = db.insert_payment(&test_payment(site_id, Some(12345)));
    assert!(result.is_err());
}

#[test]
fn test_delete_payment() {
    let mut db = test_db();
    let site_id = seed_site(&mut db);

    let payment_id = db.insert_payment(&test_payment(site_id, None)).unwrap();
    db.delete_payment(payment_id).unwrap();

    assert!(db.get_payment(payment_id).unwrap().is_none());

    let result = db.delete_payment(payment_id);
    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}
