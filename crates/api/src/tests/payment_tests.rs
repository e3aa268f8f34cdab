// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment ledger tests: validation, invoice linking and removal.

use rust_decimal_macros::dec;

use crate::error::ApiError;
use crate::request_response::SetBilledQuantityRequest;
use crate::tests::helpers::{
    create_test_lot, create_test_site, open_test_invoice, payment_request, test_db,
};
use crate::{billing, payments};
use site_ledger_domain::PaymentMethod;

#[test]
fn test_record_unlinked_payment() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);

    let payment = payments::record_payment(&mut db, &payment_request(site_id, dec!(2000), None))
        .expect("record payment");

    assert!(payment.payment_id > 0);
    assert_eq!(payment.method, PaymentMethod::Transfer);
    assert_eq!(payment.invoice_id, None);

    let loaded = payments::get_payment(&mut db, payment.payment_id).expect("get payment");
    assert_eq!(loaded.amount, dec!(2000));
    assert_eq!(loaded.reference.as_deref(), Some("TRF-2026-0420"));
}

#[test]
fn test_zero_amount_is_rejected() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);

    let result = payments::record_payment(&mut db, &payment_request(site_id, dec!(0), None));

    assert!(matches!(result, Err(ApiError::Validation { .. })));
}

#[test]
fn test_unknown_method_is_rejected() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);

    let mut request = payment_request(site_id, dec!(100), None);
    request.method = String::from("barter");

    let result = payments::record_payment(&mut db, &request);

    assert!(matches!(result, Err(ApiError::Validation { .. })));
}

#[test]
fn test_link_to_unknown_invoice_is_not_found() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);

    let result = payments::record_payment(&mut db, &payment_request(site_id, dec!(100), Some(999)));

    assert!(matches!(result, Err(ApiError::NotFound { .. })));
}

#[test]
fn test_link_to_another_sites_invoice_is_a_conflict() {
    let mut db = test_db();
    let site_a = create_test_site(&mut db);
    let site_b = create_test_site(&mut db);
    create_test_lot(&mut db, site_b, "Earthworks", dec!(100), dec!(50));
    let invoice = open_test_invoice(&mut db, site_b, dec!(19));

    let result = payments::record_payment(
        &mut db,
        &payment_request(site_a, dec!(100), Some(invoice.invoice_id)),
    );

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_listing_filters_by_invoice() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);
    let lot = create_test_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));
    let invoice = open_test_invoice(&mut db, site_id, dec!(19));
    billing::set_billed_quantity(
        &mut db,
        invoice.invoice_id,
        &SetBilledQuantityRequest {
            lot_id: lot.lot_id,
            billed_quantity: dec!(70),
        },
    )
    .expect("set billed quantity");

    payments::record_payment(
        &mut db,
        &payment_request(site_id, dec!(2000), Some(invoice.invoice_id)),
    )
    .expect("linked payment");
    payments::record_payment(&mut db, &payment_request(site_id, dec!(500), None))
        .expect("unlinked payment");

    let all = payments::list_payments(&mut db, site_id, None).expect("list all");
    assert_eq!(all.len(), 2);

    let linked = payments::list_payments(&mut db, site_id, Some(invoice.invoice_id))
        .expect("list linked");
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].amount, dec!(2000));
}

#[test]
fn test_remove_payment() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);
    let payment = payments::record_payment(&mut db, &payment_request(site_id, dec!(2000), None))
        .expect("record payment");

    payments::remove_payment(&mut db, payment.payment_id).expect("remove");

    let result = payments::get_payment(&mut db, payment.payment_id);
    assert!(matches!(result, Err(ApiError::NotFound { .. })));
}
