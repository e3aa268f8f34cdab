// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment ledger operations.
//!
//! Payments may exceed the amount of the invoice they link to; the
//! reconciler reports overpayment as a warning. What is rejected here
//! is structural: non-positive amounts, unknown invoices, and links
//! across site boundaries.

use std::str::FromStr;
use tracing::info;

use site_ledger_domain::{Payment, PaymentMethod, validate_payment_amount};
use site_ledger_persistence::Persistence;

use crate::billing::require_invoice;
use crate::catalog::require_site;
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::RecordPaymentRequest;

/// Records a received payment.
///
/// # Errors
///
/// Returns `NotFound` if the site or linked invoice does not exist, a
/// validation error for a non-positive amount, bad date or unknown
/// method, `Conflict` if the linked invoice belongs to another site,
/// or an internal error if persistence fails.
pub fn record_payment(
    persistence: &mut Persistence,
    request: &RecordPaymentRequest,
) -> Result<Payment, ApiError> {
    require_site(persistence, request.site_id)?;
    site_ledger_domain::parse_iso_date(&request.date).map_err(translate_domain_error)?;
    validate_payment_amount(request.amount).map_err(translate_domain_error)?;
    let method = PaymentMethod::from_str(&request.method).map_err(translate_domain_error)?;

    if let Some(invoice_id) = request.invoice_id {
        let invoice = require_invoice(persistence, invoice_id)?;
        if invoice.site_id != request.site_id {
            return Err(ApiError::Conflict {
                message: format!(
                    "Invoice {invoice_id} belongs to site {} and cannot settle a payment on site {}",
                    invoice.site_id, request.site_id
                ),
            });
        }
    }

    let mut payment = Payment {
        payment_id: 0,
        site_id: request.site_id,
        date: request.date.clone(),
        amount: request.amount,
        method,
        invoice_id: request.invoice_id,
        reference: request.reference.clone(),
        comment: request.comment.clone(),
    };
    payment.payment_id = persistence.insert_payment(&payment)?;

    info!(
        payment_id = payment.payment_id,
        site_id = request.site_id,
        invoice_id = ?request.invoice_id,
        "Payment recorded"
    );

    Ok(payment)
}

/// Removes a recorded payment.
///
/// # Errors
///
/// Returns `NotFound` if the payment does not exist, or an internal
/// error if persistence fails.
pub fn remove_payment(persistence: &mut Persistence, payment_id: i64) -> Result<(), ApiError> {
    persistence.delete_payment(payment_id)?;

    info!(payment_id, "Payment removed");

    Ok(())
}

/// Retrieves a payment.
///
/// # Errors
///
/// Returns `NotFound` if the payment does not exist.
pub fn get_payment(persistence: &mut Persistence, payment_id: i64) -> Result<Payment, ApiError> {
    persistence
        .get_payment(payment_id)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Payment"),
            message: format!("Payment with ID {payment_id} does not exist"),
        })
}

/// Lists a site's payments, optionally restricted to one invoice.
///
/// # Errors
///
/// Returns `NotFound` if the site does not exist, or an internal error
/// if the query fails.
pub fn list_payments(
    persistence: &mut Persistence,
    site_id: i64,
    invoice_id: Option<i64>,
) -> Result<Vec<Payment>, ApiError> {
    require_site(persistence, site_id)?;
    Ok(persistence.list_payments(site_id, invoice_id)?)
}
