// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Billing ledger operations: the draft → submitted → approved or
//! rejected workflow over invoices, with approved → paid on top.
//!
//! Billing is not gated on recorded progress. Advance billing is
//! legitimate; the reconciler flags it per lot instead of this module
//! rejecting it.

use rust_decimal::Decimal;
use tracing::info;

use site_ledger_domain::{
    Invoice, InvoiceLine, InvoiceStatus, validate_period, validate_quantity, validate_vat_rate,
};
use site_ledger_persistence::Persistence;

use crate::catalog::require_site;
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{OpenInvoiceRequest, SetBilledQuantityRequest};

/// Opens a draft invoice with a zero-quantity line per active lot.
///
/// # Errors
///
/// Returns `NotFound` if the site does not exist, a validation error
/// for bad dates or VAT rate, or an internal error if persistence
/// fails.
pub fn open_draft_invoice(
    persistence: &mut Persistence,
    request: &OpenInvoiceRequest,
) -> Result<Invoice, ApiError> {
    require_site(persistence, request.site_id)?;
    site_ledger_domain::parse_iso_date(&request.date).map_err(translate_domain_error)?;
    validate_period(&request.period_start, &request.period_end).map_err(translate_domain_error)?;
    validate_vat_rate(request.vat_rate).map_err(translate_domain_error)?;

    let lots = persistence.list_lots(request.site_id, true)?;
    let lines: Vec<InvoiceLine> = lots.iter().map(InvoiceLine::seed).collect();

    let mut invoice = Invoice {
        invoice_id: 0,
        site_id: request.site_id,
        number: 0,
        date: request.date.clone(),
        period_start: request.period_start.clone(),
        period_end: request.period_end.clone(),
        status: InvoiceStatus::Draft,
        vat_rate: request.vat_rate,
        lines,
        amount_ex_vat: Decimal::ZERO,
        vat_amount: Decimal::ZERO,
        amount_inc_vat: Decimal::ZERO,
        created_by: request.created_by,
    };
    invoice.recompute_totals();

    let (invoice_id, number) = persistence.create_invoice(&invoice)?;
    invoice.invoice_id = invoice_id;
    invoice.number = number;

    info!(
        invoice_id,
        site_id = request.site_id,
        number,
        "Draft invoice opened"
    );

    Ok(invoice)
}

/// Sets the billed quantity on one line of a draft invoice and
/// recomputes the totals.
///
/// # Errors
///
/// Returns `NotFound` for a missing invoice or line, `InvalidState`
/// if the invoice is no longer editable, a validation error for a
/// negative quantity, or an internal error if persistence fails.
pub fn set_billed_quantity(
    persistence: &mut Persistence,
    invoice_id: i64,
    request: &SetBilledQuantityRequest,
) -> Result<Invoice, ApiError> {
    validate_quantity("billed_quantity", request.billed_quantity)
        .map_err(translate_domain_error)?;

    let mut invoice = require_invoice(persistence, invoice_id)?;
    ensure_editable(&invoice)?;

    let line = invoice
        .lines
        .iter_mut()
        .find(|line| line.lot_id == request.lot_id)
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Invoice line"),
            message: format!("Invoice {invoice_id} has no line for lot {}", request.lot_id),
        })?;
    line.set_billed(request.billed_quantity);
    let updated_line = line.clone();
    invoice.recompute_totals();

    persistence.update_invoice_line_and_totals(
        invoice_id,
        &updated_line,
        invoice.vat_rate,
        invoice.amount_ex_vat,
        invoice.vat_amount,
        invoice.amount_inc_vat,
    )?;

    Ok(invoice)
}

/// Changes the VAT rate of a draft invoice and recomputes the totals.
///
/// # Errors
///
/// Returns `NotFound` for a missing invoice, `InvalidState` if the
/// invoice is no longer editable, a validation error for a rate
/// outside 0..=100, or an internal error if persistence fails.
pub fn set_vat_rate(
    persistence: &mut Persistence,
    invoice_id: i64,
    vat_rate: Decimal,
) -> Result<Invoice, ApiError> {
    validate_vat_rate(vat_rate).map_err(translate_domain_error)?;

    let mut invoice = require_invoice(persistence, invoice_id)?;
    ensure_editable(&invoice)?;

    invoice.vat_rate = vat_rate;
    invoice.recompute_totals();

    persistence.update_invoice_totals(
        invoice_id,
        invoice.vat_rate,
        invoice.amount_ex_vat,
        invoice.vat_amount,
        invoice.amount_inc_vat,
    )?;

    Ok(invoice)
}

/// Submits a draft invoice for approval.
///
/// An invoice that bills nothing cannot be submitted.
///
/// # Errors
///
/// Returns `NotFound` for a missing invoice, `InvalidState` if the
/// workflow forbids the transition, a validation error for an empty
/// invoice, or an internal error if persistence fails.
pub fn submit_invoice(
    persistence: &mut Persistence,
    invoice_id: i64,
) -> Result<Invoice, ApiError> {
    let mut invoice = require_invoice(persistence, invoice_id)?;
    invoice
        .status
        .validate_transition(InvoiceStatus::Submitted)
        .map_err(translate_domain_error)?;
    invoice.validate_non_empty().map_err(translate_domain_error)?;

    persistence.set_invoice_status(invoice_id, InvoiceStatus::Submitted)?;
    invoice.status = InvoiceStatus::Submitted;

    info!(invoice_id, "Invoice submitted");

    Ok(invoice)
}

/// Approves a submitted invoice. From this point it counts toward the
/// site's invoiced total.
///
/// # Errors
///
/// Returns `NotFound` for a missing invoice, `InvalidState` if the
/// workflow forbids the transition, or an internal error if
/// persistence fails.
pub fn approve_invoice(
    persistence: &mut Persistence,
    invoice_id: i64,
) -> Result<Invoice, ApiError> {
    transition_invoice(persistence, invoice_id, InvoiceStatus::Approved)
}

/// Rejects a submitted invoice.
///
/// # Errors
///
/// Returns `NotFound` for a missing invoice, `InvalidState` if the
/// workflow forbids the transition, or an internal error if
/// persistence fails.
pub fn reject_invoice(
    persistence: &mut Persistence,
    invoice_id: i64,
) -> Result<Invoice, ApiError> {
    transition_invoice(persistence, invoice_id, InvoiceStatus::Rejected)
}

/// Marks an approved invoice as paid.
///
/// This is a manual confirmation, independent of recorded payments;
/// the reconciler reports the derived settlement alongside it.
///
/// # Errors
///
/// Returns `NotFound` for a missing invoice, `InvalidState` if the
/// workflow forbids the transition, or an internal error if
/// persistence fails.
pub fn mark_invoice_paid(
    persistence: &mut Persistence,
    invoice_id: i64,
) -> Result<Invoice, ApiError> {
    transition_invoice(persistence, invoice_id, InvoiceStatus::Paid)
}

/// Deletes a draft invoice.
///
/// # Errors
///
/// Returns `NotFound` for a missing invoice, `InvalidState` for any
/// non-draft invoice, `Conflict` if payments link to it, or an
/// internal error if persistence fails.
pub fn delete_invoice(persistence: &mut Persistence, invoice_id: i64) -> Result<(), ApiError> {
    let invoice = require_invoice(persistence, invoice_id)?;
    if invoice.status != InvoiceStatus::Draft {
        return Err(ApiError::InvalidState {
            message: format!(
                "Invoice {invoice_id} is '{}' and cannot be deleted",
                invoice.status
            ),
        });
    }

    persistence.delete_invoice(invoice_id)?;

    info!(invoice_id, "Invoice deleted");

    Ok(())
}

/// Retrieves an invoice with its lines.
///
/// # Errors
///
/// Returns `NotFound` if the invoice does not exist.
pub fn get_invoice(persistence: &mut Persistence, invoice_id: i64) -> Result<Invoice, ApiError> {
    require_invoice(persistence, invoice_id)
}

/// Lists a site's invoices in number order.
///
/// # Errors
///
/// Returns `NotFound` if the site does not exist, or an internal error
/// if the query fails.
pub fn list_invoices(
    persistence: &mut Persistence,
    site_id: i64,
) -> Result<Vec<Invoice>, ApiError> {
    require_site(persistence, site_id)?;
    Ok(persistence.list_invoices(site_id)?)
}

fn transition_invoice(
    persistence: &mut Persistence,
    invoice_id: i64,
    to: InvoiceStatus,
) -> Result<Invoice, ApiError> {
    let mut invoice = require_invoice(persistence, invoice_id)?;
    invoice
        .status
        .validate_transition(to)
        .map_err(translate_domain_error)?;

    persistence.set_invoice_status(invoice_id, to)?;
    invoice.status = to;

    info!(invoice_id, status = to.as_str(), "Invoice status changed");

    Ok(invoice)
}

fn ensure_editable(invoice: &Invoice) -> Result<(), ApiError> {
    if invoice.status.is_editable() {
        Ok(())
    } else {
        Err(ApiError::InvalidState {
            message: format!(
                "Invoice {} is '{}' and cannot be edited",
                invoice.invoice_id, invoice.status
            ),
        })
    }
}

pub(crate) fn require_invoice(
    persistence: &mut Persistence,
    invoice_id: i64,
) -> Result<Invoice, ApiError> {
    persistence
        .get_invoice(invoice_id)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Invoice"),
            message: format!("Invoice with ID {invoice_id} does not exist"),
        })
}
