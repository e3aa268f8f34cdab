// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Billing ledger mutations.

use diesel::prelude::*;
use rust_decimal::Decimal;
use tracing::debug;

use crate::data_models::{NewInvoice, NewInvoiceLine};
use crate::diesel_schema::{invoice_lines, invoices};
use crate::error::PersistenceError;
use crate::mutations::counters::{KIND_INVOICE, allocate_number};
use crate::sqlite::get_last_insert_rowid;
use site_ledger_domain::{Invoice, InvoiceLine, InvoiceStatus};

/// Inserts a new invoice with its lines, allocating the next invoice
/// number for the site in the same transaction.
///
/// The `invoice_id` and `number` on the passed value are ignored.
/// Returns the assigned `(invoice_id, number)`.
///
/// # Errors
///
/// Returns an error if the database operation fails; the transaction
/// rolls back and the number is not consumed.
pub fn create_invoice(
    conn: &mut SqliteConnection,
    invoice: &Invoice,
) -> Result<(i64, i32), PersistenceError> {
    conn.transaction(|conn| {
        let number = allocate_number(conn, invoice.site_id, KIND_INVOICE)?;

        diesel::insert_into(invoices::table)
            .values(NewInvoice {
                site_id: invoice.site_id,
                number,
                date: invoice.date.clone(),
                period_start: invoice.period_start.clone(),
                period_end: invoice.period_end.clone(),
                status: invoice.status.as_str().to_string(),
                vat_rate: invoice.vat_rate.to_string(),
                amount_ex_vat: invoice.amount_ex_vat.to_string(),
                vat_amount: invoice.vat_amount.to_string(),
                amount_inc_vat: invoice.amount_inc_vat.to_string(),
                created_by: invoice.created_by,
            })
            .execute(conn)?;

        let invoice_id = get_last_insert_rowid(conn)?;

        for line in &invoice.lines {
            diesel::insert_into(invoice_lines::table)
                .values(NewInvoiceLine {
                    invoice_id,
                    lot_id: line.lot_id,
                    billed_quantity: line.billed_quantity.to_string(),
                    unit_price: line.unit_price.to_string(),
                    amount: line.amount.to_string(),
                })
                .execute(conn)?;
        }

        debug!(
            invoice_id,
            site_id = invoice.site_id,
            number,
            line_count = invoice.lines.len(),
            "Created invoice"
        );

        Ok((invoice_id, number))
    })
}

/// Updates one invoice line's billed quantity and the invoice's
/// recomputed totals in a single transaction, so an invoice never
/// shows a new line with stale totals or the reverse.
///
/// # Errors
///
/// Returns `NotFound` if the invoice does not exist or has no line for
/// the lot, or an error if the database operation fails. On any error
/// the whole update is rolled back.
pub fn update_line_and_totals(
    conn: &mut SqliteConnection,
    invoice_id: i64,
    line: &InvoiceLine,
    vat_rate: Decimal,
    amount_ex_vat: Decimal,
    vat_amount: Decimal,
    amount_inc_vat: Decimal,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        update_totals(
            conn,
            invoice_id,
            vat_rate,
            amount_ex_vat,
            vat_amount,
            amount_inc_vat,
        )?;

        let rows_affected = diesel::update(
            invoice_lines::table
                .filter(invoice_lines::invoice_id.eq(invoice_id))
                .filter(invoice_lines::lot_id.eq(line.lot_id)),
        )
        .set((
            invoice_lines::billed_quantity.eq(line.billed_quantity.to_string()),
            invoice_lines::amount.eq(line.amount.to_string()),
        ))
        .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Invoice {invoice_id} has no line for lot {}",
                line.lot_id
            )));
        }

        debug!(
            invoice_id,
            lot_id = line.lot_id,
            "Updated invoice line and totals"
        );

        Ok(())
    })
}

/// Updates an invoice's VAT rate and totals.
///
/// # Errors
///
/// Returns `NotFound` if the invoice does not exist, or an error if
/// the database operation fails.
pub fn update_totals(
    conn: &mut SqliteConnection,
    invoice_id: i64,
    vat_rate: Decimal,
    amount_ex_vat: Decimal,
    vat_amount: Decimal,
    amount_inc_vat: Decimal,
) -> Result<(), PersistenceError> {
    let rows_affected =
        diesel::update(invoices::table.filter(invoices::invoice_id.eq(invoice_id)))
            .set((
                invoices::vat_rate.eq(vat_rate.to_string()),
                invoices::amount_ex_vat.eq(amount_ex_vat.to_string()),
                invoices::vat_amount.eq(vat_amount.to_string()),
                invoices::amount_inc_vat.eq(amount_inc_vat.to_string()),
            ))
            .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Invoice with ID {invoice_id} not found"
        )));
    }

    Ok(())
}

/// Sets an invoice's status.
///
/// The caller validates the transition against the workflow table; this
/// only records the outcome.
///
/// # Errors
///
/// Returns `NotFound` if the invoice does not exist, or an error if
/// the database operation fails.
pub fn set_status(
    conn: &mut SqliteConnection,
    invoice_id: i64,
    status: InvoiceStatus,
) -> Result<(), PersistenceError> {
    let rows_affected =
        diesel::update(invoices::table.filter(invoices::invoice_id.eq(invoice_id)))
            .set(invoices::status.eq(status.as_str()))
            .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Invoice with ID {invoice_id} not found"
        )));
    }

    debug!(invoice_id, status = status.as_str(), "Set invoice status");

    Ok(())
}

/// Deletes an invoice with its lines.
///
/// The caller ensures the invoice is still a draft; payments linked to
/// the invoice make the delete fail on the foreign key, surfaced as a
/// conflict.
///
/// # Errors
///
/// Returns `NotFound` if the invoice does not exist, or an error if
/// the database operation fails.
pub fn delete_invoice(conn: &mut SqliteConnection, invoice_id: i64) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        diesel::delete(invoice_lines::table.filter(invoice_lines::invoice_id.eq(invoice_id)))
            .execute(conn)?;

        let rows_affected =
            diesel::delete(invoices::table.filter(invoices::invoice_id.eq(invoice_id)))
                .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Invoice with ID {invoice_id} not found"
            )));
        }

        debug!(invoice_id, "Deleted invoice");

        Ok(())
    })
}
