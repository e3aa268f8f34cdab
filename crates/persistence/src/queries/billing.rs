// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Billing ledger queries.

use crate::data_models::{InvoiceLineRow, InvoiceRow, decode_decimal, decode_enum};
use crate::diesel_schema::{invoice_lines, invoices, work_lots};
use crate::error::PersistenceError;
use diesel::prelude::*;
use site_ledger_domain::{Invoice, InvoiceLine};

/// Retrieves one invoice with its lines.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn get_invoice(
    conn: &mut SqliteConnection,
    invoice_id: i64,
) -> Result<Option<Invoice>, PersistenceError> {
    let row = invoices::table
        .filter(invoices::invoice_id.eq(invoice_id))
        .first::<InvoiceRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_invoice: {e}")))?;

    match row {
        Some(row) => {
            let lines = load_lines(conn, row.invoice_id)?;
            Ok(Some(row_to_invoice(row, lines)?))
        }
        None => Ok(None),
    }
}

/// Lists a site's invoices in number order, lines included.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_invoices(
    conn: &mut SqliteConnection,
    site_id: i64,
) -> Result<Vec<Invoice>, PersistenceError> {
    let rows = invoices::table
        .filter(invoices::site_id.eq(site_id))
        .order(invoices::number.asc())
        .load::<InvoiceRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_invoices: {e}")))?;

    rows.into_iter()
        .map(|row| {
            let lines = load_lines(conn, row.invoice_id)?;
            row_to_invoice(row, lines)
        })
        .collect()
}

fn load_lines(
    conn: &mut SqliteConnection,
    invoice_id: i64,
) -> Result<Vec<InvoiceLine>, PersistenceError> {
    let rows = invoice_lines::table
        .inner_join(work_lots::table)
        .filter(invoice_lines::invoice_id.eq(invoice_id))
        .order(invoice_lines::line_id.asc())
        .select((invoice_lines::all_columns, work_lots::name, work_lots::unit))
        .load::<(InvoiceLineRow, String, String)>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("load_lines: {e}")))?;

    rows.into_iter()
        .map(|(row, name, unit)| {
            Ok(InvoiceLine {
                lot_id: row.lot_id,
                name,
                unit: decode_enum("unit", &unit)?,
                unit_price: decode_decimal("unit_price", &row.unit_price)?,
                billed_quantity: decode_decimal("billed_quantity", &row.billed_quantity)?,
                amount: decode_decimal("amount", &row.amount)?,
            })
        })
        .collect()
}

fn row_to_invoice(row: InvoiceRow, lines: Vec<InvoiceLine>) -> Result<Invoice, PersistenceError> {
    Ok(Invoice {
        invoice_id: row.invoice_id,
        site_id: row.site_id,
        number: row.number,
        date: row.date,
        period_start: row.period_start,
        period_end: row.period_end,
        status: decode_enum("status", &row.status)?,
        vat_rate: decode_decimal("vat_rate", &row.vat_rate)?,
        lines,
        amount_ex_vat: decode_decimal("amount_ex_vat", &row.amount_ex_vat)?,
        vat_amount: decode_decimal("vat_amount", &row.vat_amount)?,
        amount_inc_vat: decode_decimal("amount_inc_vat", &row.amount_inc_vat)?,
        created_by: row.created_by,
    })
}
