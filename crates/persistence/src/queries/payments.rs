// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment ledger queries.

use crate::data_models::{PaymentRow, decode_decimal, decode_enum};
use crate::diesel_schema::payments;
use crate::error::PersistenceError;
use diesel::prelude::*;
use site_ledger_domain::Payment;

/// Retrieves one payment.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn get_payment(
    conn: &mut SqliteConnection,
    payment_id: i64,
) -> Result<Option<Payment>, PersistenceError> {
    let row = payments::table
        .filter(payments::payment_id.eq(payment_id))
        .first::<PaymentRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_payment: {e}")))?;

    row.map(row_to_payment).transpose()
}

/// Lists a site's payments in receipt order, optionally restricted to
/// those linked to one invoice.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_payments(
    conn: &mut SqliteConnection,
    site_id: i64,
    invoice_id: Option<i64>,
) -> Result<Vec<Payment>, PersistenceError> {
    let mut query = payments::table
        .filter(payments::site_id.eq(site_id))
        .into_boxed();
    if let Some(invoice_id) = invoice_id {
        query = query.filter(payments::invoice_id.eq(invoice_id));
    }

    let rows = query
        .order(payments::payment_id.asc())
        .load::<PaymentRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_payments: {e}")))?;

    rows.into_iter().map(row_to_payment).collect()
}

fn row_to_payment(row: PaymentRow) -> Result<Payment, PersistenceError> {
    Ok(Payment {
        payment_id: row.payment_id,
        site_id: row.site_id,
        date: row.date,
        amount: decode_decimal("amount", &row.amount)?,
        method: decode_enum("method", &row.method)?,
        invoice_id: row.invoice_id,
        reference: row.reference,
        comment: row.comment,
    })
}
