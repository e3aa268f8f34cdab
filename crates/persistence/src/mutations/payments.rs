// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment ledger mutations. The ledger is append-and-delete only;
//! recorded payments are never edited in place.

use diesel::prelude::*;
use tracing::debug;

use crate::data_models::NewPayment;
use crate::diesel_schema::payments;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;
use site_ledger_domain::Payment;

/// Inserts a new payment and returns its assigned ID.
///
/// The `payment_id` on the passed value is ignored.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_payment(
    conn: &mut SqliteConnection,
    payment: &Payment,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(payments::table)
        .values(NewPayment {
            site_id: payment.site_id,
            date: payment.date.clone(),
            amount: payment.amount.to_string(),
            method: payment.method.as_str().to_string(),
            invoice_id: payment.invoice_id,
            reference: payment.reference.clone(),
            comment: payment.comment.clone(),
        })
        .execute(conn)?;

    let payment_id = get_last_insert_rowid(conn)?;

    debug!(
        payment_id,
        site_id = payment.site_id,
        invoice_id = ?payment.invoice_id,
        "Inserted payment"
    );

    Ok(payment_id)
}

/// Deletes a payment.
///
/// # Errors
///
/// Returns `NotFound` if the payment does not exist, or an error if
/// the database operation fails.
pub fn delete_payment(conn: &mut SqliteConnection, payment_id: i64) -> Result<(), PersistenceError> {
    let rows_affected =
        diesel::delete(payments::table.filter(payments::payment_id.eq(payment_id)))
            .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Payment with ID {payment_id} not found"
        )));
    }

    debug!(payment_id, "Deleted payment");

    Ok(())
}
