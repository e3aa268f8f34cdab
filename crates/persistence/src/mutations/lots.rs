// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work lot catalog mutations.

use diesel::prelude::*;
use tracing::debug;

use crate::data_models::NewWorkLot;
use crate::diesel_schema::work_lots;
use crate::error::PersistenceError;
use crate::queries::lots::lot_is_referenced;
use crate::sqlite::get_last_insert_rowid;
use site_ledger_domain::WorkLot;

/// Inserts a new work lot and returns its assigned ID.
///
/// The `lot_id` on the passed value is ignored; the database assigns
/// the canonical identifier.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_lot(conn: &mut SqliteConnection, lot: &WorkLot) -> Result<i64, PersistenceError> {
    diesel::insert_into(work_lots::table)
        .values(NewWorkLot {
            site_id: lot.site_id,
            name: lot.name.clone(),
            unit: lot.unit.as_str().to_string(),
            planned_quantity: lot.planned_quantity.to_string(),
            unit_price: lot.unit_price.to_string(),
            planned_amount: lot.planned_amount.to_string(),
            position: lot.position,
            active: i32::from(lot.active),
        })
        .execute(conn)?;

    let lot_id = get_last_insert_rowid(conn)?;

    debug!(lot_id, site_id = lot.site_id, name = %lot.name, "Inserted work lot");

    Ok(lot_id)
}

/// Updates a work lot's descriptive and pricing fields.
///
/// # Errors
///
/// Returns `NotFound` if the lot does not exist, or an error if the
/// database operation fails.
pub fn update_lot(conn: &mut SqliteConnection, lot: &WorkLot) -> Result<(), PersistenceError> {
    let rows_affected = diesel::update(work_lots::table.filter(work_lots::lot_id.eq(lot.lot_id)))
        .set((
            work_lots::name.eq(&lot.name),
            work_lots::unit.eq(lot.unit.as_str()),
            work_lots::planned_quantity.eq(lot.planned_quantity.to_string()),
            work_lots::unit_price.eq(lot.unit_price.to_string()),
            work_lots::planned_amount.eq(lot.planned_amount.to_string()),
            work_lots::position.eq(lot.position),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Work lot with ID {} not found",
            lot.lot_id
        )));
    }

    debug!(lot_id = lot.lot_id, "Updated work lot");

    Ok(())
}

/// Activates or deactivates a work lot.
///
/// Deactivated lots stay referenceable by existing documents but are
/// excluded from new drafts.
///
/// # Errors
///
/// Returns `NotFound` if the lot does not exist, or an error if the
/// database operation fails.
pub fn set_lot_active(
    conn: &mut SqliteConnection,
    lot_id: i64,
    active: bool,
) -> Result<(), PersistenceError> {
    let rows_affected = diesel::update(work_lots::table.filter(work_lots::lot_id.eq(lot_id)))
        .set(work_lots::active.eq(i32::from(active)))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Work lot with ID {lot_id} not found"
        )));
    }

    debug!(lot_id, active, "Set work lot active flag");

    Ok(())
}

/// Deletes a work lot that no document references.
///
/// # Errors
///
/// Returns `LotReferenced` if any progress or invoice line points at
/// the lot, `NotFound` if it does not exist, or an error if the
/// database operation fails.
pub fn delete_lot(conn: &mut SqliteConnection, lot_id: i64) -> Result<(), PersistenceError> {
    if lot_is_referenced(conn, lot_id)? {
        return Err(PersistenceError::LotReferenced { lot_id });
    }

    let rows_affected =
        diesel::delete(work_lots::table.filter(work_lots::lot_id.eq(lot_id))).execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Work lot with ID {lot_id} not found"
        )));
    }

    debug!(lot_id, "Deleted work lot");

    Ok(())
}
