// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work lot catalog queries.

use crate::data_models::{WorkLotRow, decode_decimal, decode_enum};
use crate::diesel_schema::{invoice_lines, progress_lines, work_lots};
use crate::error::PersistenceError;
use diesel::prelude::*;
use site_ledger_domain::WorkLot;

/// Retrieves one lot.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn get_lot(
    conn: &mut SqliteConnection,
    lot_id: i64,
) -> Result<Option<WorkLot>, PersistenceError> {
    let row = work_lots::table
        .filter(work_lots::lot_id.eq(lot_id))
        .first::<WorkLotRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_lot: {e}")))?;

    row.map(row_to_lot).transpose()
}

/// Lists a site's lots in display order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_lots(
    conn: &mut SqliteConnection,
    site_id: i64,
    active_only: bool,
) -> Result<Vec<WorkLot>, PersistenceError> {
    let mut query = work_lots::table
        .filter(work_lots::site_id.eq(site_id))
        .into_boxed();
    if active_only {
        query = query.filter(work_lots::active.eq(1));
    }

    let rows = query
        .order((work_lots::position.asc(), work_lots::lot_id.asc()))
        .load::<WorkLotRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_lots: {e}")))?;

    rows.into_iter().map(row_to_lot).collect()
}

/// Checks whether any progress or invoice line references a lot.
///
/// Referenced lots may only be deactivated, never deleted.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn lot_is_referenced(
    conn: &mut SqliteConnection,
    lot_id: i64,
) -> Result<bool, PersistenceError> {
    let progress_refs: i64 = progress_lines::table
        .filter(progress_lines::lot_id.eq(lot_id))
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("lot_is_referenced: {e}")))?;
    if progress_refs > 0 {
        return Ok(true);
    }

    let invoice_refs: i64 = invoice_lines::table
        .filter(invoice_lines::lot_id.eq(lot_id))
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("lot_is_referenced: {e}")))?;
    Ok(invoice_refs > 0)
}

pub(crate) fn row_to_lot(row: WorkLotRow) -> Result<WorkLot, PersistenceError> {
    Ok(WorkLot {
        lot_id: row.lot_id,
        site_id: row.site_id,
        name: row.name,
        unit: decode_enum("unit", &row.unit)?,
        planned_quantity: decode_decimal("planned_quantity", &row.planned_quantity)?,
        unit_price: decode_decimal("unit_price", &row.unit_price)?,
        planned_amount: decode_decimal("planned_amount", &row.planned_amount)?,
        position: row.position,
        active: row.active != 0,
    })
}
