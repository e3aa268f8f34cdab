// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Progress ledger queries.
//!
//! Snapshot lines store only the recorded quantities; the lot metadata
//! on each line (name, unit, planned quantity, unit price) is joined
//! from the catalog, which is safe because referenced lots are never
//! hard-deleted.

use crate::data_models::{ProgressLineRow, SnapshotRow, decode_decimal, decode_enum};
use crate::diesel_schema::{progress_baselines, progress_lines, progress_snapshots, work_lots};
use crate::error::PersistenceError;
use diesel::prelude::*;
use site_ledger_domain::{LotProgress, ProgressBaseline, ProgressSnapshot};

/// Retrieves one snapshot with its lines.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn get_snapshot(
    conn: &mut SqliteConnection,
    snapshot_id: i64,
) -> Result<Option<ProgressSnapshot>, PersistenceError> {
    let row = progress_snapshots::table
        .filter(progress_snapshots::snapshot_id.eq(snapshot_id))
        .first::<SnapshotRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_snapshot: {e}")))?;

    match row {
        Some(row) => {
            let lines = load_lines(conn, row.snapshot_id)?;
            Ok(Some(row_to_snapshot(row, lines)?))
        }
        None => Ok(None),
    }
}

/// Lists a site's snapshots in number order, lines included.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_snapshots(
    conn: &mut SqliteConnection,
    site_id: i64,
) -> Result<Vec<ProgressSnapshot>, PersistenceError> {
    let rows = progress_snapshots::table
        .filter(progress_snapshots::site_id.eq(site_id))
        .order(progress_snapshots::number.asc())
        .load::<SnapshotRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_snapshots: {e}")))?;

    rows.into_iter()
        .map(|row| {
            let lines = load_lines(conn, row.snapshot_id)?;
            row_to_snapshot(row, lines)
        })
        .collect()
}

/// Retrieves the approved carry-forward baselines for a site.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn get_baselines(
    conn: &mut SqliteConnection,
    site_id: i64,
) -> Result<Vec<ProgressBaseline>, PersistenceError> {
    let rows = progress_baselines::table
        .filter(progress_baselines::site_id.eq(site_id))
        .order(progress_baselines::lot_id.asc())
        .select((progress_baselines::lot_id, progress_baselines::realized_quantity))
        .load::<(i64, String)>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("get_baselines: {e}")))?;

    rows.into_iter()
        .map(|(lot_id, realized_quantity)| {
            Ok(ProgressBaseline {
                lot_id,
                realized_quantity: decode_decimal("realized_quantity", &realized_quantity)?,
            })
        })
        .collect()
}

fn load_lines(
    conn: &mut SqliteConnection,
    snapshot_id: i64,
) -> Result<Vec<LotProgress>, PersistenceError> {
    let rows = progress_lines::table
        .inner_join(work_lots::table)
        .filter(progress_lines::snapshot_id.eq(snapshot_id))
        .order(progress_lines::line_id.asc())
        .select((
            progress_lines::all_columns,
            work_lots::name,
            work_lots::unit,
            work_lots::planned_quantity,
            work_lots::unit_price,
        ))
        .load::<(ProgressLineRow, String, String, String, String)>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("load_lines: {e}")))?;

    rows.into_iter()
        .map(|(row, name, unit, planned_quantity, unit_price)| {
            Ok(LotProgress {
                lot_id: row.lot_id,
                name,
                unit: decode_enum("unit", &unit)?,
                planned_quantity: decode_decimal("planned_quantity", &planned_quantity)?,
                unit_price: decode_decimal("unit_price", &unit_price)?,
                realized_quantity: decode_decimal("realized_quantity", &row.realized_quantity)?,
                percent: decode_decimal("percent", &row.percent)?,
                amount: decode_decimal("amount", &row.amount)?,
            })
        })
        .collect()
}

fn row_to_snapshot(
    row: SnapshotRow,
    lines: Vec<LotProgress>,
) -> Result<ProgressSnapshot, PersistenceError> {
    Ok(ProgressSnapshot {
        snapshot_id: row.snapshot_id,
        site_id: row.site_id,
        number: row.number,
        date: row.date,
        period_start: row.period_start,
        period_end: row.period_end,
        status: decode_enum("status", &row.status)?,
        lines,
        global_percent: decode_decimal("global_percent", &row.global_percent)?,
        cumulative_amount: decode_decimal("cumulative_amount", &row.cumulative_amount)?,
        created_by: row.created_by,
        approved_at: row.approved_at,
        approved_by: row.approved_by,
    })
}
