// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Progress ledger mutations.
//!
//! Snapshot creation and approval are multi-table writes and run in a
//! transaction: creation pairs the document insert with its number
//! allocation, approval pairs the status stamp with the baseline
//! upserts.

use diesel::prelude::*;
use rust_decimal::Decimal;
use tracing::debug;

use crate::data_models::{NewProgressLine, NewSnapshot};
use crate::diesel_schema::{progress_baselines, progress_lines, progress_snapshots};
use crate::error::PersistenceError;
use crate::mutations::counters::{KIND_SNAPSHOT, allocate_number};
use crate::sqlite::get_last_insert_rowid;
use site_ledger_domain::{LotProgress, ProgressSnapshot, SnapshotStatus};

/// Inserts a new snapshot with its lines, allocating the next snapshot
/// number for the site in the same transaction.
///
/// The `snapshot_id` and `number` on the passed value are ignored.
/// Returns the assigned `(snapshot_id, number)`.
///
/// # Errors
///
/// Returns an error if the database operation fails; the transaction
/// rolls back and the number is not consumed.
pub fn create_snapshot(
    conn: &mut SqliteConnection,
    snapshot: &ProgressSnapshot,
) -> Result<(i64, i32), PersistenceError> {
    conn.transaction(|conn| {
        let number = allocate_number(conn, snapshot.site_id, KIND_SNAPSHOT)?;

        diesel::insert_into(progress_snapshots::table)
            .values(NewSnapshot {
                site_id: snapshot.site_id,
                number,
                date: snapshot.date.clone(),
                period_start: snapshot.period_start.clone(),
                period_end: snapshot.period_end.clone(),
                status: snapshot.status.as_str().to_string(),
                global_percent: snapshot.global_percent.to_string(),
                cumulative_amount: snapshot.cumulative_amount.to_string(),
                created_by: snapshot.created_by,
            })
            .execute(conn)?;

        let snapshot_id = get_last_insert_rowid(conn)?;

        for line in &snapshot.lines {
            diesel::insert_into(progress_lines::table)
                .values(NewProgressLine {
                    snapshot_id,
                    lot_id: line.lot_id,
                    realized_quantity: line.realized_quantity.to_string(),
                    percent: line.percent.to_string(),
                    amount: line.amount.to_string(),
                })
                .execute(conn)?;
        }

        debug!(
            snapshot_id,
            site_id = snapshot.site_id,
            number,
            line_count = snapshot.lines.len(),
            "Created progress snapshot"
        );

        Ok((snapshot_id, number))
    })
}

/// Updates one snapshot line's realized quantity and the snapshot's
/// recomputed totals in a single transaction, so a snapshot never
/// shows a new line with stale totals or the reverse.
///
/// # Errors
///
/// Returns `NotFound` if the snapshot does not exist or has no line
/// for the lot, or an error if the database operation fails. On any
/// error the whole update is rolled back.
pub fn update_line_and_totals(
    conn: &mut SqliteConnection,
    snapshot_id: i64,
    line: &LotProgress,
    global_percent: Decimal,
    cumulative_amount: Decimal,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        let rows_affected = diesel::update(
            progress_snapshots::table.filter(progress_snapshots::snapshot_id.eq(snapshot_id)),
        )
        .set((
            progress_snapshots::global_percent.eq(global_percent.to_string()),
            progress_snapshots::cumulative_amount.eq(cumulative_amount.to_string()),
        ))
        .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Snapshot with ID {snapshot_id} not found"
            )));
        }

        let rows_affected = diesel::update(
            progress_lines::table
                .filter(progress_lines::snapshot_id.eq(snapshot_id))
                .filter(progress_lines::lot_id.eq(line.lot_id)),
        )
        .set((
            progress_lines::realized_quantity.eq(line.realized_quantity.to_string()),
            progress_lines::percent.eq(line.percent.to_string()),
            progress_lines::amount.eq(line.amount.to_string()),
        ))
        .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Snapshot {snapshot_id} has no line for lot {}",
                line.lot_id
            )));
        }

        debug!(
            snapshot_id,
            lot_id = line.lot_id,
            "Updated snapshot line and totals"
        );

        Ok(())
    })
}

/// Sets a snapshot's status.
///
/// The caller validates the transition against the workflow table; this
/// only records the outcome.
///
/// # Errors
///
/// Returns `NotFound` if the snapshot does not exist, or an error if
/// the database operation fails.
pub fn set_status(
    conn: &mut SqliteConnection,
    snapshot_id: i64,
    status: SnapshotStatus,
) -> Result<(), PersistenceError> {
    let rows_affected = diesel::update(
        progress_snapshots::table.filter(progress_snapshots::snapshot_id.eq(snapshot_id)),
    )
    .set(progress_snapshots::status.eq(status.as_str()))
    .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Snapshot with ID {snapshot_id} not found"
        )));
    }

    debug!(snapshot_id, status = status.as_str(), "Set snapshot status");

    Ok(())
}

/// Approves a snapshot: stamps the approval and materializes the new
/// per-lot baselines, all in one transaction.
///
/// The passed snapshot must carry the lines as loaded from the
/// database; each line's realized quantity becomes the site's new
/// baseline for that lot.
///
/// # Errors
///
/// Returns an error if the database operation fails; the transaction
/// rolls back and neither the stamp nor the baselines are written.
pub fn approve_snapshot(
    conn: &mut SqliteConnection,
    snapshot: &ProgressSnapshot,
    approved_by: i64,
    approved_at: &str,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        let rows_affected = diesel::update(
            progress_snapshots::table
                .filter(progress_snapshots::snapshot_id.eq(snapshot.snapshot_id)),
        )
        .set((
            progress_snapshots::status.eq(SnapshotStatus::Approved.as_str()),
            progress_snapshots::approved_at.eq(approved_at),
            progress_snapshots::approved_by.eq(approved_by),
        ))
        .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Snapshot with ID {} not found",
                snapshot.snapshot_id
            )));
        }

        for line in &snapshot.lines {
            diesel::insert_into(progress_baselines::table)
                .values((
                    progress_baselines::site_id.eq(snapshot.site_id),
                    progress_baselines::lot_id.eq(line.lot_id),
                    progress_baselines::snapshot_id.eq(snapshot.snapshot_id),
                    progress_baselines::realized_quantity.eq(line.realized_quantity.to_string()),
                ))
                .on_conflict((progress_baselines::site_id, progress_baselines::lot_id))
                .do_update()
                .set((
                    progress_baselines::snapshot_id.eq(snapshot.snapshot_id),
                    progress_baselines::realized_quantity.eq(line.realized_quantity.to_string()),
                ))
                .execute(conn)?;
        }

        debug!(
            snapshot_id = snapshot.snapshot_id,
            site_id = snapshot.site_id,
            approved_by,
            baseline_count = snapshot.lines.len(),
            "Approved progress snapshot"
        );

        Ok(())
    })
}

/// Deletes a snapshot with its lines.
///
/// The caller ensures the snapshot is still editable; approved
/// snapshots are never deleted because baselines reference them.
///
/// # Errors
///
/// Returns `NotFound` if the snapshot does not exist, or an error if
/// the database operation fails.
pub fn delete_snapshot(
    conn: &mut SqliteConnection,
    snapshot_id: i64,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        diesel::delete(progress_lines::table.filter(progress_lines::snapshot_id.eq(snapshot_id)))
            .execute(conn)?;

        let rows_affected = diesel::delete(
            progress_snapshots::table.filter(progress_snapshots::snapshot_id.eq(snapshot_id)),
        )
        .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Snapshot with ID {snapshot_id} not found"
            )));
        }

        debug!(snapshot_id, "Deleted progress snapshot");

        Ok(())
    })
}
