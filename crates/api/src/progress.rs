// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Progress ledger operations: the draft → submitted → approved or
//! rejected workflow over cumulative snapshots.
//!
//! Drafts seed from the approved carry-forward baselines so every new
//! snapshot starts at the last approved state. Monotonicity is enforced
//! once, at approval: cumulative quantities may never fall below the
//! baseline that was current when the gate is passed.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

use site_ledger_domain::{
    LotProgress, ProgressSnapshot, SnapshotStatus, validate_period, validate_quantity,
};
use site_ledger_persistence::Persistence;

use crate::catalog::require_site;
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{OpenSnapshotRequest, RecordProgressRequest};

/// Opens a draft snapshot seeded from the site's active lots.
///
/// Each line starts at the lot's approved carry-forward baseline, so a
/// fresh draft restates the approved state of the site rather than
/// zero.
///
/// # Errors
///
/// Returns `NotFound` if the site does not exist, a validation error
/// for bad dates, or an internal error if persistence fails.
pub fn open_draft_snapshot(
    persistence: &mut Persistence,
    request: &OpenSnapshotRequest,
) -> Result<ProgressSnapshot, ApiError> {
    require_site(persistence, request.site_id)?;
    site_ledger_domain::parse_iso_date(&request.date).map_err(translate_domain_error)?;
    validate_period(&request.period_start, &request.period_end).map_err(translate_domain_error)?;

    let lots = persistence.list_lots(request.site_id, true)?;
    let baselines = persistence.get_baselines(request.site_id)?;

    let lines: Vec<LotProgress> = lots
        .iter()
        .map(|lot| {
            let baseline = baselines
                .iter()
                .find(|b| b.lot_id == lot.lot_id)
                .map_or(rust_decimal::Decimal::ZERO, |b| b.realized_quantity);
            LotProgress::seed(lot, baseline)
        })
        .collect();

    let mut snapshot = ProgressSnapshot {
        snapshot_id: 0,
        site_id: request.site_id,
        number: 0,
        date: request.date.clone(),
        period_start: request.period_start.clone(),
        period_end: request.period_end.clone(),
        status: SnapshotStatus::Draft,
        lines,
        global_percent: rust_decimal::Decimal::ZERO,
        cumulative_amount: rust_decimal::Decimal::ZERO,
        created_by: request.created_by,
        approved_at: None,
        approved_by: None,
    };
    snapshot.recompute_totals();

    let (snapshot_id, number) = persistence.create_snapshot(&snapshot)?;
    snapshot.snapshot_id = snapshot_id;
    snapshot.number = number;

    info!(
        snapshot_id,
        site_id = request.site_id,
        number,
        "Draft snapshot opened"
    );

    Ok(snapshot)
}

/// Records a cumulative realized quantity on one line of a draft
/// snapshot and recomputes the totals.
///
/// # Errors
///
/// Returns `NotFound` for a missing snapshot or line, `InvalidState`
/// if the snapshot is no longer editable, a validation error for a
/// negative quantity, or an internal error if persistence fails.
pub fn record_progress(
    persistence: &mut Persistence,
    snapshot_id: i64,
    request: &RecordProgressRequest,
) -> Result<ProgressSnapshot, ApiError> {
    validate_quantity("realized_quantity", request.realized_quantity)
        .map_err(translate_domain_error)?;

    let mut snapshot = require_snapshot(persistence, snapshot_id)?;
    if !snapshot.status.is_editable() {
        return Err(ApiError::InvalidState {
            message: format!(
                "Snapshot {snapshot_id} is '{}' and cannot be edited",
                snapshot.status
            ),
        });
    }

    let line = snapshot
        .lines
        .iter_mut()
        .find(|line| line.lot_id == request.lot_id)
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Snapshot line"),
            message: format!(
                "Snapshot {snapshot_id} has no line for lot {}",
                request.lot_id
            ),
        })?;
    line.set_realized(request.realized_quantity);
    let updated_line = line.clone();
    snapshot.recompute_totals();

    persistence.update_snapshot_line_and_totals(
        snapshot_id,
        &updated_line,
        snapshot.global_percent,
        snapshot.cumulative_amount,
    )?;

    Ok(snapshot)
}

/// Submits a draft snapshot for approval.
///
/// # Errors
///
/// Returns `NotFound` for a missing snapshot, `InvalidState` if the
/// workflow forbids the transition, or an internal error if
/// persistence fails.
pub fn submit_snapshot(
    persistence: &mut Persistence,
    snapshot_id: i64,
) -> Result<ProgressSnapshot, ApiError> {
    let mut snapshot = require_snapshot(persistence, snapshot_id)?;
    snapshot
        .status
        .validate_transition(SnapshotStatus::Submitted)
        .map_err(translate_domain_error)?;

    persistence.set_snapshot_status(snapshot_id, SnapshotStatus::Submitted)?;
    snapshot.status = SnapshotStatus::Submitted;

    info!(snapshot_id, "Snapshot submitted");

    Ok(snapshot)
}

/// Approves a submitted snapshot.
///
/// The monotonicity gate runs here: every line must be at or above the
/// site's approved baseline for its lot. On success the snapshot's
/// lines become the new baselines, transactionally with the stamp.
///
/// # Errors
///
/// Returns `NotFound` for a missing snapshot, `InvalidState` if the
/// workflow forbids the transition, `Conflict` if any line regresses
/// below its baseline, or an internal error if persistence fails.
pub fn approve_snapshot(
    persistence: &mut Persistence,
    snapshot_id: i64,
    approved_by: i64,
) -> Result<ProgressSnapshot, ApiError> {
    let mut snapshot = require_snapshot(persistence, snapshot_id)?;
    snapshot
        .status
        .validate_transition(SnapshotStatus::Approved)
        .map_err(translate_domain_error)?;

    let baselines = persistence.get_baselines(snapshot.site_id)?;
    snapshot
        .validate_against_baselines(&baselines)
        .map_err(translate_domain_error)?;

    let approved_at = now_iso()?;
    persistence.approve_snapshot(&snapshot, approved_by, &approved_at)?;

    snapshot.status = SnapshotStatus::Approved;
    snapshot.approved_at = Some(approved_at);
    snapshot.approved_by = Some(approved_by);

    info!(snapshot_id, approved_by, "Snapshot approved");

    Ok(snapshot)
}

/// Rejects a submitted snapshot.
///
/// # Errors
///
/// Returns `NotFound` for a missing snapshot, `InvalidState` if the
/// workflow forbids the transition, or an internal error if
/// persistence fails.
pub fn reject_snapshot(
    persistence: &mut Persistence,
    snapshot_id: i64,
) -> Result<ProgressSnapshot, ApiError> {
    let mut snapshot = require_snapshot(persistence, snapshot_id)?;
    snapshot
        .status
        .validate_transition(SnapshotStatus::Rejected)
        .map_err(translate_domain_error)?;

    persistence.set_snapshot_status(snapshot_id, SnapshotStatus::Rejected)?;
    snapshot.status = SnapshotStatus::Rejected;

    info!(snapshot_id, "Snapshot rejected");

    Ok(snapshot)
}

/// Deletes a draft snapshot.
///
/// Anything past draft is history: approved snapshots back the
/// baselines, and submitted or rejected ones document the workflow.
///
/// # Errors
///
/// Returns `NotFound` for a missing snapshot, `InvalidState` for any
/// non-draft snapshot, or an internal error if persistence fails.
pub fn delete_snapshot(persistence: &mut Persistence, snapshot_id: i64) -> Result<(), ApiError> {
    let snapshot = require_snapshot(persistence, snapshot_id)?;
    if snapshot.status != SnapshotStatus::Draft {
        return Err(ApiError::InvalidState {
            message: format!(
                "Snapshot {snapshot_id} is '{}' and cannot be deleted",
                snapshot.status
            ),
        });
    }

    persistence.delete_snapshot(snapshot_id)?;

    info!(snapshot_id, "Snapshot deleted");

    Ok(())
}

/// Retrieves a snapshot with its lines.
///
/// # Errors
///
/// Returns `NotFound` if the snapshot does not exist.
pub fn get_snapshot(
    persistence: &mut Persistence,
    snapshot_id: i64,
) -> Result<ProgressSnapshot, ApiError> {
    require_snapshot(persistence, snapshot_id)
}

/// Lists a site's snapshots in number order.
///
/// # Errors
///
/// Returns `NotFound` if the site does not exist, or an internal error
/// if the query fails.
pub fn list_snapshots(
    persistence: &mut Persistence,
    site_id: i64,
) -> Result<Vec<ProgressSnapshot>, ApiError> {
    require_site(persistence, site_id)?;
    Ok(persistence.list_snapshots(site_id)?)
}

fn require_snapshot(
    persistence: &mut Persistence,
    snapshot_id: i64,
) -> Result<ProgressSnapshot, ApiError> {
    persistence
        .get_snapshot(snapshot_id)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Snapshot"),
            message: format!("Snapshot with ID {snapshot_id} does not exist"),
        })
}

pub(crate) fn now_iso() -> Result<String, ApiError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format timestamp: {e}"),
        })
}
