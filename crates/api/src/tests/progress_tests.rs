// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Progress workflow tests: baseline seeding, lifecycle enforcement,
//! the monotonicity gate and carry-forward after approval.

use rust_decimal_macros::dec;

use crate::error::ApiError;
use crate::request_response::RecordProgressRequest;
use crate::tests::helpers::{create_test_lot, create_test_site, open_test_snapshot, test_db};
use crate::progress;
use site_ledger_domain::SnapshotStatus;

#[test]
fn test_open_draft_seeds_active_lots_at_zero() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);
    create_test_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));
    create_test_lot(&mut db, site_id, "Masonry", dec!(40), dec!(80));

    let snapshot = open_test_snapshot(&mut db, site_id);

    assert_eq!(snapshot.number, 1);
    assert_eq!(snapshot.status, SnapshotStatus::Draft);
    assert_eq!(snapshot.lines.len(), 2);
    assert!(snapshot.lines.iter().all(|l| l.realized_quantity == dec!(0)));
    assert_eq!(snapshot.cumulative_amount, dec!(0));
}

#[test]
fn test_record_progress_recomputes_totals() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);
    let lot = create_test_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));

    let snapshot = open_test_snapshot(&mut db, site_id);
    let updated = progress::record_progress(
        &mut db,
        snapshot.snapshot_id,
        &RecordProgressRequest {
            lot_id: lot.lot_id,
            realized_quantity: dec!(40),
        },
    )
    .expect("record progress");

    assert_eq!(updated.lines[0].realized_quantity, dec!(40));
    assert_eq!(updated.lines[0].amount, dec!(2000));
    assert_eq!(updated.cumulative_amount, dec!(2000));
    assert_eq!(updated.global_percent, dec!(40.00));

    let loaded = progress::get_snapshot(&mut db, snapshot.snapshot_id).expect("get snapshot");
    assert_eq!(loaded.cumulative_amount, dec!(2000));
}

#[test]
fn test_record_progress_rejects_negative_quantity() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);
    let lot = create_test_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));
    let snapshot = open_test_snapshot(&mut db, site_id);

    let result = progress::record_progress(
        &mut db,
        snapshot.snapshot_id,
        &RecordProgressRequest {
            lot_id: lot.lot_id,
            realized_quantity: dec!(-5),
        },
    );

    assert!(matches!(result, Err(ApiError::Validation { .. })));
}

#[test]
fn test_record_progress_on_unknown_line_is_not_found() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);
    create_test_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));
    let snapshot = open_test_snapshot(&mut db, site_id);

    let result = progress::record_progress(
        &mut db,
        snapshot.snapshot_id,
        &RecordProgressRequest {
            lot_id: 999,
            realized_quantity: dec!(10),
        },
    );

    assert!(matches!(result, Err(ApiError::NotFound { .. })));
}

#[test]
fn test_submitted_snapshot_is_locked() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);
    let lot = create_test_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));
    let snapshot = open_test_snapshot(&mut db, site_id);

    progress::submit_snapshot(&mut db, snapshot.snapshot_id).expect("submit");

    let result = progress::record_progress(
        &mut db,
        snapshot.snapshot_id,
        &RecordProgressRequest {
            lot_id: lot.lot_id,
            realized_quantity: dec!(10),
        },
    );

    assert!(matches!(result, Err(ApiError::InvalidState { .. })));
}

#[test]
fn test_approve_requires_submission() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);
    create_test_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));
    let snapshot = open_test_snapshot(&mut db, site_id);

    let result = progress::approve_snapshot(&mut db, snapshot.snapshot_id, 7);

    assert!(matches!(result, Err(ApiError::InvalidState { .. })));
}

#[test]
fn test_approval_stamps_and_carries_baselines_forward() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);
    let lot = create_test_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));

    let snapshot = open_test_snapshot(&mut db, site_id);
    progress::record_progress(
        &mut db,
        snapshot.snapshot_id,
        &RecordProgressRequest {
            lot_id: lot.lot_id,
            realized_quantity: dec!(40),
        },
    )
    .expect("record progress");
    progress::submit_snapshot(&mut db, snapshot.snapshot_id).expect("submit");

    let approved = progress::approve_snapshot(&mut db, snapshot.snapshot_id, 7).expect("approve");
    assert_eq!(approved.status, SnapshotStatus::Approved);
    assert_eq!(approved.approved_by, Some(7));
    assert!(approved.approved_at.is_some());

    // The next draft restates the approved state, not zero.
    let next = open_test_snapshot(&mut db, site_id);
    assert_eq!(next.number, 2);
    assert_eq!(next.lines[0].realized_quantity, dec!(40));
    assert_eq!(next.cumulative_amount, dec!(2000));
}

#[test]
fn test_regression_below_baseline_is_a_conflict() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);
    let lot = create_test_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));

    let first = open_test_snapshot(&mut db, site_id);
    progress::record_progress(
        &mut db,
        first.snapshot_id,
        &RecordProgressRequest {
            lot_id: lot.lot_id,
            realized_quantity: dec!(40),
        },
    )
    .expect("record progress");
    progress::submit_snapshot(&mut db, first.snapshot_id).expect("submit");
    progress::approve_snapshot(&mut db, first.snapshot_id, 7).expect("approve");

    let second = open_test_snapshot(&mut db, site_id);
    progress::record_progress(
        &mut db,
        second.snapshot_id,
        &RecordProgressRequest {
            lot_id: lot.lot_id,
            realized_quantity: dec!(30),
        },
    )
    .expect("record regression in draft");
    progress::submit_snapshot(&mut db, second.snapshot_id).expect("submit");

    let result = progress::approve_snapshot(&mut db, second.snapshot_id, 7);
    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_draft_snapshot_can_be_deleted() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);
    create_test_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));

    let snapshot = open_test_snapshot(&mut db, site_id);

    progress::delete_snapshot(&mut db, snapshot.snapshot_id).expect("delete");

    let result = progress::get_snapshot(&mut db, snapshot.snapshot_id);
    assert!(matches!(result, Err(ApiError::NotFound { .. })));
}

#[test]
fn test_only_drafts_are_deletable() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);
    create_test_lot(&mut db, site_id, "Earthworks", dec!(100), dec!(50));

    let snapshot = open_test_snapshot(&mut db, site_id);
    progress::submit_snapshot(&mut db, snapshot.snapshot_id).expect("submit");

    let result = progress::delete_snapshot(&mut db, snapshot.snapshot_id);
    assert!(matches!(result, Err(ApiError::InvalidState { .. })));

    progress::reject_snapshot(&mut db, snapshot.snapshot_id).expect("reject");

    let result = progress::delete_snapshot(&mut db, snapshot.snapshot_id);
    assert!(matches!(result, Err(ApiError::InvalidState { .. })));
}

#[test]
fn test_open_snapshot_rejects_inverted_period() {
    let mut db = test_db();
    let site_id = create_test_site(&mut db);

    let result = progress::open_draft_snapshot(
        &mut db,
        &crate::request_response::OpenSnapshotRequest {
            site_id,
            date: String::from("2026-03-31"),
            period_start: String::from("2026-03-31"),
            period_end: String::from("2026-03-01"),
            created_by: 1,
        },
    );

    assert!(matches!(result, Err(ApiError::Validation { .. })));
}
