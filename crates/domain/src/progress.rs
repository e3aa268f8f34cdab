// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Progress snapshots: numbered, approval-gated records of cumulative
//! realized quantity per lot.
//!
//! Quantities are cumulative, never incremental: each snapshot restates
//! how much total work exists on every lot. Totals are always recomputed
//! from the lines, never adjusted in place.

use crate::error::DomainError;
use crate::status::SnapshotStatus;
use crate::work_lot::{MeasurementUnit, WorkLot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One lot's row in a progress snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotProgress {
    /// The lot this row tracks.
    pub lot_id: i64,
    /// Lot name, copied at seeding time.
    pub name: String,
    /// Lot measurement unit, copied at seeding time.
    pub unit: MeasurementUnit,
    /// Contracted quantity, copied at seeding time.
    pub planned_quantity: Decimal,
    /// Contracted unit price, copied at seeding time.
    pub unit_price: Decimal,
    /// Cumulative realized quantity.
    pub realized_quantity: Decimal,
    /// `min(100, realized / planned × 100)`.
    pub percent: Decimal,
    /// `realized_quantity × unit_price`.
    pub amount: Decimal,
}

impl LotProgress {
    /// Seeds a row for a lot with a given cumulative quantity
    /// (the carry-forward baseline, or 0 for a first snapshot).
    #[must_use]
    pub fn seed(lot: &WorkLot, realized_quantity: Decimal) -> Self {
        Self {
            lot_id: lot.lot_id,
            name: lot.name.clone(),
            unit: lot.unit,
            planned_quantity: lot.planned_quantity,
            unit_price: lot.unit_price,
            realized_quantity,
            percent: progress_percent(lot.planned_quantity, realized_quantity),
            amount: (realized_quantity * lot.unit_price).round_dp(2),
        }
    }

    /// Replaces the cumulative quantity and recomputes the derived fields.
    pub fn set_realized(&mut self, realized_quantity: Decimal) {
        self.realized_quantity = realized_quantity;
        self.percent = progress_percent(self.planned_quantity, realized_quantity);
        self.amount = (realized_quantity * self.unit_price).round_dp(2);
    }
}

/// Completion percentage for a lot, capped at 100.
///
/// A lot with no planned quantity reports 0 rather than dividing by zero.
#[must_use]
pub fn progress_percent(planned_quantity: Decimal, realized_quantity: Decimal) -> Decimal {
    if planned_quantity.is_zero() {
        return Decimal::ZERO;
    }
    let hundred = Decimal::ONE_HUNDRED;
    let percent = (realized_quantity / planned_quantity * hundred).round_dp(2);
    percent.min(hundred)
}

/// Amount-weighted completion percentage across a snapshot's lines:
/// `Σ amount / Σ (planned_quantity × unit_price) × 100`.
#[must_use]
pub fn global_percent(lines: &[LotProgress]) -> Decimal {
    let planned_total: Decimal = lines
        .iter()
        .map(|line| line.planned_quantity * line.unit_price)
        .sum();
    if planned_total.is_zero() {
        return Decimal::ZERO;
    }
    let realized_total: Decimal = lines.iter().map(|line| line.amount).sum();
    (realized_total / planned_total * Decimal::ONE_HUNDRED).round_dp(2)
}

/// A dated, numbered, approval-gated record of cumulative work per lot
/// (the "PV d'avancement").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Canonical identifier assigned by the database.
    pub snapshot_id: i64,
    /// The site this snapshot covers.
    pub site_id: i64,
    /// Per-site sequential number, starting at 1; never reused.
    pub number: i32,
    /// Document date (ISO 8601).
    pub date: String,
    /// Covered period start (ISO 8601).
    pub period_start: String,
    /// Covered period end (ISO 8601).
    pub period_end: String,
    /// Workflow status.
    pub status: SnapshotStatus,
    /// One row per lot, in lot display order.
    pub lines: Vec<LotProgress>,
    /// Amount-weighted completion percentage across all lines.
    pub global_percent: Decimal,
    /// Sum of line amounts.
    pub cumulative_amount: Decimal,
    /// Acting user who created the snapshot.
    pub created_by: i64,
    /// Approval timestamp (ISO 8601), set on approval.
    pub approved_at: Option<String>,
    /// Acting user who approved the snapshot.
    pub approved_by: Option<i64>,
}

impl ProgressSnapshot {
    /// Recomputes `global_percent` and `cumulative_amount` from the lines.
    ///
    /// Idempotent: the totals depend only on the final line values, so
    /// repeated edits cannot drift.
    pub fn recompute_totals(&mut self) {
        self.global_percent = global_percent(&self.lines);
        self.cumulative_amount = self.lines.iter().map(|line| line.amount).sum();
    }

    /// Validates every line against the approved carry-forward baselines.
    ///
    /// Work never "un-happens": an approved snapshot may not record less
    /// cumulative quantity for a lot than the previous approved snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ProgressRegression` for the first line whose
    /// quantity falls below its baseline.
    pub fn validate_against_baselines(
        &self,
        baselines: &[ProgressBaseline],
    ) -> Result<(), DomainError> {
        for line in &self.lines {
            let baseline = baselines
                .iter()
                .find(|b| b.lot_id == line.lot_id)
                .map_or(Decimal::ZERO, |b| b.realized_quantity);
            if line.realized_quantity < baseline {
                return Err(DomainError::ProgressRegression {
                    lot_id: line.lot_id,
                    baseline,
                    requested: line.realized_quantity,
                });
            }
        }
        Ok(())
    }
}

/// The materialized carry-forward baseline for one `(site, lot)` pair:
/// the cumulative quantity recorded by the most recent approved snapshot.
///
/// Maintained transactionally at approval so that draft seeding and
/// monotonicity checks never scan snapshot history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressBaseline {
    /// The lot the baseline applies to.
    pub lot_id: i64,
    /// The last approved cumulative quantity.
    pub realized_quantity: Decimal,
}
