// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Approval workflow statuses for progress snapshots and invoices.
//!
//! Both state machines are closed: any transition not listed in the
//! table is rejected. Documents are mutable only while in `Draft`,
//! and only `Draft` documents may be deleted.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states of a progress snapshot.
///
/// Valid transitions:
/// - Draft → Submitted
/// - Submitted → Approved | Rejected
///
/// Approved and Rejected are terminal. A rejected snapshot may be
/// recreated as a new draft, never resurrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    /// Editable working copy; the only deletable state.
    Draft,
    /// Frozen, awaiting approval.
    Submitted,
    /// Accepted; line values feed the carry-forward baseline.
    Approved,
    /// Refused; keeps its number, which is never reused.
    Rejected,
}

impl SnapshotStatus {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidSnapshotStatus(s.to_string())),
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Returns true if line edits are permitted in this status.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Validates a transition from this status to another.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition
    /// is not listed in the lifecycle table.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid = matches!(
            (self, new_status),
            (Self::Draft, Self::Submitted)
                | (Self::Submitted, Self::Approved | Self::Rejected)
        );

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                entity: "snapshot",
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
            })
        }
    }
}

impl FromStr for SnapshotStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle states of an invoice.
///
/// Valid transitions:
/// - Draft → Submitted
/// - Submitted → Approved | Rejected
/// - Approved → Paid
///
/// Paid and Rejected are terminal. The Paid transition is an explicit
/// confirmation; settlement derived from payments is reported
/// separately by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Editable working copy; the only deletable state.
    Draft,
    /// Frozen, awaiting approval.
    Submitted,
    /// Accepted; counts toward the invoiced total.
    Approved,
    /// Refused; keeps its number, which is never reused.
    Rejected,
    /// Confirmed as settled; still counts toward the invoiced total.
    Paid,
}

impl InvoiceStatus {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Paid => "paid",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "paid" => Ok(Self::Paid),
            _ => Err(DomainError::InvalidInvoiceStatus(s.to_string())),
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Rejected)
    }

    /// Returns true if line edits are permitted in this status.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the invoice counts toward the invoiced total.
    #[must_use]
    pub const fn counts_as_invoiced(&self) -> bool {
        matches!(self, Self::Approved | Self::Paid)
    }

    /// Validates a transition from this status to another.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition
    /// is not listed in the lifecycle table.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid = matches!(
            (self, new_status),
            (Self::Draft, Self::Submitted)
                | (Self::Submitted, Self::Approved | Self::Rejected)
                | (Self::Approved, Self::Paid)
        );

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                entity: "invoice",
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
            })
        }
    }
}

impl FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_status_round_trip() {
        let statuses = vec![
            SnapshotStatus::Draft,
            SnapshotStatus::Submitted,
            SnapshotStatus::Approved,
            SnapshotStatus::Rejected,
        ];

        for status in statuses {
            let s = status.as_str();
            match SnapshotStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invoice_status_round_trip() {
        let statuses = vec![
            InvoiceStatus::Draft,
            InvoiceStatus::Submitted,
            InvoiceStatus::Approved,
            InvoiceStatus::Rejected,
            InvoiceStatus::Paid,
        ];

        for status in statuses {
            let s = status.as_str();
            match InvoiceStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_unknown_status_strings_rejected() {
        assert!(SnapshotStatus::parse_str("validated").is_err());
        assert!(InvoiceStatus::parse_str("settled").is_err());
    }

    #[test]
    fn test_snapshot_transition_table() {
        assert!(
            SnapshotStatus::Draft
                .validate_transition(SnapshotStatus::Submitted)
                .is_ok()
        );
        assert!(
            SnapshotStatus::Submitted
                .validate_transition(SnapshotStatus::Approved)
                .is_ok()
        );
        assert!(
            SnapshotStatus::Submitted
                .validate_transition(SnapshotStatus::Rejected)
                .is_ok()
        );

        // Draft cannot skip straight to a terminal state.
        assert!(
            SnapshotStatus::Draft
                .validate_transition(SnapshotStatus::Approved)
                .is_err()
        );
        assert!(
            SnapshotStatus::Draft
                .validate_transition(SnapshotStatus::Rejected)
                .is_err()
        );
    }

    #[test]
    fn test_snapshot_terminal_states_have_no_transitions() {
        let all = vec![
            SnapshotStatus::Draft,
            SnapshotStatus::Submitted,
            SnapshotStatus::Approved,
            SnapshotStatus::Rejected,
        ];

        for terminal in [SnapshotStatus::Approved, SnapshotStatus::Rejected] {
            assert!(terminal.is_terminal());
            for target in &all {
                assert!(terminal.validate_transition(*target).is_err());
            }
        }
    }

    #[test]
    fn test_invoice_transition_table() {
        assert!(
            InvoiceStatus::Draft
                .validate_transition(InvoiceStatus::Submitted)
                .is_ok()
        );
        assert!(
            InvoiceStatus::Submitted
                .validate_transition(InvoiceStatus::Approved)
                .is_ok()
        );
        assert!(
            InvoiceStatus::Submitted
                .validate_transition(InvoiceStatus::Rejected)
                .is_ok()
        );
        assert!(
            InvoiceStatus::Approved
                .validate_transition(InvoiceStatus::Paid)
                .is_ok()
        );

        // Paid is reachable only from Approved.
        assert!(
            InvoiceStatus::Draft
                .validate_transition(InvoiceStatus::Paid)
                .is_err()
        );
        assert!(
            InvoiceStatus::Submitted
                .validate_transition(InvoiceStatus::Paid)
                .is_err()
        );
        assert!(
            InvoiceStatus::Rejected
                .validate_transition(InvoiceStatus::Paid)
                .is_err()
        );
    }

    #[test]
    fn test_invoiced_total_statuses() {
        assert!(!InvoiceStatus::Draft.counts_as_invoiced());
        assert!(!InvoiceStatus::Submitted.counts_as_invoiced());
        assert!(!InvoiceStatus::Rejected.counts_as_invoiced());
        assert!(InvoiceStatus::Approved.counts_as_invoiced());
        assert!(InvoiceStatus::Paid.counts_as_invoiced());
    }
}
