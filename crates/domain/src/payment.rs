// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cash receipts, optionally tied to one invoice.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a payment was received. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Bank transfer.
    Transfer,
    /// Cash.
    Cash,
    /// Check.
    Check,
    /// Card payment.
    Card,
}

impl PaymentMethod {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Cash => "cash",
            Self::Check => "check",
            Self::Card => "card",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "transfer" => Ok(Self::Transfer),
            "cash" => Ok(Self::Cash),
            "check" => Ok(Self::Check),
            "card" => Ok(Self::Card),
            _ => Err(DomainError::InvalidPaymentMethod(s.to_string())),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An append-only cash-receipt ledger entry.
///
/// Unlinked payments are allowed (`invoice_id = None`), and payments are
/// not capped at the linked invoice's amount: overpayment is surfaced by
/// the reconciler as a warning, never rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Canonical identifier assigned by the database.
    pub payment_id: i64,
    /// The site the payment belongs to.
    pub site_id: i64,
    /// Receipt date (ISO 8601).
    pub date: String,
    /// Received amount; strictly positive.
    pub amount: Decimal,
    /// How the payment was received.
    pub method: PaymentMethod,
    /// The invoice this payment settles, if any. Must belong to the
    /// same site as the payment.
    pub invoice_id: Option<i64>,
    /// External reference (e.g., a transfer reference).
    pub reference: Option<String>,
    /// Free-form comment.
    pub comment: Option<String>,
}
