// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Site Ledger system.
//!
//! Each operation takes a `&mut Persistence` and a request, enforces
//! the workflow rules (status transitions, monotonic progress,
//! non-empty submission, cross-site link checks) and returns domain
//! values or an [`ApiError`]. Domain and persistence errors never
//! cross this boundary untranslated.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

pub mod billing;
pub mod catalog;
mod error;
pub mod payments;
pub mod progress;
mod request_response;
pub mod situation;

#[cfg(test)]
mod tests;

pub use error::{ApiError, translate_domain_error};
pub use request_response::{
    CreateLotRequest, CreateSiteRequest, OpenInvoiceRequest, OpenSnapshotRequest,
    RecordPaymentRequest, RecordProgressRequest, SetBilledQuantityRequest, UpdateLotRequest,
    UpdateSiteRequest,
};
