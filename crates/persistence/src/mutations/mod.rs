// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side database operations.
//!
//! Mutations that touch more than one table (document creation with
//! number allocation, approval with baseline upserts, cascading
//! deletes) run inside a transaction so a failure leaves no partial
//! rows behind.

pub mod billing;
pub mod counters;
pub mod lots;
pub mod payments;
pub mod progress;
pub mod sites;
