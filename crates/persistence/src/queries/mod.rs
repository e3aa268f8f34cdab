// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only query functions. All functions use Diesel DSL and never
//! mutate state.

pub mod billing;
pub mod lots;
pub mod payments;
pub mod progress;
pub mod sites;
