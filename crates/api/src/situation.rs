// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The read-side reconciliation endpoint.

use site_ledger_domain::{FinancialSituation, compute_situation};
use site_ledger_persistence::Persistence;

use crate::catalog::require_site;
use crate::error::ApiError;

/// Computes a site's financial situation from its three ledgers.
///
/// Pure read: loads the catalog, the approved baselines, the invoices
/// and the payments, and folds them with the domain reconciler. The
/// deactivated lots are included so historic work stays visible.
///
/// # Errors
///
/// Returns `NotFound` if the site does not exist, or an internal error
/// if a query fails.
pub fn financial_situation(
    persistence: &mut Persistence,
    site_id: i64,
) -> Result<FinancialSituation, ApiError> {
    let site = require_site(persistence, site_id)?;

    let lots = persistence.list_lots(site_id, false)?;
    let baselines = persistence.get_baselines(site_id)?;
    let invoices = persistence.list_invoices(site_id)?;
    let payments = persistence.list_payments(site_id, None)?;

    Ok(compute_situation(
        site_id,
        site.planned_budget,
        &lots,
        &baselines,
        &invoices,
        &payments,
    ))
}
