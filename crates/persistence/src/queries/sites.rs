// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Site registry queries.

use crate::data_models::{SiteRecord, SiteRow, decode_decimal};
use crate::diesel_schema::sites;
use crate::error::PersistenceError;
use diesel::prelude::*;

/// Retrieves one site record.
///
/// # Errors
///
/// Returns an error if the query fails or the stored budget is corrupt.
pub fn get_site(
    conn: &mut SqliteConnection,
    site_id: i64,
) -> Result<Option<SiteRecord>, PersistenceError> {
    let row = sites::table
        .filter(sites::site_id.eq(site_id))
        .first::<SiteRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_site: {e}")))?;

    row.map(row_to_site).transpose()
}

/// Lists all registered sites, in creation order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored budget is corrupt.
pub fn list_sites(conn: &mut SqliteConnection) -> Result<Vec<SiteRecord>, PersistenceError> {
    let rows = sites::table
        .order(sites::site_id.asc())
        .load::<SiteRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_sites: {e}")))?;

    rows.into_iter().map(row_to_site).collect()
}

fn row_to_site(row: SiteRow) -> Result<SiteRecord, PersistenceError> {
    Ok(SiteRecord {
        site_id: row.site_id,
        name: row.name,
        planned_budget: decode_decimal("planned_budget", &row.planned_budget)?,
    })
}
