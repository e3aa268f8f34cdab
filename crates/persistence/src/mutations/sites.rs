// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Site registry mutations.

use diesel::prelude::*;
use rust_decimal::Decimal;
use tracing::debug;

use crate::data_models::NewSite;
use crate::diesel_schema::sites;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Inserts a new site and returns its assigned ID.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn create_site(
    conn: &mut SqliteConnection,
    name: &str,
    planned_budget: Decimal,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sites::table)
        .values(NewSite {
            name: name.to_string(),
            planned_budget: planned_budget.to_string(),
        })
        .execute(conn)?;

    let site_id = get_last_insert_rowid(conn)?;

    debug!(site_id, name, "Created site");

    Ok(site_id)
}

/// Updates a site's name and planned budget.
///
/// # Errors
///
/// Returns `NotFound` if the site does not exist, or an error if the
/// database operation fails.
pub fn update_site(
    conn: &mut SqliteConnection,
    site_id: i64,
    name: &str,
    planned_budget: Decimal,
) -> Result<(), PersistenceError> {
    let rows_affected = diesel::update(sites::table.filter(sites::site_id.eq(site_id)))
        .set((
            sites::name.eq(name),
            sites::planned_budget.eq(planned_budget.to_string()),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Site with ID {site_id} not found"
        )));
    }

    debug!(site_id, name, "Updated site");

    Ok(())
}
