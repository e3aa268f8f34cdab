// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-site sequential document numbering.

use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{NewSiteCounter, SiteCounterRow};
use crate::diesel_schema::site_counters;
use crate::error::PersistenceError;

/// Counter kind for progress snapshots.
pub const KIND_SNAPSHOT: &str = "snapshot";
/// Counter kind for invoices.
pub const KIND_INVOICE: &str = "invoice";

/// Allocates the next sequential number for a document kind on a site.
///
/// Must be called inside the transaction that inserts the document that
/// consumes the number: the counter increment then commits or rolls
/// back together with the insert, so numbers are unique and a failed
/// insert does not burn one.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn allocate_number(
    conn: &mut SqliteConnection,
    site_id: i64,
    kind: &str,
) -> Result<i32, PersistenceError> {
    let existing = site_counters::table
        .filter(site_counters::site_id.eq(site_id))
        .filter(site_counters::kind.eq(kind))
        .first::<SiteCounterRow>(conn)
        .optional()?;

    let number = match existing {
        Some(counter) => {
            diesel::update(
                site_counters::table.filter(site_counters::counter_id.eq(counter.counter_id)),
            )
            .set(site_counters::next_number.eq(counter.next_number + 1))
            .execute(conn)?;
            counter.next_number
        }
        None => {
            diesel::insert_into(site_counters::table)
                .values(NewSiteCounter {
                    site_id,
                    kind: kind.to_string(),
                    next_number: 2,
                })
                .execute(conn)?;
            1
        }
    };

    debug!(site_id, kind, number, "Allocated document number");

    Ok(number)
}
