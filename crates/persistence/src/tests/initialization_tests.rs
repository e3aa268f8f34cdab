// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Connection establishment, migration application and foreign key
//! enforcement are also exercised implicitly by every test that calls
//! `Persistence::new_in_memory()`.

use rust_decimal_macros::dec;

use crate::tests::{seed_site, test_db};
use crate::{Persistence, PersistenceError};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = test_db();
    let mut db2 = test_db();

    seed_site(&mut db1);

    assert_eq!(db1.list_sites().unwrap().len(), 1, "db1 should have 1 site");
    assert_eq!(
        db2.list_sites().unwrap().len(),
        0,
        "db2 should have 0 sites (isolated)"
    );
}

#[test]
fn test_migrations_applied_on_initialization() {
    // If migrations didn't run, the schema wouldn't exist and this would fail.
    let mut db = test_db();
    assert!(db.list_sites().is_ok());
}

#[test]
fn test_foreign_key_enforcement_active() {
    let mut db = test_db();
    assert!(db.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_site_round_trip() {
    let mut db = test_db();
    let site_id = db.create_site("Harbor extension", dec!(12500.50)).unwrap();

    let site = db.get_site(site_id).unwrap().unwrap();
    assert_eq!(site.name, "Harbor extension");
    assert_eq!(site.planned_budget, dec!(12500.50));

    db.update_site(site_id, "Harbor extension phase 2", dec!(20000))
        .unwrap();
    let site = db.get_site(site_id).unwrap().unwrap();
    assert_eq!(site.name, "Harbor extension phase 2");
    assert_eq!(site.planned_budget, dec!(20000));
}

#[test]
fn test_get_missing_site_returns_none() {
    let mut db = test_db();
    assert!(db.get_site(42).unwrap().is_none());
}
