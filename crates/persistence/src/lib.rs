// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Site Ledger system.
//!
//! This crate stores the site registry, work lot catalog, progress
//! ledger, billing ledger and payment ledger in `SQLite` via Diesel.
//! Decimal quantities and amounts are persisted as TEXT to keep exact
//! values; status strings are validated against the domain's closed
//! enums on the way out.
//!
//! The adapter exposes raw typed operations only. Workflow rules
//! (status transitions, monotonicity, non-empty submission) live in the
//! API layer; the durable invariants (per-site unique numbering,
//! baseline materialization at approval, referential guards) are
//! enforced here, transactionally where more than one table is
//! involved.
//!
//! ## Testing
//!
//! Tests run against unique shared in-memory databases, one per
//! `new_in_memory()` call, so they are isolated and need no external
//! infrastructure.

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

use diesel::SqliteConnection;
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use site_ledger_domain::{
    Invoice, InvoiceLine, InvoiceStatus, LotProgress, Payment, ProgressBaseline, ProgressSnapshot,
    SnapshotStatus, WorkLot,
};

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use data_models::SiteRecord;
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based collisions.
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the site ledger database.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        // Unique shared in-memory database name per call so tests are isolated.
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn = sqlite::initialize_database(path_str)?;

        // WAL mode for better read concurrency on file-based databases.
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Site registry
    // ========================================================================

    /// Creates a site and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_site(
        &mut self,
        name: &str,
        planned_budget: Decimal,
    ) -> Result<i64, PersistenceError> {
        mutations::sites::create_site(&mut self.conn, name, planned_budget)
    }

    /// Updates a site's name and planned budget.
    ///
    /// # Errors
    ///
    /// Returns an error if the site does not exist or persistence fails.
    pub fn update_site(
        &mut self,
        site_id: i64,
        name: &str,
        planned_budget: Decimal,
    ) -> Result<(), PersistenceError> {
        mutations::sites::update_site(&mut self.conn, site_id, name, planned_budget)
    }

    /// Retrieves a site by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_site(&mut self, site_id: i64) -> Result<Option<SiteRecord>, PersistenceError> {
        queries::sites::get_site(&mut self.conn, site_id)
    }

    /// Lists all sites.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_sites(&mut self) -> Result<Vec<SiteRecord>, PersistenceError> {
        queries::sites::list_sites(&mut self.conn)
    }

    // ========================================================================
    // Work lot catalog
    // ========================================================================

    /// Inserts a work lot and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn insert_lot(&mut self, lot: &WorkLot) -> Result<i64, PersistenceError> {
        mutations::lots::insert_lot(&mut self.conn, lot)
    }

    /// Updates a work lot's descriptive and pricing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the lot does not exist or persistence fails.
    pub fn update_lot(&mut self, lot: &WorkLot) -> Result<(), PersistenceError> {
        mutations::lots::update_lot(&mut self.conn, lot)
    }

    /// Activates or deactivates a work lot.
    ///
    /// # Errors
    ///
    /// Returns an error if the lot does not exist or persistence fails.
    pub fn set_lot_active(&mut self, lot_id: i64, active: bool) -> Result<(), PersistenceError> {
        mutations::lots::set_lot_active(&mut self.conn, lot_id, active)
    }

    /// Deletes an unreferenced work lot.
    ///
    /// # Errors
    ///
    /// Returns `LotReferenced` if any document line points at the lot,
    /// or an error if persistence fails.
    pub fn delete_lot(&mut self, lot_id: i64) -> Result<(), PersistenceError> {
        mutations::lots::delete_lot(&mut self.conn, lot_id)
    }

    /// Retrieves a work lot by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_lot(&mut self, lot_id: i64) -> Result<Option<WorkLot>, PersistenceError> {
        queries::lots::get_lot(&mut self.conn, lot_id)
    }

    /// Lists a site's work lots in position order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_lots(
        &mut self,
        site_id: i64,
        active_only: bool,
    ) -> Result<Vec<WorkLot>, PersistenceError> {
        queries::lots::list_lots(&mut self.conn, site_id, active_only)
    }

    /// Returns whether any progress or invoice line references the lot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn lot_is_referenced(&mut self, lot_id: i64) -> Result<bool, PersistenceError> {
        queries::lots::lot_is_referenced(&mut self.conn, lot_id)
    }

    // ========================================================================
    // Progress ledger
    // ========================================================================

    /// Inserts a snapshot with its lines, allocating the next snapshot
    /// number for the site transactionally. Returns `(snapshot_id, number)`.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_snapshot(
        &mut self,
        snapshot: &ProgressSnapshot,
    ) -> Result<(i64, i32), PersistenceError> {
        mutations::progress::create_snapshot(&mut self.conn, snapshot)
    }

    /// Retrieves a snapshot with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_snapshot(
        &mut self,
        snapshot_id: i64,
    ) -> Result<Option<ProgressSnapshot>, PersistenceError> {
        queries::progress::get_snapshot(&mut self.conn, snapshot_id)
    }

    /// Lists a site's snapshots in number order, lines included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_snapshots(
        &mut self,
        site_id: i64,
    ) -> Result<Vec<ProgressSnapshot>, PersistenceError> {
        queries::progress::list_snapshots(&mut self.conn, site_id)
    }

    /// Retrieves the approved cumulative baselines for a site.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_baselines(
        &mut self,
        site_id: i64,
    ) -> Result<Vec<ProgressBaseline>, PersistenceError> {
        queries::progress::get_baselines(&mut self.conn, site_id)
    }

    /// Updates one snapshot line and the snapshot's recomputed totals
    /// in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot or line does not exist or
    /// persistence fails; nothing is written in that case.
    pub fn update_snapshot_line_and_totals(
        &mut self,
        snapshot_id: i64,
        line: &LotProgress,
        global_percent: Decimal,
        cumulative_amount: Decimal,
    ) -> Result<(), PersistenceError> {
        mutations::progress::update_line_and_totals(
            &mut self.conn,
            snapshot_id,
            line,
            global_percent,
            cumulative_amount,
        )
    }

    /// Sets a snapshot's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot does not exist or persistence fails.
    pub fn set_snapshot_status(
        &mut self,
        snapshot_id: i64,
        status: SnapshotStatus,
    ) -> Result<(), PersistenceError> {
        mutations::progress::set_status(&mut self.conn, snapshot_id, status)
    }

    /// Approves a snapshot and materializes its lines as the site's new
    /// per-lot baselines, transactionally.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn approve_snapshot(
        &mut self,
        snapshot: &ProgressSnapshot,
        approved_by: i64,
        approved_at: &str,
    ) -> Result<(), PersistenceError> {
        mutations::progress::approve_snapshot(&mut self.conn, snapshot, approved_by, approved_at)
    }

    /// Deletes a snapshot with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot does not exist or persistence fails.
    pub fn delete_snapshot(&mut self, snapshot_id: i64) -> Result<(), PersistenceError> {
        mutations::progress::delete_snapshot(&mut self.conn, snapshot_id)
    }

    // ========================================================================
    // Billing ledger
    // ========================================================================

    /// Inserts an invoice with its lines, allocating the next invoice
    /// number for the site transactionally. Returns `(invoice_id, number)`.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_invoice(&mut self, invoice: &Invoice) -> Result<(i64, i32), PersistenceError> {
        mutations::billing::create_invoice(&mut self.conn, invoice)
    }

    /// Retrieves an invoice with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_invoice(&mut self, invoice_id: i64) -> Result<Option<Invoice>, PersistenceError> {
        queries::billing::get_invoice(&mut self.conn, invoice_id)
    }

    /// Lists a site's invoices in number order, lines included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_invoices(&mut self, site_id: i64) -> Result<Vec<Invoice>, PersistenceError> {
        queries::billing::list_invoices(&mut self.conn, site_id)
    }

    /// Updates one invoice line and the invoice's recomputed totals in
    /// a single transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice or line does not exist or
    /// persistence fails; nothing is written in that case.
    pub fn update_invoice_line_and_totals(
        &mut self,
        invoice_id: i64,
        line: &InvoiceLine,
        vat_rate: Decimal,
        amount_ex_vat: Decimal,
        vat_amount: Decimal,
        amount_inc_vat: Decimal,
    ) -> Result<(), PersistenceError> {
        mutations::billing::update_line_and_totals(
            &mut self.conn,
            invoice_id,
            line,
            vat_rate,
            amount_ex_vat,
            vat_amount,
            amount_inc_vat,
        )
    }

    /// Updates an invoice's VAT rate and totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice does not exist or persistence fails.
    pub fn update_invoice_totals(
        &mut self,
        invoice_id: i64,
        vat_rate: Decimal,
        amount_ex_vat: Decimal,
        vat_amount: Decimal,
        amount_inc_vat: Decimal,
    ) -> Result<(), PersistenceError> {
        mutations::billing::update_totals(
            &mut self.conn,
            invoice_id,
            vat_rate,
            amount_ex_vat,
            vat_amount,
            amount_inc_vat,
        )
    }

    /// Sets an invoice's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice does not exist or persistence fails.
    pub fn set_invoice_status(
        &mut self,
        invoice_id: i64,
        status: InvoiceStatus,
    ) -> Result<(), PersistenceError> {
        mutations::billing::set_status(&mut self.conn, invoice_id, status)
    }

    /// Deletes an invoice with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice does not exist or persistence fails.
    pub fn delete_invoice(&mut self, invoice_id: i64) -> Result<(), PersistenceError> {
        mutations::billing::delete_invoice(&mut self.conn, invoice_id)
    }

    // ========================================================================
    // Payment ledger
    // ========================================================================

    /// Inserts a payment and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn insert_payment(&mut self, payment: &Payment) -> Result<i64, PersistenceError> {
        mutations::payments::insert_payment(&mut self.conn, payment)
    }

    /// Retrieves a payment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_payment(&mut self, payment_id: i64) -> Result<Option<Payment>, PersistenceError> {
        queries::payments::get_payment(&mut self.conn, payment_id)
    }

    /// Lists a site's payments, optionally restricted to one invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_payments(
        &mut self,
        site_id: i64,
        invoice_id: Option<i64>,
    ) -> Result<Vec<Payment>, PersistenceError> {
        queries::payments::list_payments(&mut self.conn, site_id, invoice_id)
    }

    /// Deletes a payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment does not exist or persistence fails.
    pub fn delete_payment(&mut self, payment_id: i64) -> Result<(), PersistenceError> {
        mutations::payments::delete_payment(&mut self.conn, payment_id)
    }
}
