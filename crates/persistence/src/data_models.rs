// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs mapping the Diesel schema, and decoding helpers that
//! turn stored TEXT columns back into domain values.
//!
//! Decimals, dates and status strings are persisted as TEXT; a row
//! that fails to decode is reported as a `SerializationError` rather
//! than silently coerced.

use crate::diesel_schema::{
    invoice_lines, invoices, payments, progress_baselines, progress_lines, progress_snapshots,
    site_counters, sites, work_lots,
};
use crate::error::PersistenceError;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Decodes a stored decimal TEXT column.
///
/// # Errors
///
/// Returns a `SerializationError` naming the column if the text is not
/// a valid decimal.
pub fn decode_decimal(column: &str, text: &str) -> Result<Decimal, PersistenceError> {
    Decimal::from_str(text).map_err(|e| {
        PersistenceError::SerializationError(format!("column '{column}' holds '{text}': {e}"))
    })
}

/// Decodes a stored enum TEXT column via the domain's `FromStr`.
///
/// # Errors
///
/// Returns a `SerializationError` if the stored string is not a member
/// of the closed set.
pub fn decode_enum<T>(column: &str, text: &str) -> Result<T, PersistenceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.parse().map_err(|e| {
        PersistenceError::SerializationError(format!("column '{column}' holds '{text}': {e}"))
    })
}

/// A site registry record: the external collaborator contract the
/// reconciler reads its budget figure from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub site_id: i64,
    pub name: String,
    pub planned_budget: Decimal,
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = sites)]
pub struct SiteRow {
    pub site_id: i64,
    pub name: String,
    pub planned_budget: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sites)]
pub struct NewSite {
    pub name: String,
    pub planned_budget: String,
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = work_lots)]
pub struct WorkLotRow {
    pub lot_id: i64,
    pub site_id: i64,
    pub name: String,
    pub unit: String,
    pub planned_quantity: String,
    pub unit_price: String,
    pub planned_amount: String,
    pub position: i32,
    pub active: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = work_lots)]
pub struct NewWorkLot {
    pub site_id: i64,
    pub name: String,
    pub unit: String,
    pub planned_quantity: String,
    pub unit_price: String,
    pub planned_amount: String,
    pub position: i32,
    pub active: i32,
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = site_counters)]
pub struct SiteCounterRow {
    pub counter_id: i64,
    pub site_id: i64,
    pub kind: String,
    pub next_number: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = site_counters)]
pub struct NewSiteCounter {
    pub site_id: i64,
    pub kind: String,
    pub next_number: i32,
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = progress_snapshots)]
pub struct SnapshotRow {
    pub snapshot_id: i64,
    pub site_id: i64,
    pub number: i32,
    pub date: String,
    pub period_start: String,
    pub period_end: String,
    pub status: String,
    pub global_percent: String,
    pub cumulative_amount: String,
    pub created_by: i64,
    pub approved_at: Option<String>,
    pub approved_by: Option<i64>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = progress_snapshots)]
pub struct NewSnapshot {
    pub site_id: i64,
    pub number: i32,
    pub date: String,
    pub period_start: String,
    pub period_end: String,
    pub status: String,
    pub global_percent: String,
    pub cumulative_amount: String,
    pub created_by: i64,
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = progress_lines)]
pub struct ProgressLineRow {
    pub line_id: i64,
    pub snapshot_id: i64,
    pub lot_id: i64,
    pub realized_quantity: String,
    pub percent: String,
    pub amount: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = progress_lines)]
pub struct NewProgressLine {
    pub snapshot_id: i64,
    pub lot_id: i64,
    pub realized_quantity: String,
    pub percent: String,
    pub amount: String,
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = progress_baselines)]
pub struct BaselineRow {
    pub baseline_id: i64,
    pub site_id: i64,
    pub lot_id: i64,
    pub snapshot_id: i64,
    pub realized_quantity: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = progress_baselines)]
pub struct NewBaseline {
    pub site_id: i64,
    pub lot_id: i64,
    pub snapshot_id: i64,
    pub realized_quantity: String,
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = invoices)]
pub struct InvoiceRow {
    pub invoice_id: i64,
    pub site_id: i64,
    pub number: i32,
    pub date: String,
    pub period_start: String,
    pub period_end: String,
    pub status: String,
    pub vat_rate: String,
    pub amount_ex_vat: String,
    pub vat_amount: String,
    pub amount_inc_vat: String,
    pub created_by: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invoices)]
pub struct NewInvoice {
    pub site_id: i64,
    pub number: i32,
    pub date: String,
    pub period_start: String,
    pub period_end: String,
    pub status: String,
    pub vat_rate: String,
    pub amount_ex_vat: String,
    pub vat_amount: String,
    pub amount_inc_vat: String,
    pub created_by: i64,
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = invoice_lines)]
pub struct InvoiceLineRow {
    pub line_id: i64,
    pub invoice_id: i64,
    pub lot_id: i64,
    pub billed_quantity: String,
    pub unit_price: String,
    pub amount: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invoice_lines)]
pub struct NewInvoiceLine {
    pub invoice_id: i64,
    pub lot_id: i64,
    pub billed_quantity: String,
    pub unit_price: String,
    pub amount: String,
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentRow {
    pub payment_id: i64,
    pub site_id: i64,
    pub date: String,
    pub amount: String,
    pub method: String,
    pub invoice_id: Option<i64>,
    pub reference: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPayment {
    pub site_id: i64,
    pub date: String,
    pub amount: String,
    pub method: String,
    pub invoice_id: Option<i64>,
    pub reference: Option<String>,
    pub comment: Option<String>,
}
