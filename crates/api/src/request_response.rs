// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request data transfer objects.
//!
//! Requests carry raw user input (unit and method as strings, dates as
//! ISO 8601 text); the operation functions validate and translate them
//! into domain values. Responses reuse the domain types directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request to register a new site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSiteRequest {
    /// Site display name.
    pub name: String,
    /// Site-level planned budget.
    pub planned_budget: Decimal,
}

/// Request to update a site's registry fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSiteRequest {
    /// Site display name.
    pub name: String,
    /// Site-level planned budget.
    pub planned_budget: Decimal,
}

/// Request to add a work lot to a site's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLotRequest {
    /// The site the lot belongs to.
    pub site_id: i64,
    /// Lot display name.
    pub name: String,
    /// Measurement unit code (e.g., `m3`).
    pub unit: String,
    /// Contracted quantity.
    pub planned_quantity: Decimal,
    /// Contracted unit price.
    pub unit_price: Decimal,
    /// Display ordering within the site.
    pub position: i32,
}

/// Request to update a work lot's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLotRequest {
    /// Lot display name.
    pub name: String,
    /// Measurement unit code (e.g., `m3`).
    pub unit: String,
    /// Contracted quantity.
    pub planned_quantity: Decimal,
    /// Contracted unit price.
    pub unit_price: Decimal,
    /// Display ordering within the site.
    pub position: i32,
}

/// Request to open a draft progress snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenSnapshotRequest {
    /// The site the snapshot covers.
    pub site_id: i64,
    /// Document date (ISO 8601).
    pub date: String,
    /// Covered period start (ISO 8601).
    pub period_start: String,
    /// Covered period end (ISO 8601).
    pub period_end: String,
    /// Acting user opening the draft.
    pub created_by: i64,
}

/// Request to record a cumulative quantity on one snapshot line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordProgressRequest {
    /// The lot whose line is updated.
    pub lot_id: i64,
    /// Cumulative realized quantity.
    pub realized_quantity: Decimal,
}

/// Request to open a draft invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenInvoiceRequest {
    /// The site the invoice bills.
    pub site_id: i64,
    /// Document date (ISO 8601).
    pub date: String,
    /// Billed period start (ISO 8601).
    pub period_start: String,
    /// Billed period end (ISO 8601).
    pub period_end: String,
    /// VAT rate as a percentage (e.g., 19 for 19%).
    pub vat_rate: Decimal,
    /// Acting user opening the draft.
    pub created_by: i64,
}

/// Request to set the billed quantity on one invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBilledQuantityRequest {
    /// The lot whose line is updated.
    pub lot_id: i64,
    /// Quantity billed on this invoice.
    pub billed_quantity: Decimal,
}

/// Request to record a received payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    /// The site the payment belongs to.
    pub site_id: i64,
    /// Receipt date (ISO 8601).
    pub date: String,
    /// Received amount; strictly positive.
    pub amount: Decimal,
    /// Payment method code (e.g., `transfer`).
    pub method: String,
    /// The invoice this payment settles, if any. Must belong to the
    /// same site.
    pub invoice_id: Option<i64>,
    /// External reference.
    pub reference: Option<String>,
    /// Free-form comment.
    pub comment: Option<String>,
}
