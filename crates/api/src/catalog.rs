// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Site registry and work lot catalog operations.

use std::str::FromStr;
use tracing::info;

use site_ledger_domain::{
    MeasurementUnit, WorkLot, validate_lot_fields, validate_quantity,
};
use site_ledger_persistence::{Persistence, SiteRecord};

use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{CreateLotRequest, CreateSiteRequest, UpdateLotRequest, UpdateSiteRequest};

/// Looks up a site, translating absence into `NotFound`.
///
/// # Errors
///
/// Returns `NotFound` if the site does not exist, or an internal error
/// if the query fails.
pub(crate) fn require_site(
    persistence: &mut Persistence,
    site_id: i64,
) -> Result<SiteRecord, ApiError> {
    persistence
        .get_site(site_id)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Site"),
            message: format!("Site with ID {site_id} does not exist"),
        })
}

/// Registers a new site.
///
/// # Errors
///
/// Returns a validation error if the name is empty or the budget is
/// negative, or an internal error if persistence fails.
pub fn create_site(
    persistence: &mut Persistence,
    request: &CreateSiteRequest,
) -> Result<SiteRecord, ApiError> {
    validate_site_fields(&request.name, request.planned_budget)?;

    let site_id = persistence.create_site(&request.name, request.planned_budget)?;

    info!(site_id, name = %request.name, "Site created");

    Ok(SiteRecord {
        site_id,
        name: request.name.clone(),
        planned_budget: request.planned_budget,
    })
}

/// Updates a site's name and planned budget.
///
/// # Errors
///
/// Returns `NotFound` if the site does not exist, a validation error
/// for bad input, or an internal error if persistence fails.
pub fn update_site(
    persistence: &mut Persistence,
    site_id: i64,
    request: &UpdateSiteRequest,
) -> Result<SiteRecord, ApiError> {
    validate_site_fields(&request.name, request.planned_budget)?;
    require_site(persistence, site_id)?;

    persistence.update_site(site_id, &request.name, request.planned_budget)?;

    Ok(SiteRecord {
        site_id,
        name: request.name.clone(),
        planned_budget: request.planned_budget,
    })
}

/// Retrieves a site.
///
/// # Errors
///
/// Returns `NotFound` if the site does not exist.
pub fn get_site(persistence: &mut Persistence, site_id: i64) -> Result<SiteRecord, ApiError> {
    require_site(persistence, site_id)
}

/// Lists all sites.
///
/// # Errors
///
/// Returns an internal error if the query fails.
pub fn list_sites(persistence: &mut Persistence) -> Result<Vec<SiteRecord>, ApiError> {
    Ok(persistence.list_sites()?)
}

fn validate_site_fields(
    name: &str,
    planned_budget: rust_decimal::Decimal,
) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation {
            field: String::from("name"),
            message: String::from("site name cannot be empty"),
        });
    }
    validate_quantity("planned_budget", planned_budget).map_err(translate_domain_error)
}

/// Adds a work lot to a site's catalog.
///
/// The planned amount is derived from quantity and price, never taken
/// from the caller.
///
/// # Errors
///
/// Returns `NotFound` if the site does not exist, a validation error
/// for bad fields or an unknown unit, or an internal error if
/// persistence fails.
pub fn create_lot(
    persistence: &mut Persistence,
    request: &CreateLotRequest,
) -> Result<WorkLot, ApiError> {
    require_site(persistence, request.site_id)?;
    validate_lot_fields(&request.name, request.planned_quantity, request.unit_price)
        .map_err(translate_domain_error)?;
    let unit = MeasurementUnit::from_str(&request.unit).map_err(translate_domain_error)?;

    let mut lot = WorkLot {
        lot_id: 0,
        site_id: request.site_id,
        name: request.name.clone(),
        unit,
        planned_quantity: request.planned_quantity,
        unit_price: request.unit_price,
        planned_amount: WorkLot::planned_amount(request.planned_quantity, request.unit_price),
        position: request.position,
        active: true,
    };
    lot.lot_id = persistence.insert_lot(&lot)?;

    info!(lot_id = lot.lot_id, site_id = lot.site_id, "Work lot created");

    Ok(lot)
}

/// Updates a work lot's descriptive and pricing fields.
///
/// Repricing a lot affects future documents only: existing invoice
/// lines keep the price they were created with.
///
/// # Errors
///
/// Returns `NotFound` if the lot does not exist, a validation error
/// for bad fields, or an internal error if persistence fails.
pub fn update_lot(
    persistence: &mut Persistence,
    lot_id: i64,
    request: &UpdateLotRequest,
) -> Result<WorkLot, ApiError> {
    validate_lot_fields(&request.name, request.planned_quantity, request.unit_price)
        .map_err(translate_domain_error)?;
    let unit = MeasurementUnit::from_str(&request.unit).map_err(translate_domain_error)?;

    let mut lot = require_lot(persistence, lot_id)?;
    lot.name = request.name.clone();
    lot.unit = unit;
    lot.planned_quantity = request.planned_quantity;
    lot.unit_price = request.unit_price;
    lot.planned_amount = WorkLot::planned_amount(request.planned_quantity, request.unit_price);
    lot.position = request.position;

    persistence.update_lot(&lot)?;

    Ok(lot)
}

/// Activates or deactivates a work lot.
///
/// # Errors
///
/// Returns `NotFound` if the lot does not exist, or an internal error
/// if persistence fails.
pub fn set_lot_active(
    persistence: &mut Persistence,
    lot_id: i64,
    active: bool,
) -> Result<WorkLot, ApiError> {
    require_lot(persistence, lot_id)?;
    persistence.set_lot_active(lot_id, active)?;
    require_lot(persistence, lot_id)
}

/// Deletes a work lot that no document references.
///
/// # Errors
///
/// Returns `NotFound` if the lot does not exist, `Conflict` if any
/// snapshot or invoice line references it, or an internal error if
/// persistence fails.
pub fn delete_lot(persistence: &mut Persistence, lot_id: i64) -> Result<(), ApiError> {
    require_lot(persistence, lot_id)?;
    persistence.delete_lot(lot_id)?;

    info!(lot_id, "Work lot deleted");

    Ok(())
}

/// Retrieves a work lot.
///
/// # Errors
///
/// Returns `NotFound` if the lot does not exist.
pub fn get_lot(persistence: &mut Persistence, lot_id: i64) -> Result<WorkLot, ApiError> {
    require_lot(persistence, lot_id)
}

/// Lists a site's work lots in position order.
///
/// # Errors
///
/// Returns `NotFound` if the site does not exist, or an internal error
/// if the query fails.
pub fn list_lots(
    persistence: &mut Persistence,
    site_id: i64,
    active_only: bool,
) -> Result<Vec<WorkLot>, ApiError> {
    require_site(persistence, site_id)?;
    Ok(persistence.list_lots(site_id, active_only)?)
}

pub(crate) fn require_lot(
    persistence: &mut Persistence,
    lot_id: i64,
) -> Result<WorkLot, ApiError> {
    persistence
        .get_lot(lot_id)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Work lot"),
            message: format!("Work lot with ID {lot_id} does not exist"),
        })
}
