// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contracted work lots: the priced decomposition of a site.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Measurement units for contracted quantities.
///
/// This is a closed set; unknown unit strings are rejected rather
/// than coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementUnit {
    /// Meter.
    Meter,
    /// Square meter.
    SquareMeter,
    /// Cubic meter.
    CubicMeter,
    /// Linear meter.
    LinearMeter,
    /// Kilogram.
    Kilogram,
    /// Metric ton.
    Ton,
    /// Liter.
    Liter,
    /// Piece / unit count.
    Piece,
    /// Hour of work.
    Hour,
    /// Lump sum (forfait): quantity is a fraction of the whole.
    LumpSum,
}

impl MeasurementUnit {
    /// Returns the string representation used for persistence and display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Meter => "m",
            Self::SquareMeter => "m2",
            Self::CubicMeter => "m3",
            Self::LinearMeter => "ml",
            Self::Kilogram => "kg",
            Self::Ton => "t",
            Self::Liter => "l",
            Self::Piece => "u",
            Self::Hour => "h",
            Self::LumpSum => "ff",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "m" => Ok(Self::Meter),
            "m2" => Ok(Self::SquareMeter),
            "m3" => Ok(Self::CubicMeter),
            "ml" => Ok(Self::LinearMeter),
            "kg" => Ok(Self::Kilogram),
            "t" => Ok(Self::Ton),
            "l" => Ok(Self::Liter),
            "u" => Ok(Self::Piece),
            "h" => Ok(Self::Hour),
            "ff" => Ok(Self::LumpSum),
            _ => Err(DomainError::InvalidUnit(s.to_string())),
        }
    }
}

impl FromStr for MeasurementUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A priced, quantifiable unit of contracted work on a site.
///
/// `planned_amount` is always derived from `planned_quantity × unit_price`;
/// it is never edited independently. Deactivation is soft: a lot referenced
/// by progress or billing records is never hard-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLot {
    /// Canonical identifier assigned by the database.
    pub lot_id: i64,
    /// The site this lot belongs to.
    pub site_id: i64,
    /// Human-readable lot name (e.g., "Fondations").
    pub name: String,
    /// Measurement unit for quantities on this lot.
    pub unit: MeasurementUnit,
    /// Contracted quantity.
    pub planned_quantity: Decimal,
    /// Contracted price per unit.
    pub unit_price: Decimal,
    /// Derived contracted amount (`planned_quantity × unit_price`).
    pub planned_amount: Decimal,
    /// Display rank within the site.
    pub position: i32,
    /// Whether the lot seeds new progress/billing documents.
    pub active: bool,
}

impl WorkLot {
    /// Computes the contracted amount for a quantity and unit price.
    #[must_use]
    pub fn planned_amount(planned_quantity: Decimal, unit_price: Decimal) -> Decimal {
        (planned_quantity * unit_price).round_dp(2)
    }
}
