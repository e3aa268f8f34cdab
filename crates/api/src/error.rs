// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use site_ledger_domain::DomainError;
use site_ledger_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent
/// the API contract. The server layer maps each variant to one HTTP
/// status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A requested resource was not found.
    NotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The operation is not permitted in the entity's current workflow
    /// status.
    InvalidState {
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    Validation {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The operation conflicts with existing data.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidState { message } => {
                write!(f, "Invalid state: {message}")
            }
            Self::Validation { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Conflict { message } => {
                write!(f, "Conflict: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not
/// leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidUnit(unit) => ApiError::Validation {
            field: String::from("unit"),
            message: format!("'{unit}' is not a known measurement unit"),
        },
        DomainError::InvalidSnapshotStatus(status) => ApiError::Validation {
            field: String::from("status"),
            message: format!("'{status}' is not a snapshot status"),
        },
        DomainError::InvalidInvoiceStatus(status) => ApiError::Validation {
            field: String::from("status"),
            message: format!("'{status}' is not an invoice status"),
        },
        DomainError::InvalidPaymentMethod(method) => ApiError::Validation {
            field: String::from("method"),
            message: format!("'{method}' is not a payment method"),
        },
        DomainError::InvalidStatusTransition { entity, from, to } => ApiError::InvalidState {
            message: format!("Cannot move {entity} from '{from}' to '{to}'"),
        },
        DomainError::InvalidName(msg) => ApiError::Validation {
            field: String::from("name"),
            message: msg,
        },
        DomainError::NegativeQuantity { field, value } => ApiError::Validation {
            field: String::from(field),
            message: format!("must be >= 0, got {value}"),
        },
        DomainError::NonPositiveAmount { value } => ApiError::Validation {
            field: String::from("amount"),
            message: format!("must be > 0, got {value}"),
        },
        DomainError::InvalidVatRate { value } => ApiError::Validation {
            field: String::from("vat_rate"),
            message: format!("must be between 0 and 100, got {value}"),
        },
        DomainError::DateParseError { date_string, error } => ApiError::Validation {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
        DomainError::InvalidPeriod { start, end } => ApiError::Validation {
            field: String::from("period"),
            message: format!("Period end {end} precedes period start {start}"),
        },
        DomainError::ProgressRegression {
            lot_id,
            baseline,
            requested,
        } => ApiError::Conflict {
            message: format!(
                "Realized quantity {requested} for lot {lot_id} is below the approved baseline {baseline}"
            ),
        },
        DomainError::EmptyInvoice => ApiError::Validation {
            field: String::from("lines"),
            message: String::from("invoice has no line with a billed quantity greater than zero"),
        },
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(message) => Self::NotFound {
                resource_type: String::from("Record"),
                message,
            },
            PersistenceError::LotReferenced { lot_id } => Self::Conflict {
                message: format!(
                    "Work lot {lot_id} is referenced by snapshot or invoice lines and cannot be deleted"
                ),
            },
            PersistenceError::Conflict(message) => Self::Conflict { message },
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}
