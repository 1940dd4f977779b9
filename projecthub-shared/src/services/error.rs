//! Service error taxonomy

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::models::project::NAME_UNIQUE_CONSTRAINT;
use crate::store::StoreError;

/// Where in the request a field lives
pub const LOCATION_BODY: &str = "body";
pub const LOCATION_QUERY: &str = "query";

/// A field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Offending field, as named on the wire
    pub field: String,

    /// `body` or `query`
    pub location: String,

    /// Human-readable messages
    pub messages: Vec<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            location: location.into(),
            messages: vec![message.into()],
        }
    }

    /// Collects `validator` output into one entry per field
    ///
    /// Entries are sorted by field name so responses are stable.
    pub fn from_validation(errors: &ValidationErrors, location: &str) -> Vec<Self> {
        let mut fields: Vec<Self> = errors
            .field_errors()
            .iter()
            .map(|(field, errors)| Self {
                field: wire_name(field),
                location: location.to_string(),
                messages: errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("\"{}\" is invalid", wire_name(field)))
                    })
                    .collect(),
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        fields
    }
}

// Query parameters are camelCase on the wire
fn wire_name(field: &str) -> String {
    match field {
        "per_page" => "perPage".to_string(),
        other => other.to_string(),
    }
}

/// Errors returned by the project service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input failed validation; nothing was read or written
    #[error("Validation failed: {} errors", .0.len())]
    Validation(Vec<FieldError>),

    /// The composite project name is already taken
    #[error("Validation Error: \"name\" already exists")]
    DuplicateName(FieldError),

    /// The requested project does not exist
    #[error("{0}")]
    NotFound(String),

    /// Unclassified storage failure
    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    /// Builds a validation error from `validator` output
    pub fn validation(errors: &ValidationErrors, location: &str) -> Self {
        ServiceError::Validation(FieldError::from_validation(errors, location))
    }
}

/// Translates a store failure into the service taxonomy
///
/// A violation of the project-name unique index becomes
/// [`ServiceError::DuplicateName`] pointing at the `name` body field. Every
/// other failure passes through untouched as [`ServiceError::Store`].
pub fn check_duplicate_project_name(err: StoreError) -> ServiceError {
    match err {
        StoreError::UniqueViolation { constraint } if constraint == NAME_UNIQUE_CONSTRAINT => {
            ServiceError::DuplicateName(FieldError::new(
                "name",
                LOCATION_BODY,
                "\"name\" already exists",
            ))
        }
        other => ServiceError::Store(other),
    }
}
