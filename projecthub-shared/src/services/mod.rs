//! Business logic
//!
//! - `project`: create, list, and get projects
//! - `error`: the service error taxonomy and store-error translation

pub mod error;
pub mod project;

pub use error::{check_duplicate_project_name, FieldError, ServiceError};
pub use project::ProjectService;
