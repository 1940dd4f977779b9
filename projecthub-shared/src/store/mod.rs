//! Project persistence
//!
//! [`ProjectStore`] is the seam between the project service and whatever holds
//! the records. Backends classify their own failures into [`StoreError`], so a
//! unique-index violation arrives as a typed variant instead of a driver error
//! the caller would have to inspect.
//!
//! # Backends
//!
//! - [`postgres::PgProjectStore`]: PostgreSQL via sqlx, uniqueness enforced by
//!   the `projects_name_key` constraint
//! - [`memory::InMemoryProjectStore`]: process-local store for development and
//!   tests, uniqueness enforced under a single write lock

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::project::{NewProject, Project};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryProjectStore;
pub use postgres::PgProjectStore;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by a project store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An insert collided with a unique index
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation {
        /// Name of the violated constraint
        constraint: String,
    },

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}

/// Pagination window over a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Records to skip
    pub offset: i64,

    /// Maximum records to return
    pub limit: i64,
}

/// Durable storage for projects
#[async_trait]
pub trait ProjectStore: Send + Sync + 'static {
    /// Short backend name, reported by the health endpoint
    fn backend(&self) -> &'static str;

    /// Inserts a project, atomically enforcing name uniqueness
    ///
    /// Returns [`StoreError::UniqueViolation`] when a project with the same
    /// name already exists. Nothing is written in that case.
    async fn insert(&self, project: NewProject) -> StoreResult<Project>;

    /// Fetches a project by ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Project>>;

    /// Lists projects whose `shared_user_ids` contain `user_id`
    ///
    /// Ordered by `created_at` descending, then `id` descending.
    async fn list_shared_with(&self, user_id: Uuid, page: Page) -> StoreResult<Vec<Project>>;

    /// Verifies the store is reachable
    async fn ping(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_unique_violations() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_unique_violation_display() {
        let err = StoreError::UniqueViolation {
            constraint: "projects_name_key".to_string(),
        };
        assert_eq!(err.to_string(), "Unique constraint violated: projects_name_key");
    }
}
