//! Project model and database operations
//!
//! A project is owned by the user who created it (`admin_user_id`) and is
//! visible to every user listed in `shared_user_ids`. The stored name is
//! namespaced to its creator (`{creator_id}_{requested_name}`) and is unique
//! across the whole table.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE projects (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     name VARCHAR(128) NOT NULL,
//!     admin_user_id UUID NOT NULL,
//!     shared_user_ids UUID[] NOT NULL DEFAULT '{}',
//!     status TEXT NOT NULL DEFAULT 'active',
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     CONSTRAINT projects_name_key UNIQUE (name),
//!     CONSTRAINT projects_status_check CHECK (status IN ('active', 'inactive'))
//! );
//! ```
//!
//! The SQL helpers on [`Project`] return raw `sqlx::Error`s. Callers go through
//! [`crate::store::ProjectStore`], which classifies those errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

/// Maximum length of a stored project name, in characters
pub const NAME_MAX_LEN: usize = 128;

/// Name of the unique constraint guarding `projects.name`
pub const NAME_UNIQUE_CONSTRAINT: &str = "projects_name_key";

/// Project lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Default status for new projects
    #[default]
    Active,

    /// Project has been switched off
    Inactive,
}

impl ProjectStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Inactive => "inactive",
        }
    }

    /// Parses status from its stored form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ProjectStatus::Active),
            "inactive" => Some(ProjectStatus::Inactive),
            _ => None,
        }
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ProjectStatus::parse(&value).ok_or_else(|| format!("unknown project status: {}", value))
    }
}

/// Project record as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID, assigned by the store
    pub id: Uuid,

    /// Composite name, `{admin_user_id}_{requested_name}`
    pub name: String,

    /// User who created the project
    pub admin_user_id: Uuid,

    /// Users with access to the project; always includes the creator
    pub shared_user_ids: Vec<Uuid>,

    /// Current status
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last modified
    pub updated_at: DateTime<Utc>,
}

/// External representation of a project
///
/// This is the only shape in which a project leaves the service. The internal
/// `id` and `updated_at` are never exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub name: String,
    pub admin_user_id: Uuid,
    pub shared_user_ids: Vec<Uuid>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Project> for ProjectView {
    fn from(project: Project) -> Self {
        Self {
            name: project.name,
            admin_user_id: project.admin_user_id,
            shared_user_ids: project.shared_user_ids,
            status: project.status,
            created_at: project.created_at,
        }
    }
}

/// Input for inserting a new project
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    /// Composite name (already namespaced and trimmed)
    pub name: String,

    /// Creator
    pub admin_user_id: Uuid,

    /// Initial members
    pub shared_user_ids: Vec<Uuid>,

    /// Initial status
    pub status: ProjectStatus,
}

impl NewProject {
    /// Builds the record a user creates when asking for `requested_name`
    ///
    /// The creator becomes admin and sole shared user, and the stored name is
    /// namespaced with the creator's ID.
    pub fn for_creator(creator: Uuid, requested_name: &str) -> Self {
        Self {
            name: composite_name(creator, requested_name),
            admin_user_id: creator,
            shared_user_ids: vec![creator],
            status: ProjectStatus::Active,
        }
    }
}

/// Builds the stored project name for a creator
///
/// # Example
///
/// ```
/// use projecthub_shared::models::project::composite_name;
/// use uuid::Uuid;
///
/// let creator = Uuid::nil();
/// assert_eq!(
///     composite_name(creator, "alpha"),
///     "00000000-0000-0000-0000-000000000000_alpha"
/// );
/// ```
pub fn composite_name(creator: Uuid, requested_name: &str) -> String {
    format!("{}_{}", creator, requested_name).trim().to_string()
}

/// Body of `POST /v1/projects/create`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Requested (un-namespaced) project name
    #[validate(length(
        min = 3,
        max = 128,
        message = "\"name\" length must be between 3 and 128 characters"
    ))]
    pub name: String,
}

/// Body of `POST /v1/projects/create` as received
///
/// Fields stay loosely typed so that a missing or mistyped `name` surfaces as
/// a field error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProjectPayload {
    #[serde(default)]
    pub name: Option<serde_json::Value>,
}

impl CreateProjectPayload {
    /// Checks that `name` is present and is a string
    pub fn into_request(self) -> Result<CreateProjectRequest, ValidationErrors> {
        match self.name {
            Some(serde_json::Value::String(name)) => Ok(CreateProjectRequest { name }),
            Some(serde_json::Value::Null) | None => {
                let mut errors = ValidationErrors::new();
                errors.add("name", field_error("required", "\"name\" is required"));
                Err(errors)
            }
            Some(_) => {
                let mut errors = ValidationErrors::new();
                errors.add("name", field_error("type", "\"name\" must be a string"));
                Err(errors)
            }
        }
    }
}

/// Query string of `GET /v1/projects` as received
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProjectsParams {
    pub page: Option<String>,

    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
}

impl ListProjectsParams {
    /// Checks that both parameters are present integers
    ///
    /// Range checks happen when the resulting [`ListProjectsQuery`] is
    /// validated.
    pub fn into_query(self) -> Result<ListProjectsQuery, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let page = parse_integer(&mut errors, "page", "page", self.page);
        let per_page = parse_integer(&mut errors, "per_page", "perPage", self.per_page);

        match (page, per_page) {
            (Some(page), Some(per_page)) => Ok(ListProjectsQuery { page, per_page }),
            _ => Err(errors),
        }
    }
}

fn parse_integer(
    errors: &mut ValidationErrors,
    field: &'static str,
    wire_name: &str,
    raw: Option<String>,
) -> Option<i64> {
    let error = match raw {
        None => field_error("required", format!("\"{}\" is required", wire_name)),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(value) => return Some(value),
            Err(_) => field_error("integer", format!("\"{}\" must be an integer", wire_name)),
        },
    };
    errors.add(field, error);
    None
}

fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Query string of `GET /v1/projects`
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct ListProjectsQuery {
    /// 1-based page number
    #[validate(range(min = 1, message = "\"page\" must be greater than or equal to 1"))]
    pub page: i64,

    /// Page size
    #[serde(rename = "perPage")]
    #[validate(range(min = 1, max = 100, message = "\"perPage\" must be between 1 and 100"))]
    pub per_page: i64,
}

impl ListProjectsQuery {
    /// Number of records to skip
    ///
    /// Saturates at `i64::MAX`, which any store treats as past the end.
    pub fn offset(&self) -> i64 {
        self.page
            .saturating_sub(1)
            .max(0)
            .saturating_mul(self.per_page.max(0))
    }

    /// Maximum number of records to return
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

const PROJECT_COLUMNS: &str =
    "id, name, admin_user_id, shared_user_ids, status, created_at, updated_at";

impl Project {
    /// Projects the record onto its external representation
    pub fn transform(self) -> ProjectView {
        ProjectView::from(self)
    }

    /// Whether `user_id` may see this project
    pub fn is_shared_with(&self, user_id: Uuid) -> bool {
        self.shared_user_ids.contains(&user_id)
    }

    /// Inserts a new project
    ///
    /// Uniqueness of `name` is enforced by the `projects_name_key` constraint,
    /// so a colliding insert fails with a database error instead of
    /// overwriting the existing row.
    pub async fn create(pool: &PgPool, data: NewProject) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO projects (name, admin_user_id, shared_user_ids, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(data.name)
            .bind(data.admin_user_id)
            .bind(&data.shared_user_ids)
            .bind(data.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);

        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds projects by their stored (composite) name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM projects WHERE name = $1", PROJECT_COLUMNS);

        sqlx::query_as::<_, Project>(&query)
            .bind(name)
            .fetch_all(pool)
            .await
    }

    /// Lists projects shared with a user, newest first
    ///
    /// Rows with equal `created_at` are ordered by `id` so that consecutive
    /// pages never overlap.
    pub async fn list_shared_with(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {}
            FROM projects
            WHERE $1 = ANY(shared_user_ids)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            PROJECT_COLUMNS
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
