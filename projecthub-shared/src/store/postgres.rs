//! PostgreSQL project store

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{Page, ProjectStore, StoreResult};
use crate::db::pool;
use crate::models::project::{NewProject, Project};

/// Project store backed by the `projects` table
#[derive(Debug, Clone)]
pub struct PgProjectStore {
    pool: PgPool,
}

impl PgProjectStore {
    /// Wraps an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, project: NewProject) -> StoreResult<Project> {
        // Single INSERT: the unique constraint is the only race arbiter
        let project = Project::create(&self.pool, project).await?;
        debug!(project_id = %project.id, "Inserted project row");
        Ok(project)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(Project::find_by_id(&self.pool, id).await?)
    }

    async fn list_shared_with(&self, user_id: Uuid, page: Page) -> StoreResult<Vec<Project>> {
        let projects =
            Project::list_shared_with(&self.pool, user_id, page.limit, page.offset).await?;
        Ok(projects)
    }

    async fn ping(&self) -> StoreResult<()> {
        pool::health_check(&self.pool).await?;
        Ok(())
    }
}
