//! In-memory project store
//!
//! Keeps every project in a `Vec` behind a tokio `RwLock`. Inserts check the
//! name index and push under the same write guard, which gives the same
//! check-and-insert atomicity a unique index gives in Postgres.
//!
//! Creation timestamps are strictly increasing (1µs apart at minimum), so
//! listings are fully ordered even when inserts land within the same clock
//! tick.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{Page, ProjectStore, StoreError, StoreResult};
use crate::models::project::{NewProject, Project, NAME_UNIQUE_CONSTRAINT};

#[derive(Debug, Default)]
struct State {
    projects: Vec<Project>,
    names: HashSet<String>,
    last_created_at: Option<DateTime<Utc>>,
}

impl State {
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_created_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(ts);
        ts
    }
}

/// Process-local project store
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    state: RwLock<State>,
}

impl InMemoryProjectStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored projects
    pub async fn len(&self) -> usize {
        self.state.read().await.projects.len()
    }

    /// Whether the store holds no projects
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, project: NewProject) -> StoreResult<Project> {
        let mut state = self.state.write().await;

        if state.names.contains(&project.name) {
            return Err(StoreError::UniqueViolation {
                constraint: NAME_UNIQUE_CONSTRAINT.to_string(),
            });
        }

        let created_at = state.next_timestamp();
        let record = Project {
            id: Uuid::new_v4(),
            name: project.name,
            admin_user_id: project.admin_user_id,
            shared_user_ids: project.shared_user_ids,
            status: project.status,
            created_at,
            updated_at: created_at,
        };

        state.names.insert(record.name.clone());
        state.projects.push(record.clone());
        debug!(project_id = %record.id, total = state.projects.len(), "Stored project in memory");

        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let state = self.state.read().await;
        Ok(state.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_shared_with(&self, user_id: Uuid, page: Page) -> StoreResult<Vec<Project>> {
        let state = self.state.read().await;

        let mut matching: Vec<&Project> = state
            .projects
            .iter()
            .filter(|p| p.is_shared_with(user_id))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        // An offset beyond the address space is simply past the end
        let offset = usize::try_from(page.offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit.max(0)).unwrap_or(usize::MAX);

        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
