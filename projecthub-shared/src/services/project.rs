//! Project create/list/get
//!
//! [`ProjectService`] is stateless apart from its store handle: every call is
//! one validation step followed by at most one store round-trip. Name
//! collisions are never pre-checked; the store's atomic insert is the only
//! arbiter between concurrent creators.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::error::{
    check_duplicate_project_name, FieldError, ServiceError, LOCATION_BODY, LOCATION_QUERY,
};
use crate::auth::AuthenticatedIdentity;
use crate::models::project::{
    CreateProjectRequest, ListProjectsQuery, NewProject, Project, ProjectView, NAME_MAX_LEN,
};
use crate::store::{Page, ProjectStore};

/// Project operations on top of a [`ProjectStore`]
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn ProjectStore>,
}

impl ProjectService {
    /// Creates a service over the given store
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    /// The store this service writes to
    pub fn store(&self) -> &Arc<dyn ProjectStore> {
        &self.store
    }

    /// Creates a project owned by `identity`
    ///
    /// The stored name is `{user_id}_{request.name}`; the creator becomes
    /// admin and the only shared user.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Validation`] if the name is out of bounds, either as
    ///   requested or once namespaced
    /// - [`ServiceError::DuplicateName`] if the composite name already exists
    /// - [`ServiceError::Store`] for any other storage failure
    pub async fn create_project(
        &self,
        identity: &AuthenticatedIdentity,
        request: CreateProjectRequest,
    ) -> Result<ProjectView, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(&e, LOCATION_BODY))?;

        let new_project = NewProject::for_creator(identity.user_id, &request.name);
        if new_project.name.chars().count() > NAME_MAX_LEN {
            return Err(ServiceError::Validation(vec![FieldError::new(
                "name",
                LOCATION_BODY,
                format!(
                    "\"name\" must leave the stored project name at most {} characters",
                    NAME_MAX_LEN
                ),
            )]));
        }

        let project = self
            .store
            .insert(new_project)
            .await
            .map_err(check_duplicate_project_name)?;

        info!(
            project_id = %project.id,
            admin_user_id = %project.admin_user_id,
            "Project created"
        );

        Ok(project.transform())
    }

    /// Lists projects shared with `identity`, newest first
    ///
    /// # Errors
    ///
    /// [`ServiceError::Validation`] if `page < 1` or `perPage` is outside
    /// `1..=100`; the store is not touched in that case.
    pub async fn list_projects(
        &self,
        identity: &AuthenticatedIdentity,
        query: ListProjectsQuery,
    ) -> Result<Vec<ProjectView>, ServiceError> {
        query
            .validate()
            .map_err(|e| ServiceError::validation(&e, LOCATION_QUERY))?;

        let page = Page {
            offset: query.offset(),
            limit: query.limit(),
        };

        let projects = self
            .store
            .list_shared_with(identity.user_id, page)
            .await
            .map_err(ServiceError::Store)?;

        debug!(
            user_id = %identity.user_id,
            page = query.page,
            per_page = query.per_page,
            returned = projects.len(),
            "Listed projects"
        );

        Ok(projects.into_iter().map(Project::transform).collect())
    }

    /// Fetches a project by its ID string
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] if `id` is not a valid UUID or no project has
    /// that ID.
    pub async fn get_project(&self, id: &str) -> Result<Project, ServiceError> {
        let not_found = || ServiceError::NotFound("Project does not exist".to_string());

        let id = Uuid::parse_str(id).map_err(|_| not_found())?;

        self.store
            .find_by_id(id)
            .await
            .map_err(ServiceError::Store)?
            .ok_or_else(not_found)
    }
}
