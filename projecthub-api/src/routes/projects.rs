/// Project endpoints
///
/// Both endpoints require JWT authentication; the caller's identity comes
/// from the auth layer via request extensions.
///
/// # Endpoints
///
/// - `POST /v1/projects/create` - Create a project
/// - `GET /v1/projects?page=&perPage=` - List projects shared with the caller

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use projecthub_shared::{
    auth::AuthenticatedIdentity,
    models::project::{CreateProjectPayload, ListProjectsParams, ProjectView},
    services::{
        error::{LOCATION_BODY, LOCATION_QUERY},
        ServiceError,
    },
};

/// Create project
///
/// # Request Body
///
/// ```json
/// { "name": "alpha" }
/// ```
///
/// # Response
///
/// `201 Created` with the project view. The stored name is namespaced with
/// the caller's user ID, so two users may both own an `alpha`.
///
/// # Errors
///
/// - `400` for malformed JSON, a missing or non-string name, or a name
///   outside 3..=128 characters
/// - `409` if the caller already has a project with this name
pub async fn create_project(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    payload: Result<Json<CreateProjectPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProjectView>)> {
    let Json(payload) = payload?;
    let request = payload
        .into_request()
        .map_err(|e| ServiceError::validation(&e, LOCATION_BODY))?;

    let project = state.projects.create_project(&identity, request).await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// List projects
///
/// Returns projects whose shared users include the caller, newest first.
/// An empty page is `200 []`; missing or non-integer `page`/`perPage` are
/// field errors like any other out-of-range value.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
    params: Result<Query<ListProjectsParams>, QueryRejection>,
) -> ApiResult<Json<Vec<ProjectView>>> {
    let Query(params) = params?;
    let query = params
        .into_query()
        .map_err(|e| ServiceError::validation(&e, LOCATION_QUERY))?;

    let projects = state.projects.list_projects(&identity, query).await?;

    Ok(Json(projects))
}
