//! Application state and router builder
//!
//! # Example
//!
//! ```no_run
//! use projecthub_api::{app::{build_router, AppState}, config::Config};
//! use projecthub_shared::services::ProjectService;
//! use projecthub_shared::store::InMemoryProjectStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let projects = ProjectService::new(Arc::new(InMemoryProjectStore::new()));
//! let app = build_router(AppState::new(projects, config));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::Config;
use crate::error::ApiError;
use crate::middleware::security::security_headers;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use projecthub_shared::auth::authenticate;
use projecthub_shared::services::ProjectService;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Project operations over the configured store
    pub projects: ProjectService,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(projects: ProjectService, config: Config) -> Self {
        Self {
            projects,
            config: Arc::new(config),
        }
    }

    /// Secret used to verify bearer tokens
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET /health                 # Health check (public)
/// └── /v1/
///     ├── GET /status             # Liveness probe, plain "OK" (public)
///     └── /projects/              # Authenticated
///         ├── POST /create        # Create a project
///         └── GET  /              # List projects shared with the caller
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let project_routes = Router::new()
        .route("/create", post(routes::projects::create_project))
        .route("/", get(routes::projects::list_projects))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .route("/status", get(routes::health::status))
        .nest("/projects", project_routes);

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(axum::middleware::from_fn_with_state(
            state.config.api.production,
            security_headers,
        ))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let wildcard = config.api.cors_origins.iter().any(|origin| origin == "*");

    if wildcard && !config.api.production {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// JWT authentication middleware layer
///
/// Validates the bearer token and injects the caller's
/// `AuthenticatedIdentity` into request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = authenticate(req.headers(), state.jwt_secret())?;

    tracing::debug!(user_id = %identity.user_id, "Request authenticated");
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
