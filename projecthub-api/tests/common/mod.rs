//! Common test utilities for integration tests
//!
//! Builds the full router over an in-memory store, so these tests need no
//! database. Each context gets fresh users and their access tokens.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use projecthub_api::app::{build_router, AppState};
use projecthub_api::config::{ApiConfig, Config, JwtConfig, LogFormat, StoreBackend, StoreConfig};
use projecthub_shared::auth::jwt::{create_token, Claims, TokenType};
use projecthub_shared::services::ProjectService;
use projecthub_shared::store::InMemoryProjectStore;
use serde_json::Value;
use std::sync::Arc;
use tower::Service as _;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<InMemoryProjectStore>,
    pub config: Config,
    pub user_id: Uuid,
    pub jwt_token: String,
    pub other_user_id: Uuid,
    pub other_jwt_token: String,
}

impl TestContext {
    pub fn new() -> Self {
        let config = test_config();
        let store = Arc::new(InMemoryProjectStore::new());
        let state = AppState::new(ProjectService::new(store.clone()), config.clone());
        let app = build_router(state);

        let user_id = Uuid::new_v4();
        let other_user_id = Uuid::new_v4();

        TestContext {
            app,
            store,
            config,
            user_id,
            jwt_token: access_token(user_id),
            other_user_id,
            other_jwt_token: access_token(other_user_id),
        }
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    pub fn other_auth_header(&self) -> String {
        format!("Bearer {}", self.other_jwt_token)
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().call(request).await.unwrap()
    }

    /// `POST /v1/projects/create` with a raw body
    pub async fn create_project_raw(&self, auth: Option<&str>, body: &str) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/v1/projects/create")
            .header("content-type", "application/json");
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Creates a project as the primary user and returns the view JSON
    pub async fn create_project(&self, name: &str) -> Value {
        let body = serde_json::json!({ "name": name }).to_string();
        let response = self
            .create_project_raw(Some(&self.auth_header()), &body)
            .await;
        let (status, json) = read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", json);
        json
    }

    /// `GET /v1/projects` with a raw query string
    pub async fn list_projects(&self, auth: Option<&str>, query: &str) -> Response<Body> {
        let mut builder = Request::builder()
            .method("GET")
            .uri(format!("/v1/projects?{}", query));
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            production: false,
            cors_origins: vec!["*".to_string()],
        },
        store: StoreConfig {
            backend: StoreBackend::Memory,
            database_url: None,
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
        log_format: LogFormat::Pretty,
    }
}

pub fn access_token(user_id: Uuid) -> String {
    let claims = Claims::new(user_id, TokenType::Access);
    create_token(&claims, TEST_SECRET).unwrap()
}

/// Splits a response into its status and JSON body
pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}
