//! Integration tests for the project endpoints
//!
//! Drive the complete router (auth layer, handlers, error mapping) over the
//! in-memory store.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{read_json, TestContext, TEST_SECRET};
use projecthub_shared::auth::jwt::{create_token, Claims, TokenType};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_create_project_returns_view() {
    let ctx = TestContext::new();

    let response = ctx
        .create_project_raw(Some(&ctx.auth_header()), &json!({ "name": "alpha" }).to_string())
        .await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], format!("{}_alpha", ctx.user_id));
    assert_eq!(body["adminUserId"], ctx.user_id.to_string());
    assert_eq!(body["sharedUserIds"], json!([ctx.user_id.to_string()]));
    assert_eq!(body["status"], "active");
    assert!(body["createdAt"].is_string());

    let mut keys: Vec<&str> = body
        .as_object()
        .unwrap()
        .keys()
        .map(|k| k.as_str())
        .collect();
    keys.sort();
    assert_eq!(
        keys,
        vec!["adminUserId", "createdAt", "name", "sharedUserIds", "status"]
    );
}

#[tokio::test]
async fn test_duplicate_name_conflict() {
    let ctx = TestContext::new();
    ctx.create_project("alpha").await;

    let response = ctx
        .create_project_raw(Some(&ctx.auth_header()), &json!({ "name": "alpha" }).to_string())
        .await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["message"], "Validation Error");
    assert_eq!(
        body["details"],
        json!([{
            "field": "name",
            "location": "body",
            "messages": ["\"name\" already exists"]
        }])
    );

    assert_eq!(ctx.store.len().await, 1);
}

#[tokio::test]
async fn test_same_name_for_different_users() {
    let ctx = TestContext::new();
    let body = json!({ "name": "shared-name" }).to_string();

    let first = ctx.create_project_raw(Some(&ctx.auth_header()), &body).await;
    let second = ctx
        .create_project_raw(Some(&ctx.other_auth_header()), &body)
        .await;

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::CREATED);

    let (_, second_body) = read_json(second).await;
    assert_eq!(second_body["name"], format!("{}_shared-name", ctx.other_user_id));
    assert_eq!(ctx.store.len().await, 2);
}

#[tokio::test]
async fn test_create_rejects_invalid_names() {
    let ctx = TestContext::new();

    let too_long = "x".repeat(129);
    for name in ["", "ab", too_long.as_str()] {
        let response = ctx
            .create_project_raw(Some(&ctx.auth_header()), &json!({ "name": name }).to_string())
            .await;
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "name {:?}", name);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0]["field"], "name");
        assert_eq!(body["details"][0]["location"], "body");
    }

    assert!(ctx.store.is_empty().await);
}

#[tokio::test]
async fn test_create_rejects_name_too_long_once_namespaced() {
    let ctx = TestContext::new();

    // 37 characters of user-ID prefix leave room for 91
    let response = ctx
        .create_project_raw(
            Some(&ctx.auth_header()),
            &json!({ "name": "n".repeat(92) }).to_string(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .create_project_raw(
            Some(&ctx.auth_header()),
            &json!({ "name": "n".repeat(91) }).to_string(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let ctx = TestContext::new();

    let response = ctx
        .create_project_raw(Some(&ctx.auth_header()), "{\"name\":")
        .await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_create_reports_missing_or_mistyped_name() {
    let ctx = TestContext::new();

    for (payload, message) in [
        ("{}", "\"name\" is required"),
        ("{\"name\":null}", "\"name\" is required"),
        ("{\"name\":42}", "\"name\" must be a string"),
    ] {
        let (status, body) = read_json(
            ctx.create_project_raw(Some(&ctx.auth_header()), payload)
                .await,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(
            body["details"],
            json!([{ "field": "name", "location": "body", "messages": [message] }])
        );
    }

    assert!(ctx.store.is_empty().await);
}

#[tokio::test]
async fn test_requires_authentication() {
    let ctx = TestContext::new();
    let body = json!({ "name": "alpha" }).to_string();

    let response = ctx.create_project_raw(None, &body).await;
    let (status, json) = read_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");

    let response = ctx.list_projects(None, "page=1&perPage=10").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert!(ctx.store.is_empty().await);
}

#[tokio::test]
async fn test_rejects_bad_credentials() {
    let ctx = TestContext::new();
    let body = json!({ "name": "alpha" }).to_string();

    let response = ctx.create_project_raw(Some("Basic dXNlcjpwYXNz"), &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx.create_project_raw(Some("Bearer not-a-jwt"), &body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let forged = create_token(
        &Claims::new(ctx.user_id, TokenType::Access),
        "some-other-secret-that-is-long-enough-too",
    )
    .unwrap();
    let response = ctx
        .create_project_raw(Some(&format!("Bearer {}", forged)), &body)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let refresh = create_token(&Claims::new(ctx.user_id, TokenType::Refresh), TEST_SECRET).unwrap();
    let response = ctx
        .create_project_raw(Some(&format!("Bearer {}", refresh)), &body)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert!(ctx.store.is_empty().await);
}

#[tokio::test]
async fn test_list_orders_newest_first_and_paginates() {
    let ctx = TestContext::new();
    for name in ["first", "second", "third"] {
        ctx.create_project(name).await;
    }

    let (status, page1) = read_json(
        ctx.list_projects(Some(&ctx.auth_header()), "page=1&perPage=2")
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<String> = page1
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            format!("{}_third", ctx.user_id),
            format!("{}_second", ctx.user_id)
        ]
    );

    let (status, page2) = read_json(
        ctx.list_projects(Some(&ctx.auth_header()), "page=2&perPage=2")
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let page2 = page2.as_array().unwrap();
    assert_eq!(page2.len(), 1);
    assert_eq!(page2[0]["name"], format!("{}_first", ctx.user_id));
    assert!(page2[0].get("id").is_none());
    assert!(page2[0].get("updatedAt").is_none());
}

#[tokio::test]
async fn test_list_only_shows_shared_projects() {
    let ctx = TestContext::new();
    ctx.create_project("mine").await;

    let (status, body) = read_json(
        ctx.list_projects(Some(&ctx.other_auth_header()), "page=1&perPage=10")
            .await,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_rejects_bad_pagination() {
    let ctx = TestContext::new();
    ctx.create_project("alpha").await;

    for (query, field) in [
        ("page=0&perPage=10", "page"),
        ("page=1&perPage=0", "perPage"),
        ("page=1&perPage=101", "perPage"),
    ] {
        let (status, body) = read_json(ctx.list_projects(Some(&ctx.auth_header()), query).await).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "query {}", query);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0]["field"], field);
        assert_eq!(body["details"][0]["location"], "query");
    }

    for (query, fields) in [
        ("", vec!["page", "perPage"]),
        ("page=1", vec!["perPage"]),
        ("page=one&perPage=10", vec!["page"]),
        ("page=1&perPage=ten", vec!["perPage"]),
    ] {
        let (status, body) = read_json(ctx.list_projects(Some(&ctx.auth_header()), query).await).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "query {:?}", query);
        assert_eq!(body["error"], "validation_error");
        let reported: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap())
            .collect();
        assert_eq!(reported, fields, "query {:?}", query);
        assert!(body["details"]
            .as_array()
            .unwrap()
            .iter()
            .all(|d| d["location"] == "query"));
    }
}

#[tokio::test]
async fn test_list_page_far_past_the_end() {
    let ctx = TestContext::new();
    ctx.create_project("alpha").await;

    let (status, body) = read_json(
        ctx.list_projects(
            Some(&ctx.auth_header()),
            "page=9223372036854775807&perPage=100",
        )
        .await,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_status_and_health() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            Request::builder()
                .uri("/v1/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");

    let (status, health) = read_json(
        ctx.send(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["store"], "memory");
    assert_eq!(health["database"], "connected");
}

#[tokio::test]
async fn test_unknown_user_sees_empty_list() {
    let ctx = TestContext::new();
    let stranger = common::access_token(Uuid::new_v4());

    let (status, body) = read_json(
        ctx.list_projects(Some(&format!("Bearer {}", stranger)), "page=1&perPage=100")
            .await,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
