//! HTTP surface tests against the in-memory backends.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tinylink_cache::MokaLinkCache;
use tinylink_core::RandomCodeGenerator;
use tinylink_gateway::{App, AppState};
use tinylink_service::{LinkService, TokenService};
use tinylink_storage::InMemoryRepository;
use tower::ServiceExt;

const SECRET: &str = "test-secret";

fn app() -> Router {
    let shortener = Arc::new(LinkService::new(
        InMemoryRepository::new(),
        MokaLinkCache::new(),
        RandomCodeGenerator,
        "https://amtinyurl.com",
    ));
    let tokens = Arc::new(TokenService::new(SECRET));
    App::router(AppState::new(shortener, tokens, "https://amtinyurl.com"))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn issue_token(app: &Router, user_id: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/token",
            None,
            json!({ "userId": user_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn token_issue_lowercases_the_user_id() {
    let app = app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/token",
            None,
            json!({ "userId": "AbC123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["userId"], "abc123");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn token_issue_rejects_malformed_user_ids() {
    let app = app();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/token",
            None,
            json!({ "userId": "too-long-id" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INVALID_USER_ID");
}

#[tokio::test]
async fn management_api_requires_a_bearer_token() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/urls",
            None,
            json!({ "url": "example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get_request("/api/urls", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_then_resubmit_yields_201_then_200() {
    let app = app();
    let token = issue_token(&app, "abc123").await;

    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/urls",
            Some(&token),
            json!({ "url": "example.com/page" }),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = body_json(created).await;
    assert_eq!(created["url"], "https://example.com/page");
    assert_eq!(created["existed"], false);
    let code = created["code"].as_str().unwrap().to_owned();
    assert_eq!(code.len(), 7);
    assert_eq!(
        created["shortUrl"],
        format!("https://amtinyurl.com/{code}")
    );

    let resubmitted = app
        .oneshot(json_request(
            "POST",
            "/api/urls",
            Some(&token),
            json!({ "url": "example.com/page" }),
        ))
        .await
        .unwrap();
    assert_eq!(resubmitted.status(), StatusCode::OK);
    let resubmitted = body_json(resubmitted).await;
    assert_eq!(resubmitted["code"], code.as_str());
    assert_eq!(resubmitted["existed"], true);
}

#[tokio::test]
async fn invalid_urls_are_rejected_with_400() {
    let app = app();
    let token = issue_token(&app, "abc123").await;

    for bad in ["http://example.com", "", "https://amtinyurl.com/x"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/urls",
                Some(&token),
                json!({ "url": bad }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "INVALID_URL");
    }
}

#[tokio::test]
async fn redirect_carries_location_and_cache_control() {
    let app = app();
    let token = issue_token(&app, "abc123").await;

    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/urls",
            Some(&token),
            json!({ "url": "example.com/target" }),
        ))
        .await
        .unwrap();
    let created = body_json(created).await;
    let code = created["code"].as_str().unwrap().to_owned();

    let response = app
        .oneshot(get_request(&format!("/{code}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.com/target"
    );
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "max-age=100, public"
    );
}

#[tokio::test]
async fn unknown_codes_redirect_to_404_with_json_body() {
    let app = app();

    for missing in ["abcdefg", "not!valid"] {
        let response = app
            .clone()
            .oneshot(get_request(&format!("/{missing}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Short code not found");
        assert_eq!(body["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn list_and_delete_are_scoped_to_the_caller() {
    let app = app();
    let alice = issue_token(&app, "abc123").await;
    let bob = issue_token(&app, "xyz789").await;

    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/urls",
            Some(&alice),
            json!({ "url": "example.com/shared" }),
        ))
        .await
        .unwrap();
    let created = body_json(created).await;
    let code = created["code"].as_str().unwrap().to_owned();

    // Bob submits the same URL, gets the same code.
    let shared = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/urls",
            Some(&bob),
            json!({ "url": "example.com/shared" }),
        ))
        .await
        .unwrap();
    assert_eq!(shared.status(), StatusCode::OK);

    let listed = app
        .clone()
        .oneshot(get_request("/api/urls", Some(&alice)))
        .await
        .unwrap();
    assert_eq!(listed.status(), StatusCode::OK);
    let listed = body_json(listed).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["code"], code.as_str());
    assert_eq!(
        listed[0]["shortUrl"],
        format!("https://amtinyurl.com/{code}")
    );

    // Alice deletes her association; Bob's and the redirect survive.
    let deleted = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/urls/{code}"),
            Some(&alice),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let again = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/urls/{code}"),
            Some(&alice),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let bobs = app
        .clone()
        .oneshot(get_request("/api/urls", Some(&bob)))
        .await
        .unwrap();
    let bobs = body_json(bobs).await;
    assert_eq!(bobs.as_array().unwrap().len(), 1);

    let redirect = app
        .oneshot(get_request(&format!("/{code}"), None))
        .await
        .unwrap();
    assert_eq!(redirect.status(), StatusCode::MOVED_PERMANENTLY);
}

#[tokio::test]
async fn healthz_reports_both_components() {
    let app = app();
    let response = app.oneshot(get_request("/healthz", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["checks"]["storage"], true);
    assert_eq!(body["checks"]["cache"], true);
}
