use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use service::{roadmap::RoadmapStore, storage::PersistOptions};
use tower::ServiceExt;
use uuid::Uuid;

use server::routes;
use server::startup::build_cors;
use server::state::ServerState;

struct TestApp {
    router: Router,
    data_file: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.data_file);
    }
}

async fn build_app() -> TestApp {
    let data_file = std::env::temp_dir().join(format!("roadmap_api_{}.json", Uuid::new_v4()));
    let store = RoadmapStore::open(&data_file, PersistOptions::default()).await;
    let router = routes::build_router(ServerState::new(Arc::new(store)), build_cors());
    TestApp { router, data_file }
}

async fn send_raw(app: &TestApp, method: Method, uri: &str, body: Option<Body>, content_type: Option<&str>) -> anyhow::Result<(StatusCode, Bytes)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        req = req.header(header::CONTENT_TYPE, ct);
    }
    let req = req.body(body.unwrap_or_else(Body::empty))?;
    let res = app.router.clone().oneshot(req).await?;
    let status = res.status();
    Ok((status, axum::body::to_bytes(res.into_body(), usize::MAX).await?))
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Body>, content_type: Option<&str>) -> anyhow::Result<(StatusCode, Value)> {
    let (status, bytes) = send_raw(app, method, uri, body, content_type).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

async fn get(app: &TestApp, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
    send(app, Method::GET, uri, None, None).await
}

async fn put_json(app: &TestApp, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
    send(app, Method::PUT, uri, Some(Body::from(body.to_string())), Some("application/json")).await
}

async fn delete(app: &TestApp, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
    send(app, Method::DELETE, uri, None, None).await
}

async fn create_user(app: &TestApp) -> anyhow::Result<String> {
    let (status, body) = send(app, Method::POST, "/api/user", None, None).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully.");
    Ok(body["key"].as_str().expect("key is a string").to_string())
}

#[tokio::test]
async fn create_user_returns_fresh_alphanumeric_keys() -> anyhow::Result<()> {
    let app = build_app().await;
    let a = create_user(&app).await?;
    let b = create_user(&app).await?;
    for key in [&a, &b] {
        assert_eq!(key.len(), 16);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
    }
    assert_ne!(a, b);
    Ok(())
}

#[tokio::test]
async fn new_user_has_empty_roadmaps() -> anyhow::Result<()> {
    let app = build_app().await;
    let key = create_user(&app).await?;
    let (status, body) = get(&app, &format!("/api/roadmap/{key}")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
    Ok(())
}

#[tokio::test]
async fn put_then_get_round_trips_document() -> anyhow::Result<()> {
    let app = build_app().await;
    let key = create_user(&app).await?;
    let doc = json!({"university_id": "mit", "notes": "x"});

    let (status, body) = put_json(&app, &format!("/api/roadmap/{key}"), doc.clone()).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Roadmap updated successfully.", "university_id": "mit"}));

    let (status, body) = get(&app, &format!("/api/roadmap/{key}/mit")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, doc);
    Ok(())
}

#[tokio::test]
async fn get_returns_document_bytes_in_sent_key_order() -> anyhow::Result<()> {
    let app = build_app().await;
    let key = create_user(&app).await?;
    let sent = r#"{"university_id":"mit","zeta":1,"alpha":2}"#;

    let (status, _) = send(&app, Method::PUT, &format!("/api/roadmap/{key}"), Some(Body::from(sent)), Some("application/json")).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, bytes) = send_raw(&app, Method::GET, &format!("/api/roadmap/{key}/mit"), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(std::str::from_utf8(&bytes)?, sent);
    Ok(())
}

#[tokio::test]
async fn second_put_overwrites_instead_of_duplicating() -> anyhow::Result<()> {
    let app = build_app().await;
    let key = create_user(&app).await?;
    let uri = format!("/api/roadmap/{key}");

    put_json(&app, &uri, json!({"university_id": "mit", "notes": "x"})).await?;
    put_json(&app, &uri, json!({"university_id": "mit", "notes": "y"})).await?;

    let (status, body) = get(&app, &uri).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"mit": {"university_id": "mit", "notes": "y"}}));
    Ok(())
}

#[tokio::test]
async fn delete_removes_roadmap() -> anyhow::Result<()> {
    let app = build_app().await;
    let key = create_user(&app).await?;
    put_json(&app, &format!("/api/roadmap/{key}"), json!({"university_id": "mit"})).await?;

    let (status, body) = delete(&app, &format!("/api/roadmap/{key}/mit")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Roadmap deleted successfully.", "university_id": "mit"}));

    let (status, body) = get(&app, &format!("/api/roadmap/{key}/mit")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Roadmap not found for this university");

    let (status, _) = delete(&app, &format!("/api/roadmap/{key}/mit")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_key_is_404_with_error_everywhere() -> anyhow::Result<()> {
    let app = build_app().await;
    let responses = [
        get(&app, "/api/roadmap/doesnotexist1234").await?,
        get(&app, "/api/roadmap/doesnotexist1234/mit").await?,
        put_json(&app, "/api/roadmap/doesnotexist1234", json!({"university_id": "mit"})).await?,
        delete(&app, "/api/roadmap/doesnotexist1234/mit").await?,
    ];
    for (status, body) in responses {
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }
    Ok(())
}

#[tokio::test]
async fn unknown_key_wins_over_bad_body() -> anyhow::Result<()> {
    let app = build_app().await;
    let (status, _) = send(&app, Method::PUT, "/api/roadmap/nobody", Some(Body::from("nope")), Some("text/plain")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn put_without_university_id_is_400_and_changes_nothing() -> anyhow::Result<()> {
    let app = build_app().await;
    let key = create_user(&app).await?;
    let uri = format!("/api/roadmap/{key}");
    let before = std::fs::read(&app.data_file)?;

    let (status, body) = put_json(&app, &uri, json!({"notes": "x"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing 'university_id' field in request body");

    let (_, body) = get(&app, &uri).await?;
    assert_eq!(body, json!({}));
    assert_eq!(std::fs::read(&app.data_file)?, before);
    Ok(())
}

#[tokio::test]
async fn non_json_body_is_400() -> anyhow::Result<()> {
    let app = build_app().await;
    let key = create_user(&app).await?;
    let uri = format!("/api/roadmap/{key}");

    let (status, body) = send(&app, Method::PUT, &uri, Some(Body::from("university_id=mit")), Some("text/plain")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request must be JSON");

    let (status, body) = send(&app, Method::PUT, &uri, Some(Body::from("{\"university_id\": ")), Some("application/json")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request must be JSON");

    let (status, _) = send(&app, Method::PUT, &uri, None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn numeric_university_id_is_addressable_as_string() -> anyhow::Result<()> {
    let app = build_app().await;
    let key = create_user(&app).await?;

    let (status, body) = put_json(&app, &format!("/api/roadmap/{key}"), json!({"university_id": 7})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["university_id"], 7);

    let (status, body) = get(&app, &format!("/api/roadmap/{key}/7")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"university_id": 7}));
    Ok(())
}

#[tokio::test]
async fn health_reports_user_count() -> anyhow::Result<()> {
    let app = build_app().await;
    let (status, body) = get(&app, "/api/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "users": 0}));

    create_user(&app).await?;
    create_user(&app).await?;
    let (_, body) = get(&app, "/api/health").await?;
    assert_eq!(body["users"], 2);
    Ok(())
}

#[tokio::test]
async fn cors_allows_any_origin() -> anyhow::Result<()> {
    let app = build_app().await;
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/user")
        .header(header::ORIGIN, "http://example.test")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())?;
    let res = app.router.clone().oneshot(req).await?;
    assert!(res.status().is_success());
    let allowed = res
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok());
    assert_eq!(allowed, Some("http://example.test"));
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_404() -> anyhow::Result<()> {
    let app = build_app().await;
    let (status, body) = get(&app, "/api/nothing-here").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn failed_save_is_500_with_error_body() -> anyhow::Result<()> {
    let missing_dir = std::env::temp_dir().join(format!("roadmap_api_{}", Uuid::new_v4()));
    let store = RoadmapStore::open(missing_dir.join("data.json"), PersistOptions::default()).await;
    let router = routes::build_router(ServerState::new(Arc::new(store)), build_cors());

    let req = Request::builder().method(Method::POST).uri("/api/user").body(Body::empty())?;
    let res = router.oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&axum::body::to_bytes(res.into_body(), usize::MAX).await?)?;
    assert!(body["error"].is_string());
    assert!(!missing_dir.exists());
    Ok(())
}
