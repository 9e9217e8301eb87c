//! 路由层测试：参数校验、错误码、multipart 上传

mod common;

use std::collections::HashMap;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{csv_body, settings, InMemoryStore};
use http_body_util::BodyExt;
use page_analytics::api::{build_router, AppState};
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "pagepulse-test-boundary";
const MAX_UPLOAD: usize = 1024 * 1024;

fn app(store: &InMemoryStore) -> Router {
    let state = AppState::new(store.repositories(), None, HashMap::new(), settings());
    build_router(state, MAX_UPLOAD)
}

fn multipart(field: &str, filename: &str, content: &[u8]) -> Body {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

fn upload(uri: &str, field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart(field, filename, content))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn content_type(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

const ROWS: [&str; 2] = [
    "1222,106,Juana Babe Ana,Morning stream,Photo,2025-12-01 04:00:00,100,10,5,1000,800",
    "2001,207,Juana Babe Bea,Hello,Video,2025-12-02 02:00:00,7,0,0,90,60",
];

#[tokio::test]
async fn test_out_of_range_params_are_rejected() {
    let store = InMemoryStore::new();

    for uri in [
        "/api/v1/stats/daily?days=0",
        "/api/v1/stats/daily?days=366",
        "/api/v1/stats/top-posts?limit=101",
        "/api/v1/stats/top-posts?metric=likes",
        "/api/v1/posts?per_page=500",
        "/api/v1/imports?limit=0",
        "/api/v1/stats?start_date=2025-12-10&end_date=2025-12-01",
    ] {
        let (status, _) = send(app(&store), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_missing_resources_return_404() {
    let store = InMemoryStore::new();

    let (status, body) = send(app(&store), get("/api/v1/pages/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    let (status, _) = send(app(&store), get("/api/v1/posts/latest")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app(&store), get("/api/v1/posts/12345")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sync_without_token_is_precondition_failure() {
    let store = InMemoryStore::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/pages/106/sync?days_back=30")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(&store), request).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn test_upload_then_query() {
    let store = InMemoryStore::new();

    let (status, body) = send(
        app(&store),
        upload("/api/v1/imports", "file", "posts.csv", &csv_body(&ROWS)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows_imported"], 2);
    assert_eq!(body["status"], "completed");

    let (status, body) = send(app(&store), get("/api/v1/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_posts"], 2);
    assert_eq!(body["all_pages"], 2);

    let (_, body) = send(app(&store), get("/api/v1/posts?page_id=207")).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["post_id"], "2001");

    let (_, body) = send(app(&store), get("/api/v1/imports")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send(app(&store), get("/api/v1/database/stats")).await;
    assert_eq!(body["posts"], 2);
}

#[tokio::test]
async fn test_upload_requires_csv_file_field() {
    let store = InMemoryStore::new();

    let (status, _) = send(
        app(&store),
        upload("/api/v1/imports", "file", "posts.xlsx", b"not a csv"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app(&store),
        upload("/api/v1/imports", "attachment", "posts.csv", &csv_body(&ROWS)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app(&store),
        upload("/api/v1/imports?mode=upsert", "file", "posts.csv", &csv_body(&ROWS)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.post_count(), 0);
}

#[tokio::test]
async fn test_validate_endpoint_does_not_write() {
    let store = InMemoryStore::new();
    let (status, body) = send(
        app(&store),
        upload("/api/v1/imports/validate", "file", "posts.csv", &csv_body(&ROWS)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["rows"], 2);
    assert_eq!(store.post_count(), 0);
}

#[tokio::test]
async fn test_export_json_shape() {
    let store = InMemoryStore::new();
    send(
        app(&store),
        upload("/api/v1/imports", "file", "posts.csv", &csv_body(&ROWS)),
    )
    .await;

    let (status, body) = send(app(&store), get("/api/v1/export/analytics.json")).await;
    assert_eq!(status, StatusCode::OK);
    for key in ["generatedAt", "stats", "pages", "postTypes", "daily", "topPosts"] {
        assert!(body.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(body["stats"]["all"]["total_posts"], 2);
    assert_eq!(body["stats"]["byPage"]["106"]["all_pages"], 1);
}

#[tokio::test]
async fn test_overlap_request_validation() {
    let store = InMemoryStore::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/overlaps")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"page_id_1":"106","page_id_2":"106"}"#))
        .unwrap();
    let (status, _) = send(app(&store), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(app(&store), get("/api/v1/overlaps")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_params_return_problem_json() {
    let store = InMemoryStore::new();

    for uri in [
        "/api/v1/stats/daily?days=-1",
        "/api/v1/posts?page=abc",
        "/api/v1/stats?start_date=yesterday",
    ] {
        let response = app(&store).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(content_type(&response), "application/problem+json", "{}", uri);
    }

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/overlaps")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"page_id_1": 106"#))
        .unwrap();
    let response = app(&store).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&response), "application/problem+json");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_huge_page_number_returns_empty_items() {
    let store = InMemoryStore::new();
    send(
        app(&store),
        upload("/api/v1/imports", "file", "posts.csv", &csv_body(&ROWS)),
    )
    .await;

    let (status, body) = send(
        app(&store),
        get("/api/v1/posts?page=100000000&per_page=50"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert!(body["items"].as_array().unwrap().is_empty());
}
