mod common;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::{test_catalog, TestCatalog};
use doc_catalog::models::{Document, ListDocumentsRequest, ListDocumentsResponse, NewDocument};
use doc_catalog::routes::{self, AppState};
use doc_catalog::metrics::{install_recorder, HTTP_REQUESTS_TOTAL};
use doc_catalog::{Catalog, CatalogResult};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

fn app_for(test: &TestCatalog) -> Router {
    routes::router(AppState {
        catalog: Arc::new(test.catalog.clone()),
        request_timeout: Duration::from_secs(5),
        metrics: None,
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn healthz_is_ok() {
    let test = test_catalog().await;
    let (status, body) = send(app_for(&test), get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn insert_then_fetch_over_http() {
    let test = test_catalog().await;
    let app = app_for(&test);

    let (status, body) = send(
        app.clone(),
        post_json(
            "/catalog/documents",
            json!({
                "title": "title",
                "uri": "uri",
                "kind": "web",
                "authors": [{ "name": "name", "surname": "surname" }],
                "tags": ["tag_0"]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(app, get(&format!("/catalog/documents/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "title");
    assert_eq!(body["uri"], "uri");
    assert_eq!(body["kind"]["name"], "web");
    assert_eq!(body["tags"][0]["tag"], "tag_0");
    assert_eq!(body["authors"][0]["surname"], "surname");
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn missing_uri_is_bad_request() {
    let test = test_catalog().await;
    let (status, body) = send(
        app_for(&test),
        post_json("/catalog/documents", json!({ "title": "no uri" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn unknown_document_is_not_found() {
    let test = test_catalog().await;
    let (status, body) = send(app_for(&test), get("/catalog/documents/42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn list_accepts_repeated_tags_and_paginates() {
    let test = test_catalog().await;
    for (title, tags) in [("a doc", vec!["a"]), ("b doc", vec!["b"]), ("c doc", vec!["c"])] {
        test.catalog
            .insert_document(&NewDocument::new(title, "file://x").with_tags(tags))
            .await
            .unwrap();
    }

    let (status, body) = send(
        app_for(&test),
        get("/catalog/documents?tags=a&tags=b&page=1&page_size=1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalElements"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["title"], "a doc");
}

#[tokio::test]
async fn invalid_pagination_is_bad_request() {
    let test = test_catalog().await;
    for uri in [
        "/catalog/documents?page_size=0",
        "/catalog/documents?page=0",
        "/catalog/documents?page=abc",
        "/catalog/documents?page=4294967295&page_size=4294967295",
    ] {
        let (status, _) = send(app_for(&test), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
}

/// 응답하지 않는 저장소
struct StalledCatalog;

#[async_trait]
impl Catalog for StalledCatalog {
    async fn initialize(&self) -> CatalogResult<()> {
        Ok(())
    }

    async fn insert_document(&self, _document: &NewDocument) -> CatalogResult<i64> {
        std::future::pending().await
    }

    async fn get_document(&self, _id: i64) -> CatalogResult<Document> {
        std::future::pending().await
    }

    async fn list_documents(
        &self,
        _request: &ListDocumentsRequest,
    ) -> CatalogResult<ListDocumentsResponse> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn slow_store_times_out_with_gateway_timeout() {
    let app = routes::router(AppState {
        catalog: Arc::new(StalledCatalog),
        request_timeout: Duration::from_millis(50),
        metrics: None,
    });

    let (status, body) = send(app, get("/catalog/documents/1")).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"]["code"], "timeout");
}

#[tokio::test]
async fn metrics_endpoint_reports_requests_by_route_and_status() {
    let test = test_catalog().await;
    let handle = install_recorder().unwrap();
    let app = routes::router(AppState {
        catalog: Arc::new(test.catalog.clone()),
        request_timeout: Duration::from_secs(5),
        metrics: Some(handle),
    });

    let (status, _) = send(app.clone(), get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(app.clone(), get("/catalog/documents/987654")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    let request_lines: Vec<&str> = text
        .lines()
        .filter(|line| line.starts_with(HTTP_REQUESTS_TOTAL))
        .collect();
    assert!(request_lines
        .iter()
        .any(|line| line.contains("route=\"/healthz\"") && line.contains("status=\"200\"")));
    assert!(request_lines.iter().any(|line| {
        line.contains("route=\"/catalog/documents/{id}\"") && line.contains("status=\"404\"")
    }));
    assert!(!text.contains("/catalog/documents/987654"));
}

#[tokio::test]
async fn metrics_route_is_absent_when_disabled() {
    let test = test_catalog().await;
    let response = app_for(&test).oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
