#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Router-level tests for `/api/datasets`.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use datasets::api::rest::routes::{ConcreteService, register_routes};
use datasets::config::DatasetsConfig;
use datasets::infra::storage::OrmDatasetsRepository;
use datasets::infra::storage::migrations::Migrator;
use modkit::db::{DatabaseConfig, connect};
use modkit_auth::{AuthConfig, JwtTokenService, SecretString, TokenIssuer};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    token: String,
}

async fn test_app() -> TestApp {
    let db = connect(&DatabaseConfig::in_memory()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let service = Arc::new(ConcreteService::new(
        db,
        Arc::new(OrmDatasetsRepository::new()),
        DatasetsConfig::default(),
    ));

    let jwt = Arc::new(JwtTokenService::new(&AuthConfig {
        jwt_secret: SecretString::new("datasets-test-secret"),
        ..AuthConfig::default()
    }));
    let token = jwt.issue(Uuid::now_v7()).unwrap().access_token;

    TestApp {
        router: register_routes(Router::new(), service, jwt),
        token,
    }
}

impl TestApp {
    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = self
            .router
            .clone()
            .oneshot(req.body(body).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create(&self, id: &str, layer: &str, deps: &[&str]) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/api/datasets",
            Some(json!({
                "dataset_id": id,
                "dataset_name": format!("/mnt/{layer}/{id}"),
                "dataset_type": "delta",
                "layer": layer,
                "upstream_dependencies": deps,
            })),
        )
        .await
    }
}

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let app = test_app().await;
    let resp = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/datasets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dependency_graph_walkthrough() {
    let app = test_app().await;

    let (status, body) = app.create("A", "bronze", &[]).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Dataset created successfully");
    assert_eq!(body["dataset"]["status"], "active");

    let (status, _) = app.create("B", "silver", &["A"]).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.create("C", "gold", &["Z"]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Upstream dependencies not found: Z" }));

    let (status, body) = app.call(Method::DELETE, "/api/datasets/A", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Dataset deleted successfully" }));

    let (status, body) = app.call(Method::GET, "/api/datasets/B", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dataset"]["upstream_dependencies"], json!(["A"]));
}

#[tokio::test]
async fn create_then_get_round_trips_the_record() {
    let app = test_app().await;
    let (_, created) = app.create("orders", "bronze", &[]).await;

    let (status, fetched) = app.call(Method::GET, "/api/datasets/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["dataset"], created["dataset"]);
    assert!(fetched["dataset"]["created_ts"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn validation_and_conflict_are_400() {
    let app = test_app().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/datasets",
            Some(json!({ "dataset_id": "A", "dataset_type": "delta", "layer": "bronze" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "dataset_name is required" }));

    app.create("A", "bronze", &[]).await;
    let (status, body) = app.create("A", "bronze", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Dataset ID already exists" }));
}

#[tokio::test]
async fn malformed_json_is_400_with_error_body() {
    let app = test_app().await;
    let resp = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/datasets")
                .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn update_semantics_for_dependencies() {
    let app = test_app().await;
    app.create("A", "bronze", &[]).await;
    app.create("B", "silver", &["A"]).await;

    let (status, body) = app
        .call(
            Method::PUT,
            "/api/datasets/B",
            Some(json!({ "status": "deprecated" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Dataset updated successfully");
    assert_eq!(body["dataset"]["upstream_dependencies"], json!(["A"]));
    assert_eq!(body["dataset"]["status"], "deprecated");

    let (_, body) = app
        .call(
            Method::PUT,
            "/api/datasets/B",
            Some(json!({ "upstream_dependencies": [] })),
        )
        .await;
    assert_eq!(body["dataset"]["upstream_dependencies"], json!([]));

    let (status, body) = app
        .call(
            Method::PUT,
            "/api/datasets/B",
            Some(json!({ "upstream_dependencies": ["X", "Y"] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Upstream dependencies not found: X, Y" }));

    let (status, body) = app
        .call(Method::PUT, "/api/datasets/nope", Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Dataset not found" }));
}

#[tokio::test]
async fn list_filters_and_reports_paging() {
    let app = test_app().await;
    app.create("b1", "bronze", &[]).await;
    app.create("b2", "bronze", &[]).await;
    app.create("s1", "silver", &["b1", "b2"]).await;

    let (status, body) = app
        .call(
            Method::GET,
            "/api/datasets?layer=bronze&page=1&per_page=1",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 1);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["datasets"].as_array().unwrap().len(), 1);

    let (_, body) = app
        .call(Method::GET, "/api/datasets?status=active&page=7", None)
        .await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["datasets"], json!([]));

    let (_, body) = app
        .call(Method::GET, "/api/datasets?page=abc&per_page=0&layer=", None)
        .await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 20);
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn unknown_dataset_is_404() {
    let app = test_app().await;
    let (status, body) = app.call(Method::GET, "/api/datasets/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Dataset not found" }));

    let (status, _) = app.call(Method::DELETE, "/api/datasets/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
