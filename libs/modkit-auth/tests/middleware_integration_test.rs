#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware,
    routing::get,
};
use modkit_auth::{
    AuthConfig, JwtTokenService, TokenIssuer,
    axum_ext::{BearerAuthState, CurrentUser, require_bearer},
};
use tower::ServiceExt;
use uuid::Uuid;

async fn whoami(CurrentUser(id): CurrentUser) -> String {
    id.to_string()
}

fn app(svc: Arc<JwtTokenService>) -> Router {
    Router::new()
        .route("/protected", get(whoami))
        .route_layer(middleware::from_fn_with_state(
            BearerAuthState::new(svc),
            require_bearer,
        ))
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_token_is_401_with_error_body() {
    let svc = Arc::new(JwtTokenService::new(&AuthConfig::default()));

    let resp = app(svc)
        .oneshot(Request::get("/protected").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert!(json["error"].as_str().unwrap().contains("Authentication required"));
}

#[tokio::test]
async fn invalid_token_is_401() {
    let svc = Arc::new(JwtTokenService::new(&AuthConfig::default()));

    let resp = app(svc)
        .oneshot(
            Request::get("/protected")
                .header("authorization", "Bearer nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_exposes_current_user() {
    let svc = Arc::new(JwtTokenService::new(&AuthConfig::default()));
    let user_id = Uuid::now_v7();
    let token = svc.issue(user_id).unwrap().access_token;

    let resp = app(svc)
        .oneshot(
            Request::get("/protected")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), user_id.to_string());
}

#[tokio::test]
async fn unknown_route_is_not_masked_by_auth() {
    let svc = Arc::new(JwtTokenService::new(&AuthConfig::default()));

    let resp = app(svc)
        .oneshot(Request::get("/elsewhere").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
