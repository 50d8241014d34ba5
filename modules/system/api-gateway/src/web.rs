//! Host-level endpoints: liveness and the merged OpenAPI document.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::{Components, OpenApi};

pub const BEARER_SCHEME: &str = "bearer_auth";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
}

pub async fn health(State(service): State<Arc<str>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: service.to_string(),
    })
}

pub async fn openapi_json(State(doc): State<Bytes>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], doc)
}

/// Stamp title and version on the merged module fragments and declare the
/// JWT bearer scheme their operations reference.
#[must_use]
pub fn finalize_document(mut doc: OpenApi, service_name: &str) -> OpenApi {
    service_name.clone_into(&mut doc.info.title);
    env!("CARGO_PKG_VERSION").clone_into(&mut doc.info.version);

    doc.components
        .get_or_insert_with(Components::default)
        .add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    doc
}
