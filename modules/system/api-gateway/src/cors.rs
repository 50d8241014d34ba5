use std::time::Duration;

use anyhow::{Context, bail};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::config::CorsConfig;

/// Build a CORS layer from config; `None` when CORS is disabled.
///
/// # Errors
/// Fails on `allowed_origins = ["*"]` combined with credentials, or on any
/// origin, method or header that is not a valid HTTP token.
pub fn build_cors_layer(cfg: &CorsConfig) -> anyhow::Result<Option<CorsLayer>> {
    if !cfg.enabled {
        return Ok(None);
    }

    let wildcard_origin = cfg.allowed_origins.iter().any(|o| o == "*");
    if wildcard_origin && cfg.allow_credentials {
        bail!("cors.allowed_origins=['*'] cannot be combined with cors.allow_credentials=true");
    }

    let mut layer = CorsLayer::new();

    if wildcard_origin {
        warn!("CORS allows any origin");
        layer = layer.allow_origin(Any);
    } else {
        let origins = cfg
            .allowed_origins
            .iter()
            .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{o}'")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        layer = layer.allow_origin(origins);
    }

    if cfg.allowed_methods.iter().any(|m| m == "*") {
        layer = layer.allow_methods(Any);
    } else {
        let methods = cfg
            .allowed_methods
            .iter()
            .map(|m| {
                m.parse::<Method>()
                    .with_context(|| format!("invalid CORS method '{m}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        layer = layer.allow_methods(methods);
    }

    if cfg.allowed_headers.iter().any(|h| h == "*") {
        layer = layer.allow_headers(Any);
    } else {
        layer = layer.allow_headers(header_names(&cfg.allowed_headers)?);
    }
    layer = layer.expose_headers(header_names(&cfg.expose_headers)?);

    if cfg.allow_credentials {
        layer = layer.allow_credentials(true);
    }
    if cfg.max_age_seconds > 0 {
        layer = layer.max_age(Duration::from_secs(cfg.max_age_seconds));
    }

    Ok(Some(layer))
}

fn header_names(names: &[String]) -> anyhow::Result<Vec<HeaderName>> {
    names
        .iter()
        .map(|h| {
            h.parse::<HeaderName>()
                .with_context(|| format!("invalid CORS header '{h}'"))
        })
        .collect()
}
