use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::DefaultBodyLimit;
use axum::http::{Request, Response, StatusCode};
use axum::middleware::{Next, from_fn};
use axum::routing::get;
use modkit::{ModuleCtx, RestHostModule};
use tokio_util::sync::CancellationToken;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;
use utoipa::openapi::OpenApi;

use crate::config::ApiGatewayConfig;
use crate::cors::build_cors_layer;
use crate::middleware::rate_limit::{RateLimiterMap, rate_limit_middleware};
use crate::middleware::request_id::{self, MakeUuidRequestId};
use crate::web;

/// The process's HTTP host.
pub struct ApiGateway {
    config: ApiGatewayConfig,
}

impl ApiGateway {
    #[must_use]
    pub fn new(config: ApiGatewayConfig) -> Self {
        Self { config }
    }

    /// Add `/health` and `/openapi.json`, then wrap everything in the
    /// middleware stack.
    ///
    /// # Errors
    /// Fails on invalid CORS or rate limit settings, or if the OpenAPI
    /// document cannot be serialized.
    pub fn build_router(&self, router: Router, openapi: OpenApi) -> anyhow::Result<Router> {
        let server = &self.config.server;

        let doc = web::finalize_document(openapi, &server.service_name);
        let doc = Bytes::from(doc.to_json().context("serializing OpenAPI document")?);

        let mut router = router
            .merge(
                Router::new()
                    .route("/health", get(web::health))
                    .with_state(Arc::<str>::from(server.service_name.as_str())),
            )
            .merge(
                Router::new()
                    .route("/openapi.json", get(web::openapi_json))
                    .with_state(doc),
            );

        // Layers wrap outward: the last one added sees the request first.

        if self.config.rate_limit.enabled {
            let limits = RateLimiterMap::from_config(&self.config.rate_limit)?;
            tracing::info!(routes = limits.len(), "rate limiting enabled");
            router = router.layer(from_fn(move |req: Request<Body>, next: Next| {
                rate_limit_middleware(limits.clone(), req, next)
            }));
        }

        if let Some(cors) = build_cors_layer(&self.config.cors)? {
            router = router.layer(cors);
        }

        router = router
            .layer(RequestBodyLimitLayer::new(server.body_limit_bytes))
            .layer(DefaultBodyLimit::max(server.body_limit_bytes))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::GATEWAY_TIMEOUT,
                Duration::from_secs(server.request_timeout_secs),
            ));

        router = router.layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<Body>| {
                    let rid = req
                        .headers()
                        .get(request_id::header())
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("n/a");
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        request_id = %rid,
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(
                    |res: &Response<Body>, latency: Duration, span: &tracing::Span| {
                        let ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                        span.record("status", res.status().as_u16());
                        span.record("latency_ms", ms);
                        tracing::info!(
                            parent: span,
                            status = res.status().as_u16(),
                            latency_ms = ms,
                            "request completed"
                        );
                    },
                ),
        );

        let x_request_id = request_id::header();
        router = router
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, MakeUuidRequestId));

        Ok(router)
    }
}

#[async_trait]
impl RestHostModule for ApiGateway {
    fn rest_finalize(
        &self,
        _ctx: &ModuleCtx,
        router: Router,
        openapi: OpenApi,
    ) -> anyhow::Result<Router> {
        self.build_router(router, openapi)
    }

    async fn serve(&self, router: Router, cancel: CancellationToken) -> anyhow::Result<()> {
        let addr: SocketAddr = self
            .config
            .server
            .bind_addr
            .parse()
            .with_context(|| format!("invalid bind_addr '{}'", self.config.server.bind_addr))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        tracing::info!(
            addr = %listener.local_addr().unwrap_or(addr),
            "HTTP server listening"
        );

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("HTTP server failed")?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
