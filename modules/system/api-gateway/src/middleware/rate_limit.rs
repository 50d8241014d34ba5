//! Per-client, per-route request limits.
//!
//! Each configured `(method, route template)` pair owns a keyed token bucket
//! indexed by client IP, so one noisy client cannot drain another's quota.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use axum::extract::{ConnectInfo, MatchedPath, Request};
use axum::http::{HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::Clock;
use governor::middleware::StateInformationMiddleware;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use modkit_errors::ApiError;

use crate::config::RateLimitConfig;

type RouteKey = (Method, String);
type ClientLimiter = DefaultKeyedRateLimiter<IpAddr, StateInformationMiddleware>;

struct RouteBucket {
    limiter: ClientLimiter,
    limit: HeaderValue,
}

/// Limits keyed by method and matched route template.
#[derive(Clone, Default)]
pub struct RateLimiterMap {
    routes: Arc<HashMap<RouteKey, Arc<RouteBucket>>>,
}

impl RateLimiterMap {
    /// # Errors
    /// Returns an error if a route has an unknown method or a zero limit.
    pub fn from_config(cfg: &RateLimitConfig) -> Result<Self> {
        let mut routes = HashMap::new();
        for route in &cfg.routes {
            let method = route
                .method
                .to_ascii_uppercase()
                .parse::<Method>()
                .with_context(|| format!("invalid rate limit method '{}'", route.method))?;
            let per_minute = NonZeroU32::new(route.per_minute).ok_or_else(|| {
                anyhow!("rate limit for {} {} is zero", route.method, route.path)
            })?;
            let limiter = RateLimiter::keyed(Quota::per_minute(per_minute))
                .with_middleware::<StateInformationMiddleware>();
            routes.insert(
                (method, route.path.clone()),
                Arc::new(RouteBucket {
                    limiter,
                    limit: HeaderValue::from(route.per_minute),
                }),
            );
        }
        Ok(Self {
            routes: Arc::new(routes),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn client_ip(req: &Request) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ci| ci.0.ip())
}

// TODO: prune idle client keys with `retain_recent` on a timer once the
// gateway grows a background task hook.
pub async fn rate_limit_middleware(map: RateLimiterMap, req: Request, next: Next) -> Response {
    // Preflights never count against a client's quota.
    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let Some(path) = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
    else {
        return next.run(req).await;
    };

    let Some(bucket) = map.routes.get(&(req.method().clone(), path)).cloned() else {
        return next.run(req).await;
    };

    let ip = client_ip(&req);
    match bucket.limiter.check_key(&ip) {
        Ok(state) => {
            let mut resp = next.run(req).await;
            let headers = resp.headers_mut();
            headers.insert("X-RateLimit-Limit", bucket.limit.clone());
            headers.insert(
                "X-RateLimit-Remaining",
                HeaderValue::from(state.remaining_burst_capacity()),
            );
            resp
        }
        Err(not_until) => {
            let wait = not_until.wait_time_from(bucket.limiter.clock().now());
            let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            tracing::warn!(
                client = %ip,
                method = %req.method(),
                path = %req.uri().path(),
                retry_after = secs.max(1),
                "rate limit exceeded"
            );
            ApiError::too_many_requests(secs.max(1)).into_response()
        }
    }
}
