#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! HTTP host for the Parkour API.
//!
//! Owns the listener and the global middleware stack. Requests flow through
//! the layers outermost first:
//! set request id → propagate request id → trace → timeout → body limit →
//! CORS → rate limit → router.

pub mod config;
pub mod cors;
pub mod middleware;
pub mod module;
pub mod web;

pub use config::{ApiGatewayConfig, CorsConfig, RateLimitConfig, RouteRateLimit, ServerConfig};
pub use module::ApiGateway;
