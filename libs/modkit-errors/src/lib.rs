//! Error envelope and request/response helpers shared by every Parkour module.
//!
//! Every failure leaving the HTTP surface is rendered as `{"error": "<message>"}`
//! with a status code chosen by the module that produced it. Modules translate
//! their domain errors into [`ApiError`]; nothing else crosses the REST boundary.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api_error;
#[cfg(feature = "axum")]
pub mod extract;
#[cfg(feature = "axum")]
pub mod response;

pub use api_error::{ApiError, ApiResult, ErrorBody};
#[cfg(feature = "axum")]
pub use extract::{JsonBody, QueryParams};
