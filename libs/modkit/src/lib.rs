//! Module kit for Parkour services.
//!
//! A service is a set of modules composed explicitly by the binary. Each
//! module implements [`contracts::Module`] and optionally [`contracts::DbModule`]
//! and [`contracts::RestfulModule`]; the runtime drives them through
//! migrate → init → REST → serve → stop.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod client_hub;
pub mod config;
pub mod context;
pub mod contracts;
pub mod db;
pub mod registry;
pub mod runtime;

pub use client_hub::{ClientHub, ClientHubError};
pub use config::{ConfigError, ConfigProvider, module_config_or_default};
pub use context::{ModuleContextBuilder, ModuleCtx};
pub use contracts::{DbModule, Module, RestHostModule, RestfulModule};
pub use registry::{ModuleEntry, ModuleRegistry, RegistryError};
pub use runtime::{DbOptions, Runtime, RuntimeOptions, ShutdownOptions, bootstrap, run};
