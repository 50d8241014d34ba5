//! Layered server configuration.
//!
//! Precedence, lowest first: built-in defaults → YAML file → `APP__*`
//! environment variables (`__` separates nesting levels) → CLI overrides.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, bail};
use api_gateway::{ApiGatewayConfig, CorsConfig, RateLimitConfig, ServerConfig};
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use modkit::db::DatabaseConfig;
use modkit_auth::AuthConfig;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "APP__";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
    /// Raw per-module sections, read by each module as `<name>.config`.
    pub modules: BTreeMap<String, serde_json::Value>,
}

/// Overrides taken from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub mock: bool,
}

impl AppConfig {
    /// Load defaults, then the optional YAML file, then `APP__*` variables.
    ///
    /// # Errors
    /// Fails if the file is missing or any layer does not match the schema.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")
    }

    /// # Errors
    /// Fails if `--port` is given but `server.bind_addr` is not `host:port`.
    pub fn apply_cli_overrides(&mut self, cli: CliOverrides) -> anyhow::Result<()> {
        if let Some(port) = cli.port {
            let mut addr: SocketAddr = self.server.bind_addr.parse().with_context(|| {
                format!("server.bind_addr '{}' is not host:port", self.server.bind_addr)
            })?;
            addr.set_port(port);
            self.server.bind_addr = addr.to_string();
        }
        if cli.mock {
            self.database = DatabaseConfig::in_memory();
        }
        Ok(())
    }

    /// Cross-section checks that serde alone cannot express.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.auth.validate().map_err(anyhow::Error::msg)?;
        self.server
            .bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("server.bind_addr '{}' is invalid", self.server.bind_addr))?;
        if self.server.request_timeout_secs == 0 {
            bail!("server.request_timeout_secs must be positive");
        }
        if self.server.body_limit_bytes == 0 {
            bail!("server.body_limit_bytes must be positive");
        }
        api_gateway::cors::build_cors_layer(&self.cors).context("cors")?;
        if self.rate_limit.enabled {
            api_gateway::middleware::rate_limit::RateLimiterMap::from_config(&self.rate_limit)
                .context("rate_limit")?;
        }
        Ok(())
    }

    #[must_use]
    pub fn gateway(&self) -> ApiGatewayConfig {
        ApiGatewayConfig {
            server: self.server.clone(),
            cors: self.cors.clone(),
            rate_limit: self.rate_limit.clone(),
        }
    }

    /// Effective configuration as YAML. Secrets render as `[REDACTED]`.
    ///
    /// # Errors
    /// Fails if serialization fails.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_saphyr::to_string(self).context("rendering configuration as YAML")
    }
}

/// Module sections handed to the runtime.
pub struct ModulesConfig(BTreeMap<String, serde_json::Value>);

impl ModulesConfig {
    #[must_use]
    pub fn new(modules: BTreeMap<String, serde_json::Value>) -> Self {
        Self(modules)
    }
}

impl modkit::ConfigProvider for ModulesConfig {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.get(module_name)
    }
}
