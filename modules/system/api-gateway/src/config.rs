use serde::{Deserialize, Serialize};

/// `server` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Reported by `/health`.
    pub service_name: String,
    pub request_timeout_secs: u64,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_owned(),
            service_name: "parkour-api".to_owned(),
            request_timeout_secs: 30,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

/// `cors` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    pub enabled: bool,
    /// Exact origins, or `["*"]` for any.
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub expose_headers: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_owned()).collect();
        Self {
            enabled: true,
            allowed_origins: owned(&[
                "http://localhost:4200",
                "http://localhost:3000",
                "http://127.0.0.1:4200",
                "http://127.0.0.1:3000",
            ]),
            allowed_methods: owned(&["GET", "POST", "PUT", "DELETE", "OPTIONS", "PATCH"]),
            allowed_headers: owned(&["Content-Type", "Authorization", "X-Requested-With"]),
            expose_headers: owned(&["Content-Type", "Authorization"]),
            allow_credentials: true,
            max_age_seconds: 3600,
        }
    }
}

/// Limit for one `(method, route template)` pair, per client IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteRateLimit {
    pub method: String,
    /// Route template as registered, e.g. `/api/datasets/{dataset_id}`.
    pub path: String,
    pub per_minute: u32,
}

impl RouteRateLimit {
    fn new(method: &str, path: &str, per_minute: u32) -> Self {
        Self {
            method: method.to_owned(),
            path: path.to_owned(),
            per_minute,
        }
    }
}

/// `rate_limit` section. Routes not listed are not limited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub routes: Vec<RouteRateLimit>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        const DATASET: &str = "/api/datasets/{dataset_id}";
        Self {
            enabled: true,
            routes: vec![
                RouteRateLimit::new("POST", "/api/auth/register", 5),
                RouteRateLimit::new("POST", "/api/auth/login", 10),
                RouteRateLimit::new("GET", "/api/auth/profile", 60),
                RouteRateLimit::new("PUT", "/api/auth/profile", 60),
                RouteRateLimit::new("GET", "/api/datasets", 100),
                RouteRateLimit::new("GET", DATASET, 100),
                RouteRateLimit::new("POST", "/api/datasets", 20),
                RouteRateLimit::new("PUT", DATASET, 20),
                RouteRateLimit::new("DELETE", DATASET, 20),
            ],
        }
    }
}

/// Everything the gateway needs, assembled by the server from its sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiGatewayConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn partial_sections_keep_defaults() {
        let cfg: ApiGatewayConfig = serde_json::from_value(serde_json::json!({
            "server": { "bind_addr": "127.0.0.1:8080" },
            "rate_limit": { "enabled": false }
        }))
        .unwrap();
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.server.service_name, "parkour-api");
        assert!(!cfg.rate_limit.enabled);
        assert_eq!(cfg.rate_limit.routes.len(), 9);
        assert!(cfg.cors.allow_credentials);
    }

    #[test]
    fn unknown_server_key_is_rejected() {
        let res: Result<ServerConfig, _> =
            serde_json::from_value(serde_json::json!({ "bind": "x" }));
        assert!(res.is_err());
    }
}
