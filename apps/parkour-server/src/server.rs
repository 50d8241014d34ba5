//! Composition root: shared auth handles, the module set and the runtime.

use std::sync::Arc;

use accounts::AccountsModule;
use api_gateway::ApiGateway;
use datasets::DatasetsModule;
use modkit::{
    ClientHub, DbOptions, ModuleEntry, ModuleRegistry, Runtime, RuntimeOptions, ShutdownOptions,
};
use modkit_auth::{
    AuthConfig, BcryptPasswordHasher, JwtTokenService, PasswordHasher, TokenIssuer,
    TokenValidator,
};

use crate::config::{AppConfig, ModulesConfig};

/// Hub pre-populated with the handles modules expect at init.
#[must_use]
pub fn client_hub(auth: &AuthConfig) -> Arc<ClientHub> {
    let hub = Arc::new(ClientHub::new());
    let jwt = Arc::new(JwtTokenService::new(auth));
    hub.register::<dyn TokenIssuer>(jwt.clone());
    hub.register::<dyn TokenValidator>(jwt);
    hub.register::<dyn PasswordHasher>(Arc::new(BcryptPasswordHasher::new(auth.bcrypt_cost)));
    hub
}

/// # Errors
/// Fails on a duplicate module name.
pub fn registry() -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();

    let accounts = Arc::new(AccountsModule::default());
    registry.register(
        ModuleEntry::new("accounts", accounts.clone())
            .with_db(accounts.clone())
            .with_rest(accounts),
    )?;

    let datasets = Arc::new(DatasetsModule::default());
    registry.register(
        ModuleEntry::new("datasets", datasets.clone())
            .with_db(datasets.clone())
            .with_rest(datasets),
    )?;

    Ok(registry)
}

/// # Errors
/// Fails if the module set cannot be assembled.
pub fn runtime_options(config: &AppConfig) -> anyhow::Result<RuntimeOptions> {
    Ok(RuntimeOptions {
        modules_cfg: Arc::new(ModulesConfig::new(config.modules.clone())),
        db: DbOptions::Connect(config.database.clone()),
        client_hub: client_hub(&config.auth),
        registry: registry()?,
    })
}

/// Connect, migrate and init every module without serving HTTP.
///
/// # Errors
/// Fails if the database is unreachable or a module fails to start.
pub async fn bootstrap(config: &AppConfig) -> anyhow::Result<Runtime> {
    modkit::bootstrap(runtime_options(config)?).await
}

/// Serve until SIGINT/SIGTERM.
///
/// # Errors
/// Propagates startup and listener failures.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let host = Arc::new(ApiGateway::new(config.gateway()));
    modkit::run(runtime_options(&config)?, host, ShutdownOptions::Signals).await
}
