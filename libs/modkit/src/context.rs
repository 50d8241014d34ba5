use sea_orm::DatabaseConnection;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::client_hub::ClientHub;
use crate::config::{ConfigError, ConfigProvider, module_config_or_default};

/// Module execution context.
///
/// Passed to every lifecycle method. Gives a module its typed config, the
/// shared database handle (when the process has one), the [`ClientHub`] for
/// publishing and consuming service handles, and a cancellation token tied
/// to process shutdown.
///
/// ```ignore
/// async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
///     let cfg: DatasetsConfig = ctx.config()?;
///     let db = ctx.db_required()?;
///     let svc = Arc::new(Service::new(db, repo, cfg));
///     ctx.client_hub().register::<dyn DatasetsApi>(Arc::new(LocalClient::new(svc)));
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ModuleCtx {
    module_name: Arc<str>,
    config_provider: Arc<dyn ConfigProvider>,
    client_hub: Arc<ClientHub>,
    cancellation_token: CancellationToken,
    db: Option<DatabaseConnection>,
}

impl ModuleCtx {
    pub fn new(
        module_name: impl Into<Arc<str>>,
        config_provider: Arc<dyn ConfigProvider>,
        client_hub: Arc<ClientHub>,
        cancellation_token: CancellationToken,
        db: Option<DatabaseConnection>,
    ) -> Self {
        Self {
            module_name: module_name.into(),
            config_provider,
            client_hub,
            cancellation_token,
            db,
        }
    }

    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    #[must_use]
    pub fn client_hub(&self) -> Arc<ClientHub> {
        Arc::clone(&self.client_hub)
    }

    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    /// Load this module's typed config, falling back to `T::default()`.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidConfig` if the section is present but malformed.
    pub fn config<T: DeserializeOwned + Default>(&self) -> Result<T, ConfigError> {
        module_config_or_default(self.config_provider.as_ref(), &self.module_name)
    }

    #[must_use]
    pub fn db_optional(&self) -> Option<DatabaseConnection> {
        self.db.clone()
    }

    /// # Errors
    /// Fails when the process was started without a database.
    pub fn db_required(&self) -> anyhow::Result<DatabaseConnection> {
        self.db.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "module '{}' requires a database but none is configured",
                self.module_name
            )
        })
    }
}

/// Builds per-module contexts that share one hub, config and database.
pub struct ModuleContextBuilder {
    config_provider: Arc<dyn ConfigProvider>,
    client_hub: Arc<ClientHub>,
    root_token: CancellationToken,
    db: Option<DatabaseConnection>,
}

impl ModuleContextBuilder {
    pub fn new(
        config_provider: Arc<dyn ConfigProvider>,
        client_hub: Arc<ClientHub>,
        root_token: CancellationToken,
        db: Option<DatabaseConnection>,
    ) -> Self {
        Self {
            config_provider,
            client_hub,
            root_token,
            db,
        }
    }

    #[must_use]
    pub fn for_module(&self, module_name: &str) -> ModuleCtx {
        ModuleCtx::new(
            module_name,
            Arc::clone(&self.config_provider),
            Arc::clone(&self.client_hub),
            self.root_token.child_token(),
            self.db.clone(),
        )
    }
}
