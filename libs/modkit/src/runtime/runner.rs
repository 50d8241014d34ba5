//! Runtime runner.
//!
//! Phase order: **DB → migrate → init → REST → serve → stop**.
//!
//! [`bootstrap`] covers DB → migrate → init and hands back a [`Runtime`], which
//! one-shot commands use to reach module clients through the hub. [`run`]
//! continues with REST composition, serving until shutdown, and teardown.

use std::{future::Future, pin::Pin, sync::Arc};

use anyhow::Context;
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;
use utoipa::openapi::OpenApiBuilder;

use crate::client_hub::ClientHub;
use crate::config::ConfigProvider;
use crate::context::ModuleContextBuilder;
use crate::contracts::RestHostModule;
use crate::db::{DatabaseConfig, connect_with_retry};
use crate::registry::{ModuleRegistry, RegistryError};
use crate::runtime::shutdown;

/// How the runtime should provide a database to modules.
pub enum DbOptions {
    /// No database. `ModuleCtx::db_required()` will error.
    None,
    /// Connect (with retries) using the given settings.
    Connect(DatabaseConfig),
    /// Use an already-open connection.
    Existing(DatabaseConnection),
}

/// How the runtime should decide when to stop serving.
pub enum ShutdownOptions {
    /// Listen for OS signals (Ctrl+C / SIGTERM).
    Signals,
    /// An external `CancellationToken` controls the lifecycle.
    Token(CancellationToken),
    /// An arbitrary future; when it completes, we initiate shutdown.
    Future(Pin<Box<dyn Future<Output = ()> + Send>>),
}

pub struct RuntimeOptions {
    /// Provider of module config sections (raw JSON by module name).
    pub modules_cfg: Arc<dyn ConfigProvider>,
    pub db: DbOptions,
    /// Hub pre-populated with process-wide handles (token service, hasher).
    pub client_hub: Arc<ClientHub>,
    pub registry: ModuleRegistry,
}

/// Modules that have been migrated and initialized.
pub struct Runtime {
    registry: ModuleRegistry,
    ctx_builder: ModuleContextBuilder,
    client_hub: Arc<ClientHub>,
    db: Option<DatabaseConnection>,
    cancel: CancellationToken,
}

/// DB → migrate → init.
///
/// # Errors
/// Fails if the database is unreachable or any module fails to migrate or init.
pub async fn bootstrap(opts: RuntimeOptions) -> anyhow::Result<Runtime> {
    let cancel = CancellationToken::new();

    tracing::info!("Phase: db");
    let db = match opts.db {
        DbOptions::None => None,
        DbOptions::Connect(cfg) => Some(connect_with_retry(&cfg).await?),
        DbOptions::Existing(db) => Some(db),
    };

    let ctx_builder = ModuleContextBuilder::new(
        opts.modules_cfg,
        Arc::clone(&opts.client_hub),
        cancel.clone(),
        db.clone(),
    );

    tracing::info!("Phase: migrate");
    for entry in opts.registry.entries() {
        match (&db, entry.db.as_ref()) {
            (Some(conn), Some(dbm)) => {
                tracing::debug!(module = entry.name, "Running DB migration");
                dbm.migrate(conn)
                    .await
                    .map_err(|source| RegistryError::DbMigrate {
                        module: entry.name,
                        source,
                    })?;
            }
            (None, Some(_)) => {
                tracing::debug!(
                    module = entry.name,
                    "Module has DbModule trait but no DB handle"
                );
            }
            _ => {}
        }
    }

    tracing::info!("Phase: init");
    for entry in opts.registry.entries() {
        let ctx = ctx_builder.for_module(entry.name);
        entry
            .core
            .init(&ctx)
            .await
            .map_err(|source| RegistryError::Init {
                module: entry.name,
                source,
            })?;
    }

    Ok(Runtime {
        registry: opts.registry,
        ctx_builder,
        client_hub: opts.client_hub,
        db,
        cancel,
    })
}

/// Full cycle: bootstrap → REST → serve → stop.
///
/// # Errors
/// Propagates failures of any phase.
pub async fn run(
    opts: RuntimeOptions,
    host: Arc<dyn RestHostModule>,
    shutdown: ShutdownOptions,
) -> anyhow::Result<()> {
    bootstrap(opts).await?.serve(host, shutdown).await
}

impl Runtime {
    #[must_use]
    pub fn client_hub(&self) -> Arc<ClientHub> {
        Arc::clone(&self.client_hub)
    }

    #[must_use]
    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    /// REST → serve until shutdown → stop.
    ///
    /// # Errors
    /// Fails if route registration or the listener fails. The database is
    /// closed in every case.
    pub async fn serve(
        self,
        host: Arc<dyn RestHostModule>,
        shutdown: ShutdownOptions,
    ) -> anyhow::Result<()> {
        spawn_shutdown_waiter(shutdown, self.cancel.clone());

        let served = self.rest_and_serve(host.as_ref()).await;
        let closed = self.close().await;
        served.and(closed)
    }

    async fn rest_and_serve(&self, host: &dyn RestHostModule) -> anyhow::Result<()> {
        tracing::info!("Phase: rest");
        let mut router = axum::Router::new();
        let mut openapi = OpenApiBuilder::new().build();
        for entry in self.registry.entries() {
            let Some(rest) = entry.rest.as_ref() else {
                continue;
            };
            let ctx = self.ctx_builder.for_module(entry.name);
            router = rest
                .register_rest(&ctx, router)
                .map_err(|source| RegistryError::Rest {
                    module: entry.name,
                    source,
                })?;
            openapi.merge(rest.openapi());
        }

        let host_ctx = self.ctx_builder.for_module("api_gateway");
        let router = host
            .rest_finalize(&host_ctx, router, openapi)
            .context("REST host finalize failed")?;

        tracing::info!("Phase: serve");
        host.serve(router, self.cancel.clone()).await
    }

    /// Stop phase: release the database pool.
    ///
    /// # Errors
    /// Fails if the pool cannot be closed cleanly.
    pub async fn close(self) -> anyhow::Result<()> {
        tracing::info!("Phase: stop");
        self.cancel.cancel();
        if let Some(db) = self.db {
            db.close().await.context("closing database pool")?;
        }
        Ok(())
    }
}

fn spawn_shutdown_waiter(shutdown: ShutdownOptions, cancel: CancellationToken) {
    match shutdown {
        ShutdownOptions::Signals => {
            tokio::spawn(async move {
                match shutdown::wait_for_shutdown().await {
                    Ok(()) => tracing::info!("shutdown: signal received"),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "shutdown: primary waiter failed; falling back to ctrl_c()"
                        );
                        if let Err(e) = tokio::signal::ctrl_c().await {
                            tracing::error!(error = %e, "shutdown: ctrl_c() failed");
                        }
                    }
                }
                cancel.cancel();
            });
        }
        ShutdownOptions::Token(token) => {
            tokio::spawn(async move {
                tokio::select! {
                    () = token.cancelled() => tracing::info!("shutdown: external token cancelled"),
                    () = cancel.cancelled() => {}
                }
                cancel.cancel();
            });
        }
        ShutdownOptions::Future(waiter) => {
            tokio::spawn(async move {
                tokio::select! {
                    () = waiter => tracing::info!("shutdown: external future completed"),
                    () = cancel.cancelled() => {}
                }
                cancel.cancel();
            });
        }
    }
}
