use std::sync::Arc;

use accounts_sdk::AccountsApi;
use async_trait::async_trait;
use axum::Router;
use modkit::{DbModule, Module, ModuleCtx, RestfulModule};
use modkit_auth::{PasswordHasher, TokenIssuer, TokenValidator};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;
use utoipa::OpenApi;

use crate::api::rest::routes::{self, AccountsApiDoc, ConcreteService};
use crate::infra::storage::OrmUsersRepository;
use crate::infra::storage::migrations::Migrator;
use crate::local_client::AccountsLocalClient;

/// User Store module.
///
/// Expects `dyn PasswordHasher` and `dyn TokenIssuer` in the client hub at
/// init, and `dyn TokenValidator` at REST registration. Publishes
/// `Arc<dyn AccountsApi>`.
#[derive(Default)]
pub struct AccountsModule {
    service: arc_swap::ArcSwapOption<ConcreteService>,
}

#[async_trait]
impl Module for AccountsModule {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let db = ctx.db_required()?;
        let hub = ctx.client_hub();
        let hasher = hub.get::<dyn PasswordHasher>()?;
        let issuer = hub.get::<dyn TokenIssuer>()?;

        let service = Arc::new(ConcreteService::new(
            db,
            Arc::new(OrmUsersRepository::new()),
            hasher,
            issuer,
        ));
        self.service.store(Some(service.clone()));

        let api: Arc<dyn AccountsApi> = Arc::new(AccountsLocalClient::new(service));
        hub.register::<dyn AccountsApi>(api);

        info!("accounts module initialized");
        Ok(())
    }
}

#[async_trait]
impl DbModule for AccountsModule {
    async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        Migrator::up(db, None).await?;
        info!("accounts migrations applied");
        Ok(())
    }
}

impl RestfulModule for AccountsModule {
    fn register_rest(&self, ctx: &ModuleCtx, router: Router) -> anyhow::Result<Router> {
        let service = self
            .service
            .load()
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("accounts service not initialized"))?
            .clone();
        let validator = ctx.client_hub().get::<dyn TokenValidator>()?;

        Ok(routes::register_routes(router, service, validator))
    }

    fn openapi(&self) -> utoipa::openapi::OpenApi {
        AccountsApiDoc::openapi()
    }
}
