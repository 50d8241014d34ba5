use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use datasets_sdk::DatasetsApi;
use modkit::{DbModule, Module, ModuleCtx, RestfulModule};
use modkit_auth::TokenValidator;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;
use utoipa::OpenApi;

use crate::api::rest::routes::{self, ConcreteService, DatasetsApiDoc};
use crate::config::DatasetsConfig;
use crate::infra::storage::OrmDatasetsRepository;
use crate::infra::storage::migrations::Migrator;
use crate::local_client::DatasetsLocalClient;

/// Dataset Registry module.
///
/// Registers `Arc<dyn DatasetsApi>` in the client hub during init and serves
/// `/api/datasets`. Needs a `dyn TokenValidator` in the hub before REST
/// registration.
#[derive(Default)]
pub struct DatasetsModule {
    service: arc_swap::ArcSwapOption<ConcreteService>,
}

#[async_trait]
impl Module for DatasetsModule {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        let cfg: DatasetsConfig = ctx.config()?;
        cfg.validate()?;
        let db = ctx.db_required()?;

        let service = Arc::new(ConcreteService::new(
            db,
            Arc::new(OrmDatasetsRepository::new()),
            cfg.clone(),
        ));
        self.service.store(Some(service.clone()));

        let api: Arc<dyn DatasetsApi> = Arc::new(DatasetsLocalClient::new(service));
        ctx.client_hub().register::<dyn DatasetsApi>(api);

        info!(
            default_page_size = cfg.default_page_size,
            max_page_size = cfg.max_page_size,
            "datasets module initialized"
        );
        Ok(())
    }
}

#[async_trait]
impl DbModule for DatasetsModule {
    async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        Migrator::up(db, None).await?;
        info!("datasets migrations applied");
        Ok(())
    }
}

impl RestfulModule for DatasetsModule {
    fn register_rest(&self, ctx: &ModuleCtx, router: Router) -> anyhow::Result<Router> {
        let service = self
            .service
            .load()
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("datasets service not initialized"))?
            .clone();
        let validator = ctx.client_hub().get::<dyn TokenValidator>()?;

        Ok(routes::register_routes(router, service, validator))
    }

    fn openapi(&self) -> utoipa::openapi::OpenApi {
        DatasetsApiDoc::openapi()
    }
}
