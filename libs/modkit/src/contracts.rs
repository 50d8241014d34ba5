use async_trait::async_trait;
use axum::Router;
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;
use utoipa::openapi::OpenApi;

use crate::context::ModuleCtx;

/// Core module: DI/wiring. Runs after migrations, so the schema is in place.
#[async_trait]
pub trait Module: Send + Sync + 'static {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()>;
}

#[async_trait]
pub trait DbModule: Send + Sync {
    /// Runs BEFORE init. Must be idempotent.
    async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()>;
}

/// Pure wiring; must be sync. Runs after init.
pub trait RestfulModule: Send + Sync {
    fn register_rest(&self, ctx: &ModuleCtx, router: Router) -> anyhow::Result<Router>;

    /// OpenAPI fragment describing the routes added by `register_rest`.
    fn openapi(&self) -> OpenApi;
}

/// REST host: owns the global middleware stack and the listener.
#[async_trait]
pub trait RestHostModule: Send + Sync + 'static {
    /// Attach host-level routes and middleware to the composed router.
    /// Do NOT start the server here.
    fn rest_finalize(
        &self,
        ctx: &ModuleCtx,
        router: Router,
        openapi: OpenApi,
    ) -> anyhow::Result<Router>;

    /// Serve `router` until `cancel` fires, then drain in-flight requests.
    async fn serve(&self, router: Router, cancel: CancellationToken) -> anyhow::Result<()>;
}
