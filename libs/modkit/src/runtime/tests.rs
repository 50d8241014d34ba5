#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{Router, routing::get};
use parking_lot::Mutex;
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;
use utoipa::openapi::{OpenApi, OpenApiBuilder};

use super::{DbOptions, RuntimeOptions, ShutdownOptions, bootstrap, run};
use crate::client_hub::ClientHub;
use crate::config::ConfigProvider;
use crate::context::ModuleCtx;
use crate::contracts::{DbModule, Module, RestHostModule, RestfulModule};
use crate::db::{DatabaseConfig, connect};
use crate::registry::{ModuleEntry, ModuleRegistry};

type Events = Arc<Mutex<Vec<String>>>;

struct EmptyConfig;

impl ConfigProvider for EmptyConfig {
    fn get_module_config(&self, _module_name: &str) -> Option<&serde_json::Value> {
        None
    }
}

struct Recorder {
    name: &'static str,
    events: Events,
    fail_init: bool,
}

impl Recorder {
    fn new(name: &'static str, events: &Events) -> Arc<Self> {
        Arc::new(Self {
            name,
            events: Arc::clone(events),
            fail_init: false,
        })
    }

    fn push(&self, phase: &str) {
        self.events.lock().push(format!("{}:{phase}", self.name));
    }
}

#[async_trait]
impl Module for Recorder {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        assert_eq!(ctx.module_name(), self.name);
        self.push("init");
        if self.fail_init {
            anyhow::bail!("boom");
        }
        ctx.client_hub()
            .register::<str>(Arc::from(self.name));
        Ok(())
    }
}

#[async_trait]
impl DbModule for Recorder {
    async fn migrate(&self, _db: &DatabaseConnection) -> anyhow::Result<()> {
        self.push("migrate");
        Ok(())
    }
}

impl RestfulModule for Recorder {
    fn register_rest(&self, _ctx: &ModuleCtx, router: Router) -> anyhow::Result<Router> {
        self.push("rest");
        Ok(router.route(&format!("/{}", self.name), get(|| async { "ok" })))
    }

    fn openapi(&self) -> OpenApi {
        OpenApiBuilder::new().build()
    }
}

struct Host {
    events: Events,
}

#[async_trait]
impl RestHostModule for Host {
    fn rest_finalize(
        &self,
        _ctx: &ModuleCtx,
        router: Router,
        _openapi: OpenApi,
    ) -> anyhow::Result<Router> {
        self.events.lock().push("host:finalize".to_owned());
        Ok(router)
    }

    async fn serve(&self, _router: Router, cancel: CancellationToken) -> anyhow::Result<()> {
        self.events.lock().push("host:serve".to_owned());
        cancel.cancelled().await;
        self.events.lock().push("host:stopped".to_owned());
        Ok(())
    }
}

fn options(registry: ModuleRegistry, db: DbOptions) -> RuntimeOptions {
    RuntimeOptions {
        modules_cfg: Arc::new(EmptyConfig),
        db,
        client_hub: Arc::new(ClientHub::new()),
        registry,
    }
}

fn registry_of(modules: &[Arc<Recorder>]) -> ModuleRegistry {
    let mut reg = ModuleRegistry::new();
    for m in modules {
        reg.register(
            ModuleEntry::new(m.name, m.clone())
                .with_db(m.clone())
                .with_rest(m.clone()),
        )
        .unwrap();
    }
    reg
}

#[tokio::test]
async fn phases_run_in_order() {
    let events: Events = Arc::default();
    let a = Recorder::new("accounts", &events);
    let d = Recorder::new("datasets", &events);
    let db = connect(&DatabaseConfig::in_memory()).await.unwrap();

    let token = CancellationToken::new();
    token.cancel();

    run(
        options(registry_of(&[a, d]), DbOptions::Existing(db)),
        Arc::new(Host {
            events: Arc::clone(&events),
        }),
        ShutdownOptions::Token(token),
    )
    .await
    .unwrap();

    let got = events.lock().clone();
    assert_eq!(
        got,
        [
            "accounts:migrate",
            "datasets:migrate",
            "accounts:init",
            "datasets:init",
            "accounts:rest",
            "datasets:rest",
            "host:finalize",
            "host:serve",
            "host:stopped",
        ]
    );
}

#[tokio::test]
async fn migrations_are_skipped_without_database() {
    let events: Events = Arc::default();
    let a = Recorder::new("accounts", &events);

    let rt = bootstrap(options(registry_of(&[a]), DbOptions::None))
        .await
        .unwrap();
    assert!(rt.db().is_none());
    assert_eq!(rt.client_hub().get::<str>().unwrap().as_ref(), "accounts");
    rt.close().await.unwrap();

    assert_eq!(events.lock().clone(), ["accounts:init"]);
}

#[tokio::test]
async fn init_failure_names_the_module() {
    let events: Events = Arc::default();
    let bad = Arc::new(Recorder {
        name: "datasets",
        events: Arc::clone(&events),
        fail_init: true,
    });

    let err = bootstrap(options(registry_of(&[bad]), DbOptions::None))
        .await
        .err()
        .unwrap();
    assert!(err.to_string().contains("datasets"));
}

#[tokio::test]
async fn future_shutdown_stops_serving() {
    let events: Events = Arc::default();
    let a = Recorder::new("accounts", &events);

    run(
        options(registry_of(&[a]), DbOptions::None),
        Arc::new(Host {
            events: Arc::clone(&events),
        }),
        ShutdownOptions::Future(Box::pin(async {})),
    )
    .await
    .unwrap();

    assert!(events.lock().contains(&"host:stopped".to_owned()));
}
