#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use accounts::{AccountsApi, AccountsModule, NewUser};
use modkit::db::{DatabaseConfig, connect};
use modkit::{ClientHub, ConfigProvider, DbModule, Module, ModuleCtx};
use modkit_auth::{
    AuthConfig, BcryptPasswordHasher, JwtTokenService, PasswordHasher, TokenIssuer,
};
use tokio_util::sync::CancellationToken;

struct NoConfig;

impl ConfigProvider for NoConfig {
    fn get_module_config(&self, _module_name: &str) -> Option<&serde_json::Value> {
        None
    }
}

#[tokio::test]
async fn init_requires_auth_handles_in_the_hub() {
    let db = connect(&DatabaseConfig::in_memory()).await.unwrap();
    let hub = Arc::new(ClientHub::new());
    let ctx = ModuleCtx::new(
        "accounts",
        Arc::new(NoConfig),
        hub.clone(),
        CancellationToken::new(),
        Some(db.clone()),
    );
    let module = AccountsModule::default();
    module.migrate(&db).await.unwrap();

    assert!(module.init(&ctx).await.is_err());

    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::new(4));
    let issuer: Arc<dyn TokenIssuer> = Arc::new(JwtTokenService::new(&AuthConfig::default()));
    hub.register::<dyn PasswordHasher>(hasher);
    hub.register::<dyn TokenIssuer>(issuer);
    module.init(&ctx).await.unwrap();

    let api = hub.get::<dyn AccountsApi>().unwrap();
    let session = api
        .register(NewUser {
            username: "admin".to_owned(),
            email: "admin@parkour.com".to_owned(),
            password: "admin123".to_owned(),
            first_name: "Admin".to_owned(),
            last_name: "User".to_owned(),
        })
        .await
        .unwrap();
    let found = api.find_by_username("admin").await.unwrap().unwrap();
    assert_eq!(found.id, session.user.id);
}
