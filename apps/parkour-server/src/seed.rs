//! One-shot data commands: admin bootstrap, sample datasets, account toggles.

use std::collections::HashMap;

use accounts_sdk::{AccountsApi, NewUser, User};
use anyhow::{Context, anyhow};
use datasets_sdk::{DatasetsApi, NewDataset};
use uuid::Uuid;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_EMAIL: &str = "admin@parkour.com";

/// Create the `admin` account unless it already exists.
/// Returns `true` when a new account was created.
///
/// # Errors
/// Propagates store failures.
pub async fn ensure_admin(accounts: &dyn AccountsApi, password: &str) -> anyhow::Result<bool> {
    if accounts.find_by_username(ADMIN_USERNAME).await?.is_some() {
        tracing::info!("admin user already exists");
        return Ok(false);
    }
    let session = accounts
        .register(NewUser {
            username: ADMIN_USERNAME.to_owned(),
            email: ADMIN_EMAIL.to_owned(),
            password: password.to_owned(),
            first_name: "Admin".to_owned(),
            last_name: "User".to_owned(),
        })
        .await
        .context("creating admin user")?;
    tracing::info!(user_id = %session.user.id, "admin user created");
    Ok(true)
}

/// # Errors
/// Fails if the user does not exist or the store fails.
pub async fn set_user_active(
    accounts: &dyn AccountsApi,
    username: &str,
    active: bool,
) -> anyhow::Result<User> {
    let user = accounts
        .find_by_username(username)
        .await?
        .ok_or_else(|| anyhow!("user '{username}' not found"))?;
    let user = accounts.set_active(user.id, active).await?;
    tracing::info!(user_id = %user.id, %username, active, "account state changed");
    Ok(user)
}

struct SampleDataset {
    key: &'static str,
    name: &'static str,
    dataset_type: &'static str,
    layer: &'static str,
    upstream: &'static [&'static str],
}

const fn sample(
    key: &'static str,
    name: &'static str,
    dataset_type: &'static str,
    layer: &'static str,
    upstream: &'static [&'static str],
) -> SampleDataset {
    SampleDataset {
        key,
        name,
        dataset_type,
        layer,
        upstream,
    }
}

/// Medallion sample graph; every dependency appears before its dependents.
const SAMPLE_GRAPH: &[SampleDataset] = &[
    sample("bronze_customer", "adls://bronze/customer/raw_customer_data", "adls", "bronze", &[]),
    sample("bronze_transaction", "adls://bronze/transactions/raw_transaction_data", "adls", "bronze", &[]),
    sample("bronze_product", "adls://bronze/products/raw_product_catalog", "adls", "bronze", &[]),
    sample("silver_customer_cleaned", "uc.bronze.customer_cleaned", "delta", "silver", &["bronze_customer"]),
    sample("silver_transaction_cleaned", "uc.bronze.transaction_cleaned", "delta", "silver", &["bronze_transaction"]),
    sample("silver_product_cleaned", "uc.bronze.product_catalog_cleaned", "delta", "silver", &["bronze_product"]),
    sample(
        "silver_customer_enriched",
        "uc.silver.customer_enriched",
        "delta",
        "silver",
        &["silver_customer_cleaned", "silver_transaction_cleaned"],
    ),
    sample("gold_customer_analytics", "uc.gold.customer_analytics", "delta", "gold", &["silver_customer_enriched"]),
    sample(
        "gold_transaction_summary",
        "uc.gold.transaction_summary",
        "delta",
        "gold",
        &["silver_transaction_cleaned", "silver_product_cleaned"],
    ),
    sample(
        "gold_customer_ltv",
        "uc.gold.customer_lifetime_value",
        "delta",
        "gold",
        &["gold_customer_analytics", "gold_transaction_summary"],
    ),
    sample(
        "gold_product_performance",
        "adls://gold/reporting/product_performance",
        "adls",
        "gold",
        &["silver_product_cleaned", "silver_transaction_cleaned"],
    ),
];

/// Per-layer counts of what `seed_datasets` inserted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub removed: u64,
    pub bronze: usize,
    pub silver: usize,
    pub gold: usize,
}

impl SeedReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.bronze + self.silver + self.gold
    }
}

/// Replace every dataset with the sample graph, using fresh UUIDs as ids.
///
/// # Errors
/// Propagates registry failures.
pub async fn seed_datasets(datasets: &dyn DatasetsApi) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport {
        removed: datasets.clear_datasets().await?,
        ..SeedReport::default()
    };

    let mut ids: HashMap<&str, String> = HashMap::with_capacity(SAMPLE_GRAPH.len());
    for entry in SAMPLE_GRAPH {
        let upstream = entry
            .upstream
            .iter()
            .map(|key| {
                ids.get(key)
                    .cloned()
                    .ok_or_else(|| anyhow!("sample '{}' depends on unknown '{key}'", entry.key))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let dataset_id = Uuid::new_v4().to_string();
        datasets
            .create_dataset(NewDataset {
                dataset_id: dataset_id.clone(),
                dataset_name: entry.name.to_owned(),
                dataset_type: entry.dataset_type.to_owned(),
                layer: entry.layer.to_owned(),
                upstream_dependencies: upstream,
                status: None,
            })
            .await
            .with_context(|| format!("seeding {}", entry.key))?;
        ids.insert(entry.key, dataset_id);

        match entry.layer {
            "bronze" => report.bronze += 1,
            "silver" => report.silver += 1,
            _ => report.gold += 1,
        }
    }

    tracing::info!(
        removed = report.removed,
        inserted = report.total(),
        "sample datasets seeded"
    );
    Ok(report)
}
