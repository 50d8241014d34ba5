mod config;
mod logging;
mod seed;
mod server;

use std::path::PathBuf;

use accounts_sdk::AccountsApi;
use anyhow::Result;
use clap::{Parser, Subcommand};
use datasets_sdk::DatasetsApi;

use crate::config::{AppConfig, CliOverrides};

/// Parkour API server: user accounts and the layered dataset registry
#[derive(Parser)]
#[command(name = "parkour-server", version, about)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for the HTTP server (keeps the configured host)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
    /// Apply migrations and create the admin user if it is missing
    InitDb {
        #[arg(long, default_value = "admin123")]
        admin_password: String,
    },
    /// Replace all datasets with the bronze/silver/gold sample graph
    SeedDatasets,
    /// Mark an account inactive so it can no longer log in
    DeactivateUser { username: String },
    /// Re-enable a deactivated account
    ActivateUser { username: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(CliOverrides {
        port: cli.port,
        mock: cli.mock,
    })?;

    logging::init(&config.logging, cli.verbose)?;

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    config.validate()?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        database = %config.database.redacted_dsn(),
        "Parkour API starting"
    );

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => server::run(config).await,
        Commands::Check => {
            println!("Configuration is valid");
            Ok(())
        }
        Commands::InitDb { admin_password } => init_db(&config, &admin_password).await,
        Commands::SeedDatasets => seed_datasets(&config).await,
        Commands::DeactivateUser { username } => set_active(&config, &username, false).await,
        Commands::ActivateUser { username } => set_active(&config, &username, true).await,
    }
}

async fn init_db(config: &AppConfig, admin_password: &str) -> Result<()> {
    let runtime = server::bootstrap(config).await?;
    let accounts = runtime.client_hub().get::<dyn AccountsApi>()?;

    let outcome = seed::ensure_admin(accounts.as_ref(), admin_password).await;
    runtime.close().await?;

    if outcome? {
        println!("Admin user created: username={}", seed::ADMIN_USERNAME);
    } else {
        println!("Admin user already exists");
    }
    println!("Database initialized");
    Ok(())
}

async fn seed_datasets(config: &AppConfig) -> Result<()> {
    let runtime = server::bootstrap(config).await?;
    let datasets = runtime.client_hub().get::<dyn DatasetsApi>()?;

    let outcome = seed::seed_datasets(datasets.as_ref()).await;
    runtime.close().await?;

    let report = outcome?;
    println!("Removed {} existing datasets", report.removed);
    println!("Created {} sample datasets", report.total());
    println!("  - Bronze layer: {} datasets", report.bronze);
    println!("  - Silver layer: {} datasets", report.silver);
    println!("  - Gold layer: {} datasets", report.gold);
    Ok(())
}

async fn set_active(config: &AppConfig, username: &str, active: bool) -> Result<()> {
    let runtime = server::bootstrap(config).await?;
    let accounts = runtime.client_hub().get::<dyn AccountsApi>()?;

    let outcome = seed::set_user_active(accounts.as_ref(), username, active).await;
    runtime.close().await?;

    let user = outcome?;
    let state = if user.is_active { "activated" } else { "deactivated" };
    println!("User '{}' {state}", user.username);
    Ok(())
}
