//! sqgs-store - Local database provisioning for the SQGS quality-gate app
//!
//! Provisions the on-device SQLite database, inspects its manifest, and
//! reports the persisted provisioning state.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sqgs_store::bootstrap::{DbBootstrap, InitMode};
use sqgs_store::config::{self, AppConfig};
use sqgs_store::engine::{self, BundledEngine, SqliteEngine};
use sqgs_store::prefs::{FilePreferences, PreferenceStore};
use sqgs_store::schema;

/// SQGS local database provisioning tool
#[derive(Parser, Debug)]
#[command(name = "sqgs-store")]
#[command(about = "Provisions and inspects the SQGS local database")]
struct Args {
    /// Directory holding database files (overrides configuration)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the initialization flow (default)
    Init {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the tables of the schema manifest
    Tables,
    /// Show the persisted provisioning state
    Status,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Configuration is resolved before logging so the filter can come from it
    let (config, config_path) = load_or_create_config(args.config.as_deref());

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match &config_path {
        Some(path) => info!("Loaded configuration from {:?}", path),
        None => info!("Using default configuration"),
    }

    let rt = Runtime::new().context("Failed to create tokio runtime")?;
    rt.block_on(run(args, config))
}

/// Load configuration from file or fall back to defaults
fn load_or_create_config(path_override: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    let config_path = match path_override {
        Some(path) => Some(path.to_path_buf()),
        None => engine::get_config_dir()
            .ok()
            .map(|dir| dir.join("config.toml")),
    };

    if let Some(path) = &config_path {
        if path.exists() {
            if let Ok(config) = config::load_config(path) {
                return (config, Some(path.clone()));
            }
        }
    }
    (AppConfig::default(), None)
}

async fn run(args: Args, config: AppConfig) -> Result<()> {
    let data_dir = match args.data_dir.or_else(|| config.database.directory.clone()) {
        Some(dir) => dir,
        None => engine::get_data_dir()?,
    };
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    let engine = Arc::new(BundledEngine::new(&data_dir));
    let prefs = FilePreferences::new(data_dir.join("preferences.json"));
    let bootstrap = DbBootstrap::with_db_name(
        engine.clone(),
        prefs,
        config.database.default_name.clone(),
    );

    match args.command.unwrap_or(Command::Init { json: false }) {
        Command::Init { json } => run_init(&bootstrap, json).await,
        Command::Tables => {
            run_tables();
            Ok(())
        }
        Command::Status => run_status(&bootstrap, &engine).await,
    }
}

async fn run_init<E: SqliteEngine, P: PreferenceStore>(
    bootstrap: &DbBootstrap<E, P>,
    json: bool,
) -> Result<()> {
    let report = bootstrap
        .initialize()
        .await
        .context("Database initialization failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report.mode {
        InitMode::ColdSetup => {
            println!(
                "First setup of '{}': {} tables created, {} failed",
                bootstrap.db_name(),
                report.created(),
                report.failed()
            );
            for outcome in report.tables.iter().filter(|t| t.error.is_some()) {
                println!(
                    "  {}: {}",
                    outcome.table,
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
        InitMode::WarmOpen => {
            println!("Reopened existing database '{}'", bootstrap.db_name());
        }
    }
    Ok(())
}

fn run_tables() {
    println!("Schema manifest ({} tables):", schema::TABLE_COUNT);
    for name in schema::table_names() {
        println!("  {}", name);
    }
}

async fn run_status<E: SqliteEngine, P: PreferenceStore>(
    bootstrap: &DbBootstrap<E, P>,
    engine: &BundledEngine,
) -> Result<()> {
    let stored = bootstrap.stored_db_name().await?;
    let resolved = stored.clone().unwrap_or_else(|| bootstrap.db_name());
    let db_path = engine.database_path(&resolved);

    println!("Platform:       {}", bootstrap.platform());
    println!("Data directory: {}", engine.data_dir().display());
    match &stored {
        Some(name) => println!("Database name:  {} (persisted)", name),
        None => println!("Database name:  {} (default, not persisted)", resolved),
    }
    println!(
        "Database file:  {} ({})",
        db_path.display(),
        if db_path.exists() { "present" } else { "absent" }
    );
    println!(
        "First setup:    {}",
        if bootstrap.first_setup_done().await? {
            "done"
        } else {
            "pending"
        }
    );
    Ok(())
}
