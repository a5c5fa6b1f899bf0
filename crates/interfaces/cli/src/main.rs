mod commands;
mod watch;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shelfwatch_api::{HttpInventoryClient, InventoryApi};
use shelfwatch_config::AppConfig;

#[derive(Debug, Parser)]
#[command(
    name = "shelfwatch",
    version,
    about = "Inventory watcher for the shop dashboard service"
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = "config/shelfwatch.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the refresh loop in the foreground and print alerts as they fire.
    ///
    /// Lines typed on stdin become (debounced) search terms, narrowing both
    /// the remote fetch and the printed rows; an empty line clears the term.
    Watch {
        /// Override the configured refresh interval.
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// One-shot listing with search and category filters applied.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Aggregate stock counters.
    Stats,
    /// Create a record.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value_t = 0.0)]
        quantity: f64,
        #[arg(long, default_value = "")]
        unit: String,
        #[arg(long, default_value_t = 0.0)]
        min_quantity: f64,
        #[arg(long, default_value_t = 0.0)]
        price: f64,
    },
    /// Update a record.  Omitted fields keep their current values.
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        quantity: Option<f64>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        min_quantity: Option<f64>,
        #[arg(long)]
        price: Option<f64>,
    },
    /// Delete a record.
    Remove {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config)?;

    let api: Arc<dyn InventoryApi> = Arc::new(HttpInventoryClient::new(
        config.service_root(),
        Duration::from_secs(config.service.request_timeout_secs),
    )?);

    match cli.command {
        Commands::Watch { interval_ms } => {
            let interval =
                Duration::from_millis(interval_ms.unwrap_or(config.refresh.interval_ms));
            let debounce = Duration::from_millis(config.refresh.search_debounce_ms);
            watch::run_watch(api, interval, debounce).await
        }
        Commands::List { search, category } => {
            commands::run_list(api, search.as_deref(), category.as_deref()).await
        }
        Commands::Stats => commands::run_stats(api).await,
        Commands::Add {
            name,
            category,
            quantity,
            unit,
            min_quantity,
            price,
        } => {
            commands::run_add(
                api,
                &config,
                shelfwatch_api::RecordFields {
                    name,
                    category,
                    quantity,
                    unit,
                    min_quantity,
                    price,
                },
            )
            .await
        }
        Commands::Update {
            id,
            name,
            category,
            quantity,
            unit,
            min_quantity,
            price,
        } => {
            commands::run_update(
                api,
                &config,
                id,
                commands::UpdateFields {
                    name,
                    category,
                    quantity,
                    unit,
                    min_quantity,
                    price,
                },
            )
            .await
        }
        Commands::Remove { id, yes } => commands::run_remove(api, &config, id, yes).await,
    }
}
