//! flow-breaker
//!
//! Command line front end for the circuit breaking engine.
//!
//! ```text
//! flow-breaker check --config rules.toml [--json]
//!     load → validate → print the rule table
//!
//! flow-breaker run --config rules.toml   (rule sync only, no admission surface)
//!     logging + metrics → RuleManager::load_rules
//!     → ConfigWatcher (hot reload) → apply_updates
//!     → Ctrl-C → Shutdown::trigger
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use flow_breaker::breaker::{RecoveryScheduler, RuleManager};
use flow_breaker::config::{apply_updates, load_config, ConfigWatcher};
use flow_breaker::lifecycle::Shutdown;
use flow_breaker::observability::{logging, metrics};
use flow_breaker::stat::NodeRegistry;

#[derive(Parser)]
#[command(name = "flow-breaker")]
#[command(about = "Circuit breaking rule engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a rule file and print its rules
    Check {
        #[arg(short, long)]
        config: PathBuf,

        /// Print rules as JSON
        #[arg(long)]
        json: bool,
    },
    /// Keep the rule table in sync with the file until Ctrl-C.
    ///
    /// Rule-sync daemon only: no resources report statistics and no
    /// admission checks are served. Embed the library to guard calls.
    Run {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config, json } => check(&config, json),
        Commands::Run { config } => run(&config).await,
    }
}

fn check(path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config.rules)?);
        return Ok(());
    }

    println!("{} rule(s) in {}", config.rules.len(), path.display());
    for rule in config.to_rules() {
        println!("  {}", rule);
    }
    Ok(())
}

async fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "flow-breaker starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let scheduler = RecoveryScheduler::try_current().ok_or("no tokio runtime available")?;
    let registry = Arc::new(NodeRegistry::new());
    let manager = Arc::new(RuleManager::new(registry, Arc::new(scheduler)));
    manager.load_rules(config.to_rules());

    let shutdown = Shutdown::new();
    let (watcher, updates) = ConfigWatcher::new(path);
    let _watcher = watcher.run()?;
    let update_loop = tokio::spawn(apply_updates(manager.clone(), updates, shutdown.subscribe()));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    shutdown.trigger();
    update_loop.await?;

    tracing::info!(resources = manager.resource_count(), "Shutdown complete");
    Ok(())
}
