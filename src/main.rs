//! Coal Blend - AFT-driven coal blend optimizer
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP service (default)
//! cargo run --release
//! ./coal-blend serve --addr 127.0.0.1:9000
//!
//! # Optimize a request file offline and print the result JSON
//! ./coal-blend optimize --input blends.json
//!
//! # Show the effective configuration
//! ./coal-blend print-config
//! ```
//!
//! # Environment Variables
//!
//! - `COALBLEND_CONFIG`: Path to a TOML config file (default: `./blend_config.toml`)
//! - `COALBLEND_SERVER_ADDR`: Override the server bind address
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use coal_blend::api::{create_app, ApiState};
use coal_blend::config::defaults::SERVER_ADDR_ENV;
use coal_blend::config::validation::is_bind_address;
use coal_blend::config::BlendConfig;
use coal_blend::types::BlendRequest;
use coal_blend::BlendOptimizer;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "coal-blend")]
#[command(about = "Coal blend optimizer: AFT prediction and cost-balanced blend search")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides the default search order)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Run the HTTP service (default)
    Serve {
        /// Override the server address (default: "0.0.0.0:8080")
        #[arg(short, long, value_name = "HOST:PORT")]
        addr: Option<String>,
    },

    /// Optimize a single request file and print the result JSON
    Optimize {
        /// JSON file shaped like the `/api/v1/optimize` body
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the effective configuration as TOML
    PrintConfig,
}

// ============================================================================
// Subcommands
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<BlendConfig> {
    match path {
        Some(p) => BlendConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config from {}", p.display())),
        None => Ok(BlendConfig::load()),
    }
}

async fn run_server(mut config: BlendConfig, cli_addr: Option<String>) -> Result<()> {
    config.apply_addr_overrides(std::env::var(SERVER_ADDR_ENV).ok(), cli_addr);
    let server_addr = config.server.addr.clone();
    if !is_bind_address(&server_addr) {
        anyhow::bail!("Invalid server address '{server_addr}' (expected HOST:PORT)");
    }

    let state = ApiState::from_config(config);
    info!(
        workers = state.pool.capacity(),
        max_coals = state.config.optimizer.max_coals,
        max_combinations = state.config.optimizer.max_combinations,
        time_budget_ms = state.config.optimizer.time_budget_ms,
        "Optimizer pool ready"
    );
    let pool = state.pool.clone();
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {server_addr}"))?;
    info!("HTTP server listening on {}", server_addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            pool.close();
            info!("[HttpServer] Received shutdown signal");
        })
        .await;

    match result {
        Ok(()) => {
            info!("[HttpServer] Graceful shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("[HttpServer] Server error: {}", e);
            Err(anyhow::anyhow!("HTTP server error: {}", e))
        }
    }
}

fn run_optimize(config: &BlendConfig, input: &Path, pretty: bool) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let request: BlendRequest = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid blend request JSON in {}", input.display()))?;

    let optimizer = BlendOptimizer::new(config.optimizer.limits());
    let result = optimizer
        .optimize_request(&request)
        .context("Blend optimization failed")?;

    info!(
        combinations = result.stats.combinations_evaluated,
        elapsed_ms = result.stats.elapsed_ms,
        "Optimization complete"
    );

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let config = load_config(args.config.as_deref())?;

    match args.command.unwrap_or(SubCommand::Serve { addr: None }) {
        SubCommand::Serve { addr } => run_server(config, addr).await,
        SubCommand::Optimize { input, pretty } => run_optimize(&config, &input, pretty),
        SubCommand::PrintConfig => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
