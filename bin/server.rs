// Expense Tracker - Web Server
// Expenses & stores REST API with Axum

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use expense_tracker::{api, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// In-memory expenses and stores REST API
#[derive(Debug, Parser)]
#[command(name = "expense-server", version)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "EXPENSE_TRACKER_BIND", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// Start with empty collections instead of the demo data
    #[arg(long, env = "EXPENSE_TRACKER_NO_SEED")]
    no_seed: bool,

    /// Don't add permissive CORS headers
    #[arg(long, env = "EXPENSE_TRACKER_NO_CORS")]
    no_cors: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            bind_addr: args.bind,
            seed: !args.no_seed,
            permissive_cors: !args.no_cors,
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    // tower_http at debug so every request/response gets a line
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ServerConfig::from(Args::parse());
    let app = api::app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(
        addr = %config.bind_addr,
        seeded = config.seed,
        "expense tracker listening (API under /api)"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
