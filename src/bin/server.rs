//! partdb Server Binary
//!
//! Starts the HTTP server for partdb.

use clap::Parser;
use partdb::config::WalSyncStrategy;
use partdb::network::Server;
use partdb::{store, Config, PartsService};
use tracing_subscriber::{fmt, EnvFilter};

/// partdb Server
#[derive(Parser, Debug)]
#[command(name = "partdb-server")]
#[command(about = "Robot parts catalog service")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./partdb_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Keep parts in memory only
    #[arg(long)]
    in_memory: bool,

    /// Per-request timeout in milliseconds
    #[arg(short = 't', long, default_value = "5000")]
    request_timeout_ms: u64,

    /// fsync the WAL every N writes instead of after each one
    #[arg(long)]
    sync_every: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,partdb=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("partdb Server v{}", partdb::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let sync_strategy = match args.sync_every {
        Some(count) if count > 1 => WalSyncStrategy::EveryNEntries { count },
        _ => WalSyncStrategy::EveryWrite,
    };

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .in_memory(args.in_memory)
        .listen_addr(&args.listen)
        .request_timeout_ms(args.request_timeout_ms)
        .wal_sync_strategy(sync_strategy)
        .build();

    let store = match store::open(&config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open part store: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Part store initialized successfully");

    let server = Server::new(config, PartsService::new(store));
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
