//! StrataKV Server Binary
//!
//! Starts the RESP TCP server for StrataKV.

use std::sync::Arc;

use clap::Parser;
use parking_lot::Mutex;
use stratakv::network::Server;
use stratakv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// StrataKV Server
#[derive(Parser, Debug)]
#[command(name = "stratakv-server")]
#[command(about = "LSM-tree key-value store with a Redis-compatible interface")]
#[command(version)]
struct Args {
    /// Data directory for SSTable files
    #[arg(short, long, default_value = "./stratakv_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    listen: String,

    /// Memtable entry count that triggers a flush
    #[arg(short = 'f', long, default_value = "10000")]
    flush_threshold: usize,

    /// Max entries per SSTable
    #[arg(short = 't', long, default_value = "10000")]
    sstable_entry_limit: usize,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stratakv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("StrataKV Server v{}", stratakv::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .memtable_flush_threshold(args.flush_threshold)
        .sstable_entry_limit(args.sstable_entry_limit)
        .max_connections(args.max_connections)
        .build();

    // Open engine
    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(Mutex::new(e)),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    // Start server
    let mut server = Server::new(config, engine);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
