//! JsonDB Server Binary
//!
//! Starts the TCP server for JsonDB.

use std::sync::Arc;

use clap::Parser;
use jsondb::network::Server;
use jsondb::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// JsonDB Server
#[derive(Parser, Debug)]
#[command(name = "jsondb-server")]
#[command(about = "Networked JSON document store with nested key paths")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:23456")]
    listen: String,

    /// JSON file holding the store
    #[arg(short, long, default_value = "./data/db.json")]
    db_file: String,

    /// Keep the store in memory instead of a file
    #[arg(long, conflicts_with = "db_file")]
    in_memory: bool,

    /// Number of connection worker threads
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Read/write timeout per connection in milliseconds (0 disables)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jsondb=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("JsonDB Server v{}", jsondb::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let builder = Config::builder()
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms);

    let config = if args.in_memory {
        builder.in_memory().build()
    } else {
        builder.db_file(&args.db_file).build()
    };

    // Open engine
    let engine = match Engine::open(&config) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Store initialized successfully");

    let server = match Server::bind(config, engine) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    println!("Server started!");

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
