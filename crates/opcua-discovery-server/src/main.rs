// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! OPC UA Discovery Server
//!
//! # Usage
//!
//! ```bash
//! # Start server on the well-known discovery port (4840)
//! opcua-discovery-server
//!
//! # Custom port and advertised hostname
//! opcua-discovery-server --port 4841 --hostname plant-ds.local
//!
//! # Configuration file
//! opcua-discovery-server --config discovery.json
//!
//! # Write a default configuration file
//! opcua-discovery-server gen-config --output discovery.json
//! ```

use clap::{Parser, Subcommand};
use opcua_discovery_server::{DiscoveryServer, ServerConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// OPC UA Discovery Server - server registration and FindServers lookup
#[derive(Parser, Debug)]
#[command(name = "opcua-discovery-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TCP port to listen on
    #[arg(short, long, default_value = "4840")]
    port: u16,

    /// Bind address (0.0.0.0 for all interfaces)
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// Configuration file (JSON format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hostname advertised in discovery URLs
    #[arg(long)]
    hostname: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "discovery.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    if let Some(Commands::GenConfig { output }) = args.command {
        ServerConfig::default().to_file(&output)?;
        println!("Wrote default configuration to {}", output.display());
        return Ok(());
    }

    let config = if let Some(config_path) = args.config {
        info!("Loading config from {:?}", config_path);
        ServerConfig::from_file(&config_path)?
    } else {
        ServerConfig {
            bind_address: args.bind.parse()?,
            port: args.port,
            advertised_hostname: args.hostname,
            ..Default::default()
        }
    };

    let server = DiscoveryServer::new(config)?;
    let config = server.config();
    let own = config.server_info();

    info!("+----------------------------------------------------+");
    info!(
        "|       OPC UA Discovery Server v{}            |",
        env!("CARGO_PKG_VERSION")
    );
    info!("+----------------------------------------------------+");
    info!(
        "|  Bind:   {:40} |",
        format!("{}:{}", config.bind_address, config.port)
    );
    info!("|  URI:    {:40} |", own.application_uri);
    info!(
        "|  Host:   {:40} |",
        config
            .advertised_hostname
            .as_deref()
            .unwrap_or("<per connection>")
    );
    info!("+----------------------------------------------------+");

    let server_handle = server.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received, stopping server...");
        server_handle.shutdown();
    });

    server.run().await?;

    info!("Discovery server stopped");
    Ok(())
}
