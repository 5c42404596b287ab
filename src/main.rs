//! Hasura webhook demo server
//!
//! Serves the demo action, event trigger and cron trigger handlers over HTTP.
//!
//! Usage:
//!   hasura-router-server                         # Default port 9001
//!   hasura-router-server --port 8080             # Custom port
//!   hasura-router-server --debug                 # Record payloads in trace fields
//!   hasura-router-server --log-file ./hooks.log  # Append logs to a file

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hasura_router_server::demo;
use hasura_transport::{ServerConfig, WebhookServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hasura-router-server", about = "Hasura action, event and cron webhook server")]
struct Cli {
    /// Port to listen on (0 for OS-assigned)
    #[arg(long, default_value = "9001")]
    port: u16,

    /// Hostname to bind to
    #[arg(long, default_value = "0.0.0.0")]
    hostname: String,

    /// Record request payloads in trace fields
    #[arg(long)]
    debug: bool,

    /// Enable permissive CORS
    #[arg(long)]
    cors: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            port: self.port,
            hostname: self.hostname.clone(),
            enable_cors: self.cors,
        }
    }
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match (&cli.log_file, cli.json_logs) {
        (Some(path), json) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let builder = builder
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false);
            if json {
                builder.json().init();
            } else {
                builder.init();
            }
            eprintln!("Logging to {}", path.display());
        }
        (None, true) => builder.json().init(),
        (None, false) => builder.init(),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let routes = demo::routes(cli.debug)?;
    let mut server = WebhookServer::start(cli.server_config(), routes)
        .await
        .context("Failed to start webhook server")?;

    info!(
        port = server.port(),
        debug = cli.debug,
        "Serving /actions, /events and /crons"
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    info!("Shutting down");
    server.stop().await;

    Ok(())
}
