//! notify-listener: receives problem notifications and logs each problem.
//!
//! On startup the cluster version is queried once to verify the API URL and
//! token before the port is opened.

use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use tracing::info;

use monconf_core::Config;
use monconf_notify::{ApiClient, Handler, ListenerState, ProblemEvent};

// ── CLI ─────────────────────────────────────────────────────────────

/// Problem-notification listener.
#[derive(Parser, Debug)]
#[command(name = "notify-listener", version, about)]
struct Cli {
    /// Configuration profile (prefix for every env key).
    #[arg(long, env = "MONCONF_PROFILE", default_value = "")]
    profile: String,

    /// Bind host; overrides LISTENER_HOST.
    #[arg(long)]
    host: Option<String>,

    /// Bind port; overrides LISTENER_PORT.
    #[arg(long)]
    port: Option<u16>,

    /// Log rejected requests and full payloads.
    #[arg(long, short)]
    verbose: bool,
}

// ── LoggingHandler ──────────────────────────────────────────────────

struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    async fn handle(&self, event: ProblemEvent) {
        info!(
            problem_id = %event.problem.id,
            title = event.problem.title.as_deref().unwrap_or(""),
            status = event.problem.status.as_deref().unwrap_or(""),
            severity = event.problem.severity_level.as_deref().unwrap_or(""),
            "problem event"
        );
    }

    fn name(&self) -> &str {
        "logging"
    }
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    monconf_core::config::load_dotenv();
    let cli = Cli::parse();

    let mut config = Config::for_profile(&cli.profile);
    if let Some(host) = cli.host {
        config.listener.host = host;
    }
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    config.listener.verbose |= cli.verbose;
    config.log_summary();

    let client = ApiClient::from_config(&config.api)?;
    let version = client.cluster_version().await?;
    info!(%version, "connected to cluster");

    let state = Arc::new(ListenerState {
        source: Arc::new(client),
        handler: Arc::new(LoggingHandler),
        verbose: config.listener.verbose,
    });

    monconf_notify::serve(&config.listener.bind_addr(), state).await?;
    info!("notify-listener exited cleanly");

    Ok(())
}
