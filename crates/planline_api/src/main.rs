//! planline API server binary.

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use planline_api::{build_router, AppState};
use planline_core::db::open_db;
use planline_core::{default_log_level, init_logging};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "planline_api", version, about = "HTTP API server for planline")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "PLANLINE_ADDR", default_value = "127.0.0.1:8088")]
    addr: String,

    /// Path to the SQLite database file.
    #[arg(long, env = "PLANLINE_DB", default_value = "planline.db")]
    db_path: PathBuf,

    /// Directory for rolling log files. Must be absolute.
    #[arg(long, env = "PLANLINE_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error.
    #[arg(long, env = "PLANLINE_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_dir = args
        .log_dir
        .unwrap_or_else(|| std::env::temp_dir().join("planline-logs"));
    let log_dir = log_dir
        .to_str()
        .context("log directory path must be valid UTF-8")?;
    let log_level = args
        .log_level
        .unwrap_or_else(|| default_log_level().to_string());
    init_logging(&log_level, log_dir, true).map_err(anyhow::Error::msg)?;

    let conn = open_db(&args.db_path)
        .with_context(|| format!("failed to open database at {}", args.db_path.display()))?;
    let app = build_router(AppState::new(conn));

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    let local_addr = listener.local_addr().context("failed to read local addr")?;
    info!(
        "event=server_started module=api status=ok addr={local_addr} db={}",
        args.db_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("event=server_stopped module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=api status=error error={err}");
        return;
    }
    info!("event=shutdown_requested module=api status=ok");
}
