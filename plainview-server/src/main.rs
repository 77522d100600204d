use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use plainview_common::APP_NAME;
use plainview_common::observability::{LogConfig, LogFormat, init_logging};
use plainview_config::{PlainviewConfig, PlainviewConfigLoader};
use plainview_server::{AppState, router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

const DEFAULT_CONFIG: &str = "plainview.yaml";

/// Forward proxy that serves pages without scripts, styles or link farms.
#[derive(Debug, Parser)]
#[command(name = "plainview", version, about)]
struct Args {
    /// YAML configuration file. `plainview.yaml` is read when present.
    #[arg(short, long, env = "PLAINVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind, overriding `server.host`.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding `server.port`.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1) Load config (env wins over file, CLI wins over both)
    let loader = match &args.config {
        Some(path) => PlainviewConfigLoader::new().with_file(path),
        None => PlainviewConfigLoader::new().with_optional_file(DEFAULT_CONFIG),
    };
    let mut cfg: PlainviewConfig = loader.load().context("failed to load configuration")?;
    if let Some(host) = args.host {
        cfg.server.host = host;
    }
    if let Some(port) = args.port {
        cfg.server.port = port;
    }

    // 2) Logging
    let log_path = init_logging(log_config(&cfg)?)?;

    // 3) Serve
    let state = AppState::from_config(&cfg)?;
    let addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        log = %log_path.display(),
        link_quota = cfg.rewrite.link_quota,
        timeout_secs = cfg.fetch.timeout_secs,
        "server.listening"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    tracing::info!("server.stopped");
    Ok(())
}

fn log_config(cfg: &PlainviewConfig) -> Result<LogConfig> {
    let format: LogFormat = cfg.logging.format.parse().map_err(anyhow::Error::msg)?;
    Ok(LogConfig {
        app_name: APP_NAME,
        log_dir: cfg.logging.dir.as_ref().map(PathBuf::from),
        emit_stderr: cfg.logging.stderr,
        format,
        default_filter: cfg.logging.filter.clone(),
    })
}

async fn wait_for_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate => {}
    }
    tracing::info!("server.shutdown_requested");
    shutdown.cancel();
}
