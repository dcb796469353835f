mod bootstrap;
mod health;
mod recommendations;

use std::future::IntoFuture;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tokio::sync::oneshot;
use treatmatch_core::config::{AppConfig, LoadOptions};

use crate::bootstrap::AppState;

fn init_logging(config: &AppConfig) {
    use tracing::Level;
    use treatmatch_core::config::LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

fn app(state: AppState) -> Router {
    health::router().merge(recommendations::router()).with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

async fn run() -> Result<()> {
    // Logging depends on config, so config is loaded first.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app_instance = bootstrap::bootstrap_with_config(config)?;
    let server = &app_instance.config.server;
    let address = format!("{}:{}", server.bind_address, server.port);
    let grace = Duration::from_secs(server.graceful_shutdown_secs);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "treatmatch-server listening"
    );

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut serving = tokio::spawn(
        axum::serve(listener, app(app_instance.state))
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .into_future(),
    );

    tokio::select! {
        result = &mut serving => {
            result??;
            return Ok(());
        }
        signal = tokio::signal::ctrl_c() => signal?,
    }

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        grace_secs = grace.as_secs(),
        "draining in-flight requests"
    );
    let _ = stop_tx.send(());

    match tokio::time::timeout(grace, serving).await {
        Ok(result) => result??,
        Err(_) => tracing::warn!(
            event_name = "system.server.shutdown_timeout",
            correlation_id = "shutdown",
            "graceful shutdown window elapsed; exiting"
        ),
    }

    Ok(())
}
