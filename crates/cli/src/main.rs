//! Micro-app sync service entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Load configuration** from `micro-app-sync.toml` (or the file named by
//!    `MICRO_APP_SYNC_CONFIG`) and `MICRO_APP_SYNC_*` environment variables.
//! 2. **Wire observability**: `tracing-subscriber` with a JSON layer and,
//!    when `otel_endpoint` is set, an OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure**: the icon store, the CMS client and the
//!    queue tracker, injected into a [`orchestrator::PipelineExecutor`].
//! 4. **Serve** the ingress router until Ctrl+C or SIGTERM.

mod config;
mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use cms::CmsClient;
use listener::{ApiKey, IngressState};
use orchestrator::PipelineExecutor;
use tokio::net::TcpListener;
use tracing::{error, info};
use upstream::{HttpIconStore, MessageLogTracker};

use crate::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::load().context("failed to load configuration")?;
    let telemetry = telemetry::init(&config.log_level, config.otel_endpoint.as_deref())
        .context("failed to initialise telemetry")?;

    let result = run(config).await;
    if let Err(e) = &result {
        error!(error = %format!("{e:#}"), "Service stopped with an error");
    }

    telemetry.shutdown();
    result
}

async fn run(config: ServiceConfig) -> anyhow::Result<()> {
    let icons = HttpIconStore::new(
        Duration::from_secs(config.icons.timeout_secs),
        config.icons.media_base_url.clone(),
    )
    .context("failed to build icon store client")?;

    let cms = CmsClient::new(config.cms.to_cms_config());

    let mut tracker = MessageLogTracker::new(
        config.tracker.base_url.clone(),
        Duration::from_secs(config.tracker.timeout_secs),
    )
    .context("failed to build queue tracker client")?
    .with_collection(config.tracker.collection.clone());
    if let Some(token) = &config.tracker.api_token {
        tracker = tracker.with_api_token(token.expose());
    }

    let api_key = ApiKey::new(config.api_key.expose()).context("api_key must not be empty")?;
    let executor = PipelineExecutor::new(Arc::new(icons), Arc::new(cms));
    let state = IngressState::new(api_key, Arc::new(executor), Arc::new(tracker));

    let socket = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    listener::serve(socket, state, shutdown_signal())
        .await
        .context("ingress server failed")?;

    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Received shutdown signal, draining connections");
}
