use anyhow::Context;
use log::{error, info};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod models;
mod services;
mod utils;

use config::Config;
use error::AuditError;
use models::{AppState, Job};
use services::{AuditQueue, AuditRunner, ChromiumLauncher, LighthouseCli, QueueHooks};
use utils::WebhookClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    if let Some(webhook) = &config.default_webhook {
        info!("All results will be delivered to {}", webhook);
    }

    let runner = AuditRunner::new(
        Arc::new(ChromiumLauncher::new(&config.chromium_path)),
        Arc::new(LighthouseCli::new(&config.lighthouse_bin, config.pass_timeout)),
        Arc::new(WebhookClient::new()),
        config.delivery_timeout,
        config.failure_delivery_timeout,
    );

    let hooks = QueueHooks {
        on_drain: Some(Box::new(|| info!("All queued audits processed"))),
        on_error: Some(Box::new(|job: &Job, err: &AuditError| {
            error!(
                "Audit failed for {} ({}): {}",
                job.target_url, job.device_profile, err
            )
        })),
    };
    let queue = AuditQueue::start(Arc::new(runner), hooks);

    let address = config.bind_address();
    let state = AppState {
        queue,
        config: Arc::new(config),
    };
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!("🚀 Lighthouse audit server running on http://{}", address);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
