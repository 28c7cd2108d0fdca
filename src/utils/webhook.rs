use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use std::time::Duration;

use crate::error::DeliveryError;
use crate::models::DeliveryPayload;

pub const USER_AGENT: &str = "Lightqueue-Webhook/1.0";

/// Where a finished job's payload goes.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn deliver(
        &self,
        endpoint: &str,
        payload: &DeliveryPayload,
        timeout: Duration,
    ) -> Result<(), DeliveryError>;
}

/// Posts payloads as JSON to the job's webhook.
#[derive(Clone, Default)]
pub struct WebhookClient {
    client: Client,
}

impl WebhookClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultSink for WebhookClient {
    async fn deliver(
        &self,
        endpoint: &str,
        payload: &DeliveryPayload,
        timeout: Duration,
    ) -> Result<(), DeliveryError> {
        let json_body = serde_json::to_string(payload)?;
        debug!("POST {} ({} bytes)", endpoint, json_body.len());

        let response = self
            .client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .header("User-Agent", USER_AGENT)
            .timeout(timeout)
            .body(json_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The body is only for the log line; a failed read leaves it empty.
            let body = response.text().await.unwrap_or_default();
            warn!("Webhook {} answered {}", endpoint, status);
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("Webhook {} accepted the payload ({})", endpoint, status);
        Ok(())
    }
}
