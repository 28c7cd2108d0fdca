use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use log::info;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    AppState, DeviceProfile, InFlightJob, Job, LighthouseResponse, LighthouseStatus,
    ParamsRunLighthouse, QueueStatusResponse,
};
use crate::utils::validate_http_url;

pub async fn run_lighthouse_handler(
    State(state): State<AppState>,
    payload: Result<Json<ParamsRunLighthouse>, JsonRejection>,
) -> Result<(StatusCode, Json<LighthouseResponse>), ApiError> {
    let Json(params) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
    let job = build_job(&state.config, params)?;
    let job_id = job.id;
    let message = format!(
        "Lighthouse audit for {} ({}) queued",
        job.target_url, job.device_profile
    );

    let queue_length = state.queue.enqueue(job).await;
    info!("Accepted job {}, queue length {}", job_id, queue_length);

    Ok((
        StatusCode::ACCEPTED,
        Json(LighthouseResponse {
            status: LighthouseStatus::Queued,
            message,
            job_id,
            queue_length,
            timestamp: Utc::now().to_rfc3339(),
        }),
    ))
}

pub async fn queue_status_handler(State(state): State<AppState>) -> Json<QueueStatusResponse> {
    let (pending, in_flight) = state.queue.snapshot().await;
    let depth = pending + usize::from(in_flight.is_some());

    Json(QueueStatusResponse {
        pending,
        depth,
        in_flight: in_flight.map(|job| InFlightJob {
            job_id: job.id,
            url: job.target_url,
            device: job.device_profile.to_string(),
        }),
    })
}

/// Validates a request body into a job. With a default webhook configured the
/// caller's webhook is ignored and only `url` is required.
pub fn build_job(config: &Config, params: ParamsRunLighthouse) -> Result<Job, ApiError> {
    let url = params.url.filter(|u| !u.trim().is_empty());
    let webhook = config.resolve_webhook(params.webhook);

    let (url, webhook) = match (url, webhook) {
        (Some(url), Some(webhook)) => (url, webhook),
        (None, _) if config.default_webhook.is_some() => return Err(ApiError::MissingUrl),
        _ => return Err(ApiError::MissingParameters),
    };

    let device = match params.device.as_deref() {
        None => DeviceProfile::default(),
        Some(raw) => raw.parse().map_err(|_| ApiError::InvalidDevice)?,
    };

    Ok(Job::new(
        validate_http_url(&url)?,
        validate_http_url(&webhook)?,
        device,
    ))
}
