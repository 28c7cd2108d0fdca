use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Lighthouse response status
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LighthouseStatus {
    Queued,
}

// Response for the run-lighthouse handler
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseResponse {
    pub status: LighthouseStatus,
    pub message: String,
    pub job_id: Uuid,
    pub queue_length: usize,
    pub timestamp: String,
}

// Snapshot of the audit queue
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatusResponse {
    pub pending: usize,
    pub in_flight: Option<InFlightJob>,
    pub depth: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InFlightJob {
    pub job_id: Uuid,
    pub url: String,
    pub device: String,
}
