use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceProfile {
    #[default]
    Mobile,
    Desktop,
}

impl fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceProfile::Mobile => write!(f, "mobile"),
            DeviceProfile::Desktop => write!(f, "desktop"),
        }
    }
}

impl FromStr for DeviceProfile {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(DeviceProfile::Mobile),
            "desktop" => Ok(DeviceProfile::Desktop),
            _ => Err(()),
        }
    }
}

/// One queued audit. Built by the front door, never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: Uuid,
    pub target_url: String,
    pub result_endpoint: String,
    pub device_profile: DeviceProfile,
}

impl Job {
    pub fn new(
        target_url: impl Into<String>,
        result_endpoint: impl Into<String>,
        device_profile: DeviceProfile,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            target_url: target_url.into(),
            result_endpoint: result_endpoint.into(),
            device_profile,
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[job {} url={} device={}]",
            self.id, self.target_url, self.device_profile
        )
    }
}

// Lifecycle of a job inside the queue. Terminal states are logged, not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    InFlight,
    Completed,
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            JobState::Pending => "pending",
            JobState::InFlight => "in-flight",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        };
        write!(f, "{}", state)
    }
}
