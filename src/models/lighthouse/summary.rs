use serde::{Serialize, Serializer};

use crate::models::DeviceProfile;

/// Stands in for a category's issue list when its pass produced no data.
pub const SKIPPED_MARKER: &str = "skipped/failed";

// Payload posted to the result endpoint once both passes are done
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    pub device_profile: DeviceProfile,
    pub target_url: String,
    pub scores: Scores,
    pub issues_by_category: IssuesByCategory,
    pub top_issues: Vec<Issue>,
    pub overall_health: OverallHealth,
}

// Category scores as whole percentages; `None` serializes as null
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub performance: Option<u8>,
    pub accessibility: Option<u8>,
    pub best_practices: Option<u8>,
    pub seo: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuesByCategory {
    pub performance: CategoryIssues,
    pub accessibility: CategoryIssues,
    pub best_practices: CategoryIssues,
    pub seo: CategoryIssues,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CategoryIssues {
    Found(Vec<Issue>),
    Skipped,
}

impl CategoryIssues {
    #[cfg(test)]
    pub fn issues(&self) -> Option<&[Issue]> {
        match self {
            CategoryIssues::Found(issues) => Some(issues),
            CategoryIssues::Skipped => None,
        }
    }
}

impl Serialize for CategoryIssues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CategoryIssues::Found(issues) => issues.serialize(serializer),
            CategoryIssues::Skipped => serializer.serialize_str(SKIPPED_MARKER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub metric: String,
    pub description: String,
    pub score: u8,
    pub impact: Impact,
    pub display_value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Impact {
    Low,
    Medium,
    High,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Impact {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => Impact::NotApplicable,
            Some(s) if s < 0.5 => Impact::High,
            Some(s) if s < 0.9 => Impact::Medium,
            Some(_) => Impact::Low,
        }
    }
}

// Driven by the performance score alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverallHealth {
    Good,
    NeedsImprovement,
    Poor,
    Unavailable,
}

impl OverallHealth {
    pub fn from_performance(score: Option<u8>) -> Self {
        match score {
            None => OverallHealth::Unavailable,
            Some(s) if s >= 90 => OverallHealth::Good,
            Some(s) if s >= 50 => OverallHealth::NeedsImprovement,
            Some(_) => OverallHealth::Poor,
        }
    }
}

// Posted instead of a summary when the job cannot finish
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureNotice {
    pub error: String,
    pub details: String,
}

impl FailureNotice {
    pub fn new(target_url: &str, details: impl ToString) -> Self {
        Self {
            error: format!("Lighthouse process failed critically for {}", target_url),
            details: details.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeliveryPayload {
    Summary(SummaryRecord),
    Failure(FailureNotice),
}
