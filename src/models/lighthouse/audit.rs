use serde::{Deserialize, Serialize};

// pub struct for individual audit results
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub score: Option<f64>,
    #[serde(default)]
    pub display_value: Option<String>,
}

// A category's pointer into `audits`, carrying the audit's weight in that category
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuditRef {
    pub id: String,
    #[serde(default)]
    pub weight: f64,
}
