use crate::models::lighthouse::audit::Audit;
use crate::models::lighthouse::category::{AuditCategory, Category};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The subset of a Lighthouse result (LHR) the summarizer reads.
///
/// Categories are kept in a sorted map so that walking every category of a
/// report visits them in the same order on every run.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseReport {
    #[serde(default)]
    pub categories: BTreeMap<String, Category>,
    #[serde(default)]
    pub audits: HashMap<String, Audit>,
}

impl LighthouseReport {
    pub fn category(&self, category: AuditCategory) -> Option<&Category> {
        self.categories.get(category.id())
    }
}
