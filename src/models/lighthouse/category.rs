use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::lighthouse::audit::AuditRef;

// Lighthouse category ids the service audits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditCategory {
    Performance,
    Accessibility,
    BestPractices,
    Seo,
}

impl AuditCategory {
    /// Id as it appears in `--only-categories` and in the report's `categories` map.
    pub fn id(&self) -> &'static str {
        match self {
            AuditCategory::Performance => "performance",
            AuditCategory::Accessibility => "accessibility",
            AuditCategory::BestPractices => "best-practices",
            AuditCategory::Seo => "seo",
        }
    }

    pub fn pass(&self) -> AuditPass {
        match self {
            AuditCategory::Performance => AuditPass::Primary,
            _ => AuditPass::Secondary,
        }
    }
}

impl fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// The two Lighthouse runs made against one browser session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditPass {
    Primary,
    Secondary,
}

impl AuditPass {
    pub fn categories(&self) -> &'static [AuditCategory] {
        match self {
            AuditPass::Primary => &[AuditCategory::Performance],
            AuditPass::Secondary => &[
                AuditCategory::Accessibility,
                AuditCategory::Seo,
                AuditCategory::BestPractices,
            ],
        }
    }
}

impl fmt::Display for AuditPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditPass::Primary => write!(f, "primary (performance)"),
            AuditPass::Secondary => write!(f, "secondary (accessibility, seo, best-practices)"),
        }
    }
}

// pub struct for one category inside a Lighthouse report
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub title: Option<String>,
    pub score: Option<f64>,
    #[serde(default)]
    pub audit_refs: Vec<AuditRef>,
}
