pub mod audit;
pub mod category;
pub mod report;
pub mod status;
pub mod summary;

pub use audit::{Audit, AuditRef};
pub use category::{AuditCategory, AuditPass, Category};
pub use report::LighthouseReport;
pub use status::{InFlightJob, LighthouseResponse, LighthouseStatus, QueueStatusResponse};
pub use summary::{
    CategoryIssues, DeliveryPayload, FailureNotice, Impact, Issue, IssuesByCategory,
    OverallHealth, Scores, SummaryRecord,
};
