// src/services/mod.rs

pub mod queue_service;
pub mod site_audit_service;

pub use queue_service::{AuditQueue, QueueHooks};
pub use site_audit_service::{AuditRunner, ChromiumLauncher, LighthouseCli};
