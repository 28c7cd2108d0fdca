// src/services/site_audit_service/mod.rs

pub mod browser;
pub mod compute;
pub mod lighthouse;
pub mod runner;

pub use browser::ChromiumLauncher;
pub use lighthouse::LighthouseCli;
pub use runner::AuditRunner;
