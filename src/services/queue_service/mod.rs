// src/services/queue_service/mod.rs

pub mod queue;
mod worker;

pub use queue::{AuditQueue, JobRunner, QueueHooks};
