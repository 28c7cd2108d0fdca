// src/models/mod.rs

pub mod api;
pub mod app;
pub mod lighthouse;
pub mod queue;

pub use api::ParamsRunLighthouse;
pub use app::AppState;
pub use lighthouse::*;
pub use queue::{DeviceProfile, Job, JobState};
