pub mod job;

pub use job::{DeviceProfile, Job, JobState};
