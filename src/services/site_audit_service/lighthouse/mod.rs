pub mod lighthouse;
pub mod settings;

pub use lighthouse::{AuditEngine, LighthouseCli};
pub use settings::DeviceSettings;
