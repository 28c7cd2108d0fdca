pub mod session;

pub use session::{ChromiumLauncher, SessionLauncher};
