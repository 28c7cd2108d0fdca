use std::sync::Arc;

use crate::config::Config;
use crate::services::AuditQueue;

#[derive(Clone)]
pub struct AppState {
    pub queue: AuditQueue,
    pub config: Arc<Config>,
}
