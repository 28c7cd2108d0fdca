// src/utils/mod.rs

pub mod url_utils;
pub mod webhook;

pub use url_utils::validate_http_url;
pub use webhook::{ResultSink, WebhookClient};
