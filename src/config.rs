use anyhow::{Context, Result};
use dotenv::dotenv;
use std::time::Duration;

use crate::utils::validate_http_url;

/// Process-wide settings, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// When set, every job delivers here regardless of the request's webhook.
    pub default_webhook: Option<String>,
    pub chromium_path: String,
    pub lighthouse_bin: String,
    pub delivery_timeout: Duration,
    pub failure_delivery_timeout: Duration,
    /// Hard ceiling on a single Lighthouse process, on top of its own page-load wait.
    pub pass_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            default_webhook: None,
            chromium_path: "/usr/bin/chromium".to_string(),
            lighthouse_bin: "lighthouse".to_string(),
            delivery_timeout: Duration::from_secs(30),
            failure_delivery_timeout: Duration::from_secs(10),
            pass_timeout: Duration::from_secs(180),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            None => default.port,
        };

        let secs = |key: &str, fallback: Duration| -> Result<Duration> {
            match non_empty(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("{key} must be a whole number of seconds, got {raw:?}")),
                None => Ok(fallback),
            }
        };

        let default_webhook = non_empty("WEBHOOK_URL")
            .map(|raw| validate_http_url(&raw))
            .transpose()
            .context("WEBHOOK_URL must be an absolute http(s) URL")?;

        Ok(Self {
            host: non_empty("HOST").unwrap_or(default.host),
            port,
            default_webhook,
            chromium_path: non_empty("CHROMIUM_PATH").unwrap_or(default.chromium_path),
            lighthouse_bin: non_empty("LIGHTHOUSE_BIN").unwrap_or(default.lighthouse_bin),
            delivery_timeout: secs("DELIVERY_TIMEOUT_SECS", default.delivery_timeout)?,
            failure_delivery_timeout: secs(
                "FAILURE_DELIVERY_TIMEOUT_SECS",
                default.failure_delivery_timeout,
            )?,
            pass_timeout: secs("PASS_TIMEOUT_SECS", default.pass_timeout)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Picks the endpoint a job delivers to. The configured default wins over
    /// whatever the caller sent.
    pub fn resolve_webhook(&self, requested: Option<String>) -> Option<String> {
        self.default_webhook
            .clone()
            .or_else(|| requested.filter(|w| !w.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert!(config.default_webhook.is_none());
        assert_eq!(config.delivery_timeout, Duration::from_secs(30));
        assert_eq!(config.failure_delivery_timeout, Duration::from_secs(10));
    }

    #[test]
    fn reads_overrides() {
        let config = config_with(&[
            ("PORT", "8080"),
            ("WEBHOOK_URL", "https://hooks.example.com/lh"),
            ("LIGHTHOUSE_BIN", "/opt/lh/bin/lighthouse"),
            ("PASS_TIMEOUT_SECS", "240"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.default_webhook.as_deref(),
            Some("https://hooks.example.com/lh")
        );
        assert_eq!(config.lighthouse_bin, "/opt/lh/bin/lighthouse");
        assert_eq!(config.pass_timeout, Duration::from_secs(240));
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(config_with(&[("PORT", "eighty")]).is_err());
        assert!(config_with(&[("DELIVERY_TIMEOUT_SECS", "-3")]).is_err());
    }

    #[test]
    fn rejects_unusable_default_webhook() {
        assert!(config_with(&[("WEBHOOK_URL", "hooks.example.com/lh")]).is_err());
        assert!(config_with(&[("WEBHOOK_URL", "ftp://hooks.example.com")]).is_err());
    }

    #[test]
    fn blank_webhook_is_treated_as_unset() {
        let config = config_with(&[("WEBHOOK_URL", "  ")]).unwrap();
        assert!(config.default_webhook.is_none());
    }

    #[test]
    fn default_webhook_overrides_requested_one() {
        let config = config_with(&[("WEBHOOK_URL", "https://default.example.com")]).unwrap();
        assert_eq!(
            config.resolve_webhook(Some("https://caller.example.com".into())),
            Some("https://default.example.com".to_string())
        );
        assert_eq!(
            config.resolve_webhook(None),
            Some("https://default.example.com".to_string())
        );
    }

    #[test]
    fn requested_webhook_used_without_default() {
        let config = Config::default();
        assert_eq!(
            config.resolve_webhook(Some("https://caller.example.com".into())),
            Some("https://caller.example.com".to_string())
        );
        assert_eq!(config.resolve_webhook(Some("".into())), None);
        assert_eq!(config.resolve_webhook(None), None);
    }
}
