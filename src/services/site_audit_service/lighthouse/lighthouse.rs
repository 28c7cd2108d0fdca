use async_trait::async_trait;
use log::{debug, info, warn};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::AuditError;
use crate::models::{AuditPass, LighthouseReport};
use crate::services::site_audit_service::lighthouse::settings::DeviceSettings;

/// Runs one Lighthouse pass against a browser that is already listening on
/// `port`, restricted to the categories of `pass`.
#[async_trait]
pub trait AuditEngine: Send + Sync {
    async fn run_pass(
        &self,
        target_url: &str,
        port: u16,
        pass: AuditPass,
        settings: &DeviceSettings,
    ) -> Result<LighthouseReport, AuditError>;
}

/// The `lighthouse` CLI, attached to the job's browser through `--port`.
pub struct LighthouseCli {
    bin: String,
    timeout: Duration,
}

impl LighthouseCli {
    pub fn new(bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            timeout,
        }
    }
}

#[async_trait]
impl AuditEngine for LighthouseCli {
    async fn run_pass(
        &self,
        target_url: &str,
        port: u16,
        pass: AuditPass,
        settings: &DeviceSettings,
    ) -> Result<LighthouseReport, AuditError> {
        let args = command_args(target_url, port, pass, settings);
        debug!("{} {}", self.bin, args.join(" "));

        let child = Command::new(&self.bin)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AuditError::Pass {
                pass,
                reason: format!("could not start {}: {}", self.bin, e),
            })?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| AuditError::Pass {
                pass,
                reason: e.to_string(),
            })?,
            Err(_) => {
                warn!("Lighthouse {} pass for {} hit the {:?} ceiling", pass, target_url, self.timeout);
                return Err(AuditError::PassTimeout {
                    pass,
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            return Err(AuditError::Pass {
                pass,
                reason: format!(
                    "lighthouse exited with {}: {}",
                    output.status,
                    stderr_tail(&output.stderr)
                ),
            });
        }

        let report = parse_report(&output.stdout, pass)?;
        info!("Lighthouse {} pass completed for {}", pass, target_url);
        Ok(report)
    }
}

pub fn command_args(
    target_url: &str,
    port: u16,
    pass: AuditPass,
    settings: &DeviceSettings,
) -> Vec<String> {
    let categories = pass
        .categories()
        .iter()
        .map(|category| category.id())
        .collect::<Vec<_>>()
        .join(",");

    let mut args = vec![
        target_url.to_string(),
        "--output=json".to_string(),
        "--output-path=stdout".to_string(),
        "--quiet".to_string(),
        "--no-enable-error-reporting".to_string(),
        format!("--port={}", port),
        format!("--only-categories={}", categories),
    ];
    args.extend(settings.cli_args());
    args
}

pub fn parse_report(stdout: &[u8], pass: AuditPass) -> Result<LighthouseReport, AuditError> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Err(AuditError::NoReport(pass));
    }
    serde_json::from_slice(stdout).map_err(|e| AuditError::Pass {
        pass,
        reason: format!("unreadable report: {}", e),
    })
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.trim().lines().collect();
    lines[lines.len().saturating_sub(5)..].join(" | ")
}
