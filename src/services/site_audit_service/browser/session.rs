use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use log::{debug, info, warn};
use std::path::PathBuf;
use tokio::task::JoinHandle;
use url::Url;

use crate::error::AuditError;

/// A browser owned by exactly one job. Lighthouse attaches to it through
/// `port()`; the runner must call `close()` once the passes are done.
#[async_trait]
pub trait AuditSession: Send {
    fn port(&self) -> u16;

    async fn close(&mut self) -> Result<(), AuditError>;
}

#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn AuditSession>, AuditError>;
}

/// Launches a fresh headless Chromium per job.
pub struct ChromiumLauncher {
    executable: PathBuf,
}

impl ChromiumLauncher {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn AuditSession>, AuditError> {
        debug!("Launching {}", self.executable.display());

        let config = BrowserConfig::builder()
            .new_headless_mode()
            .chrome_executable(&self.executable)
            .args(vec![
                "--no-sandbox",
                "--disable-setuid-sandbox",
                "--disable-dev-shm-usage",
            ])
            .build()
            .map_err(AuditError::SessionLaunch)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AuditError::SessionLaunch(e.to_string()))?;

        // The CDP handler must be polled for the browser connection to make progress.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let port = match devtools_port(browser.websocket_address()) {
            Ok(port) => port,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    warn!("Error closing the browser after a failed launch: {}", close_err);
                }
                handler.abort();
                return Err(e);
            }
        };

        info!("Browser launched on port {}", port);
        Ok(Box::new(ChromiumSession {
            browser,
            handler,
            port,
        }))
    }
}

pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    port: u16,
}

#[async_trait]
impl AuditSession for ChromiumSession {
    fn port(&self) -> u16 {
        self.port
    }

    async fn close(&mut self) -> Result<(), AuditError> {
        let result = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| AuditError::SessionClose(e.to_string()));

        if result.is_ok() {
            if let Err(e) = self.browser.wait().await {
                warn!("Browser on port {} did not exit cleanly: {}", self.port, e);
            }
        }
        self.handler.abort();
        result
    }
}

/// Port of the DevTools endpoint, e.g. `ws://127.0.0.1:38017/devtools/browser/<id>`.
pub fn devtools_port(websocket_address: &str) -> Result<u16, AuditError> {
    let url = Url::parse(websocket_address).map_err(|e| {
        AuditError::SessionLaunch(format!("bad DevTools address {:?}: {}", websocket_address, e))
    })?;
    url.port().ok_or_else(|| {
        AuditError::SessionLaunch(format!("DevTools address {:?} has no port", websocket_address))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_port_from_websocket_address() {
        let port = devtools_port("ws://127.0.0.1:38017/devtools/browser/8c1f-4e2a").unwrap();
        assert_eq!(port, 38017);
    }

    #[test]
    fn rejects_addresses_without_port() {
        assert!(matches!(
            devtools_port("ws://localhost/devtools/browser/abc"),
            Err(AuditError::SessionLaunch(_))
        ));
        assert!(matches!(devtools_port("not a url"), Err(AuditError::SessionLaunch(_))));
    }
}
