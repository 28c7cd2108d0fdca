use async_trait::async_trait;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::error::AuditError;
use crate::models::{AuditPass, DeliveryPayload, FailureNotice, Job, LighthouseReport, SummaryRecord};
use crate::services::queue_service::JobRunner;
use crate::services::site_audit_service::browser::SessionLauncher;
use crate::services::site_audit_service::compute::summarize;
use crate::services::site_audit_service::lighthouse::{AuditEngine, DeviceSettings};
use crate::utils::ResultSink;

/// Runs one job end to end: browser session, two Lighthouse passes, summary
/// and a single delivery to the job's webhook.
pub struct AuditRunner {
    launcher: Arc<dyn SessionLauncher>,
    engine: Arc<dyn AuditEngine>,
    sink: Arc<dyn ResultSink>,
    delivery_timeout: Duration,
    failure_delivery_timeout: Duration,
}

impl AuditRunner {
    pub fn new(
        launcher: Arc<dyn SessionLauncher>,
        engine: Arc<dyn AuditEngine>,
        sink: Arc<dyn ResultSink>,
        delivery_timeout: Duration,
        failure_delivery_timeout: Duration,
    ) -> Self {
        Self {
            launcher,
            engine,
            sink,
            delivery_timeout,
            failure_delivery_timeout,
        }
    }

    pub async fn audit(&self, job: &Job) -> Result<SummaryRecord, AuditError> {
        info!("{} starting audit", job);

        let mut session = match self.launcher.launch().await {
            Ok(session) => session,
            Err(e) => {
                error!("{} could not get a browser: {}", job, e);
                self.deliver_failure(job, &e).await;
                return Err(e);
            }
        };

        let outcome = self.run_passes(job, session.port()).await;

        // The session is released on every path; a failed close only gets logged.
        if let Err(e) = session.close().await {
            warn!("{} {}", job, e);
        }

        match outcome {
            Ok((primary, secondary)) => {
                let summary = summarize(
                    primary.as_ref(),
                    Some(&secondary),
                    job.device_profile,
                    &job.target_url,
                );
                info!(
                    "{} summary ready, overall health {:?}",
                    job, summary.overall_health
                );
                self.deliver(
                    job,
                    &DeliveryPayload::Summary(summary.clone()),
                    self.delivery_timeout,
                )
                .await;
                Ok(summary)
            }
            Err(e) => {
                error!("{} aborted: {}", job, e);
                self.deliver_failure(job, &e).await;
                Err(e)
            }
        }
    }

    /// Performance first, then the rest. Only the second pass can abort the job.
    async fn run_passes(
        &self,
        job: &Job,
        port: u16,
    ) -> Result<(Option<LighthouseReport>, LighthouseReport), AuditError> {
        let settings = DeviceSettings::for_profile(job.device_profile);

        let primary = match self
            .engine
            .run_pass(&job.target_url, port, AuditPass::Primary, &settings)
            .await
        {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("{} continuing without performance data: {}", job, e);
                None
            }
        };

        let secondary = self
            .engine
            .run_pass(&job.target_url, port, AuditPass::Secondary, &settings)
            .await?;

        Ok((primary, secondary))
    }

    async fn deliver_failure(&self, job: &Job, cause: &AuditError) {
        let notice = FailureNotice::new(&job.target_url, cause);
        self.deliver(
            job,
            &DeliveryPayload::Failure(notice),
            self.failure_delivery_timeout,
        )
        .await;
    }

    async fn deliver(&self, job: &Job, payload: &DeliveryPayload, timeout: Duration) {
        match self
            .sink
            .deliver(&job.result_endpoint, payload, timeout)
            .await
        {
            Ok(()) => info!("{} delivered to {}", job, job.result_endpoint),
            Err(e) => error!("{} delivery to {} failed: {}", job, job.result_endpoint, e),
        }
    }
}

#[async_trait]
impl JobRunner for AuditRunner {
    async fn run(&self, job: &Job) -> Result<(), AuditError> {
        self.audit(job).await.map(|_| ())
    }
}
