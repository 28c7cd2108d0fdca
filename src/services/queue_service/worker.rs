use log::{error, info};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::AuditError;
use crate::models::{Job, JobState};
use crate::services::queue_service::queue::{JobRunner, QueueHooks, QueueShared};

/// The single consumer of the queue. Never returns: every job, however it
/// ends, is turned into an outcome before the next one is popped.
pub(crate) async fn run(shared: Arc<QueueShared>, runner: Arc<dyn JobRunner>, hooks: QueueHooks) {
    loop {
        let next = {
            let mut state = shared.state.lock().await;
            let job = state.pending.pop_front();
            state.in_flight = job.clone();
            job
        };

        let Some(job) = next else {
            // notify_one stores a permit, so an enqueue racing this wait is not lost
            shared.wakeup.notified().await;
            continue;
        };

        info!("{} {}", job, JobState::InFlight);
        let outcome = execute(runner.clone(), job.clone()).await;

        match &outcome {
            Ok(()) => info!("{} {}", job, JobState::Completed),
            Err(e) => {
                error!("{} {}: {}", job, JobState::Failed, e);
                if let Some(on_error) = &hooks.on_error {
                    call_hook("error", || on_error(&job, e));
                }
            }
        }

        let drained = {
            let mut state = shared.state.lock().await;
            state.in_flight = None;
            state.pending.is_empty()
        };

        if drained {
            info!("Audit queue drained");
            if let Some(on_drain) = &hooks.on_drain {
                call_hook("drain", || on_drain());
            }
        }
    }
}

/// Runs the job on its own task so a panic is contained and surfaces as an error.
async fn execute(runner: Arc<dyn JobRunner>, job: Job) -> Result<(), AuditError> {
    match tokio::spawn(async move { runner.run(&job).await }).await {
        Ok(result) => result,
        Err(join_err) => Err(AuditError::Aborted(join_err.to_string())),
    }
}

/// Hooks run on the worker task; a panicking hook must not take the worker down.
fn call_hook(name: &str, hook: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(hook)).is_err() {
        error!("Queue {} hook panicked, worker continues", name);
    }
}
