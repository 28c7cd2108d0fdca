use async_trait::async_trait;
use log::info;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

use crate::error::AuditError;
use crate::models::{Job, JobState};
use crate::services::queue_service::worker;

/// Executes one dequeued job. The queue only cares whether it failed.
#[async_trait]
pub trait JobRunner: Send + Sync + 'static {
    async fn run(&self, job: &Job) -> Result<(), AuditError>;
}

pub type DrainHook = Box<dyn Fn() + Send + Sync>;
pub type ErrorHook = Box<dyn Fn(&Job, &AuditError) + Send + Sync>;

/// Observability callbacks invoked by the worker.
#[derive(Default)]
pub struct QueueHooks {
    /// Fired whenever the last job finishes and nothing is pending.
    pub on_drain: Option<DrainHook>,
    /// Fired once per failed job, after the failure is logged.
    pub on_error: Option<ErrorHook>,
}

#[derive(Default)]
pub(crate) struct QueueState {
    pub(crate) pending: VecDeque<Job>,
    pub(crate) in_flight: Option<Job>,
}

impl QueueState {
    fn depth(&self) -> usize {
        self.pending.len() + usize::from(self.in_flight.is_some())
    }
}

#[derive(Default)]
pub(crate) struct QueueShared {
    pub(crate) state: Mutex<QueueState>,
    pub(crate) wakeup: Notify,
}

/// Handle to the in-memory FIFO of audit jobs. Cloning shares the same queue;
/// a single worker task started by [`AuditQueue::start`] consumes it.
#[derive(Clone)]
pub struct AuditQueue {
    shared: Arc<QueueShared>,
}

impl AuditQueue {
    pub fn start(runner: Arc<dyn JobRunner>, hooks: QueueHooks) -> Self {
        let shared = Arc::new(QueueShared::default());
        tokio::spawn(worker::run(shared.clone(), runner, hooks));
        info!("Audit queue started (concurrency 1)");
        Self { shared }
    }

    /// Appends `job` to the tail and returns pending + in-flight, this job included.
    pub async fn enqueue(&self, job: Job) -> usize {
        let depth = {
            let mut state = self.shared.state.lock().await;
            info!("{} {}", job, JobState::Pending);
            state.pending.push_back(job);
            state.depth()
        };
        self.shared.wakeup.notify_one();
        depth
    }

    /// Pending count and running job, read under one lock.
    pub async fn snapshot(&self) -> (usize, Option<Job>) {
        let state = self.shared.state.lock().await;
        (state.pending.len(), state.in_flight.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeviceProfile;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::sync::{mpsc, Semaphore};

    /// Records dispatch order and the peak number of concurrently running jobs.
    /// URLs containing "fail" return an error, "panic" panics.
    #[derive(Default)]
    struct RecordingRunner {
        started: StdMutex<Vec<String>>,
        finished: AtomicUsize,
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl JobRunner for RecordingRunner {
        async fn run(&self, job: &Job) -> Result<(), AuditError> {
            self.started.lock().unwrap().push(job.target_url.clone());
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(5)).await;

            self.running.fetch_sub(1, Ordering::SeqCst);
            self.finished.fetch_add(1, Ordering::SeqCst);
            if job.target_url.contains("panic") {
                panic!("runner blew up");
            }
            if job.target_url.contains("fail") {
                return Err(AuditError::Pass {
                    pass: crate::models::AuditPass::Secondary,
                    reason: "engine crashed".to_string(),
                });
            }
            Ok(())
        }
    }

    /// Blocks every job until the test hands out a permit.
    struct GatedRunner {
        gate: Semaphore,
        started: mpsc::UnboundedSender<String>,
    }

    #[async_trait]
    impl JobRunner for GatedRunner {
        async fn run(&self, job: &Job) -> Result<(), AuditError> {
            let _ = self.started.send(job.target_url.clone());
            let permit = self.gate.acquire().await.unwrap();
            permit.forget();
            Ok(())
        }
    }

    fn job(url: &str) -> Job {
        Job::new(url, "http://hooks.test/result", DeviceProfile::Mobile)
    }

    async fn wait_for(mut done: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !done() {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .expect("queue did not settle in time");
    }

    #[tokio::test]
    async fn dispatches_in_arrival_order_one_at_a_time() {
        let runner = Arc::new(RecordingRunner::default());
        let queue = AuditQueue::start(runner.clone(), QueueHooks::default());

        let urls: Vec<String> = (0..6).map(|i| format!("https://site{i}.test")).collect();
        for url in &urls {
            queue.enqueue(job(url)).await;
        }

        wait_for(|| runner.finished.load(Ordering::SeqCst) == urls.len()).await;
        assert_eq!(*runner.started.lock().unwrap(), urls);
        assert_eq!(runner.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_job_does_not_stop_the_queue() {
        let runner = Arc::new(RecordingRunner::default());
        let failures: Arc<StdMutex<Vec<(String, String)>>> = Arc::default();
        let seen = failures.clone();
        let hooks = QueueHooks {
            on_error: Some(Box::new(move |job: &Job, err: &AuditError| {
                seen.lock()
                    .unwrap()
                    .push((job.target_url.clone(), err.to_string()));
            })),
            ..Default::default()
        };
        let queue = AuditQueue::start(runner.clone(), hooks);

        queue.enqueue(job("https://fail.test")).await;
        queue.enqueue(job("https://next.test")).await;

        wait_for(|| runner.finished.load(Ordering::SeqCst) == 2).await;
        wait_for(|| failures.lock().unwrap().len() == 1).await;

        let failures = failures.lock().unwrap();
        assert_eq!(failures[0].0, "https://fail.test");
        assert!(failures[0].1.contains("engine crashed"));
        assert_eq!(
            *runner.started.lock().unwrap(),
            vec!["https://fail.test", "https://next.test"]
        );
    }

    #[tokio::test]
    async fn panicking_job_is_reported_and_isolated() {
        let runner = Arc::new(RecordingRunner::default());
        let failures: Arc<StdMutex<Vec<String>>> = Arc::default();
        let seen = failures.clone();
        let hooks = QueueHooks {
            on_error: Some(Box::new(move |job: &Job, err: &AuditError| {
                assert!(matches!(err, AuditError::Aborted(_)));
                seen.lock().unwrap().push(job.target_url.clone());
            })),
            ..Default::default()
        };
        let queue = AuditQueue::start(runner.clone(), hooks);

        queue.enqueue(job("https://panic.test")).await;
        queue.enqueue(job("https://after.test")).await;

        wait_for(|| runner.finished.load(Ordering::SeqCst) == 2).await;
        wait_for(|| failures.lock().unwrap().len() == 1).await;
        assert_eq!(*failures.lock().unwrap(), vec!["https://panic.test"]);
        assert_eq!(
            *runner.started.lock().unwrap(),
            vec!["https://panic.test", "https://after.test"]
        );
    }

    #[tokio::test]
    async fn panicking_hooks_do_not_stop_the_worker() {
        let runner = Arc::new(RecordingRunner::default());
        let hooks = QueueHooks {
            on_drain: Some(Box::new(|| panic!("drain hook blew up"))),
            on_error: Some(Box::new(|_: &Job, _: &AuditError| panic!("error hook blew up"))),
        };
        let queue = AuditQueue::start(runner.clone(), hooks);

        queue.enqueue(job("https://fail.test")).await;
        wait_for(|| runner.finished.load(Ordering::SeqCst) == 1).await;

        // give the worker time to reach the drain hook before the next job arrives
        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.enqueue(job("https://next.test")).await;
        wait_for(|| runner.finished.load(Ordering::SeqCst) == 2).await;

        assert_eq!(
            *runner.started.lock().unwrap(),
            vec!["https://fail.test", "https://next.test"]
        );
    }

    #[tokio::test]
    async fn drain_hook_fires_when_idle() {
        let runner = Arc::new(RecordingRunner::default());
        let drains = Arc::new(AtomicUsize::new(0));
        let counter = drains.clone();
        let hooks = QueueHooks {
            on_drain: Some(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
            ..Default::default()
        };
        let queue = AuditQueue::start(runner.clone(), hooks);

        queue.enqueue(job("https://one.test")).await;
        wait_for(|| drains.load(Ordering::SeqCst) == 1).await;

        queue.enqueue(job("https://two.test")).await;
        wait_for(|| drains.load(Ordering::SeqCst) == 2).await;
        assert_eq!(runner.finished.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn depth_counts_pending_and_in_flight() {
        let (started_tx, mut started_rx) = mpsc::unbounded_channel();
        let runner = Arc::new(GatedRunner {
            gate: Semaphore::new(0),
            started: started_tx,
        });
        let queue = AuditQueue::start(runner.clone(), QueueHooks::default());

        assert_eq!(queue.enqueue(job("https://a.test")).await, 1);
        assert_eq!(queue.enqueue(job("https://b.test")).await, 2);
        assert_eq!(queue.enqueue(job("https://c.test")).await, 3);

        assert_eq!(started_rx.recv().await.unwrap(), "https://a.test");
        let (pending, in_flight) = queue.snapshot().await;
        assert_eq!(pending, 2);
        assert_eq!(
            in_flight.map(|j| j.target_url),
            Some("https://a.test".to_string())
        );

        runner.gate.add_permits(1);
        assert_eq!(started_rx.recv().await.unwrap(), "https://b.test");
        assert_eq!(queue.snapshot().await.0, 1);

        runner.gate.add_permits(2);
        assert_eq!(started_rx.recv().await.unwrap(), "https://c.test");
        tokio::time::timeout(Duration::from_secs(5), async {
            while queue.snapshot().await.1.is_some() {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .expect("queue did not drain");
        assert_eq!(queue.snapshot().await.0, 0);
    }
}
