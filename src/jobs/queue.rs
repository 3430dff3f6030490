//! # Job Queue
//!
//! In-process asynchronous work queue for queue-dispatchable handlers.
//!
//! Submission is fire-and-forget: the invoker hands the job over and returns
//! without awaiting completion. A worker task drains the queue and executes
//! jobs sequentially, decoupled from the subscription loop, so a slow job
//! never stalls message receipt.

use crate::error::{DispatchError, DispatchResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Trait for deferred, queued asynchronous work
#[async_trait::async_trait]
pub trait QueuedJob: Send + Sync {
    /// Execute the job on the worker
    async fn execute(&self) -> anyhow::Result<()>;

    /// Job name for identification
    fn job_name(&self) -> &str {
        "unnamed_job"
    }
}

/// Shared submission/completion counters
#[derive(Debug, Default)]
struct QueueCounters {
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Snapshot of queue activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobQueueStats {
    pub submitted: u64,
    pub completed: u64,
    pub failed: u64,
}

/// Submission side of the job queue
pub struct JobQueue {
    sender: mpsc::UnboundedSender<Box<dyn QueuedJob>>,
    counters: Arc<QueueCounters>,
}

/// Worker side of the job queue; drains and executes submitted jobs
pub struct JobQueueWorker {
    receiver: mpsc::UnboundedReceiver<Box<dyn QueuedJob>>,
    counters: Arc<QueueCounters>,
}

impl JobQueue {
    /// Create a queue and its worker. Spawn the worker with
    /// [`JobQueueWorker::run`] to start executing jobs.
    pub fn new() -> (Self, JobQueueWorker) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let counters = Arc::new(QueueCounters::default());

        let queue = Self {
            sender,
            counters: counters.clone(),
        };
        let worker = JobQueueWorker { receiver, counters };

        (queue, worker)
    }

    /// Submit a job, fire-and-forget. Fails only when the worker has shut
    /// down and the queue can no longer accept work.
    pub fn submit(&self, job: Box<dyn QueuedJob>) -> DispatchResult<()> {
        let job_name = job.job_name().to_string();
        self.sender.send(job).map_err(|_| {
            DispatchError::handler_execution(&job_name, "job queue is closed; worker has shut down")
        })?;

        self.counters.submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Snapshot of submission and completion counts
    pub fn stats(&self) -> JobQueueStats {
        JobQueueStats {
            submitted: self.counters.submitted.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }
}

impl JobQueueWorker {
    /// Drain the queue, executing jobs until every submission handle is
    /// dropped. Job failures are logged and counted; they never stop the
    /// worker.
    pub async fn run(mut self) {
        info!("🚀 Job queue worker started");

        while let Some(job) = self.receiver.recv().await {
            let job_name = job.job_name().to_string();
            match job.execute().await {
                Ok(()) => {
                    self.counters.completed.fetch_add(1, Ordering::Relaxed);
                    info!("✅ Executed job: {}", job_name);
                }
                Err(e) => {
                    self.counters.failed.fetch_add(1, Ordering::Relaxed);
                    error!(job = %job_name, error = %e, "❌ Job execution failed");
                }
            }
        }

        info!("Job queue worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct TestJob {
        name: String,
        runs: Arc<AtomicU64>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl QueuedJob for TestJob {
        async fn execute(&self) -> anyhow::Result<()> {
            self.runs.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                anyhow::bail!("job exploded")
            }
            Ok(())
        }

        fn job_name(&self) -> &str {
            &self.name
        }
    }

    async fn wait_for(queue: &JobQueue, predicate: impl Fn(JobQueueStats) -> bool) {
        for _ in 0..100 {
            if predicate(queue.stats()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("queue never reached expected state: {:?}", queue.stats());
    }

    #[tokio::test]
    async fn test_submitted_job_runs() {
        let (queue, worker) = JobQueue::new();
        tokio::spawn(worker.run());

        let runs = Arc::new(AtomicU64::new(0));
        queue
            .submit(Box::new(TestJob {
                name: "process_order".to_string(),
                runs: runs.clone(),
                fail: false,
            }))
            .unwrap();

        wait_for(&queue, |stats| stats.completed == 1).await;
        assert_eq!(runs.load(Ordering::Relaxed), 1);
        assert_eq!(queue.stats().submitted, 1);
    }

    #[tokio::test]
    async fn test_failed_job_does_not_stop_worker() {
        let (queue, worker) = JobQueue::new();
        tokio::spawn(worker.run());

        let runs = Arc::new(AtomicU64::new(0));
        queue
            .submit(Box::new(TestJob {
                name: "broken".to_string(),
                runs: runs.clone(),
                fail: true,
            }))
            .unwrap();
        queue
            .submit(Box::new(TestJob {
                name: "good".to_string(),
                runs: runs.clone(),
                fail: false,
            }))
            .unwrap();

        wait_for(&queue, |stats| stats.completed == 1 && stats.failed == 1).await;
        assert_eq!(runs.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_submit_after_worker_dropped_fails() {
        let (queue, worker) = JobQueue::new();
        drop(worker);

        let err = queue
            .submit(Box::new(TestJob {
                name: "late".to_string(),
                runs: Arc::new(AtomicU64::new(0)),
                fail: false,
            }))
            .unwrap_err();
        assert!(matches!(err, DispatchError::HandlerExecution { .. }));
    }
}
