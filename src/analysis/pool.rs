//! Bounded worker pool that runs analysis tasks off the UI thread

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use super::events::{EventEmitter, TaskEvent, TaskId, Waker};
use super::task::AnalysisTask;
use crate::config::AppConfig;

/// Runs submitted tasks on a fixed set of worker threads
pub struct WorkerPool {
    runtime: Runtime,
    client: reqwest::Client,
    events: Sender<TaskEvent>,
    waker: Option<Waker>,
    next_id: TaskId,
}

impl WorkerPool {
    /// Create a pool sized from the configuration
    pub fn new(config: &AppConfig, events: Sender<TaskEvent>) -> Result<Self> {
        let mut client = reqwest::Client::builder();
        if let Some(secs) = config.api.timeout_secs {
            client = client.timeout(Duration::from_secs(secs));
        }
        let client = client.build().context("Failed to create HTTP client")?;

        Self::with_client(config.performance.worker_threads, client, events)
    }

    /// Create a pool around an existing HTTP client
    pub fn with_client(
        worker_threads: usize,
        client: reqwest::Client,
        events: Sender<TaskEvent>,
    ) -> Result<Self> {
        let worker_threads = worker_threads.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .thread_name("analysis-worker")
            .enable_all()
            .build()
            .context("Failed to create worker runtime")?;

        info!("Worker pool started with {} threads", worker_threads);

        Ok(Self {
            runtime,
            client,
            events,
            waker: None,
            next_id: 1,
        })
    }

    /// Called after every event so the UI loop repaints promptly
    pub fn set_waker(&mut self, waker: Waker) {
        self.waker = Some(waker);
    }

    /// Start a task; it runs concurrently with any other in-flight task
    pub fn submit(&mut self, task: AnalysisTask) -> TaskId {
        let task_id = self.next_id;
        self.next_id += 1;

        let emitter = EventEmitter::new(task_id, self.events.clone(), self.waker.clone());
        let client = self.client.clone();

        info!("Submitting task {} ({} image bytes)", task_id, task.image().len());
        debug!("Task {} prompt: {}", task_id, task.prompt());
        self.runtime.spawn(async move {
            task.run(&client, &emitter).await;
        });

        task_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::events::TaskEventKind;
    use crate::analysis::task::tests::{serve_once, test_client};
    use crossbeam_channel::unbounded;
    use std::time::Duration;

    #[test]
    fn test_pool_creation_from_default_config() {
        let (tx, _rx) = unbounded();
        let pool = WorkerPool::new(&AppConfig::default(), tx);
        assert!(pool.is_ok());
    }

    #[test]
    fn test_zero_threads_is_clamped() {
        let (tx, _rx) = unbounded();
        assert!(WorkerPool::with_client(0, test_client(), tx).is_ok());
    }

    #[test]
    fn test_submit_delivers_events_over_channel() {
        let (tx, rx) = unbounded();
        let mut pool = WorkerPool::with_client(2, test_client(), tx).unwrap();

        // The loopback server runs on a separate runtime so the pool's runtime is not
        // entered from this thread.
        let server_rt = tokio::runtime::Runtime::new().unwrap();
        let (url, _server) = server_rt.block_on(serve_once(
            200,
            "OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"Two pears"}]}}]}"#,
        ));

        let first = pool.submit(AnalysisTask::new(url, vec![9, 9, 9], "fruit?"));
        assert_eq!(first, 1);

        let mut received = Vec::new();
        loop {
            let event = rx
                .recv_timeout(Duration::from_secs(10))
                .expect("task did not finish");
            let terminal = event.kind.is_terminal();
            received.push(event);
            if terminal {
                break;
            }
        }

        assert!(received.iter().all(|e| e.task_id == first));
        assert_eq!(
            received.last().unwrap().kind,
            TaskEventKind::Result("Two pears".to_string())
        );
    }

    #[test]
    fn test_task_ids_increase() {
        let (tx, _rx) = unbounded();
        let mut pool = WorkerPool::with_client(1, test_client(), tx).unwrap();

        // Ids are assigned at submission regardless of how the request ends
        let a = pool.submit(AnalysisTask::new("http://127.0.0.1:9/", vec![1], "a"));
        let b = pool.submit(AnalysisTask::new("http://127.0.0.1:9/", vec![1], "b"));
        assert_eq!(b, a + 1);
    }
}
