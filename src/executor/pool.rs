use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use super::panic_handler::PanicHandler;
use super::queue::WorkQueue;
use super::work::WorkItem;
use super::worker::{Worker, WorkerId};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::task::{self, TaskHandle};

#[cfg(feature = "telemetry")]
use crate::telemetry::Metrics;

/// Fixed-size pool of worker threads consuming one shared FIFO queue.
///
/// The thread count is fixed at construction; workers start immediately and
/// run until [`shutdown`](WorkerPool::shutdown). Note that task bodies which
/// block on other tasks' results occupy their worker for the whole wait; see
/// [`TaskHandle::result`] for the starvation hazard.
pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
    queue: Arc<WorkQueue>,
    num_threads: usize,
    #[cfg(feature = "telemetry")]
    pub(crate) metrics: Arc<Metrics>,
}

struct WorkerHandle {
    id: WorkerId,
    thread: Option<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let num_threads = config.worker_threads();

        let queue = Arc::new(WorkQueue::new());
        let panic_handler = Arc::new(PanicHandler::new(config.panic_strategy));

        #[cfg(feature = "telemetry")]
        let metrics = Arc::new(Metrics::new());

        let mut workers = Vec::with_capacity(num_threads);

        for id in 0..num_threads {
            let worker = Worker::new(id, queue.clone(), panic_handler.clone());

            #[cfg(feature = "telemetry")]
            let worker = worker.with_metrics(metrics.clone());

            let name = format!("{}-{}", config.thread_name_prefix, id);
            let mut builder = thread::Builder::new().name(name);

            if let Some(stack_size) = config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            let thread = match builder.spawn(move || worker.run()) {
                Ok(thread) => thread,
                Err(e) => {
                    // Let the workers spawned so far exit before bailing.
                    queue.close();
                    return Err(Error::executor(format!("spawn failed: {}", e)));
                }
            };

            workers.push(WorkerHandle {
                id,
                thread: Some(thread),
            });
        }

        debug!(workers = num_threads, "worker pool started");

        Ok(Self {
            workers,
            queue,
            num_threads,
            #[cfg(feature = "telemetry")]
            metrics,
        })
    }

    /// Enqueues a work item at the FIFO tail and wakes one idle worker.
    ///
    /// Never blocks and never fails. After shutdown this is a no-op: the
    /// item is dropped, consistent with drain-less shutdown.
    pub fn schedule(&self, item: Arc<dyn WorkItem>) {
        if self.queue.push(item) {
            #[cfg(feature = "telemetry")]
            self.metrics.record_scheduled();
        } else {
            warn!("schedule on a shut-down pool, dropping work item");
            #[cfg(feature = "telemetry")]
            self.metrics.record_rejected();
        }
    }

    /// Creates a task: packages `f` as a work item, hands it to the pool,
    /// and returns a handle to its eventual result.
    ///
    /// The body never runs on the calling thread.
    pub fn spawn<F, T>(&self, f: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        task::spawn_on(self, f)
    }

    pub fn worker_count(&self) -> usize {
        self.num_threads
    }

    pub fn queued_items(&self) -> usize {
        self.queue.len()
    }

    #[cfg(feature = "telemetry")]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Closes the queue and joins every worker.
    ///
    /// A worker mid-execution finishes its current item first; items no
    /// worker has dequeued yet are dropped and never execute. Torn down
    /// from inside a task body (a worker dropping the last runtime
    /// reference), the executing worker is skipped rather than self-joined
    /// and exits on its own once the body returns.
    pub fn shutdown(&mut self) {
        self.queue.close();

        let abandoned = self.queue.len();
        if abandoned > 0 {
            debug!(abandoned, "queue closed with items still pending");
        }

        let current = thread::current().id();
        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                // A worker tearing down its own pool must not join itself.
                if thread.thread().id() == current {
                    continue;
                }
                let _ = thread.join();
                debug!(worker = worker.id, "worker joined");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.num_threads)
            .field("queued", &self.queue.len())
            .finish()
    }
}
