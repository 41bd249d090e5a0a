// worker thread stuff
use std::sync::Arc;

use tracing::debug;

use super::panic_handler::PanicHandler;
use super::queue::WorkQueue;
use super::work::WorkItem;

#[cfg(feature = "telemetry")]
use crate::telemetry::Metrics;
#[cfg(feature = "telemetry")]
use std::time::Instant;

pub(crate) type WorkerId = usize;

pub(crate) struct Worker {
    pub id: WorkerId,
    queue: Arc<WorkQueue>,
    panic_handler: Arc<PanicHandler>,
    #[cfg(feature = "telemetry")]
    metrics: Option<Arc<Metrics>>,
}

impl Worker {
    pub fn new(id: WorkerId, queue: Arc<WorkQueue>, panic_handler: Arc<PanicHandler>) -> Self {
        Self {
            id,
            queue,
            panic_handler,
            #[cfg(feature = "telemetry")]
            metrics: None,
        }
    }

    #[cfg(feature = "telemetry")]
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    // main loop
    pub fn run(&self) {
        debug!(worker = self.id, "worker started");

        // pop_blocking returns None once the queue closes; items still
        // queued at that point are never executed.
        while let Some(item) = self.queue.pop_blocking() {
            self.execute_item(item);
        }

        debug!(worker = self.id, "worker stopped");
    }

    fn execute_item(&self, item: Arc<dyn WorkItem>) {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let result = self.panic_handler.execute(|| item.execute());

        match result {
            Ok(()) => {
                #[cfg(feature = "telemetry")]
                if let Some(ref metrics) = self.metrics {
                    metrics.record_execution(start.elapsed().as_nanos() as u64);
                }
            }
            Err(_) => {
                // Reported by the panic handler; only the count lands here.
                #[cfg(feature = "telemetry")]
                if let Some(ref metrics) = self.metrics {
                    metrics.record_panic();
                }
            }
        }
    }
}
