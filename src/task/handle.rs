use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

use super::core::{TaskCore, TaskId};

/// A handle to a spawned task.
///
/// The handle observes the task's one-shot result cell: any number of
/// clones on any number of threads may read the outcome, and every reader
/// sees the same value or the same captured failure.
///
/// Dropping every handle does **not** cancel the task; the pool's own
/// reference keeps the completion state alive until the body has run.
pub struct TaskHandle<T> {
    core: Arc<TaskCore<T>>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(core: Arc<TaskCore<T>>) -> Self {
        Self { core }
    }

    /// Identifier of the task this handle observes.
    pub fn id(&self) -> TaskId {
        self.core.id()
    }

    /// True once the task has published a value or a captured failure.
    pub fn is_finished(&self) -> bool {
        self.core.is_finished()
    }

    /// Blocks until the task reaches its terminal point.
    ///
    /// Same caveats as [`result`](TaskHandle::result), minus the `Clone`
    /// bound: the outcome itself is not read.
    pub fn wait(&self) {
        self.core.wait_done();
    }
}

impl<T: Clone> TaskHandle<T> {
    /// Blocks until the task finishes, then returns its result.
    ///
    /// Idempotent and multi-reader: every call on every clone returns the
    /// same value, or the same [`Error::TaskPanicked`] if the body
    /// panicked. A failure is re-raised lazily here, never inside the
    /// worker that ran the body.
    ///
    /// # Starvation hazard
    ///
    /// Calling this from inside a task body blocks that body's worker until
    /// the child completes. If every worker blocks this way while the
    /// children sit undispatched behind them, the pool deadlocks. Keep
    /// dependency chains shallower than the worker count.
    pub fn result(&self) -> Result<T> {
        match self.core.wait_outcome() {
            Ok(value) => Ok(value),
            Err(failure) => Err(Error::TaskPanicked(failure.message)),
        }
    }
}

impl<T> Clone for TaskHandle<T> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T> fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.core.id())
            .field("finished", &self.core.is_finished())
            .finish()
    }
}
