//! Task creation and completion.
//!
//! A task is a computation whose first and only resumption is handed to a
//! worker pool at creation; it then runs to its terminal point on one
//! worker. `spawn_on` is the hook performing that hand-off, `TaskCore` the
//! shared completion state, and [`TaskHandle`] the caller-facing view of
//! the result.

pub(crate) mod core;
pub mod handle;
pub(crate) mod state;

pub use self::core::TaskId;
pub use handle::TaskHandle;

use self::core::TaskCore;
use crate::executor::pool::WorkerPool;

/// Creates a task on `pool`: binds the body into its completion state,
/// marks it scheduled, enqueues the resumption as a work item, and returns
/// the handle.
///
/// The body never runs on the calling thread, even transiently.
pub(crate) fn spawn_on<F, T>(pool: &WorkerPool, f: F) -> TaskHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let core = TaskCore::bind(f);
    core.mark_scheduled();
    pool.schedule(core.clone());
    TaskHandle::new(core)
}
