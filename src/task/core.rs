use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Condvar, Mutex};

use crate::executor::panic_handler::PanicInfo;
use crate::executor::work::WorkItem;

use super::state;

/// Global task ID counter
static TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    fn next() -> Self {
        TaskId(TASK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// The suspended body of a task, consumed at its single resumption.
type Thunk = Box<dyn FnOnce() + Send + 'static>;

/// Shared completion state bridging a task's terminal point to its readers.
///
/// The thunk slot owns the suspended computation until the pool resumes it;
/// the cell is a one-shot, multi-reader result slot. External handles hold
/// strong references while the thunk holds only a weak back-reference, so
/// the computation and the state it writes into never form a strong cycle.
/// While the task is queued, the pool's own reference keeps the state alive
/// even if every handle is dropped first.
pub(crate) struct TaskCore<T> {
    id: TaskId,
    state: AtomicUsize,
    thunk: Mutex<Option<Thunk>>,
    cell: Mutex<Option<Result<T, PanicInfo>>>,
    ready: Condvar,
}

impl<T> TaskCore<T> {
    /// Builds the completion state with `f` bound into the thunk slot.
    ///
    /// `Arc::new_cyclic` hands the thunk its weak back-reference at
    /// construction; the strong reference returned here goes to the handle
    /// and to the pool's queue.
    pub(crate) fn bind<F>(f: F) -> Arc<Self>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let back = weak.clone();
            let thunk: Thunk = Box::new(move || {
                let outcome = match catch_unwind(AssertUnwindSafe(f)) {
                    Ok(value) => Ok(value),
                    Err(payload) => Err(PanicInfo::from_payload(payload)),
                };
                // The worker still holds a strong reference while the thunk
                // runs, so the upgrade fails only if that invariant broke.
                let core = back
                    .upgrade()
                    .expect("completion state dropped before publication");
                core.complete(outcome);
            });

            Self {
                id: TaskId::next(),
                state: AtomicUsize::new(state::CREATED),
                thunk: Mutex::new(Some(thunk)),
                cell: Mutex::new(None),
                ready: Condvar::new(),
            }
        })
    }

    pub(crate) fn mark_scheduled(&self) {
        self.state.store(state::SCHEDULED, Ordering::Release);
    }

    /// Publishes the outcome and wakes every reader. One write per task.
    fn complete(&self, outcome: Result<T, PanicInfo>) {
        let next = if outcome.is_ok() {
            state::COMPLETED
        } else {
            state::FAILED
        };

        let mut cell = self.cell.lock();
        assert!(cell.is_none(), "task outcome published twice");
        *cell = Some(outcome);
        self.state.store(next, Ordering::Release);
        drop(cell);

        self.ready.notify_all();
    }

    pub(crate) fn id(&self) -> TaskId {
        self.id
    }

    pub(crate) fn is_finished(&self) -> bool {
        state::is_terminal(self.state.load(Ordering::Acquire))
    }

    /// Blocks until the outcome is published.
    pub(crate) fn wait_done(&self) {
        let mut cell = self.cell.lock();
        while cell.is_none() {
            self.ready.wait(&mut cell);
        }
    }

    /// Blocks until the outcome is published, then clones it out.
    ///
    /// Every caller observes the same value or the same captured failure.
    pub(crate) fn wait_outcome(&self) -> Result<T, PanicInfo>
    where
        T: Clone,
    {
        let mut cell = self.cell.lock();
        loop {
            if let Some(outcome) = cell.as_ref() {
                return outcome.clone();
            }
            self.ready.wait(&mut cell);
        }
    }
}

impl<T: Send + 'static> WorkItem for TaskCore<T> {
    /// The task's single resumption: empties the thunk slot and runs the
    /// body to its terminal point on the calling worker.
    fn execute(self: Arc<Self>) {
        self.state.store(state::RUNNING, Ordering::Release);

        let thunk = self
            .thunk
            .lock()
            .take()
            .expect("resumption thunk already consumed");

        thunk();
    }
}
