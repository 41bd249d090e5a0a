/// Task has been created but not yet handed to a pool.
///
/// The resumption thunk is bound and waiting in its slot.
pub(crate) const CREATED: usize = 0;

/// Task is queued for execution.
///
/// The completion state sits in a pool's work queue as a work item.
pub(crate) const SCHEDULED: usize = 1;

/// Task is currently being executed by a worker.
///
/// At most one worker may observe this state at a time; the thunk slot
/// is emptied on entry.
pub(crate) const RUNNING: usize = 2;

/// Task has completed and published a value.
///
/// Terminal; the result cell holds `Ok`.
pub(crate) const COMPLETED: usize = 3;

/// Task body panicked and the failure was captured.
///
/// Terminal; the result cell holds the captured panic.
pub(crate) const FAILED: usize = 4;

/// True for the two states a task can never leave.
pub(crate) fn is_terminal(state: usize) -> bool {
    state == COMPLETED || state == FAILED
}
