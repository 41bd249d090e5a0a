use std::sync::Arc;

/// A single schedulable unit of executable logic.
///
/// Items are enqueued as `Arc<dyn WorkItem>` and consumed by whichever
/// worker thread dequeues them. `execute` takes the queue's reference and
/// is invoked exactly once per scheduled item.
///
/// Implementations must not unwind out of `execute`: a failure inside a
/// wrapped computation has to be captured and stored by the item itself. A
/// panic that escapes anyway is treated as a broken invariant by the
/// worker's panic guard.
pub trait WorkItem: Send + Sync {
    fn execute(self: Arc<Self>);
}
