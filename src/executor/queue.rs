use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use super::work::WorkItem;

struct QueueState {
    items: VecDeque<Arc<dyn WorkItem>>,
    closed: bool,
}

/// Unbounded FIFO shared by every worker in a pool.
///
/// One mutex guards the buffer and the closed flag; a condvar wakes idle
/// workers. Closing never drains: waiters observe `None` even while items
/// remain, and those items are dropped unexecuted.
pub(crate) struct WorkQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Appends at the tail and wakes one idle worker. Never blocks.
    /// Returns false if the queue is closed; the item is dropped.
    pub fn push(&self, item: Arc<dyn WorkItem>) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.items.push_back(item);
        drop(state);
        self.available.notify_one();
        true
    }

    /// Blocks until an item is available or the queue is closed.
    pub fn pop_blocking(&self) -> Option<Arc<dyn WorkItem>> {
        let mut state = self.state.lock();
        loop {
            // Closed wins over remaining items: shutdown never drains.
            if state.closed {
                return None;
            }
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            self.available.wait(&mut state);
        }
    }

    /// Marks the queue closed and wakes every waiter. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        drop(state);
        self.available.notify_all();
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}
