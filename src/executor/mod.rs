//! Work execution infrastructure.
//!
//! This module provides the executor half of the runtime: the type-erased
//! work item, the shared FIFO work queue, worker threads, and the fixed-size
//! worker pool that owns them.

pub mod panic_handler;
pub mod pool;
pub mod queue;
pub mod work;
pub mod worker;

pub use panic_handler::{PanicHandler, PanicInfo, PanicStrategy};
pub use pool::WorkerPool;
pub use work::WorkItem;
