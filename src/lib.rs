//! Capstan - a minimal fixed-pool task runtime.
//!
//! A fixed-size worker pool executes suspended computations handed over at
//! task creation: spawning a task enqueues its single resumption on the
//! pool and returns a handle, the body runs to completion on one worker,
//! and any number of handle clones block-read the published result.
//!
//! # Quick Start
//!
//! ```no_run
//! use capstan::prelude::*;
//!
//! // Initialize the global runtime
//! capstan::init().unwrap();
//!
//! let task = capstan::spawn(|| 3 + 4);
//! assert_eq!(task.result().unwrap(), 7);
//!
//! capstan::shutdown();
//! ```
//!
//! Or own the runtime outright and pass it around:
//!
//! ```no_run
//! use capstan::{Config, Runtime};
//!
//! let rt = Runtime::new(Config::default()).unwrap();
//! let task = rt.spawn(|| "done");
//! assert_eq!(task.result().unwrap(), "done");
//! ```
//!
//! # Features
//!
//! - **Fixed Worker Pool**: thread count decided at construction, one
//!   shared FIFO queue, no work stealing
//! - **Blocking Task Handles**: one-shot, multi-reader results; a body's
//!   panic is captured and re-raised on read
//! - **Drain-less Shutdown**: items still queued when shutdown begins are
//!   never executed
//! - **Telemetry**: counters and an execution-latency histogram (optional)

// Lint configuration
#![warn(missing_docs, missing_debug_implementations)]
#![allow(dead_code)] // During development

// Core modules - always available
pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod runtime;
pub mod task;
pub mod telemetry;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder, DEFAULT_WORKER_THREADS};
pub use error::{Error, Result};
pub use executor::{PanicStrategy, WorkItem, WorkerPool};
pub use runtime::{current, init, init_with_config, shutdown, spawn, try_current, Runtime};
pub use task::{TaskHandle, TaskId};
