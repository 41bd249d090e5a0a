pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::executor::{PanicStrategy, WorkItem, WorkerPool};
pub use crate::runtime::Runtime;
pub use crate::task::{TaskHandle, TaskId};

pub use crate::{init, init_with_config, shutdown, spawn};

#[cfg(feature = "telemetry")]
pub use crate::telemetry::{Metrics, MetricsSnapshot};
