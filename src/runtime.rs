use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::executor::WorkerPool;
use crate::task::TaskHandle;

/// An owned runtime: a worker pool plus the configuration it was built
/// from.
///
/// This is the primary construction path. Build one at process start and
/// pass it (or clones of an `Arc` around it) to whatever needs to spawn;
/// the global [`init`]/[`current`] layer below exists for programs that
/// want a single process-wide instance without threading a handle through.
#[derive(Debug)]
pub struct Runtime {
    pub(crate) pool: Arc<WorkerPool>,
    config: Config,
}

impl Runtime {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let pool = WorkerPool::new(&config)?;

        Ok(Self {
            pool: Arc::new(pool),
            config,
        })
    }

    /// Creates a task on this runtime's pool. See [`WorkerPool::spawn`].
    pub fn spawn<F, T>(&self, f: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.pool.spawn(f)
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn worker_count(&self) -> usize {
        self.pool.worker_count()
    }
}

// Global runtime for simple API
static GLOBAL_RUNTIME: RwLock<Option<Arc<Runtime>>> = RwLock::new(None);

/// Initializes the global runtime with the default configuration.
pub fn init() -> Result<()> {
    init_with_config(Config::default())
}

/// Initializes the global runtime.
///
/// Construction is always explicit: nothing initializes the global lazily
/// on first use. Fails with [`Error::AlreadyInitialized`] if a global
/// runtime is already up.
pub fn init_with_config(config: Config) -> Result<()> {
    let mut runtime = GLOBAL_RUNTIME.write();

    if runtime.is_some() {
        return Err(Error::AlreadyInitialized);
    }

    let rt = Runtime::new(config)?;
    *runtime = Some(Arc::new(rt));

    debug!("global runtime initialized");
    Ok(())
}

/// Returns the global runtime, or [`Error::NotInitialized`] before
/// [`init`].
pub fn try_current() -> Result<Arc<Runtime>> {
    GLOBAL_RUNTIME
        .read()
        .as_ref()
        .cloned()
        .ok_or(Error::NotInitialized)
}

/// Returns the global runtime.
///
/// # Panics
///
/// Panics if the global runtime has not been initialized.
pub fn current() -> Arc<Runtime> {
    GLOBAL_RUNTIME
        .read()
        .as_ref()
        .expect("capstan runtime not initialized - call capstan::init() first")
        .clone()
}

/// Creates a task on the global runtime's pool.
///
/// # Panics
///
/// Panics if the global runtime has not been initialized.
pub fn spawn<F, T>(f: F) -> TaskHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    current().spawn(f)
}

/// Tears down the global runtime.
///
/// The pool joins its workers once the last `Arc<Runtime>` drops; callers
/// still holding one from [`try_current`] delay that until they let go.
pub fn shutdown() {
    // The write guard must be gone before the runtime drops: joining
    // workers while holding it deadlocks any body calling try_current().
    let runtime = GLOBAL_RUNTIME.write().take();
    if runtime.is_some() {
        debug!("global runtime shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global is process-wide state, so the whole lifecycle lives in one
    // test; parallel test threads must not interleave on it.
    #[test]
    fn global_lifecycle() {
        shutdown();

        assert!(matches!(try_current(), Err(Error::NotInitialized)));

        let config = Config::builder().num_threads(2).build().unwrap();
        init_with_config(config).unwrap();

        assert!(matches!(init(), Err(Error::AlreadyInitialized)));

        let rt = current();
        assert_eq!(rt.worker_count(), 2);

        let handle = spawn(|| 5 * 5);
        assert_eq!(handle.result().unwrap(), 25);

        shutdown();
        assert!(matches!(try_current(), Err(Error::NotInitialized)));

        // the global can come back up after a teardown
        init().unwrap();
        assert_eq!(current().worker_count(), crate::config::DEFAULT_WORKER_THREADS);
        shutdown();
    }

    #[test]
    fn runtime_is_plain_dependency_injection() {
        let config = Config::builder().num_threads(1).build().unwrap();
        let rt = Runtime::new(config).unwrap();

        let handle = rt.spawn(|| "owned");
        assert_eq!(handle.result().unwrap(), "owned");

        assert_eq!(rt.worker_count(), 1);
        assert_eq!(rt.config().worker_threads(), 1);
    }
}
