//! Ambient execution context for kernels
//!
//! A [`Context`] carries a cancellation flag, an optional deadline and the
//! [`KernelConfig`]. Kernels poll [`Context::check`] between output rows; the
//! library never starts a timer of its own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::ThreadPool;

use crate::error::{GraphError, Result};
use crate::matrix::config::KernelConfig;

/// Cancellation token, deadline and configuration passed to every kernel.
///
/// Clones share the cancellation flag, so a clone handed to another thread
/// can stop a kernel running on this one.
#[derive(Clone)]
pub struct Context {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
    config: KernelConfig,
    pool: Option<Arc<ThreadPool>>,
}

impl Context {
    /// A never-cancelled, sequential context
    pub fn background() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
            config: KernelConfig::default(),
            pool: None,
        }
    }

    /// A context using `config`, building a dedicated worker pool when the
    /// configuration asks for parallel execution
    pub fn with_config(config: KernelConfig) -> Result<Self> {
        let pool = if config.runs_parallel(usize::MAX) {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.n_threads)
                .build()?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
            config,
            pool,
        })
    }

    /// Derives a context that also expires at `deadline`
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        };
        Self {
            deadline: Some(deadline),
            ..self.clone()
        }
    }

    /// Derives a context that expires `timeout` from now
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Requests cancellation of every kernel observing this context or a clone of it
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Acquire) {
            return true;
        }
        matches!(self.deadline, Some(deadline) if Instant::now() >= deadline)
    }

    /// Returns [`GraphError::Cancelled`] once cancellation was requested
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(GraphError::Cancelled)
        } else {
            Ok(())
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub(crate) fn pool(&self) -> Option<&ThreadPool> {
        self.pool.as_deref()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("cancelled", &self.cancelled.load(Ordering::Relaxed))
            .field("deadline", &self.deadline)
            .field("config", &self.config)
            .finish()
    }
}
