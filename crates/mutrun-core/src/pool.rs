//! Run pool
//!
//! Retired runs are parked here instead of being freed, keeping their grown
//! buffers. Once a population's live run count settles, acquiring and
//! releasing runs stops touching the allocator entirely.
//!
//! # Thread Safety
//!
//! The pool is NOT thread-safe. [`RunPool::global`] hands out one pool per
//! thread; runs never cross threads.

use crate::config::PoolConfig;
use crate::error::{ConfigError, RunError};
use crate::run::MutationRun;
use crate::shared::SharedRun;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Pool statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Runs handed out
    pub acquisitions: u64,
    /// Acquisitions served from the free list
    pub reuses: u64,
    /// Acquisitions that created a new run
    pub fresh_allocations: u64,
    /// Runs returned after their last owner dropped
    pub releases: u64,
    /// Released runs dropped because the free list was full
    pub discarded: u64,
}

impl PoolStats {
    /// Fraction of acquisitions served from the free list
    #[must_use]
    pub fn reuse_rate(&self) -> f64 {
        if self.acquisitions == 0 {
            0.0
        } else {
            self.reuses as f64 / self.acquisitions as f64
        }
    }
}

#[derive(Debug)]
pub(crate) struct PoolInner {
    /// Retired runs (LIFO, most recently used buffer first)
    free: Vec<MutationRun>,
    config: PoolConfig,
    stats: PoolStats,
}

impl PoolInner {
    fn take(&mut self) -> MutationRun {
        self.stats.acquisitions += 1;

        if let Some(run) = self.free.pop() {
            self.stats.reuses += 1;
            return run;
        }

        self.stats.fresh_allocations += 1;
        tracing::trace!(
            fresh_allocations = self.stats.fresh_allocations,
            "run pool empty, creating run"
        );
        MutationRun::with_policy(self.config.growth)
    }

    fn give_back(&mut self, mut run: MutationRun) {
        self.stats.releases += 1;

        if self
            .config
            .max_retained
            .is_some_and(|max| self.free.len() >= max)
        {
            self.stats.discarded += 1;
            return;
        }

        run.recycle();
        self.free.push(run);
    }
}

/// Link from a run back to the pool it returns to
pub(crate) type PoolLink = Weak<RefCell<PoolInner>>;

/// Take a body from the linked pool, or create one if the pool is gone
pub(crate) fn take_from(link: &PoolLink, fallback: &MutationRun) -> MutationRun {
    match link.upgrade() {
        Some(inner) => inner.borrow_mut().take(),
        None => MutationRun::with_policy(fallback.policy()),
    }
}

/// Return a body to the linked pool; dropped if the pool is gone
pub(crate) fn return_to(link: &PoolLink, run: MutationRun) {
    if let Some(inner) = link.upgrade() {
        inner.borrow_mut().give_back(run);
    }
}

/// Free list of retired mutation runs
///
/// Cloning a `RunPool` clones the handle; both refer to the same free list.
#[derive(Debug, Clone)]
pub struct RunPool {
    inner: Rc<RefCell<PoolInner>>,
}

thread_local! {
    static GLOBAL_POOL: RunPool = RunPool::new();
}

impl Default for RunPool {
    fn default() -> Self {
        Self::new()
    }
}

impl RunPool {
    /// Create an empty pool with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(PoolConfig::default())
    }

    /// Create a pool with custom configuration
    ///
    /// # Errors
    /// Returns error if the configuration does not validate.
    pub fn with_config(config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: PoolConfig) -> Self {
        let free = (0..config.preallocate)
            .map(|_| MutationRun::with_policy(config.growth))
            .collect();

        tracing::debug!(
            preallocated = config.preallocate,
            max_retained = ?config.max_retained,
            "run pool created"
        );

        Self {
            inner: Rc::new(RefCell::new(PoolInner {
                free,
                config,
                stats: PoolStats::default(),
            })),
        }
    }

    /// The calling thread's shared pool
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_POOL.with(Clone::clone)
    }

    /// Take an empty run with a single owner
    ///
    /// Reuses a retired run when one is available; its capacity is whatever
    /// it grew to in a previous life.
    #[must_use]
    pub fn acquire(&self) -> SharedRun {
        let run = self.inner.borrow_mut().take();
        SharedRun::from_parts(run, Rc::downgrade(&self.inner))
    }

    /// Take a run holding a copy of `source`
    ///
    /// # Errors
    /// Propagates growth failures; the run goes back to the pool on error.
    pub fn acquire_copy_of(&self, source: &MutationRun) -> Result<SharedRun, RunError> {
        let mut run = self.acquire();
        run.get_mut().clone_from_run(source)?;
        Ok(run)
    }

    /// Runs parked in the free list
    #[must_use]
    pub fn retained(&self) -> usize {
        self.inner.borrow().free.len()
    }

    /// Statistics snapshot
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.inner.borrow().stats
    }

    /// Configuration in effect
    #[must_use]
    pub fn config(&self) -> PoolConfig {
        self.inner.borrow().config.clone()
    }

    /// Whether two handles refer to the same pool
    #[must_use]
    pub fn same_pool(&self, other: &RunPool) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
