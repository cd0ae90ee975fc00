//! Operation epochs and batch sweeps
//!
//! A batch pass over a population visits each run once per owner. Stamping
//! the run with the pass's [`Epoch`] makes the work itself happen once per
//! distinct run.
//!
//! # Lifecycle
//! The process-wide counter behind [`next_global_epoch`] starts at 1 when the
//! process starts and only moves forward. [`Epoch::UNSTAMPED`] is the stamp
//! of a fresh run and is never handed out, so every pass is guaranteed to
//! see fresh runs as unprocessed.

use crate::run::MutationRun;
use crate::shared::SharedRun;
use mutrun_types::MutationArena;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of one batch pass
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Epoch(u64);

impl Epoch {
    /// Stamp carried by runs that were never processed
    pub const UNSTAMPED: Epoch = Epoch(0);

    /// Create an epoch from a raw value
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

static GLOBAL_EPOCH: AtomicU64 = AtomicU64::new(1);

/// Take a never-before-used epoch from the process-wide counter
#[inline]
#[must_use]
pub fn next_global_epoch() -> Epoch {
    Epoch(GLOBAL_EPOCH.fetch_add(1, Ordering::Relaxed))
}

/// Caller-owned epoch counter
///
/// For code that keeps its own sequence instead of the global one. Epochs
/// from different counters must not be mixed on the same runs.
#[derive(Debug, Clone)]
pub struct EpochCounter {
    next: u64,
}

impl Default for EpochCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EpochCounter {
    /// Counter whose first epoch is 1
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next epoch
    #[inline]
    pub fn advance(&mut self) -> Epoch {
        let epoch = Epoch(self.next);
        self.next += 1;
        epoch
    }

    /// Most recently issued epoch, if any
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<Epoch> {
        (self.next > 1).then(|| Epoch(self.next - 1))
    }
}

/// Outcome of a batch sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Owner handles visited
    pub visited: usize,
    /// Distinct runs the operation executed on
    pub processed: usize,
    /// Handles removed, for purging sweeps
    pub removed: usize,
}

/// Apply `op` once to every distinct run reachable from `owners`
pub fn sweep<'a, I, F>(owners: I, epoch: Epoch, mut op: F) -> SweepStats
where
    I: IntoIterator<Item = &'a SharedRun>,
    F: FnMut(&mut MutationRun),
{
    let mut stats = SweepStats::default();

    for owner in owners {
        stats.visited += 1;
        if owner.run_if_not_stamped(epoch, &mut op).is_some() {
            stats.processed += 1;
        }
    }

    tracing::debug!(
        epoch = epoch.get(),
        visited = stats.visited,
        processed = stats.processed,
        "batch sweep finished"
    );
    stats
}

/// Remove fixed mutations from every distinct run reachable from `owners`
pub fn purge_fixed<'a, I, A>(owners: I, epoch: Epoch, arena: &A) -> SweepStats
where
    I: IntoIterator<Item = &'a SharedRun>,
    A: MutationArena + ?Sized,
{
    let mut removed = 0;
    let mut stats = sweep(owners, epoch, |run| {
        removed += run.remove_fixed_mutations(arena);
    });
    stats.removed = removed;

    tracing::debug!(epoch = epoch.get(), removed, "fixed mutations purged");
    stats
}
