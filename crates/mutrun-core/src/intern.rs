//! Run interning
//!
//! Repoints owners of structurally identical runs at one canonical instance.
//! Buckets are keyed by [`MutationRun::structural_hash`]; within a bucket,
//! [`MutationRun::structurally_equal`] decides.

use crate::shared::SharedRun;
use std::collections::HashMap;

/// Interning statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InternStats {
    /// Owner handles offered
    pub examined: usize,
    /// Canonical runs kept
    pub distinct: usize,
    /// Owners repointed at an equal run
    pub merged: usize,
    /// Offers whose hash matched a bucket without an equal run
    pub hash_collisions: usize,
}

/// Canonicalizing table of shared runs
///
/// The interner holds an owner reference to every canonical run, so owner
/// counts stay raised until it is dropped.
#[derive(Debug, Default)]
pub struct RunInterner {
    buckets: HashMap<u64, Vec<SharedRun>>,
    stats: InternStats,
}

impl RunInterner {
    /// Create empty interner
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical run equal to `run`
    ///
    /// Returns an owner of an existing equal run if there is one, dropping
    /// `run`; otherwise records `run` as canonical and returns it.
    pub fn intern(&mut self, run: SharedRun) -> SharedRun {
        self.stats.examined += 1;

        let hash = run.borrow().structural_hash();
        let bucket = self.buckets.entry(hash).or_default();

        if let Some(canonical) = bucket.iter().find(|canonical| {
            canonical.ptr_eq(&run) || canonical.borrow().structurally_equal(&run.borrow())
        }) {
            if !canonical.ptr_eq(&run) {
                self.stats.merged += 1;
            }
            return canonical.clone();
        }

        if !bucket.is_empty() {
            self.stats.hash_collisions += 1;
        }
        self.stats.distinct += 1;
        bucket.push(run.clone());
        run
    }

    /// Number of canonical runs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.distinct
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.distinct == 0
    }

    /// Statistics so far
    #[inline]
    #[must_use]
    pub fn stats(&self) -> InternStats {
        self.stats
    }
}

/// Repoint every owner in `owners` at a canonical run
///
/// Duplicates lose their owner reference here; a duplicate whose last owner
/// was in `owners` goes back to its pool.
pub fn unique_runs(owners: &mut [SharedRun]) -> InternStats {
    let mut interner = RunInterner::new();

    for slot in owners.iter_mut() {
        let canonical = interner.intern(slot.clone());
        if !canonical.ptr_eq(slot) {
            *slot = canonical;
        }
    }

    let stats = interner.stats();
    tracing::debug!(
        examined = stats.examined,
        distinct = stats.distinct,
        merged = stats.merged,
        hash_collisions = stats.hash_collisions,
        "interned mutation runs"
    );
    stats
}
