//! Mutation run body
//!
//! A [`MutationRun`] is an ordered sequence of [`MutationIndex`] handles plus
//! the epoch stamp used by batch passes. Ordered insertion and stack policy
//! live in `insert.rs`; hashing and equality in `dedup.rs`.
//!
//! Every method taking `&mut self` is a structural mutation. A run held
//! through a [`SharedRun`](crate::SharedRun) is only reachable mutably via
//! the ownership guard or via [`run_if_not_stamped`](MutationRun::run_if_not_stamped).

use crate::epoch::Epoch;
use crate::error::RunError;
use crate::growth::GrowthPolicy;
use crate::storage::RunStorage;
use mutrun_types::{MutationArena, MutationIndex};
use std::ops::{Index, IndexMut};

/// Ordered sequence of mutation handles
///
/// `Clone` produces a distinct, unstamped run with the source's capacity,
/// the same result as [`clone_from_run`](MutationRun::clone_from_run) into
/// an empty run.
#[derive(Debug, Default)]
pub struct MutationRun {
    storage: RunStorage,
    epoch: Epoch,
}

impl MutationRun {
    /// Create an empty run with the default growth policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty run with a specific growth policy
    #[inline]
    #[must_use]
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            storage: RunStorage::new(policy),
            epoch: Epoch::UNSTAMPED,
        }
    }

    /// Create a run holding `handles` in the given order
    ///
    /// # Errors
    /// Propagates growth failures.
    pub fn from_handles(handles: &[MutationIndex]) -> Result<Self, RunError> {
        let mut run = Self::new();
        run.extend_from_slice(handles)?;
        Ok(run)
    }

    /// Number of handles
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Slots available without growing
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Whether the handles have moved off the inline buffer
    #[inline]
    #[must_use]
    pub fn is_spilled(&self) -> bool {
        self.storage.is_spilled()
    }

    /// Growth policy in effect
    #[inline]
    #[must_use]
    pub fn policy(&self) -> GrowthPolicy {
        self.storage.policy()
    }

    /// Last epoch this run was processed in
    #[inline]
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Handles in run order
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[MutationIndex] {
        self.storage.as_slice()
    }

    /// Handles in run order, mutably
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [MutationIndex] {
        self.storage.as_mut_slice()
    }

    /// Iterate handles in run order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, MutationIndex> {
        self.as_slice().iter()
    }

    /// Handle at `index`, if in bounds
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<MutationIndex> {
        self.as_slice().get(index).copied()
    }

    /// First handle
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<MutationIndex> {
        self.as_slice().first().copied()
    }

    /// Last handle
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<MutationIndex> {
        self.as_slice().last().copied()
    }

    /// Overwrite the handle at `index`
    ///
    /// # Errors
    /// Returns [`RunError::IndexOutOfBounds`] outside `[0, len)`.
    pub fn set(&mut self, index: usize, handle: MutationIndex) -> Result<(), RunError> {
        let len = self.len();
        let slot = self
            .as_mut_slice()
            .get_mut(index)
            .ok_or(RunError::IndexOutOfBounds { index, len })?;
        *slot = handle;
        Ok(())
    }

    /// Whether `handle` is present anywhere in the run
    ///
    /// Does not assume sorted order.
    #[inline]
    #[must_use]
    pub fn contains_mutation(&self, handle: MutationIndex) -> bool {
        self.as_slice().contains(&handle)
    }

    /// Append a handle at the end
    ///
    /// # Errors
    /// Propagates growth failures; the run is unchanged on error.
    #[inline]
    pub fn push(&mut self, handle: MutationIndex) -> Result<(), RunError> {
        self.storage.push(handle)
    }

    /// Append handles at the end in one pass
    ///
    /// # Errors
    /// Propagates growth failures; the run is unchanged on error.
    #[inline]
    pub fn extend_from_slice(&mut self, handles: &[MutationIndex]) -> Result<(), RunError> {
        self.storage.extend_from_slice(handles)
    }

    /// Overwrite this run's contents with `source`'s
    ///
    /// This is how an owner gets a private copy of a shared run before
    /// changing it. The epoch stamp is not copied.
    ///
    /// # Errors
    /// Propagates growth failures; the run is unchanged on error.
    pub fn clone_from_run(&mut self, source: &MutationRun) -> Result<(), RunError> {
        self.storage.copy_from(&source.storage)
    }

    /// Remove the last handle; no-op on an empty run
    #[inline]
    pub fn pop(&mut self) -> Option<MutationIndex> {
        self.storage.pop()
    }

    /// Shorten to `len` handles
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.storage.truncate(len);
    }

    /// Remove all handles, keeping capacity
    #[inline]
    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// Keep only handles matching `keep`, preserving order
    #[inline]
    pub fn retain(&mut self, keep: impl FnMut(MutationIndex) -> bool) {
        self.storage.retain(keep);
    }

    /// Remove every handle the arena reports as fixed
    ///
    /// Returns the number of handles removed.
    pub fn remove_fixed_mutations<A: MutationArena + ?Sized>(&mut self, arena: &A) -> usize {
        let before = self.len();
        self.retain(|handle| !arena.is_fixed(handle));
        before - self.len()
    }

    /// Run `op` unless this run was already processed in `epoch`
    ///
    /// Returns `None` when the stamp already matched. Callers sweeping a
    /// population pick a fresh epoch per pass, so `op` executes once per
    /// distinct run no matter how many owners reach it.
    pub fn run_if_not_stamped<R>(
        &mut self,
        epoch: Epoch,
        op: impl FnOnce(&mut MutationRun) -> R,
    ) -> Option<R> {
        if self.epoch == epoch {
            return None;
        }
        self.epoch = epoch;
        Some(op(self))
    }

    /// Reset for reuse by the pool
    pub(crate) fn recycle(&mut self) {
        self.storage.clear();
        self.epoch = Epoch::UNSTAMPED;
    }

    pub(crate) fn storage_mut(&mut self) -> &mut RunStorage {
        &mut self.storage
    }
}

impl Clone for MutationRun {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            epoch: Epoch::UNSTAMPED,
        }
    }
}

impl Index<usize> for MutationRun {
    type Output = MutationIndex;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl IndexMut<usize> for MutationRun {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.as_mut_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MutationRun {
    type Item = &'a MutationIndex;
    type IntoIter = std::slice::Iter<'a, MutationIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
