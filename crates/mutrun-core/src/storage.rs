//! Backing storage for mutation runs
//!
//! [`RunStorage`] keeps up to [`INLINE_CAPACITY`] handles inline and spills to
//! a heap buffer beyond that. Capacity only ever moves along the
//! [`GrowthPolicy`] sequence; nothing here shrinks the buffer, so a run that
//! returns to the pool keeps its allocation for the next user.

use crate::error::RunError;
use crate::growth::{GrowthPolicy, INLINE_CAPACITY};
use mutrun_types::MutationIndex;
use smallvec::{CollectionAllocErr, SmallVec};

/// Inline-then-heap handle buffer with policy-driven growth
#[derive(Debug, Default)]
pub struct RunStorage {
    items: SmallVec<[MutationIndex; INLINE_CAPACITY]>,
    policy: GrowthPolicy,
}

impl RunStorage {
    /// Create empty storage using the inline buffer
    #[inline]
    #[must_use]
    pub fn new(policy: GrowthPolicy) -> Self {
        Self {
            items: SmallVec::new(),
            policy,
        }
    }

    /// Number of stored handles
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slots available without growing
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Whether the handles live in a heap buffer
    #[inline]
    #[must_use]
    pub fn is_spilled(&self) -> bool {
        self.items.spilled()
    }

    /// Growth policy in effect
    #[inline]
    #[must_use]
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Stored handles
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[MutationIndex] {
        &self.items
    }

    /// Stored handles, mutably
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [MutationIndex] {
        &mut self.items
    }

    /// Ensure room for `additional` more handles
    ///
    /// # Errors
    /// Returns [`RunError::CapacityOverflow`] or [`RunError::AllocationFailed`].
    pub fn reserve(&mut self, additional: usize) -> Result<(), RunError> {
        let len = self.items.len();
        let required = len
            .checked_add(additional)
            .ok_or(RunError::CapacityOverflow { current: len })?;
        let capacity = self.items.capacity();

        if required <= capacity {
            return Ok(());
        }

        let target = self
            .policy
            .capacity_for(capacity, self.items.spilled(), required)?;
        self.grow_to(target)
    }

    /// Grow to exactly `target` slots
    fn grow_to(&mut self, target: usize) -> Result<(), RunError> {
        let from = self.items.capacity();
        let spilling = !self.items.spilled();

        self.items
            .try_reserve_exact(target - self.items.len())
            .map_err(|err| match err {
                CollectionAllocErr::CapacityOverflow => {
                    RunError::CapacityOverflow { current: from }
                }
                CollectionAllocErr::AllocErr { .. } => {
                    RunError::AllocationFailed { requested: target }
                }
            })?;

        if spilling {
            tracing::trace!(from, to = target, "run storage spilled to heap");
        } else {
            tracing::trace!(from, to = target, "run storage grew");
        }
        Ok(())
    }

    /// Append one handle
    ///
    /// # Errors
    /// Propagates growth failures; the storage is unchanged on error.
    #[inline]
    pub fn push(&mut self, handle: MutationIndex) -> Result<(), RunError> {
        self.reserve(1)?;
        self.items.push(handle);
        Ok(())
    }

    /// Append a slice of handles in one pass
    ///
    /// # Errors
    /// Propagates growth failures; the storage is unchanged on error.
    pub fn extend_from_slice(&mut self, handles: &[MutationIndex]) -> Result<(), RunError> {
        self.reserve(handles.len())?;
        self.items.extend_from_slice(handles);
        Ok(())
    }

    /// Insert a handle at `at`, shifting the tail up
    ///
    /// # Errors
    /// Propagates growth failures; the storage is unchanged on error.
    pub fn insert(&mut self, at: usize, handle: MutationIndex) -> Result<(), RunError> {
        if at > self.items.len() {
            return Err(RunError::IndexOutOfBounds {
                index: at,
                len: self.items.len(),
            });
        }
        self.reserve(1)?;
        self.items.insert(at, handle);
        Ok(())
    }

    /// Overwrite contents with `source`
    ///
    /// When growth is needed the new capacity matches the source's capacity,
    /// so clones of grown runs do not walk the growth sequence step by step.
    ///
    /// # Errors
    /// Propagates growth failures; the storage is unchanged on error.
    pub fn copy_from(&mut self, source: &RunStorage) -> Result<(), RunError> {
        let needed = source.len();
        if needed > self.items.capacity() {
            let target = source.capacity().max(needed);
            self.items.clear();
            self.grow_to(target)?;
        }
        self.items.clear();
        self.items.extend_from_slice(source.as_slice());
        Ok(())
    }

    /// Remove the last handle
    #[inline]
    pub fn pop(&mut self) -> Option<MutationIndex> {
        self.items.pop()
    }

    /// Shorten to `len` handles; no-op if already shorter
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Remove all handles, keeping capacity
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Keep only handles matching `keep`, preserving order
    #[inline]
    pub fn retain(&mut self, mut keep: impl FnMut(MutationIndex) -> bool) {
        self.items.retain(|handle| keep(*handle));
    }
}

impl Clone for RunStorage {
    /// Copy with the source's capacity, keeping the copy on the growth sequence
    fn clone(&self) -> Self {
        let mut items = SmallVec::with_capacity(self.items.capacity());
        items.extend_from_slice(&self.items);
        Self {
            items,
            policy: self.policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles(raw: &[u32]) -> Vec<MutationIndex> {
        raw.iter().copied().map(MutationIndex::new).collect()
    }

    #[test]
    fn clone_keeps_source_capacity() {
        let mut storage = RunStorage::new(GrowthPolicy::default());
        storage.extend_from_slice(&handles(&(0..33).collect::<Vec<_>>())).unwrap();
        assert_eq!(storage.capacity(), 48);

        let copy = storage.clone();
        assert_eq!(copy.capacity(), 48);
        assert_eq!(copy.as_slice(), storage.as_slice());
    }

    #[test]
    fn clone_of_inline_storage_stays_inline() {
        let mut storage = RunStorage::new(GrowthPolicy::default());
        storage.push(MutationIndex::new(1)).unwrap();

        let copy = storage.clone();
        assert!(!copy.is_spilled());
        assert_eq!(copy.capacity(), INLINE_CAPACITY);
    }

    #[test]
    fn starts_inline() {
        let storage = RunStorage::new(GrowthPolicy::default());
        assert_eq!(storage.len(), 0);
        assert_eq!(storage.capacity(), INLINE_CAPACITY);
        assert!(!storage.is_spilled());
    }

    #[test]
    fn fifth_push_doubles_capacity() {
        let mut storage = RunStorage::new(GrowthPolicy::default());
        for raw in 0..4 {
            storage.push(MutationIndex::new(raw)).unwrap();
        }
        assert_eq!(storage.capacity(), 4);
        assert!(!storage.is_spilled());

        storage.push(MutationIndex::new(4)).unwrap();
        assert_eq!(storage.len(), 5);
        assert_eq!(storage.capacity(), 8);
        assert!(storage.is_spilled());
    }

    #[test]
    fn push_follows_linear_phase() {
        let mut storage = RunStorage::new(GrowthPolicy::default());
        for raw in 0..33 {
            storage.push(MutationIndex::new(raw)).unwrap();
        }
        assert_eq!(storage.capacity(), 48);
    }

    #[test]
    fn bulk_append_advances_policy_until_sufficient() {
        let mut storage = RunStorage::new(GrowthPolicy::default());
        let source: Vec<_> = (0..20).map(MutationIndex::new).collect();
        storage.extend_from_slice(&source).unwrap();
        assert_eq!(storage.capacity(), 32);
        assert_eq!(storage.as_slice(), source.as_slice());
    }

    #[test]
    fn insert_shifts_tail() {
        let mut storage = RunStorage::new(GrowthPolicy::default());
        storage.extend_from_slice(&handles(&[1, 3])).unwrap();
        storage.insert(1, MutationIndex::new(2)).unwrap();
        assert_eq!(storage.as_slice(), handles(&[1, 2, 3]).as_slice());
    }

    #[test]
    fn insert_past_end_is_rejected() {
        let mut storage = RunStorage::new(GrowthPolicy::default());
        let result = storage.insert(1, MutationIndex::new(0));
        assert_eq!(result, Err(RunError::IndexOutOfBounds { index: 1, len: 0 }));
    }

    #[test]
    fn copy_from_adopts_source_capacity() {
        let mut source = RunStorage::new(GrowthPolicy::default());
        for raw in 0..40 {
            source.push(MutationIndex::new(raw)).unwrap();
        }
        let mut target = RunStorage::new(GrowthPolicy::default());
        target.push(MutationIndex::new(99)).unwrap();

        target.copy_from(&source).unwrap();
        assert_eq!(target.as_slice(), source.as_slice());
        assert_eq!(target.capacity(), source.capacity());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut storage = RunStorage::new(GrowthPolicy::default());
        for raw in 0..10 {
            storage.push(MutationIndex::new(raw)).unwrap();
        }
        let capacity = storage.capacity();
        storage.clear();
        assert!(storage.is_empty());
        assert_eq!(storage.capacity(), capacity);
    }

    #[test]
    fn retain_preserves_order() {
        let mut storage = RunStorage::new(GrowthPolicy::default());
        storage
            .extend_from_slice(&handles(&[1, 2, 3, 4, 5, 6]))
            .unwrap();
        storage.retain(|h| h.get() % 2 == 0);
        assert_eq!(storage.as_slice(), handles(&[2, 4, 6]).as_slice());
    }
}
