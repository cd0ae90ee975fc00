//! Ordered insertion and stack policy
//!
//! Runs produced through these methods are sorted ascending by the position
//! of the mutation each handle refers to. Positions are resolved through the
//! arena; the run itself only stores handles.
//!
//! Insertion scans backward from the tail. Most new mutations land at or near
//! the end of a run, and the scan is cheaper than a binary search on the
//! short runs that dominate a population.

use crate::error::RunError;
use crate::run::MutationRun;
use mutrun_types::{MutationArena, MutationIndex, MutationType, Position, StackPolicy};

impl MutationRun {
    /// Slot where a mutation at `position` belongs: after every handle whose
    /// position is not greater
    fn sorted_slot<A: MutationArena + ?Sized>(&self, position: Position, arena: &A) -> usize {
        let handles = self.as_slice();
        let mut slot = handles.len();

        while slot > 0 && arena.position(handles[slot - 1]) > position {
            slot -= 1;
        }
        slot
    }

    /// Insert `handle` keeping the run sorted by position
    ///
    /// Mutations at equal positions keep insertion order.
    ///
    /// # Errors
    /// Propagates growth failures; the run is unchanged on error.
    pub fn insert_sorted<A: MutationArena + ?Sized>(
        &mut self,
        handle: MutationIndex,
        arena: &A,
    ) -> Result<(), RunError> {
        let position = arena.position(handle);
        let slot = self.sorted_slot(position, arena);

        if slot == self.len() {
            self.push(handle)
        } else {
            self.storage_mut().insert(slot, handle)
        }
    }

    /// Insert `handle` in sorted order unless it is already present
    ///
    /// Returns `false`, leaving the run untouched, when the same handle is
    /// already in the run.
    ///
    /// # Errors
    /// Propagates growth failures; the run is unchanged on error.
    pub fn insert_sorted_unique<A: MutationArena + ?Sized>(
        &mut self,
        handle: MutationIndex,
        arena: &A,
    ) -> Result<bool, RunError> {
        let position = arena.position(handle);
        let slot = self.sorted_slot(position, arena);

        // an identical handle has an identical position, so it can only sit
        // in the equal-position block just before `slot`
        let duplicate = self.as_slice()[..slot]
            .iter()
            .rev()
            .take_while(|&&existing| arena.position(existing) == position)
            .any(|&existing| existing == handle);

        if duplicate {
            return Ok(false);
        }

        if slot == self.len() {
            self.push(handle)?;
        } else {
            self.storage_mut().insert(slot, handle)?;
        }
        Ok(true)
    }

    /// Decide whether a new mutation of `mutation_type` may join this run
    /// at `position`
    ///
    /// - [`StackPolicy::Stack`] always admits.
    /// - [`StackPolicy::KeepFirst`] rejects if a mutation of the same stack
    ///   group already sits at `position`.
    /// - [`StackPolicy::KeepLast`] removes mutations of the same stack group
    ///   at `position`, then admits.
    ///
    /// Rejection is an ordinary outcome; callers skip the insertion.
    pub fn admit_for_stack_policy<A: MutationArena + ?Sized>(
        &mut self,
        position: Position,
        mutation_type: &MutationType,
        arena: &A,
    ) -> bool {
        match mutation_type.stack_policy {
            StackPolicy::Stack => true,
            policy => self.enforce_stack_policy(position, mutation_type, policy, arena),
        }
    }

    fn enforce_stack_policy<A: MutationArena + ?Sized>(
        &mut self,
        position: Position,
        mutation_type: &MutationType,
        policy: StackPolicy,
        arena: &A,
    ) -> bool {
        let conflicts = |handle: MutationIndex| {
            arena.position(handle) == position
                && arena.mutation_type(handle).stacks_with(mutation_type)
        };

        match policy {
            StackPolicy::Stack => true,
            StackPolicy::KeepFirst => !self.iter().any(|&handle| conflicts(handle)),
            StackPolicy::KeepLast => {
                if self.iter().any(|&handle| conflicts(handle)) {
                    self.retain(|handle| !conflicts(handle));
                }
                true
            }
        }
    }

    /// Whether handles are non-decreasing by position
    #[must_use]
    pub fn is_sorted_by_position<A: MutationArena + ?Sized>(&self, arena: &A) -> bool {
        self.as_slice()
            .windows(2)
            .all(|pair| arena.position(pair[0]) <= arena.position(pair[1]))
    }
}
