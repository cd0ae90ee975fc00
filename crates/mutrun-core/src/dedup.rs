//! Structural hashing and equality
//!
//! Used to intern runs: owners whose runs hash and compare equal can be
//! repointed at one shared instance.

use crate::run::MutationRun;
use std::hash::{Hash, Hasher};

/// Elements between sampled handles in [`MutationRun::structural_hash`]
pub const HASH_STRIDE: usize = 4;

impl MutationRun {
    /// Order-sensitive hash of the length and every fourth handle
    ///
    /// Sampling trades collisions for speed. Short runs collide often but
    /// are cheap to compare in full; long runs collide rarely, which is
    /// where skipping the full comparison pays.
    #[must_use]
    pub fn structural_hash(&self) -> u64 {
        self.iter().step_by(HASH_STRIDE).fold(
            self.len() as u64,
            // sdbm
            |hash, handle| {
                u64::from(handle.get())
                    .wrapping_add(hash << 6)
                    .wrapping_add(hash << 16)
                    .wrapping_sub(hash)
            },
        )
    }

    /// True iff both runs hold the same handles in the same order
    #[inline]
    #[must_use]
    pub fn structurally_equal(&self, other: &MutationRun) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl PartialEq for MutationRun {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_equal(other)
    }
}

impl Eq for MutationRun {}

impl Hash for MutationRun {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}
