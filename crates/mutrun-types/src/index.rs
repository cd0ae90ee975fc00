//! Mutation handles
//!
//! Provides [`MutationIndex`], the compact handle stored in every mutation
//! run. Runs never hold mutation records directly; they hold indices into an
//! arena owned elsewhere.

use std::fmt::{self, Display, Formatter};

/// Chromosome position in base pairs
pub type Position = i32;

/// A 32-bit handle into an external mutation arena
///
/// Half the size of a pointer on 64-bit targets. Runs are arrays of these,
/// so the element size dominates the memory footprint of a population.
/// Immutable and cheap to copy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MutationIndex(u32);

impl MutationIndex {
    /// Create a handle from its raw arena slot
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw arena slot
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Arena slot as a `usize`, for indexing arena storage
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for MutationIndex {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<MutationIndex> for u32 {
    fn from(index: MutationIndex) -> Self {
        index.0
    }
}

impl Display for MutationIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "mut#{}", self.0)
    }
}
