//! Mutation arena contract
//!
//! Runs resolve their handles through [`MutationArena`]. The arena owns the
//! mutation records; a run only ever stores [`MutationIndex`] values.

use crate::index::{MutationIndex, Position};
use crate::mutation_type::MutationType;

/// Lookup contract for the table of mutation records
///
/// # Contract
/// - Every handle stored in a run must resolve while the run is in use
/// - `position` and `mutation_type` must be stable for a live handle
/// - Implementations may panic on a handle they never issued
pub trait MutationArena {
    /// Chromosome position of the mutation
    fn position(&self, index: MutationIndex) -> Position;

    /// Type descriptor of the mutation
    fn mutation_type(&self, index: MutationIndex) -> &MutationType;

    /// Whether the mutation has fixed and is due for removal from every run
    ///
    /// Default implementation reports nothing as fixed.
    fn is_fixed(&self, _index: MutationIndex) -> bool {
        false
    }
}

impl<A: MutationArena + ?Sized> MutationArena for &A {
    #[inline]
    fn position(&self, index: MutationIndex) -> Position {
        (**self).position(index)
    }

    #[inline]
    fn mutation_type(&self, index: MutationIndex) -> &MutationType {
        (**self).mutation_type(index)
    }

    #[inline]
    fn is_fixed(&self, index: MutationIndex) -> bool {
        (**self).is_fixed(index)
    }
}
