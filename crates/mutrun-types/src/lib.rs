//! Mutation Run Types
//!
//! Foundation types shared between mutation runs and the simulator that owns
//! the mutation records they point into.
//!
//! # Core Concepts
//!
//! - [`MutationIndex`]: 32-bit handle into an external mutation arena
//! - [`Position`]: chromosome position in base pairs
//! - [`MutationType`]: per-type descriptor carrying a [`StackPolicy`]
//! - [`MutationArena`]: lookup contract a run uses to resolve handles
//!
//! # Example
//!
//! ```rust
//! use mutrun_types::{MutationIndex, MutationType, MutationTypeId, StackPolicy};
//!
//! let handle = MutationIndex::new(7);
//! assert_eq!(handle.get(), 7);
//!
//! let m1 = MutationType::new(MutationTypeId::new(1)).with_stack_policy(StackPolicy::KeepFirst);
//! assert_eq!(m1.stack_group, 1);
//! ```

#![warn(unreachable_pub)]

mod arena;
mod index;
mod mutation_type;

// Re-exports
pub use arena::MutationArena;
pub use index::{MutationIndex, Position};
pub use mutation_type::{MutationType, MutationTypeId, PolicyParseError, StackPolicy};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
