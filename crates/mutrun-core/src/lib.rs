//! Mutation Runs
//!
//! Compact, shareable sequences of mutation handles for forward-time
//! population genetics. Most genomes in a generation descend from, and
//! share, nearly identical mutation content; runs let them share one
//! instance instead of each holding a private list.
//!
//! # Core Concepts
//!
//! - [`MutationRun`]: sorted sequence of [`MutationIndex`] handles with an
//!   inline buffer for short runs and a policy-driven heap buffer beyond it
//! - [`RunPool`]: free list of retired runs that keep their buffers
//! - [`SharedRun`]: owner handle; clone to share, drop to release, and
//!   [`SharedRun::make_mut`] before writing to a shared run
//! - [`RunInterner`] / [`unique_runs`]: collapse identical runs into one
//! - [`Epoch`] / [`sweep`]: batch passes that touch each distinct run once
//!
//! # Example
//!
//! ```rust
//! use mutrun_core::{next_global_epoch, RunPool};
//! use mutrun_types::MutationIndex;
//!
//! let pool = RunPool::new();
//! let mut run = pool.acquire();
//! run.get_mut().push(MutationIndex::new(3)).unwrap();
//!
//! // a second genome inherits the run
//! let mut inherited = run.clone();
//! assert_eq!(run.owners(), 2);
//!
//! // writing to a shared run copies it first
//! inherited.make_mut().unwrap().push(MutationIndex::new(8)).unwrap();
//! assert_eq!(run.borrow().len(), 1);
//! assert_eq!(inherited.borrow().len(), 2);
//!
//! // a batch pass runs once per distinct run
//! let epoch = next_global_epoch();
//! assert!(run.run_if_not_stamped(epoch, |r| r.len()).is_some());
//! assert!(run.run_if_not_stamped(epoch, |r| r.len()).is_none());
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod epoch;
pub mod error;
pub mod growth;
pub mod intern;
pub mod pool;
pub mod run;
pub mod shared;
pub mod storage;

mod dedup;
mod insert;

// Re-exports
pub use config::PoolConfig;
pub use dedup::HASH_STRIDE;
pub use epoch::{next_global_epoch, purge_fixed, sweep, Epoch, EpochCounter, SweepStats};
pub use error::{ConfigError, RunError};
pub use growth::{GrowthPolicy, INLINE_CAPACITY};
pub use intern::{unique_runs, InternStats, RunInterner};
pub use pool::{PoolStats, RunPool};
pub use run::MutationRun;
pub use shared::SharedRun;
pub use storage::RunStorage;

pub use mutrun_types::{
    MutationArena, MutationIndex, MutationType, MutationTypeId, Position, StackPolicy,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with runs
    pub use crate::{
        Epoch, MutationArena, MutationIndex, MutationRun, RunError, RunPool, SharedRun,
        StackPolicy,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Check if the sharing contract is enforced on guarded writes
pub const fn ownership_checked() -> bool {
    cfg!(any(debug_assertions, feature = "strict-debug"))
}
