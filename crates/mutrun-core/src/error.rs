//! Error types for mutation runs
//!
//! Provides error handling for:
//! - Storage growth failures (allocation refused, capacity overflow)
//! - Sharing-contract violations on the checked mutable path
//! - Out-of-bounds indexed writes
//! - Configuration parsing and validation

/// Errors raised by run storage and ownership operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    /// The allocator refused to provide the requested capacity
    #[error("allocation failed while growing run storage to {requested} slots")]
    AllocationFailed {
        /// Capacity that was asked for
        requested: usize,
    },

    /// The growth policy overflowed `usize`
    #[error("capacity overflow while growing run storage from {current} slots")]
    CapacityOverflow {
        /// Capacity before the failed step
        current: usize,
    },

    /// The run has more than one owner and must be cloned before writing
    #[error("mutation run is shared by {owners} owners and cannot be modified in place")]
    SharedMutation {
        /// Owners at the time of the write
        owners: usize,
    },

    /// Indexed write outside `[0, len)`
    #[error("index {index} out of bounds for run of length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Run length
        len: usize,
    },
}

impl RunError {
    /// Check if error came from the allocator or the growth policy
    #[inline]
    #[must_use]
    pub fn is_allocation(&self) -> bool {
        matches!(
            self,
            Self::AllocationFailed { .. } | Self::CapacityOverflow { .. }
        )
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Growth policy parameters are unusable
    #[error("invalid growth policy: {0}")]
    InvalidGrowthPolicy(String),

    /// Pool parameters are unusable
    #[error("invalid pool configuration: {0}")]
    InvalidPool(String),

    /// TOML document could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
