//! Two-phase capacity growth
//!
//! Runs start in an inline buffer of [`INLINE_CAPACITY`] handles. The first
//! spill to the heap doubles; later growth keeps doubling until the capacity
//! reaches `doubling_limit`, then adds `linear_step` slots at a time.
//!
//! With the defaults the capacity sequence is `4, 8, 16, 32, 48, 64, 80, ...`.
//! Doubling keeps early, sparse runs from reallocating repeatedly; the linear
//! phase keeps equilibrium-sized runs close to their real length, since these
//! arrays hold most of a population's memory.

use crate::error::{ConfigError, RunError};

/// Handles stored inline before a run spills to the heap
pub const INLINE_CAPACITY: usize = 4;

/// Tunable growth policy for run storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GrowthPolicy {
    /// Capacity below which growth doubles
    pub doubling_limit: u32,

    /// Slots added per growth step once `doubling_limit` is reached
    pub linear_step: u32,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            doubling_limit: 32,
            linear_step: 16,
        }
    }
}

impl GrowthPolicy {
    /// Create a policy
    #[inline]
    #[must_use]
    pub const fn new(doubling_limit: u32, linear_step: u32) -> Self {
        Self {
            doubling_limit,
            linear_step,
        }
    }

    /// Validate parameters
    ///
    /// # Errors
    /// - `linear_step` of zero would never make progress
    /// - `doubling_limit` below [`INLINE_CAPACITY`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.linear_step == 0 {
            return Err(ConfigError::InvalidGrowthPolicy(
                "linear_step must be at least 1".to_string(),
            ));
        }
        if (self.doubling_limit as usize) < INLINE_CAPACITY {
            return Err(ConfigError::InvalidGrowthPolicy(format!(
                "doubling_limit {} is below the inline capacity {INLINE_CAPACITY}",
                self.doubling_limit
            )));
        }
        Ok(())
    }

    /// Capacity after one growth step
    ///
    /// `spilled` is false while the run still uses its inline buffer; the
    /// first step off the inline buffer always doubles.
    #[inline]
    #[must_use]
    pub fn next_capacity(&self, current: usize, spilled: bool) -> Option<usize> {
        if !spilled || current < self.doubling_limit as usize {
            current.max(1).checked_mul(2)
        } else {
            current.checked_add(self.linear_step.max(1) as usize)
        }
    }

    /// Smallest capacity on the growth sequence that holds `required` slots
    ///
    /// # Errors
    /// Returns [`RunError::CapacityOverflow`] if the sequence overflows.
    pub fn capacity_for(
        &self,
        current: usize,
        spilled: bool,
        required: usize,
    ) -> Result<usize, RunError> {
        let mut capacity = current;
        let mut spilled = spilled;

        while capacity < required {
            capacity = self
                .next_capacity(capacity, spilled)
                .ok_or(RunError::CapacityOverflow { current })?;
            spilled = true;
        }

        Ok(capacity)
    }
}
