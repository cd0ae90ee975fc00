//! Pool configuration
//!
//! Loaded from TOML or built in code:
//!
//! ```toml
//! max_retained = 4096
//! preallocate = 128
//!
//! [growth]
//! doubling_limit = 64
//! linear_step = 32
//! ```

use crate::error::ConfigError;
use crate::growth::GrowthPolicy;

/// Configuration for a [`RunPool`](crate::RunPool)
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Growth policy given to runs the pool creates
    pub growth: GrowthPolicy,

    /// Upper bound on retired runs kept for reuse; `None` keeps all
    pub max_retained: Option<usize>,

    /// Runs created up front and parked in the free list
    pub preallocate: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            growth: GrowthPolicy::default(),
            max_retained: None,
            preallocate: 0,
        }
    }
}

impl PoolConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With growth policy
    #[inline]
    #[must_use]
    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// With a cap on retained runs
    #[inline]
    #[must_use]
    pub fn with_max_retained(mut self, max: usize) -> Self {
        self.max_retained = Some(max);
        self
    }

    /// With preallocated runs
    #[inline]
    #[must_use]
    pub fn with_preallocate(mut self, count: usize) -> Self {
        self.preallocate = count;
        self
    }

    /// Validate configuration
    ///
    /// # Errors
    /// - Invalid growth policy
    /// - `preallocate` exceeding `max_retained`
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.growth.validate()?;

        if let Some(max) = self.max_retained {
            if self.preallocate > max {
                return Err(ConfigError::InvalidPool(format!(
                    "preallocate {} exceeds max_retained {max}",
                    self.preallocate
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// Returns parse errors and validation failures.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = PoolConfig::from_toml_str("").unwrap();
        assert_eq!(config, PoolConfig::default());
    }

    #[test]
    fn parses_full_document() {
        let config = PoolConfig::from_toml_str(
            r#"
            max_retained = 4096
            preallocate = 128

            [growth]
            doubling_limit = 64
            linear_step = 32
            "#,
        )
        .unwrap();

        assert_eq!(config.max_retained, Some(4096));
        assert_eq!(config.preallocate, 128);
        assert_eq!(config.growth, GrowthPolicy::new(64, 32));
    }

    #[test]
    fn partial_growth_table_keeps_other_default() {
        let config = PoolConfig::from_toml_str("[growth]\nlinear_step = 8\n").unwrap();
        assert_eq!(config.growth, GrowthPolicy::new(32, 8));
    }

    #[test]
    fn rejects_invalid_growth() {
        let result = PoolConfig::from_toml_str("[growth]\nlinear_step = 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidGrowthPolicy(_))));
    }

    #[test]
    fn rejects_preallocate_beyond_cap() {
        let config = PoolConfig::new().with_max_retained(2).with_preallocate(3);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidPool(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        let result = PoolConfig::from_toml_str("max_retained = \"lots\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
