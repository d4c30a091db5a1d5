//! Pool configuration parameters.

use crate::error::ConfigError;

/// Configuration for a [`Pool`](crate::Pool).
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Size of the backing buffer in bytes. Fixed for the pool's lifetime.
    ///
    /// Must be non-zero.
    pub capacity: usize,

    /// Zero-fill each region when it is allocated.
    ///
    /// Default: `false`. Freshly allocated bytes otherwise hold whatever
    /// the previous occupant left behind, and callers must not assume
    /// zeroing. Bytes gained by an in-place resize are not touched either way.
    pub zero_on_alloc: bool,
}

impl PoolConfig {
    /// Default for [`zero_on_alloc`](Self::zero_on_alloc).
    pub const DEFAULT_ZERO_ON_ALLOC: bool = false;

    /// Create a config for a pool of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            zero_on_alloc: Self::DEFAULT_ZERO_ON_ALLOC,
        }
    }

    /// Set whether new regions are zero-filled.
    pub fn zero_on_alloc(mut self, zero: bool) -> Self {
        self.zero_on_alloc = zero;
        self
    }

    /// Check all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.capacity > isize::MAX as usize {
            return Err(ConfigError::CapacityOverflow {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let config = PoolConfig::new(4096);
        assert_eq!(config.capacity, 4096);
        assert!(!config.zero_on_alloc);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(
            PoolConfig::new(0).validate(),
            Err(ConfigError::ZeroCapacity)
        );
    }

    #[test]
    fn oversized_capacity_rejected() {
        let config = PoolConfig::new(usize::MAX);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CapacityOverflow { .. })
        ));
    }

    #[test]
    fn builder_sets_zeroing() {
        let config = PoolConfig::new(8).zero_on_alloc(true);
        assert!(config.zero_on_alloc);
    }
}
