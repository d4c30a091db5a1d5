//! Pool-specific error types.

use std::error::Error;
use std::fmt;

use crate::pool::Pool;

/// Recoverable failures of pool operations.
///
/// None of these leave the pool in a modified state: a failed call is
/// observably a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// No free span large enough for the request.
    CapacityExhausted {
        /// Number of bytes requested.
        requested: usize,
        /// Total free bytes in the pool (possibly fragmented).
        available: usize,
    },
    /// The handle does not name the start of a live region.
    UnknownHandle {
        /// The offset carried by the rejected handle.
        offset: usize,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExhausted {
                requested,
                available,
            } => {
                write!(
                    f,
                    "pool capacity exhausted: requested {requested} bytes, {available} bytes free"
                )
            }
            Self::UnknownHandle { offset } => {
                write!(f, "no live region starts at offset {offset}")
            }
        }
    }
}

impl Error for PoolError {}

/// Errors detected by [`PoolConfig::validate()`](crate::PoolConfig::validate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Capacity is zero.
    ZeroCapacity,
    /// Capacity does not fit in the address space of an `isize`.
    CapacityOverflow {
        /// The configured capacity.
        capacity: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "pool capacity must be at least 1 byte"),
            Self::CapacityOverflow { capacity } => {
                write!(f, "pool capacity {capacity} exceeds isize::MAX")
            }
        }
    }
}

impl Error for ConfigError {}

/// Returned by [`Pool::destroy()`] when regions are still live.
///
/// Carries the untouched pool back to the caller so the remaining regions
/// can be freed and destruction retried.
pub struct DestroyError {
    live: usize,
    pool: Pool,
}

impl DestroyError {
    pub(crate) fn new(pool: Pool) -> Self {
        Self {
            live: pool.live_count(),
            pool,
        }
    }

    /// Number of regions that were still live.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Recover the pool.
    pub fn into_pool(self) -> Pool {
        self.pool
    }
}

impl fmt::Debug for DestroyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestroyError")
            .field("live", &self.live)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for DestroyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool is busy: {} region(s) still live", self.live)
    }
}

impl Error for DestroyError {}
