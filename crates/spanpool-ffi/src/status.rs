//! C-compatible status codes.
//!
//! [`PoolStatus`] is a `repr(i32)` enum covering every failure the C API
//! can report. The classic `pool_*` entry points collapse these into a null
//! pointer or `false`; the `spanpool_*` entry points return them directly.

use spanpool::PoolError;

/// Status code returned by the `spanpool_*` functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolStatus {
    /// Success.
    Ok = 0,
    /// Address does not name the start of a live region.
    UnknownRegion = -1,
    /// No free span large enough for the request.
    CapacityExhausted = -2,
    /// Regions are still live.
    Busy = -3,
    /// An argument is null, non-positive, or otherwise invalid.
    InvalidArgument = -4,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&PoolError> for PoolStatus {
    fn from(e: &PoolError) -> Self {
        match e {
            PoolError::CapacityExhausted { .. } => PoolStatus::CapacityExhausted,
            PoolError::UnknownHandle { .. } => PoolStatus::UnknownRegion,
        }
    }
}
