//! C FFI bindings for the spanpool memory pool.
//!
//! Exposes the classic `pool_*` interface (raw byte pointers in and out,
//! `bool` results, reports printed to stdout) plus a small `spanpool_*`
//! extension that reports [`PoolStatus`] codes. A C header is generated
//! into `include/spanpool.h` at build time.
//!
//! A `SpanPool*` is not synchronised; callers must not use one pool from
//! two threads at once.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body, converting a caught panic into `$fallback`.
///
/// `return` inside the body returns from the guarded closure, so early
/// exits produce the function's result as usual.
macro_rules! ffi_guard {
    ($fallback:expr, $body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!("panic caught at FFI boundary");
                $fallback
            }
        }
    };
}

pub mod pool;
pub mod status;

pub use pool::{SpanPool, SpanPoolStats};
pub use status::PoolStatus;
