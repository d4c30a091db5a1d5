//! Fixed-capacity first-fit memory pool over a single contiguous buffer.
//!
//! A [`Pool`] owns one byte buffer whose size is chosen at creation and
//! never changes. Variable-sized regions are carved out of it and given
//! back without touching the global allocator per request.
//!
//! # Architecture
//!
//! ```text
//! Pool
//! ├── Box<[u8]>           (backing buffer, fixed capacity)
//! ├── leading_gap         (free bytes before the first region)
//! └── RegionList          (slot table, doubly linked in address order)
//!     └── Region { start, len, trailing_gap, prev, next }
//! ```
//!
//! Every free byte is owned by exactly one gap: the leading gap or the
//! trailing gap of the region in front of it. Allocation is first-fit from
//! the front and never coalesces; freeing merges the region and its trailing
//! gap into the gap in front of it. Resize grows in place when the trailing
//! gap allows and relocates otherwise.
//!
//! # Example
//!
//! ```
//! use spanpool::Pool;
//!
//! let mut pool = Pool::new(100);
//! let a = pool.allocate(30).unwrap();
//! let b = pool.allocate(20).unwrap();
//! assert_eq!((a.offset(), b.offset()), (0, 30));
//!
//! pool.free(a).unwrap();
//! assert_eq!(pool.active_report().to_string(), "active: 30 [20]");
//! assert_eq!(pool.available_report().to_string(), "available: 0 [30], 50 [50]");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handle;
pub mod pool;
mod region;
pub mod report;

// Public re-exports for the primary API surface.
pub use config::PoolConfig;
pub use error::{ConfigError, DestroyError, PoolError};
pub use handle::{GapInfo, RegionInfo, SpanHandle};
pub use pool::Pool;
pub use report::{ActiveReport, AvailableReport};
