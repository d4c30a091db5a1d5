//! Span handles and read-only region views.
//!
//! A [`SpanHandle`] identifies a live region by its start offset in the
//! pool's buffer. Handles are plain values: they stay valid until the
//! region is freed or relocated by a resize, after which the pool rejects
//! them (or, if a later allocation happens to start at the same offset,
//! resolves them to that newer region).

use std::fmt;

/// Opaque handle to a live region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct SpanHandle(usize);

impl SpanHandle {
    pub(crate) fn new(offset: usize) -> Self {
        Self(offset)
    }

    /// Byte offset of the region's first byte within the pool buffer.
    pub fn offset(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SpanHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpanHandle(off={})", self.0)
    }
}

/// Snapshot of one active region, as yielded by [`Pool::regions()`](crate::Pool::regions).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionInfo {
    /// First occupied byte.
    pub offset: usize,
    /// Occupied length in bytes (always at least 1).
    pub len: usize,
    /// Free bytes between this region's end and the next region (or buffer end).
    pub trailing_gap: usize,
}

impl RegionInfo {
    /// One past the last occupied byte.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Handle naming this region.
    pub fn handle(&self) -> SpanHandle {
        SpanHandle::new(self.offset)
    }
}

/// One free span, as yielded by [`Pool::gaps()`](crate::Pool::gaps).
///
/// Gaps are reported in the same shape as the available report: the leading
/// gap (if non-zero) followed by every region's trailing gap, including
/// zero-length ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GapInfo {
    /// First free byte.
    pub offset: usize,
    /// Free length in bytes.
    pub len: usize,
}
