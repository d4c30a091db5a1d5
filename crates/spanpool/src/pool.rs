//! The fixed-capacity pool and its allocate / free / resize algorithm.
//!
//! [`Pool`] owns one byte buffer of fixed capacity and carves variable-sized
//! regions out of it. Every live region records the free gap that follows
//! it; the gap in front of the first region is tracked separately as the
//! leading gap. Together these always account for every free byte:
//!
//! ```text
//! |<- leading ->|<- region ->|<- trailing ->|<- region ->|<- trailing ->|
//! 0                                                                  capacity
//! ```
//!
//! Placement is first-fit from the front: the leading gap is tried first,
//! then each region's trailing gap in address order. Gaps are coalesced
//! only when a region is freed.

use std::fmt;

use tracing::{debug, trace};

use crate::config::PoolConfig;
use crate::error::{ConfigError, DestroyError, PoolError};
use crate::handle::{GapInfo, RegionInfo, SpanHandle};
use crate::region::{RegionList, SlotIdx};
use crate::report::{ActiveReport, AvailableReport};

/// A fixed-capacity memory pool over one contiguous buffer.
///
/// All mutation takes `&mut self`; the pool does no internal locking.
pub struct Pool {
    /// Backing storage, allocated once at construction.
    buffer: Box<[u8]>,
    /// Bytes not covered by any live region.
    free_total: usize,
    /// Free bytes before the first region (the whole buffer when empty).
    leading_gap: usize,
    regions: RegionList,
    zero_on_alloc: bool,
}

impl Pool {
    /// Create a pool of `capacity` bytes with default settings.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "pool capacity must be non-zero");
        Self::build(PoolConfig::new(capacity))
    }

    /// Create a pool from a validated config.
    pub fn with_config(config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PoolConfig) -> Self {
        let capacity = config.capacity;
        debug!(capacity, zero_on_alloc = config.zero_on_alloc, "pool created");
        Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            free_total: capacity,
            leading_gap: capacity,
            regions: RegionList::new(),
            zero_on_alloc: config.zero_on_alloc,
        }
    }

    /// Release the pool if no regions are live.
    ///
    /// When regions remain, the pool is handed back untouched inside the
    /// error so the caller can free them and try again.
    pub fn destroy(self) -> Result<(), DestroyError> {
        if !self.regions.is_empty() {
            debug!(live = self.regions.len(), "destroy refused: regions still live");
            return Err(DestroyError::new(self));
        }
        debug!(capacity = self.capacity(), "pool destroyed");
        Ok(())
    }

    /// Allocate a region of exactly `size` bytes.
    ///
    /// Placement order: the leading gap (offset 0), then the trailing gap of
    /// each region front to back; the new region occupies the front of the
    /// first gap that fits. On failure the pool is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn allocate(&mut self, size: usize) -> Result<SpanHandle, PoolError> {
        assert!(size > 0, "allocation size must be non-zero");
        if size > self.free_total {
            return Err(self.exhausted(size));
        }

        let start = if self.leading_gap >= size {
            // Also covers the empty pool, where the leading gap is the whole buffer.
            self.regions.push_front(0, size, self.leading_gap - size);
            self.leading_gap = 0;
            0
        } else {
            let found = self
                .regions
                .iter()
                .find(|(_, r)| r.trailing_gap >= size)
                .map(|(idx, r)| (idx, r.end(), r.trailing_gap));
            let Some((after, start, gap)) = found else {
                return Err(self.exhausted(size));
            };
            self.regions.insert_after(after, start, size, gap - size);
            self.regions.get_mut(after).trailing_gap = 0;
            start
        };

        self.free_total -= size;
        if self.zero_on_alloc {
            self.buffer[start..start + size].fill(0);
        }
        trace!(offset = start, size, free = self.free_total, "allocated region");
        Ok(SpanHandle::new(start))
    }

    /// Free the region named by `handle`.
    ///
    /// The freed bytes and the gap that followed the region are merged into
    /// the preceding gap: the previous region's trailing gap, or the leading
    /// gap when the region was first.
    pub fn free(&mut self, handle: SpanHandle) -> Result<(), PoolError> {
        let idx = self.lookup(handle)?;
        self.release(idx);
        Ok(())
    }

    /// Resize the region named by `handle` to `new_size` bytes.
    ///
    /// If `new_size` fits in the region's current length plus its trailing
    /// gap the region is adjusted in place and the same handle comes back.
    /// Otherwise a new region is allocated, the old contents are copied over
    /// and the old region is freed. If that allocation fails the original
    /// region is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `new_size` is zero.
    pub fn resize(&mut self, handle: SpanHandle, new_size: usize) -> Result<SpanHandle, PoolError> {
        assert!(new_size > 0, "resize target must be non-zero");
        let idx = self.lookup(handle)?;
        let region = self.regions.get(idx);
        let (old_start, old_len) = (region.start, region.len);
        let room = region.len + region.trailing_gap;

        if new_size <= room {
            let region = self.regions.get_mut(idx);
            region.len = new_size;
            region.trailing_gap = room - new_size;
            self.free_total = self.free_total + old_len - new_size;
            trace!(offset = old_start, old_len, new_size, "resized in place");
            return Ok(handle);
        }

        let moved = self.allocate(new_size)?;
        let keep = old_len.min(new_size);
        self.buffer
            .copy_within(old_start..old_start + keep, moved.offset());
        // Slot indices are stable across insertion, so `idx` still names the old region.
        self.release(idx);
        debug!(
            from = old_start,
            to = moved.offset(),
            old_len,
            new_size,
            "relocated region"
        );
        Ok(moved)
    }

    /// Borrow the bytes of a live region.
    pub fn bytes(&self, handle: SpanHandle) -> Option<&[u8]> {
        let region = self.regions.get(self.regions.find(handle.offset())?);
        Some(&self.buffer[region.start..region.end()])
    }

    /// Mutably borrow the bytes of a live region.
    pub fn bytes_mut(&mut self, handle: SpanHandle) -> Option<&mut [u8]> {
        let region = *self.regions.get(self.regions.find(handle.offset())?);
        Some(&mut self.buffer[region.start..region.end()])
    }

    /// Whether `handle` names a live region.
    pub fn contains(&self, handle: SpanHandle) -> bool {
        self.regions.find(handle.offset()).is_some()
    }

    /// Length of the live region named by `handle`.
    pub fn len_of(&self, handle: SpanHandle) -> Option<usize> {
        self.regions
            .find(handle.offset())
            .map(|idx| self.regions.get(idx).len)
    }

    /// Total size of the backing buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Free bytes, summed over all gaps.
    pub fn available(&self) -> usize {
        self.free_total
    }

    /// Bytes covered by live regions.
    pub fn used(&self) -> usize {
        self.capacity() - self.free_total
    }

    /// Free bytes in front of the first region.
    pub fn leading_gap(&self) -> usize {
        self.leading_gap
    }

    /// Number of live regions.
    pub fn live_count(&self) -> usize {
        self.regions.len()
    }

    /// Whether no regions are live.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Live regions in address order.
    pub fn regions(&self) -> impl Iterator<Item = RegionInfo> + '_ {
        self.regions.iter().map(|(_, r)| RegionInfo {
            offset: r.start,
            len: r.len,
            trailing_gap: r.trailing_gap,
        })
    }

    /// Free spans in address order: the leading gap when non-zero, then
    /// every region's trailing gap (zero-length ones included).
    pub fn gaps(&self) -> impl Iterator<Item = GapInfo> + '_ {
        let leading = (self.leading_gap != 0).then_some(GapInfo {
            offset: 0,
            len: self.leading_gap,
        });
        leading.into_iter().chain(self.regions.iter().map(|(_, r)| GapInfo {
            offset: r.end(),
            len: r.trailing_gap,
        }))
    }

    /// Size of the largest single free span; the biggest allocation that can succeed.
    pub fn largest_gap(&self) -> usize {
        self.gaps().map(|g| g.len).max().unwrap_or(0)
    }

    /// Textual report of live regions: `offset [len]` entries.
    pub fn active_report(&self) -> ActiveReport<'_> {
        ActiveReport::new(self)
    }

    /// Textual report of free spans: `offset [len]` entries.
    pub fn available_report(&self) -> AvailableReport<'_> {
        AvailableReport::new(self)
    }

    /// Raw pointer to the first byte of the backing buffer.
    ///
    /// Stable for the pool's lifetime; the buffer is never reallocated.
    pub fn base_ptr(&mut self) -> *mut u8 {
        self.buffer.as_mut_ptr()
    }

    /// Translate a pointer into this pool's buffer back to a handle.
    ///
    /// Returns `None` for pointers outside the buffer. The resulting handle
    /// is not checked for liveness; `free` and `resize` do that.
    pub fn handle_from_ptr(&self, ptr: *const u8) -> Option<SpanHandle> {
        let offset = (ptr as usize).checked_sub(self.buffer.as_ptr() as usize)?;
        (offset < self.capacity()).then(|| SpanHandle::new(offset))
    }

    fn lookup(&self, handle: SpanHandle) -> Result<SlotIdx, PoolError> {
        self.regions
            .find(handle.offset())
            .ok_or(PoolError::UnknownHandle {
                offset: handle.offset(),
            })
    }

    fn release(&mut self, idx: SlotIdx) {
        let region = self.regions.unlink(idx);
        self.free_total += region.len;
        let reclaimed = region.len + region.trailing_gap;
        match region.prev {
            Some(prev) => self.regions.get_mut(prev).trailing_gap += reclaimed,
            None => self.leading_gap += reclaimed,
        }
        trace!(
            offset = region.start,
            size = region.len,
            free = self.free_total,
            "freed region"
        );
    }

    fn exhausted(&self, requested: usize) -> PoolError {
        debug!(requested, available = self.free_total, "allocation failed");
        PoolError::CapacityExhausted {
            requested,
            available: self.free_total,
        }
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("capacity", &self.capacity())
            .field("available", &self.free_total)
            .field("leading_gap", &self.leading_gap)
            .field("live", &self.regions.len())
            .finish()
    }
}
