//! Test utilities for spanpool development.
//!
//! Provides a structural invariant checker ([`check_invariants`]), a
//! comparable layout snapshot ([`PoolShape`]), and an operation driver
//! ([`Driver`]) that replays [`Op`] scripts while tracking which bytes each
//! live region should hold. [`workload`] has generators for property tests
//! and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod workload;

use smallvec::SmallVec;
use spanpool::{Pool, PoolError, SpanHandle};

pub use workload::{arb_ops, Churn, Op};

/// Verify every structural invariant of the pool's region list.
///
/// Returns a description of the first violation found.
pub fn check_invariants(pool: &Pool) -> Result<(), String> {
    let capacity = pool.capacity();
    let mut cursor = pool.leading_gap();
    let mut used = 0usize;
    let mut gap_sum = pool.leading_gap();

    if pool.is_empty() && pool.leading_gap() != capacity {
        return Err(format!(
            "empty pool has leading gap {} != capacity {capacity}",
            pool.leading_gap()
        ));
    }

    for r in pool.regions() {
        if r.len == 0 {
            return Err(format!("zero-length region at {}", r.offset));
        }
        if r.offset != cursor {
            return Err(format!(
                "region at {} but gaps place it at {cursor}",
                r.offset
            ));
        }
        used += r.len;
        gap_sum += r.trailing_gap;
        cursor = r.end() + r.trailing_gap;
    }

    if cursor != capacity {
        return Err(format!("layout ends at {cursor}, capacity is {capacity}"));
    }
    if used + pool.available() != capacity {
        return Err(format!(
            "used {used} + available {} != capacity {capacity}",
            pool.available()
        ));
    }
    if gap_sum != pool.available() {
        return Err(format!(
            "gaps sum to {gap_sum}, available is {}",
            pool.available()
        ));
    }
    if used != pool.used() {
        return Err(format!("regions cover {used}, pool reports {}", pool.used()));
    }
    Ok(())
}

/// Panic with a readable message if [`check_invariants`] fails.
#[track_caller]
pub fn assert_consistent(pool: &Pool) {
    if let Err(msg) = check_invariants(pool) {
        panic!("pool invariant violated: {msg}\n{pool:?}");
    }
}

/// Comparable snapshot of a pool's layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolShape {
    pub leading_gap: usize,
    pub available: usize,
    /// `(offset, len, trailing_gap)` per region, in address order.
    pub regions: SmallVec<[(usize, usize, usize); 8]>,
}

impl PoolShape {
    pub fn capture(pool: &Pool) -> Self {
        Self {
            leading_gap: pool.leading_gap(),
            available: pool.available(),
            regions: pool
                .regions()
                .map(|r| (r.offset, r.len, r.trailing_gap))
                .collect(),
        }
    }
}

/// A live allocation tracked by the [`Driver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tracked {
    pub handle: SpanHandle,
    pub len: usize,
    /// Fill byte written across the region at allocation time.
    pub tag: u8,
}

/// Replays operation scripts against a pool, stamping each region with a
/// tag byte and checking that stamps survive every later operation.
///
/// Resizes are checked as they happen: the bytes kept from the old region
/// must still carry its stamp. The first mismatch is held and reported by
/// [`Driver::verify_contents`].
pub struct Driver {
    pub pool: Pool,
    pub live: Vec<Tracked>,
    next_tag: u8,
    lost: Option<String>,
}

impl Driver {
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: Pool::new(capacity),
            live: Vec::new(),
            next_tag: 1,
            lost: None,
        }
    }

    /// Apply one operation. Index-based ops wrap around the live set and
    /// are skipped when nothing is live.
    pub fn apply(&mut self, op: Op) -> Result<(), PoolError> {
        match op {
            Op::Alloc(size) => {
                let handle = self.pool.allocate(size)?;
                let tag = self.take_tag();
                self.pool
                    .bytes_mut(handle)
                    .expect("fresh handle is live")
                    .fill(tag);
                self.live.push(Tracked {
                    handle,
                    len: size,
                    tag,
                });
            }
            Op::Free(i) => {
                if self.live.is_empty() {
                    return Ok(());
                }
                let t = self.live.swap_remove(i % self.live.len());
                self.pool.free(t.handle)?;
            }
            Op::Resize(i, new_size) => {
                if self.live.is_empty() {
                    return Ok(());
                }
                let i = i % self.live.len();
                let t = self.live[i];
                let handle = self.pool.resize(t.handle, new_size)?;
                let keep = t.len.min(new_size);
                let bytes = self.pool.bytes_mut(handle).expect("resized handle is live");
                if let Some(pos) = bytes[..keep].iter().position(|&b| b != t.tag) {
                    self.lost.get_or_insert_with(|| {
                        format!(
                            "resize {} -> {handle} ({} -> {new_size}) lost byte {pos}: {:#04x}, expected tag {:#04x}",
                            t.handle, t.len, bytes[pos], t.tag
                        )
                    });
                }
                // Bytes gained by growth are unspecified.
                bytes[keep..].fill(t.tag);
                self.live[i] = Tracked {
                    handle,
                    len: new_size,
                    tag: t.tag,
                };
            }
        }
        Ok(())
    }

    /// Check that no resize dropped kept bytes, and that every tracked
    /// region is live, has its recorded length and still carries its stamp.
    pub fn verify_contents(&self) -> Result<(), String> {
        if let Some(msg) = &self.lost {
            return Err(msg.clone());
        }
        for t in &self.live {
            let bytes = self
                .pool
                .bytes(t.handle)
                .ok_or_else(|| format!("{} is not live", t.handle))?;
            if bytes.len() != t.len {
                return Err(format!(
                    "{} has len {}, expected {}",
                    t.handle,
                    bytes.len(),
                    t.len
                ));
            }
            if let Some(pos) = bytes.iter().position(|&b| b != t.tag) {
                return Err(format!(
                    "{} byte {pos} is {:#04x}, expected tag {:#04x}",
                    t.handle, bytes[pos], t.tag
                ));
            }
        }
        Ok(())
    }

    /// Free everything still live.
    pub fn drain(&mut self) {
        for t in self.live.drain(..) {
            self.pool
                .free(t.handle)
                .expect("tracked handle is live");
        }
    }

    fn take_tag(&mut self) -> u8 {
        let tag = self.next_tag;
        self.next_tag = self.next_tag.wrapping_add(1).max(1);
        tag
    }
}
