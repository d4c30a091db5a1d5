//! Benchmark profiles for the spanpool memory pool.
//!
//! - [`packed_profile`]: a pool filled front to back, free space only at the tail
//! - [`comb_profile`]: alternating live/freed regions, maximally fragmented
//! - [`churn_profile`]: a pool warmed up by a deterministic mixed workload

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use spanpool::{Pool, SpanHandle};
use spanpool_test_utils::{Churn, Driver};

/// `regions` back-to-back regions of `region_size` bytes followed by
/// `tail` free bytes. A request larger than `region_size` has to walk the
/// whole list before it finds the tail gap.
pub fn packed_profile(regions: usize, region_size: usize, tail: usize) -> (Pool, Vec<SpanHandle>) {
    let mut pool = Pool::new(regions * region_size + tail);
    let handles = (0..regions)
        .map(|_| pool.allocate(region_size).unwrap())
        .collect();
    (pool, handles)
}

/// `2 * teeth` regions of `region_size` bytes with every second one freed,
/// leaving `teeth` gaps of exactly `region_size` bytes.
pub fn comb_profile(teeth: usize, region_size: usize) -> (Pool, Vec<SpanHandle>) {
    let (mut pool, handles) = packed_profile(teeth * 2, region_size, 0);
    let mut kept = Vec::with_capacity(teeth);
    for (i, h) in handles.into_iter().enumerate() {
        if i % 2 == 1 {
            pool.free(h).unwrap();
        } else {
            kept.push(h);
        }
    }
    (pool, kept)
}

/// A driver over a `capacity`-byte pool after `warmup` churn operations.
pub fn churn_profile(capacity: usize, max_size: usize, warmup: usize, seed: u64) -> Driver {
    let mut d = Driver::new(capacity);
    for op in Churn::new(seed, max_size).take(warmup) {
        let _ = d.apply(op);
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_profile_leaves_only_tail() {
        let (pool, handles) = packed_profile(10, 8, 16);
        assert_eq!(handles.len(), 10);
        assert_eq!(pool.available(), 16);
        assert_eq!(pool.largest_gap(), 16);
    }

    #[test]
    fn comb_profile_alternates() {
        let (pool, kept) = comb_profile(4, 8);
        assert_eq!(kept.len(), 4);
        assert_eq!(pool.available(), 32);
        assert_eq!(pool.largest_gap(), 8);
        assert!(pool.regions().all(|r| r.trailing_gap == 8));
    }

    #[test]
    fn churn_profile_is_consistent() {
        let d = churn_profile(1024, 64, 500, 42);
        spanpool_test_utils::assert_consistent(&d.pool);
        d.verify_contents().unwrap();
    }
}
