//! Operation scripts and workload generators.
//!
//! - [`Op`] is one step of a script replayed by [`Driver`](crate::Driver).
//! - [`arb_ops`] is a proptest strategy producing random scripts.
//! - [`Churn`] is a deterministic allocate/free/resize mix for benchmarks.

use proptest::prelude::*;

/// One pool operation. Index arguments select a live allocation modulo the
/// current live count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Allocate this many bytes.
    Alloc(usize),
    /// Free the i-th live allocation.
    Free(usize),
    /// Resize the i-th live allocation to the given size.
    Resize(usize, usize),
}

/// Strategy for a script of up to `max_len` operations with sizes in
/// `1..=max_size`. Allocations are weighted above frees and resizes so
/// scripts build up fragmentation before draining it.
pub fn arb_ops(max_size: usize, max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        3 => (1..=max_size).prop_map(Op::Alloc),
        2 => any::<usize>().prop_map(Op::Free),
        1 => (any::<usize>(), 1..=max_size).prop_map(|(i, n)| Op::Resize(i, n)),
    ];
    prop::collection::vec(op, 0..=max_len)
}

/// Deterministic pseudo-random operation stream.
///
/// A 64-bit LCG keeps benchmarks reproducible without pulling in an RNG.
#[derive(Clone, Debug)]
pub struct Churn {
    state: u64,
    max_size: usize,
}

impl Churn {
    pub fn new(seed: u64, max_size: usize) -> Self {
        assert!(max_size > 0, "max_size must be non-zero");
        Self {
            state: seed,
            max_size,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state >> 33
    }

    fn size(&mut self) -> usize {
        (self.next_u64() as usize % self.max_size) + 1
    }
}

impl Iterator for Churn {
    type Item = Op;

    fn next(&mut self) -> Option<Op> {
        let op = match self.next_u64() % 8 {
            0..=3 => Op::Alloc(self.size()),
            4..=6 => Op::Free(self.next_u64() as usize),
            _ => {
                let i = self.next_u64() as usize;
                Op::Resize(i, self.size())
            }
        };
        Some(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn churn_is_deterministic() {
        let a: Vec<Op> = Churn::new(7, 64).take(100).collect();
        let b: Vec<Op> = Churn::new(7, 64).take(100).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn churn_sizes_stay_in_range() {
        for op in Churn::new(1, 16).take(1000) {
            match op {
                Op::Alloc(n) | Op::Resize(_, n) => assert!((1..=16).contains(&n)),
                Op::Free(_) => {}
            }
        }
    }

    #[test]
    fn churn_mixes_all_kinds() {
        let ops: Vec<Op> = Churn::new(3, 8).take(500).collect();
        assert!(ops.iter().any(|o| matches!(o, Op::Alloc(_))));
        assert!(ops.iter().any(|o| matches!(o, Op::Free(_))));
        assert!(ops.iter().any(|o| matches!(o, Op::Resize(..))));
    }
}
