//! Integration test: end-to-end allocate/free/resize scenarios with
//! structural checks after every step.

use spanpool::{Pool, PoolError};
use spanpool_test_utils::{assert_consistent, PoolShape};

#[test]
fn free_head_then_report() {
    let mut pool = Pool::new(100);
    let a = pool.allocate(30).unwrap();
    assert_eq!(a.offset(), 0);
    let b = pool.allocate(20).unwrap();
    assert_eq!(b.offset(), 30);
    pool.free(a).unwrap();
    assert_consistent(&pool);

    assert_eq!(pool.leading_gap(), 30);
    assert_eq!(pool.active_report().to_string(), "active: 30 [20]");
    assert_eq!(
        pool.available_report().to_string(),
        "available: 0 [30], 50 [50]"
    );
}

#[test]
fn oversized_request_fails_cleanly() {
    let mut pool = Pool::new(10);
    let _ = pool.allocate(5).unwrap();
    let before = PoolShape::capture(&pool);
    assert!(matches!(
        pool.allocate(10),
        Err(PoolError::CapacityExhausted {
            requested: 10,
            available: 5
        })
    ));
    assert_eq!(PoolShape::capture(&pool), before);
}

#[test]
fn grow_within_trailing_gap_stays_put() {
    let mut pool = Pool::new(20);
    let h = pool.allocate(10).unwrap();
    assert_eq!(h.offset(), 0);
    let r = pool.resize(h, 15).unwrap();
    assert_eq!(r, h);
    let region = pool.regions().next().unwrap();
    assert_eq!(region.len, 15);
    assert_eq!(region.trailing_gap, 5);
    assert_consistent(&pool);
}

#[test]
fn allocate_then_free_restores_shape_at_head() {
    let mut pool = Pool::new(64);
    let before = PoolShape::capture(&pool);
    let h = pool.allocate(16).unwrap();
    pool.free(h).unwrap();
    assert_eq!(PoolShape::capture(&pool), before);
}

#[test]
fn allocate_then_free_restores_shape_behind_a_region() {
    // Regression: freeing a non-head region must hand its trailing gap back
    // to the previous region as well, or the tail space is lost.
    let mut pool = Pool::new(64);
    let _ = pool.allocate(8).unwrap();
    let before = PoolShape::capture(&pool);
    let h = pool.allocate(16).unwrap();
    assert_eq!(h.offset(), 8);
    pool.free(h).unwrap();
    assert_eq!(PoolShape::capture(&pool), before);
    assert_eq!(pool.largest_gap(), 56);
    assert_consistent(&pool);
}

#[test]
fn allocate_then_free_restores_shape_in_middle_gap() {
    let mut pool = Pool::new(40);
    let a = pool.allocate(10).unwrap();
    let b = pool.allocate(10).unwrap();
    let _ = pool.allocate(10).unwrap();
    pool.free(b).unwrap();
    let before = PoolShape::capture(&pool);
    let c = pool.allocate(4).unwrap();
    assert_eq!(c.offset(), 10);
    pool.free(c).unwrap();
    assert_eq!(PoolShape::capture(&pool), before);
    assert!(pool.contains(a));
}

#[test]
fn relocation_preserves_leading_bytes() {
    let mut pool = Pool::new(32);
    let a = pool.allocate(6).unwrap();
    let _ = pool.allocate(2).unwrap();
    pool.bytes_mut(a).unwrap().copy_from_slice(b"spanpo");
    let moved = pool.resize(a, 12).unwrap();
    assert_ne!(moved, a);
    assert_eq!(&pool.bytes(moved).unwrap()[..6], b"spanpo");
    assert_eq!(pool.len_of(moved), Some(12));
    assert_eq!(pool.len_of(a), None);
    assert_consistent(&pool);
}

#[test]
fn shrink_then_regrow_in_place() {
    let mut pool = Pool::new(32);
    let a = pool.allocate(16).unwrap();
    let _ = pool.allocate(16).unwrap();
    assert_eq!(pool.resize(a, 4).unwrap(), a);
    assert_eq!(pool.available(), 12);
    assert_eq!(pool.resize(a, 16).unwrap(), a);
    assert_eq!(pool.available(), 0);
    assert_consistent(&pool);
}

#[test]
fn destroy_succeeds_only_when_drained() {
    let mut pool = Pool::new(16);
    let a = pool.allocate(4).unwrap();
    let b = pool.allocate(4).unwrap();

    let err = pool.destroy().unwrap_err();
    assert_eq!(err.live(), 2);
    let mut pool = err.into_pool();
    pool.free(a).unwrap();

    let err = pool.destroy().unwrap_err();
    assert_eq!(err.live(), 1);
    let mut pool = err.into_pool();
    pool.free(b).unwrap();

    assert!(pool.destroy().is_ok());
}

#[test]
fn fill_drain_refill_reuses_whole_buffer() {
    let mut pool = Pool::new(50);
    let handles: Vec<_> = (0..10).map(|_| pool.allocate(5).unwrap()).collect();
    assert_eq!(pool.available(), 0);
    assert_eq!(pool.available_report().to_string(), "available: none");
    for h in handles.iter().rev() {
        pool.free(*h).unwrap();
        assert_consistent(&pool);
    }
    assert_eq!(pool.leading_gap(), 50);
    let whole = pool.allocate(50).unwrap();
    assert_eq!(whole.offset(), 0);
}
