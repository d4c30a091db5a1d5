//! Integration test: drive the C API the way a C caller would and mirror
//! every call on a native `Pool` to check both agree.

use std::ffi::c_char;
use std::ptr;

use proptest::prelude::*;
use spanpool::Pool;
use spanpool_ffi::pool::{
    pool_alloc, pool_create, pool_destroy, pool_free, pool_realloc, spanpool_stats,
};
use spanpool_ffi::{PoolStatus, SpanPool, SpanPoolStats};

fn stats(p: *mut SpanPool) -> SpanPoolStats {
    let mut s = SpanPoolStats::default();
    assert_eq!(spanpool_stats(p, &mut s), PoolStatus::Ok as i32);
    s
}

#[test]
fn free_head_scenario() {
    let p = pool_create(100);
    let a = pool_alloc(p, 30);
    let b = pool_alloc(p, 20);
    assert!(!a.is_null() && !b.is_null());
    assert!(pool_free(p, a));

    let s = stats(p);
    assert_eq!(s.leading_gap, 30);
    assert_eq!(s.available, 80);
    assert_eq!(s.live, 1);

    assert!(pool_free(p, b));
    assert!(pool_destroy(p));
}

#[test]
fn exhausted_alloc_returns_null() {
    let p = pool_create(10);
    let a = pool_alloc(p, 5);
    assert!(!a.is_null());
    assert!(pool_alloc(p, 10).is_null());
    assert!(pool_free(p, a));
    assert!(pool_destroy(p));
}

#[test]
fn realloc_moves_contents() {
    let p = pool_create(32);
    let a = pool_alloc(p, 4);
    let guard = pool_alloc(p, 4);

    let payload: [c_char; 4] = [1, 2, 3, 4];
    // SAFETY: `a` points at a live 4-byte region of the pool.
    unsafe { ptr::copy_nonoverlapping(payload.as_ptr(), a, 4) };

    let moved = pool_realloc(p, a, 16);
    assert!(!moved.is_null());
    assert_ne!(moved, a);

    let mut copy: [c_char; 4] = [0; 4];
    // SAFETY: `moved` points at a live 16-byte region of the pool.
    unsafe { ptr::copy_nonoverlapping(moved, copy.as_mut_ptr(), 4) };
    assert_eq!(copy, payload);

    assert!(!pool_free(p, a));
    assert!(pool_free(p, moved));
    assert!(pool_free(p, guard));
    assert!(pool_destroy(p));
}

#[test]
fn realloc_in_place_returns_same_address() {
    let p = pool_create(20);
    let a = pool_alloc(p, 10);
    assert_eq!(pool_realloc(p, a, 15), a);
    assert_eq!(pool_realloc(p, a, 3), a);
    assert_eq!(stats(p).available, 17);
    assert!(pool_realloc(p, a, 0).is_null());
    assert!(pool_free(p, a));
    assert!(pool_destroy(p));
}

#[test]
fn destroy_blocked_until_drained() {
    let p = pool_create(8);
    let a = pool_alloc(p, 8);
    assert!(!pool_destroy(p));
    assert_eq!(stats(p).live, 1);
    assert!(pool_free(p, a));
    assert!(pool_destroy(p));
}

#[derive(Clone, Copy, Debug)]
enum Call {
    Alloc(i32),
    Free(usize),
    Realloc(usize, i32),
}

fn arb_calls() -> impl Strategy<Value = Vec<Call>> {
    let call = prop_oneof![
        3 => (1i32..48).prop_map(Call::Alloc),
        2 => any::<usize>().prop_map(Call::Free),
        1 => (any::<usize>(), 1i32..48).prop_map(|(i, n)| Call::Realloc(i, n)),
    ];
    prop::collection::vec(call, 0..120)
}

proptest! {
    #[test]
    fn c_api_matches_native_pool(capacity in 1i32..256, calls in arb_calls()) {
        let p = pool_create(capacity);
        let mut mirror = Pool::new(capacity as usize);
        let mut live: Vec<(*mut c_char, spanpool::SpanHandle)> = Vec::new();

        for call in calls {
            match call {
                Call::Alloc(n) => {
                    let addr = pool_alloc(p, n);
                    let native = mirror.allocate(n as usize);
                    prop_assert_eq!(addr.is_null(), native.is_err());
                    if let Ok(h) = native {
                        live.push((addr, h));
                    }
                }
                Call::Free(i) if !live.is_empty() => {
                    let (addr, h) = live.swap_remove(i % live.len());
                    prop_assert!(pool_free(p, addr));
                    mirror.free(h).unwrap();
                }
                Call::Realloc(i, n) if !live.is_empty() => {
                    let i = i % live.len();
                    let (addr, h) = live[i];
                    let moved = pool_realloc(p, addr, n);
                    let native = mirror.resize(h, n as usize);
                    prop_assert_eq!(moved.is_null(), native.is_err());
                    if let Ok(nh) = native {
                        prop_assert_eq!(moved == addr, nh == h);
                        live[i] = (moved, nh);
                    }
                }
                _ => {}
            }
            let s = stats(p);
            prop_assert_eq!(s.available, mirror.available());
            prop_assert_eq!(s.leading_gap, mirror.leading_gap());
            prop_assert_eq!(s.live, mirror.live_count());
        }

        for (addr, _) in live {
            prop_assert!(pool_free(p, addr));
        }
        prop_assert!(pool_destroy(p));
    }
}
