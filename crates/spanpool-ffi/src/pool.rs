//! Pool lifecycle and allocation FFI.
//!
//! A `SpanPool*` is a leaked `Box` owning one [`Pool`]. Region addresses
//! handed to C are pointers into the pool's buffer; they are translated
//! back to handles by offset on the way in.

use std::ffi::{c_char, c_int};
use std::ptr;

use spanpool::Pool;

use crate::status::PoolStatus;

/// Opaque pool handle for C callers.
pub struct SpanPool {
    inner: Pool,
}

/// Point-in-time pool counters, filled by [`spanpool_stats`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpanPoolStats {
    /// Size of the backing buffer in bytes.
    pub capacity: usize,
    /// Free bytes across all gaps.
    pub available: usize,
    /// Free bytes in front of the first region.
    pub leading_gap: usize,
    /// Largest single free span.
    pub largest_gap: usize,
    /// Number of live regions.
    pub live: usize,
}

/// Borrow the pool behind a C pointer.
#[allow(unsafe_code)]
fn pool_mut<'a>(p: *mut SpanPool) -> Option<&'a mut Pool> {
    // SAFETY: non-null pointers were produced by `pool_create` and not yet
    // destroyed, per caller contract; no other reference is live during the call.
    unsafe { p.as_mut() }.map(|sp| &mut sp.inner)
}

fn region_ptr(pool: &mut Pool, offset: usize) -> *mut c_char {
    pool.base_ptr().wrapping_add(offset).cast::<c_char>()
}

/// Create a pool with a `size`-byte buffer.
///
/// Returns null if `size` is not positive.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pool_create(size: c_int) -> *mut SpanPool {
    ffi_guard!(ptr::null_mut(), {
        if size <= 0 {
            tracing::debug!(size, "pool_create: non-positive size");
            return ptr::null_mut();
        }
        let inner = Pool::new(size as usize);
        Box::into_raw(Box::new(SpanPool { inner }))
    })
}

/// Destroy a pool. Fails (returns `false`, pool untouched) while regions
/// are live or if `p` is null.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pool_destroy(p: *mut SpanPool) -> bool {
    ffi_guard!(false, {
        match pool_mut(p) {
            Some(pool) if pool.is_empty() => {}
            _ => return false,
        }
        // SAFETY: `p` came from `Box::into_raw` in `pool_create` and is
        // being destroyed exactly once here.
        let owned = unsafe { Box::from_raw(p) };
        owned.inner.destroy().is_ok()
    })
}

/// Allocate `size` bytes. Returns null when no free span fits or the
/// arguments are invalid.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pool_alloc(p: *mut SpanPool, size: c_int) -> *mut c_char {
    ffi_guard!(ptr::null_mut(), {
        let Some(pool) = pool_mut(p) else {
            return ptr::null_mut();
        };
        if size <= 0 {
            return ptr::null_mut();
        }
        match pool.allocate(size as usize) {
            Ok(h) => region_ptr(pool, h.offset()),
            Err(_) => ptr::null_mut(),
        }
    })
}

/// Free the region starting at `addr`. Returns `false` if `addr` does not
/// start a live region of this pool.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pool_free(p: *mut SpanPool, addr: *mut c_char) -> bool {
    ffi_guard!(false, {
        let Some(pool) = pool_mut(p) else {
            return false;
        };
        let Some(h) = pool.handle_from_ptr(addr.cast::<u8>()) else {
            return false;
        };
        pool.free(h).is_ok()
    })
}

/// Resize the region starting at `addr` to `size` bytes.
///
/// Returns the region's (possibly new) address, or null on failure, in
/// which case the original region is untouched.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pool_realloc(p: *mut SpanPool, addr: *mut c_char, size: c_int) -> *mut c_char {
    ffi_guard!(ptr::null_mut(), {
        let Some(pool) = pool_mut(p) else {
            return ptr::null_mut();
        };
        if size <= 0 {
            return ptr::null_mut();
        }
        let Some(h) = pool.handle_from_ptr(addr.cast::<u8>()) else {
            return ptr::null_mut();
        };
        match pool.resize(h, size as usize) {
            Ok(h) => region_ptr(pool, h.offset()),
            Err(_) => ptr::null_mut(),
        }
    })
}

/// Print the live regions to stdout, e.g. `active: 0 [30], 30 [20]`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pool_print_active(p: *mut SpanPool) {
    ffi_guard!((), {
        if let Some(pool) = pool_mut(p) {
            println!("{}", pool.active_report());
        }
    })
}

/// Print the free spans to stdout, e.g. `available: 0 [30], 50 [50]`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pool_print_available(p: *mut SpanPool) {
    ffi_guard!((), {
        if let Some(pool) = pool_mut(p) {
            println!("{}", pool.available_report());
        }
    })
}

/// Allocate `size` bytes, writing the region address to `out`.
///
/// Unlike [`pool_alloc`], distinguishes bad arguments from exhaustion.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn spanpool_try_alloc(p: *mut SpanPool, size: usize, out: *mut *mut c_char) -> i32 {
    ffi_guard!(PoolStatus::Panicked as i32, {
        let Some(pool) = pool_mut(p) else {
            return PoolStatus::InvalidArgument as i32;
        };
        if size == 0 || out.is_null() {
            return PoolStatus::InvalidArgument as i32;
        }
        match pool.allocate(size) {
            Ok(h) => {
                let addr = region_ptr(pool, h.offset());
                // SAFETY: `out` is non-null and valid for writes per caller contract.
                unsafe { *out = addr };
                PoolStatus::Ok as i32
            }
            Err(e) => PoolStatus::from(&e) as i32,
        }
    })
}

/// Free the region starting at `addr`, reporting why it failed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn spanpool_try_free(p: *mut SpanPool, addr: *mut c_char) -> i32 {
    ffi_guard!(PoolStatus::Panicked as i32, {
        let Some(pool) = pool_mut(p) else {
            return PoolStatus::InvalidArgument as i32;
        };
        let Some(h) = pool.handle_from_ptr(addr.cast::<u8>()) else {
            return PoolStatus::UnknownRegion as i32;
        };
        match pool.free(h) {
            Ok(()) => PoolStatus::Ok as i32,
            Err(e) => PoolStatus::from(&e) as i32,
        }
    })
}

/// Destroy a pool, returning `Busy` (pool untouched) while regions are live.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn spanpool_try_destroy(p: *mut SpanPool) -> i32 {
    ffi_guard!(PoolStatus::Panicked as i32, {
        let busy = match pool_mut(p) {
            Some(pool) => !pool.is_empty(),
            None => return PoolStatus::InvalidArgument as i32,
        };
        if busy || !pool_destroy(p) {
            return PoolStatus::Busy as i32;
        }
        PoolStatus::Ok as i32
    })
}

/// Fill `out` with the pool's current counters.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn spanpool_stats(p: *mut SpanPool, out: *mut SpanPoolStats) -> i32 {
    ffi_guard!(PoolStatus::Panicked as i32, {
        let Some(pool) = pool_mut(p) else {
            return PoolStatus::InvalidArgument as i32;
        };
        if out.is_null() {
            return PoolStatus::InvalidArgument as i32;
        }
        let stats = SpanPoolStats {
            capacity: pool.capacity(),
            available: pool.available(),
            leading_gap: pool.leading_gap(),
            largest_gap: pool.largest_gap(),
            live: pool.live_count(),
        };
        // SAFETY: `out` is non-null and valid for writes per caller contract.
        unsafe { *out = stats };
        PoolStatus::Ok as i32
    })
}
