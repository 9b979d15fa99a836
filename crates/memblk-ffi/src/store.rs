//! Store lifecycle and byte-range operations behind opaque handles.

use std::sync::{Arc, Mutex};

use memblk_core::BlockBackend;
use memblk_store::{BoundedBlockStore, FanoutObserver, MetricsObserver};

use crate::config::configs;
use crate::handle::{HandleKind, Registry};
use crate::status::{status_of, MemblkStatus};

/// A live store plus the counters every store carries.
pub(crate) struct StoreEntry {
    pub store: BoundedBlockStore,
    pub metrics: Arc<MetricsObserver>,
}

static STORES: Mutex<Registry<Arc<StoreEntry>>> =
    Mutex::new(Registry::new(HandleKind::Store));

/// Resolve a handle to its store. The table lock is released before the
/// caller touches the store, so operations on one store never block
/// lifecycle calls on another.
pub(crate) fn get_store(handle: u64) -> Result<Arc<StoreEntry>, MemblkStatus> {
    let table = STORES.lock().map_err(|_| MemblkStatus::InternalError)?;
    table.resolve(handle).ok_or(MemblkStatus::InvalidHandle)
}

macro_rules! resolve {
    ($handle:expr) => {
        match get_store($handle) {
            Ok(entry) => entry,
            Err(status) => return status as i32,
        }
    };
}

// ── FFI functions ───────────────────────────────────────────────

/// Allocate a store from a config builder.
///
/// A null `out` or an unknown config handle leaves any config alive.
/// Once the config is resolved it is consumed, whether or not the store
/// can be allocated.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_store_create(config_handle: u64, out: *mut u64) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return MemblkStatus::InvalidArgument as i32;
        }
        let mut builder = match ffi_lock!(configs()).remove(config_handle) {
            Some(b) => b,
            None => return MemblkStatus::InvalidHandle as i32,
        };

        let metrics = Arc::new(MetricsObserver::new());
        let fanout = builder
            .take_observers()
            .into_iter()
            .fold(FanoutObserver::new().with(metrics.clone()), |f, o| f.with(o));

        let store = match BoundedBlockStore::with_observer(builder.config, Arc::new(fanout)) {
            Ok(s) => s,
            Err(e) => {
                log::error!(target: "memblk::ffi", "store creation failed: {e}");
                return MemblkStatus::from(&e) as i32;
            }
        };
        log::debug!(
            target: "memblk::ffi",
            "created store with {} bytes",
            store.capacity()
        );
        let handle = match ffi_lock!(STORES).insert(Arc::new(StoreEntry { store, metrics })) {
            Some(h) => h,
            None => return MemblkStatus::InternalError as i32,
        };
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = handle };
        MemblkStatus::Ok as i32
    })
}

/// Release a store. Calls already in flight on other threads finish
/// against the old region; later calls see `InvalidHandle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_store_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(STORES).remove(handle) {
            Some(_) => MemblkStatus::Ok as i32,
            None => MemblkStatus::InvalidHandle as i32,
        }
    })
}

/// Copy `len` bytes starting at `offset` into `buf`.
///
/// `buf` may be null only when `len` is 0. On failure `buf` is untouched.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_store_read(handle: u64, offset: u64, buf: *mut u8, len: usize) -> i32 {
    ffi_guard!({
        if buf.is_null() && len > 0 {
            return MemblkStatus::InvalidArgument as i32;
        }
        let entry = resolve!(handle);
        let out: &mut [u8] = if len == 0 {
            &mut []
        } else {
            // SAFETY: buf is non-null and points to len writable bytes per caller contract.
            unsafe { std::slice::from_raw_parts_mut(buf, len) }
        };
        status_of(entry.store.read_into(offset, out))
    })
}

/// Copy `len` bytes from `buf` into the store starting at `offset`.
///
/// `buf` may be null only when `len` is 0.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_store_write(handle: u64, offset: u64, buf: *const u8, len: usize) -> i32 {
    ffi_guard!({
        if buf.is_null() && len > 0 {
            return MemblkStatus::InvalidArgument as i32;
        }
        let entry = resolve!(handle);
        let data: &[u8] = if len == 0 {
            &[]
        } else {
            // SAFETY: buf is non-null and points to len readable bytes per caller contract.
            unsafe { std::slice::from_raw_parts(buf, len) }
        };
        status_of(entry.store.write(offset, data))
    })
}

/// Flush the store. Always succeeds for a live handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_store_flush(handle: u64) -> i32 {
    ffi_guard!({
        let entry = resolve!(handle);
        status_of(entry.store.flush())
    })
}

/// Hint that `[offset, offset + length)` is no longer needed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_store_trim(handle: u64, offset: u64, length: u64) -> i32 {
    ffi_guard!({
        let entry = resolve!(handle);
        status_of(entry.store.trim(offset, length))
    })
}

/// Signal the end of a client session. The store stays usable.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_store_disconnect(handle: u64) -> i32 {
    ffi_guard!({
        let entry = resolve!(handle);
        status_of(entry.store.disconnect())
    })
}

/// Write the store capacity in bytes to `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_store_size_get(handle: u64, out: *mut u64) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return MemblkStatus::InvalidArgument as i32;
        }
        let entry = resolve!(handle);
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = entry.store.size() };
        MemblkStatus::Ok as i32
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{memblk_config_create, memblk_config_set_capacity};

    fn create_store(capacity: u64) -> u64 {
        let mut cfg = 0u64;
        assert_eq!(memblk_config_create(&mut cfg), 0);
        assert_eq!(memblk_config_set_capacity(cfg, capacity), 0);
        let mut h = 0u64;
        assert_eq!(memblk_store_create(cfg, &mut h), MemblkStatus::Ok as i32);
        h
    }

    #[test]
    fn create_consumes_config() {
        let mut cfg = 0u64;
        memblk_config_create(&mut cfg);
        memblk_config_set_capacity(cfg, 64);
        let mut h = 0u64;
        assert_eq!(memblk_store_create(cfg, &mut h), 0);
        let mut h2 = 0u64;
        assert_eq!(
            memblk_store_create(cfg, &mut h2),
            MemblkStatus::InvalidHandle as i32
        );
        memblk_store_destroy(h);
    }

    #[test]
    fn write_then_read_back() {
        let h = create_store(1024);
        let data = [1u8, 2, 3, 4];
        assert_eq!(memblk_store_write(h, 0, data.as_ptr(), data.len()), 0);

        let mut buf = [0u8; 4];
        assert_eq!(memblk_store_read(h, 0, buf.as_mut_ptr(), buf.len()), 0);
        assert_eq!(buf, data);

        let mut size = 0u64;
        assert_eq!(memblk_store_size_get(h, &mut size), 0);
        assert_eq!(size, 1024);
        memblk_store_destroy(h);
    }

    #[test]
    fn out_of_range_leaves_buffer_untouched() {
        let h = create_store(1024);
        let mut buf = [0xAAu8; 4];
        assert_eq!(
            memblk_store_read(h, 1022, buf.as_mut_ptr(), buf.len()),
            MemblkStatus::OutOfRange as i32
        );
        assert_eq!(buf, [0xAA; 4]);
        assert_eq!(
            memblk_store_write(h, 1022, buf.as_ptr(), buf.len()),
            MemblkStatus::OutOfRange as i32
        );
        assert_eq!(
            memblk_store_trim(h, 1000, 100),
            MemblkStatus::OutOfRange as i32
        );
        memblk_store_destroy(h);
    }

    #[test]
    fn null_buffer_only_allowed_for_empty_ranges() {
        let h = create_store(16);
        assert_eq!(memblk_store_read(h, 16, std::ptr::null_mut(), 0), 0);
        assert_eq!(memblk_store_write(h, 16, std::ptr::null(), 0), 0);
        assert_eq!(
            memblk_store_read(h, 0, std::ptr::null_mut(), 1),
            MemblkStatus::InvalidArgument as i32
        );
        assert_eq!(
            memblk_store_write(h, 0, std::ptr::null(), 1),
            MemblkStatus::InvalidArgument as i32
        );
        assert_eq!(
            memblk_store_size_get(h, std::ptr::null_mut()),
            MemblkStatus::InvalidArgument as i32
        );
        memblk_store_destroy(h);
    }

    #[test]
    fn flush_and_disconnect_succeed() {
        let h = create_store(16);
        assert_eq!(memblk_store_flush(h), 0);
        assert_eq!(memblk_store_disconnect(h), 0);
        assert_eq!(memblk_store_flush(h), 0);
        memblk_store_destroy(h);
    }

    #[test]
    fn destroyed_handle_is_invalid() {
        let h = create_store(16);
        assert_eq!(memblk_store_destroy(h), 0);
        let invalid = MemblkStatus::InvalidHandle as i32;
        assert_eq!(memblk_store_destroy(h), invalid);
        assert_eq!(memblk_store_flush(h), invalid);
        assert_eq!(memblk_store_trim(h, 0, 1), invalid);
        assert_eq!(memblk_store_disconnect(h), invalid);
        let mut size = 0u64;
        assert_eq!(memblk_store_size_get(h, &mut size), invalid);
    }

    #[test]
    fn null_out_leaves_config_alive() {
        let mut cfg = 0u64;
        memblk_config_create(&mut cfg);
        assert_eq!(
            memblk_store_create(cfg, std::ptr::null_mut()),
            MemblkStatus::InvalidArgument as i32
        );
        assert_eq!(crate::config::memblk_config_destroy(cfg), 0);
    }

    #[test]
    fn config_and_store_handles_do_not_mix() {
        let mut cfg = 0u64;
        memblk_config_create(&mut cfg);
        let h = create_store(16);
        let invalid = MemblkStatus::InvalidHandle as i32;
        assert_eq!(memblk_store_flush(cfg), invalid);
        assert_eq!(memblk_store_destroy(cfg), invalid);
        assert_eq!(crate::config::memblk_config_destroy(h), invalid);
        assert_eq!(memblk_store_flush(h), 0);
        assert_eq!(crate::config::memblk_config_destroy(cfg), 0);
        memblk_store_destroy(h);
    }

    #[test]
    fn failed_allocation_still_consumes_config() {
        let mut cfg = 0u64;
        memblk_config_create(&mut cfg);
        memblk_config_set_capacity(cfg, u64::MAX);
        let mut h = 0u64;
        assert_eq!(
            memblk_store_create(cfg, &mut h),
            MemblkStatus::ConfigError as i32
        );
        assert_eq!(
            crate::config::memblk_config_destroy(cfg),
            MemblkStatus::InvalidHandle as i32
        );
    }
}
