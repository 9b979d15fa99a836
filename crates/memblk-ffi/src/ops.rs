//! Block-device callback table for C hosts.
//!
//! [`MemblkBlockOps`] mirrors the operations table a userspace
//! block-device host expects: five callbacks taking an opaque
//! `userdata` pointer plus the device size. Fill one with
//! [`memblk_block_ops_get`] and hand it to the host together with a
//! pointer to the store handle as `userdata`.
//!
//! Every callback returns 0 on success or a negative `MemblkStatus`.
//! `userdata` must point to a live `uint64_t` store handle for as long
//! as the host may call back.

use std::ffi::c_void;

use memblk_core::BlockBackend;

use crate::status::{status_of, MemblkStatus};
use crate::store::{get_store, StoreEntry};

/// Block-device operations table.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct MemblkBlockOps {
    /// Fill `buf` with `len` bytes starting at `offset`.
    pub read: Option<unsafe extern "C" fn(*mut c_void, u32, u64, *mut c_void) -> i32>,
    /// Store `len` bytes from `buf` starting at `offset`.
    pub write: Option<unsafe extern "C" fn(*const c_void, u32, u64, *mut c_void) -> i32>,
    /// Client session ended.
    pub disc: Option<unsafe extern "C" fn(*mut c_void)>,
    /// Flush outstanding writes.
    pub flush: Option<unsafe extern "C" fn(*mut c_void) -> i32>,
    /// Trim hint for `len` bytes starting at `from`.
    pub trim: Option<unsafe extern "C" fn(u64, u32, *mut c_void) -> i32>,
    /// Device size in bytes.
    pub size: u64,
}

/// Resolve a host `userdata` pointer to the store it names.
#[allow(unsafe_code)]
fn store_from_userdata(userdata: *mut c_void) -> Result<std::sync::Arc<StoreEntry>, MemblkStatus> {
    if userdata.is_null() {
        return Err(MemblkStatus::InvalidArgument);
    }
    // SAFETY: userdata points to a live u64 handle per the table contract.
    let handle = unsafe { *userdata.cast::<u64>() };
    get_store(handle)
}

macro_rules! resolve_userdata {
    ($userdata:expr) => {
        match store_from_userdata($userdata) {
            Ok(entry) => entry,
            Err(status) => return status as i32,
        }
    };
}

/// Fill `out` with the callback table and size for `store_handle`.
///
/// The store's size is queried once here; a host should refuse to start
/// when the call fails.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_block_ops_get(store_handle: u64, out: *mut MemblkBlockOps) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return MemblkStatus::InvalidArgument as i32;
        }
        let entry = match get_store(store_handle) {
            Ok(e) => e,
            Err(status) => return status as i32,
        };
        let ops = MemblkBlockOps {
            read: Some(memblk_block_read),
            write: Some(memblk_block_write),
            disc: Some(memblk_block_disc),
            flush: Some(memblk_block_flush),
            trim: Some(memblk_block_trim),
            size: entry.store.size(),
        };
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = ops };
        MemblkStatus::Ok as i32
    })
}

/// Read callback.
///
/// # Safety
///
/// `buf` must point to `len` writable bytes; `userdata` must satisfy the
/// table contract.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn memblk_block_read(
    buf: *mut c_void,
    len: u32,
    offset: u64,
    userdata: *mut c_void,
) -> i32 {
    ffi_guard!({
        if buf.is_null() && len > 0 {
            return MemblkStatus::InvalidArgument as i32;
        }
        let entry = resolve_userdata!(userdata);
        let out: &mut [u8] = if len == 0 {
            &mut []
        } else {
            // SAFETY: buf is non-null and points to len writable bytes per caller contract.
            unsafe { std::slice::from_raw_parts_mut(buf.cast::<u8>(), len as usize) }
        };
        status_of(entry.store.read_into(offset, out))
    })
}

/// Write callback.
///
/// # Safety
///
/// `buf` must point to `len` readable bytes; `userdata` must satisfy the
/// table contract.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn memblk_block_write(
    buf: *const c_void,
    len: u32,
    offset: u64,
    userdata: *mut c_void,
) -> i32 {
    ffi_guard!({
        if buf.is_null() && len > 0 {
            return MemblkStatus::InvalidArgument as i32;
        }
        let entry = resolve_userdata!(userdata);
        let data: &[u8] = if len == 0 {
            &[]
        } else {
            // SAFETY: buf is non-null and points to len readable bytes per caller contract.
            unsafe { std::slice::from_raw_parts(buf.cast::<u8>(), len as usize) }
        };
        status_of(entry.store.write(offset, data))
    })
}

/// Disconnect callback. Failures are logged since the host ignores them.
///
/// # Safety
///
/// `userdata` must satisfy the table contract.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn memblk_block_disc(userdata: *mut c_void) {
    ffi_guard_or!((), {
        match store_from_userdata(userdata) {
            Ok(entry) => {
                if let Err(e) = entry.store.disconnect() {
                    log::warn!(target: "memblk::ffi", "disconnect failed: {e}");
                }
            }
            Err(status) => {
                log::warn!(target: "memblk::ffi", "disconnect on unresolved store: {status:?}");
            }
        }
    })
}

/// Flush callback.
///
/// # Safety
///
/// `userdata` must satisfy the table contract.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn memblk_block_flush(userdata: *mut c_void) -> i32 {
    ffi_guard!({
        let entry = resolve_userdata!(userdata);
        status_of(entry.store.flush())
    })
}

/// Trim callback.
///
/// # Safety
///
/// `userdata` must satisfy the table contract.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn memblk_block_trim(from: u64, len: u32, userdata: *mut c_void) -> i32 {
    ffi_guard!({
        let entry = resolve_userdata!(userdata);
        status_of(entry.store.trim(from, u64::from(len)))
    })
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::config::{memblk_config_create, memblk_config_set_capacity};
    use crate::metrics::{memblk_store_metrics_get, MemblkStoreMetrics};
    use crate::store::{memblk_store_create, memblk_store_destroy};

    fn create_store(capacity: u64) -> u64 {
        let mut cfg = 0u64;
        memblk_config_create(&mut cfg);
        memblk_config_set_capacity(cfg, capacity);
        let mut h = 0u64;
        assert_eq!(memblk_store_create(cfg, &mut h), 0);
        h
    }

    fn userdata(handle: &mut u64) -> *mut c_void {
        (handle as *mut u64).cast::<c_void>()
    }

    #[test]
    fn table_is_fully_populated() {
        let h = create_store(4096);
        let mut ops = MemblkBlockOps::default();
        assert_eq!(memblk_block_ops_get(h, &mut ops), 0);
        assert!(ops.read.is_some());
        assert!(ops.write.is_some());
        assert!(ops.disc.is_some());
        assert!(ops.flush.is_some());
        assert!(ops.trim.is_some());
        assert_eq!(ops.size, 4096);
        memblk_store_destroy(h);
    }

    #[test]
    fn ops_get_rejects_bad_inputs() {
        assert_eq!(
            memblk_block_ops_get(u64::MAX, &mut MemblkBlockOps::default()),
            MemblkStatus::InvalidHandle as i32
        );
        assert_eq!(
            memblk_block_ops_get(0, std::ptr::null_mut()),
            MemblkStatus::InvalidArgument as i32
        );
    }

    #[test]
    fn host_session_through_table() {
        let h = create_store(1024);
        let mut ops = MemblkBlockOps::default();
        memblk_block_ops_get(h, &mut ops);
        let mut slot = h;
        let ud = userdata(&mut slot);

        let data = [9u8, 8, 7, 6];
        let mut buf = [0u8; 4];
        unsafe {
            let write = ops.write.unwrap();
            let read = ops.read.unwrap();
            assert_eq!(write(data.as_ptr().cast(), 4, 100, ud), 0);
            assert_eq!(read(buf.as_mut_ptr().cast(), 4, 100, ud), 0);
            assert_eq!(buf, data);

            assert_eq!(
                read(buf.as_mut_ptr().cast(), 4, 1022, ud),
                MemblkStatus::OutOfRange as i32
            );
            assert_eq!((ops.flush.unwrap())(ud), 0);
            assert_eq!((ops.trim.unwrap())(0, 512, ud), 0);
            (ops.disc.unwrap())(ud);
        }

        let mut m = MemblkStoreMetrics::default();
        memblk_store_metrics_get(h, &mut m);
        assert_eq!(m.writes, 1);
        assert_eq!(m.reads, 1);
        assert_eq!(m.rejections, 1);
        assert_eq!(m.flushes, 1);
        assert_eq!(m.trims, 1);
        assert_eq!(m.disconnects, 1);
        assert_eq!(m.size_queries, 1);
        memblk_store_destroy(h);
    }

    #[test]
    fn null_userdata_is_invalid_argument() {
        let mut buf = [0u8; 1];
        let null = std::ptr::null_mut();
        unsafe {
            assert_eq!(
                memblk_block_read(buf.as_mut_ptr().cast(), 1, 0, null),
                MemblkStatus::InvalidArgument as i32
            );
            assert_eq!(
                memblk_block_flush(null),
                MemblkStatus::InvalidArgument as i32
            );
            memblk_block_disc(null);
        }
    }

    #[test]
    fn disc_reaches_live_store_and_tolerates_stale_one() {
        let h = create_store(16);
        let mut slot = h;
        let ud = userdata(&mut slot);
        unsafe { memblk_block_disc(ud) };
        let mut m = MemblkStoreMetrics::default();
        memblk_store_metrics_get(h, &mut m);
        assert_eq!(m.disconnects, 1);

        memblk_store_destroy(h);
        unsafe { memblk_block_disc(ud) };
    }

    #[test]
    fn stale_handle_in_userdata() {
        let mut h = create_store(16);
        memblk_store_destroy(h);
        let ud = userdata(&mut h);
        unsafe {
            assert_eq!(memblk_block_trim(0, 1, ud), MemblkStatus::InvalidHandle as i32);
        }
    }
}
