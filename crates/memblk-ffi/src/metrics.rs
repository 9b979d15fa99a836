//! C-compatible store metrics and the FFI accessor.

use memblk_store::StoreMetrics;

use crate::status::MemblkStatus;
use crate::store::get_store;

/// Flat, C-compatible copy of [`StoreMetrics`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemblkStoreMetrics {
    /// Number of successful reads.
    pub reads: u64,
    /// Number of successful writes.
    pub writes: u64,
    /// Total bytes returned by reads.
    pub bytes_read: u64,
    /// Total bytes accepted by writes.
    pub bytes_written: u64,
    /// Number of flushes.
    pub flushes: u64,
    /// Number of accepted trim hints.
    pub trims: u64,
    /// Total bytes covered by trim hints.
    pub bytes_trimmed: u64,
    /// Number of capacity queries.
    pub size_queries: u64,
    /// Number of session disconnects.
    pub disconnects: u64,
    /// Number of rejected operations.
    pub rejections: u64,
}

// 10 × u64 = 80 bytes, no padding.
const _: () = assert!(std::mem::size_of::<MemblkStoreMetrics>() == 80);

impl MemblkStoreMetrics {
    pub(crate) fn from_rust(m: &StoreMetrics) -> Self {
        Self {
            reads: m.reads,
            writes: m.writes,
            bytes_read: m.bytes_read,
            bytes_written: m.bytes_written,
            flushes: m.flushes,
            trims: m.trims,
            bytes_trimmed: m.bytes_trimmed,
            size_queries: m.size_queries,
            disconnects: m.disconnects,
            rejections: m.rejections,
        }
    }
}

/// Snapshot the store's operation counters into `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_store_metrics_get(handle: u64, out: *mut MemblkStoreMetrics) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return MemblkStatus::InvalidArgument as i32;
        }
        let entry = match get_store(handle) {
            Ok(e) => e,
            Err(status) => return status as i32,
        };
        let snapshot = MemblkStoreMetrics::from_rust(&entry.metrics.snapshot());
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = snapshot };
        MemblkStatus::Ok as i32
    })
}
