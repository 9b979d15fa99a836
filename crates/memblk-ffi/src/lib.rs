//! C FFI bindings for the memblk block storage backend.
//!
//! Exposes stores behind opaque `u64` handles plus a callback table
//! ([`ops::MemblkBlockOps`]) that a C block-device host can install
//! directly. This is the only memblk crate that may contain `unsafe`
//! code; every entry point is wrapped in a panic guard.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::ffi::c_char;

/// Run `$body` under `catch_unwind`, returning `$fallback` on panic.
macro_rules! ffi_guard_or {
    ($fallback:expr, $body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                $crate::record_panic(payload);
                $fallback
            }
        }
    };
}

/// Run `$body` under `catch_unwind`, returning `Panicked` on panic.
macro_rules! ffi_guard {
    ($body:block) => {
        ffi_guard_or!($crate::status::MemblkStatus::Panicked as i32, $body)
    };
}

/// Lock a mutex or return `InternalError` from the enclosing guard body.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::MemblkStatus::InternalError as i32,
        }
    };
}

pub mod config;
mod handle;
pub mod metrics;
pub mod observer;
pub mod ops;
pub mod status;
pub mod store;
pub mod types;

thread_local! {
    /// Message of the most recent panic caught on this thread.
    pub(crate) static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

pub(crate) fn record_panic(payload: Box<dyn Any + Send>) {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    log::error!(target: "memblk::ffi", "panic caught at FFI boundary: {msg}");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
}

/// Copy the message of the last panic caught on this thread into `buf`.
///
/// Returns the full message length in bytes (excluding the terminator).
/// Pass a null `buf` or `cap == 0` to query the length only. When `buf`
/// is non-null, at most `cap - 1` bytes are copied and the result is
/// always null-terminated.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let msg = cell.borrow();
        let bytes = msg.as_bytes();
        if !buf.is_null() && cap > 0 {
            let n = bytes.len().min(cap - 1);
            // SAFETY: buf points to at least cap writable bytes per caller contract.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), n);
                *buf.add(n) = 0;
            }
        }
        bytes.len().min(i32::MAX as usize) as i32
    })
}
