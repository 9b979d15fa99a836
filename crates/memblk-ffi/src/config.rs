//! Config builder FFI: create and populate a `StoreConfig` behind an opaque handle.
//!
//! C callers build a config incrementally, then pass the handle to
//! `memblk_store_create`, which consumes it.

use std::sync::{Arc, Mutex};

use memblk_core::StoreObserver;
use memblk_store::{LogObserver, StoreConfig};

use crate::handle::{HandleKind, Registry};
use crate::observer::{CallbackObserver, MemblkObserverDef};
use crate::status::MemblkStatus;
use crate::types::parse_trim_policy;

static CONFIGS: Mutex<Registry<ConfigBuilder>> =
    Mutex::new(Registry::new(HandleKind::Config));

/// Internal config builder accumulated by FFI calls.
#[derive(Default)]
pub(crate) struct ConfigBuilder {
    pub config: StoreConfig,
    pub log: bool,
    pub observers: Vec<Arc<dyn StoreObserver>>,
}

impl ConfigBuilder {
    /// Observers to attach, with the log observer first when enabled.
    pub(crate) fn take_observers(&mut self) -> Vec<Arc<dyn StoreObserver>> {
        let mut out: Vec<Arc<dyn StoreObserver>> = Vec::with_capacity(self.observers.len() + 1);
        if self.log {
            out.push(Arc::new(LogObserver::new()));
        }
        out.append(&mut self.observers);
        out
    }
}

pub(crate) fn configs() -> &'static Mutex<Registry<ConfigBuilder>> {
    &CONFIGS
}

// ── FFI functions ───────────────────────────────────────────────

/// Create a config builder with the default 100 MiB capacity.
/// Returns the handle via `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_config_create(out: *mut u64) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return MemblkStatus::InvalidArgument as i32;
        }
        let handle = match ffi_lock!(CONFIGS).insert(ConfigBuilder::default()) {
            Some(h) => h,
            None => return MemblkStatus::InternalError as i32,
        };
        // SAFETY: out is non-null and valid per caller contract.
        unsafe { *out = handle };
        MemblkStatus::Ok as i32
    })
}

/// Destroy a config builder without creating a store.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_config_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(CONFIGS).remove(handle) {
            Some(_) => MemblkStatus::Ok as i32,
            None => MemblkStatus::InvalidHandle as i32,
        }
    })
}

/// Set the store capacity in bytes. Zero is rejected here rather than
/// at store creation.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_config_set_capacity(handle: u64, capacity: u64) -> i32 {
    ffi_guard!({
        if capacity == 0 {
            return MemblkStatus::InvalidArgument as i32;
        }
        let mut table = ffi_lock!(CONFIGS);
        match table.get_mut(handle) {
            Some(builder) => {
                builder.config.capacity = capacity;
                MemblkStatus::Ok as i32
            }
            None => MemblkStatus::InvalidHandle as i32,
        }
    })
}

/// Set the trim policy (`MemblkTrimPolicy` value).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_config_set_trim_policy(handle: u64, policy: i32) -> i32 {
    ffi_guard!({
        let policy = match parse_trim_policy(policy) {
            Some(p) => p,
            None => return MemblkStatus::InvalidArgument as i32,
        };
        let mut table = ffi_lock!(CONFIGS);
        match table.get_mut(handle) {
            Some(builder) => {
                builder.config.trim_policy = policy;
                MemblkStatus::Ok as i32
            }
            None => MemblkStatus::InvalidHandle as i32,
        }
    })
}

/// Enable (non-zero) or disable (0) diagnostic logging through the
/// `log` facade for stores built from this config.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_config_set_logging(handle: u64, enabled: u8) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(CONFIGS);
        match table.get_mut(handle) {
            Some(builder) => {
                builder.log = enabled != 0;
                MemblkStatus::Ok as i32
            }
            None => MemblkStatus::InvalidHandle as i32,
        }
    })
}

/// Attach a C event observer. May be called several times; observers
/// are invoked in registration order.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn memblk_config_set_observer(handle: u64, def: *const MemblkObserverDef) -> i32 {
    ffi_guard!({
        if def.is_null() {
            return MemblkStatus::InvalidArgument as i32;
        }
        // SAFETY: def is non-null and points to a valid definition per caller contract.
        let def = unsafe { &*def };
        let observer = match CallbackObserver::from_def(def) {
            Some(o) => o,
            None => return MemblkStatus::InvalidArgument as i32,
        };
        let mut table = ffi_lock!(CONFIGS);
        match table.get_mut(handle) {
            Some(builder) => {
                builder.observers.push(Arc::new(observer));
                MemblkStatus::Ok as i32
            }
            None => MemblkStatus::InvalidHandle as i32,
        }
    })
}
