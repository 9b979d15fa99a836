//! C-compatible status codes.
//!
//! [`MemblkStatus`] is a `repr(i32)` enum covering every failure the C
//! API can report. Conversions from the Rust error types are provided.

use memblk_core::StoreError;
use memblk_store::ConfigError;

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemblkStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// Requested range exceeds the store capacity.
    OutOfRange = -2,
    /// An argument is null, malformed, or otherwise invalid.
    InvalidArgument = -3,
    /// A backend answered a read with the wrong number of bytes.
    LengthMismatch = -4,
    /// Configuration validation error.
    ConfigError = -5,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -6,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&StoreError> for MemblkStatus {
    fn from(e: &StoreError) -> Self {
        match e {
            StoreError::OutOfRange { .. } => MemblkStatus::OutOfRange,
            StoreError::InvalidArgument { .. } => MemblkStatus::InvalidArgument,
            StoreError::LengthMismatch { .. } => MemblkStatus::LengthMismatch,
        }
    }
}

impl From<&ConfigError> for MemblkStatus {
    fn from(_e: &ConfigError) -> Self {
        MemblkStatus::ConfigError
    }
}

/// Collapse a store result into a raw status code.
pub(crate) fn status_of(result: Result<(), StoreError>) -> i32 {
    match result {
        Ok(()) => MemblkStatus::Ok as i32,
        Err(e) => MemblkStatus::from(&e) as i32,
    }
}
