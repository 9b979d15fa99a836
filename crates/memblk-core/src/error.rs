//! Error types for block storage operations.
//!
//! Every failure is a deterministic caller or backend contract error,
//! reported synchronously and never retried.

use std::error::Error;
use std::fmt;

/// Errors returned by [`BlockBackend`](crate::BlockBackend) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The requested range does not fit inside the store.
    ///
    /// Also returned when `offset + length` overflows `u64`.
    OutOfRange {
        /// Start of the rejected range.
        offset: u64,
        /// Length of the rejected range.
        length: u64,
        /// Capacity of the store in bytes.
        capacity: u64,
    },
    /// An argument is malformed, e.g. a length that cannot be addressed
    /// on this platform or an inconsistent caller buffer.
    InvalidArgument {
        /// Description of the malformed argument.
        reason: String,
    },
    /// A backend answered a read with the wrong number of bytes.
    LengthMismatch {
        /// Number of bytes requested.
        expected: u64,
        /// Number of bytes the backend returned.
        actual: u64,
    },
}

impl StoreError {
    /// Shorthand for [`StoreError::InvalidArgument`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                offset,
                length,
                capacity,
            } => write!(
                f,
                "range out of bounds: {length} bytes at offset {offset} exceeds capacity {capacity}"
            ),
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::LengthMismatch { expected, actual } => write!(
                f,
                "backend returned {actual} bytes, expected {expected}"
            ),
        }
    }
}

impl Error for StoreError {}
