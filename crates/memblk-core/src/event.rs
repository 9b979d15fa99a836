//! Observability hook for block operations.
//!
//! Backends report every call to an injected [`StoreObserver`] instead of
//! printing, so the storage logic is decoupled from any output sink.

use crate::error::StoreError;
use crate::request::Op;

/// A completed or rejected block operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    /// A read was served.
    Read {
        /// Start of the range.
        offset: u64,
        /// Number of bytes read.
        length: u64,
    },
    /// A write was applied.
    Write {
        /// Start of the range.
        offset: u64,
        /// Number of bytes written.
        length: u64,
    },
    /// A flush was acknowledged.
    Flush,
    /// A trim hint was accepted.
    Trim {
        /// Start of the range.
        offset: u64,
        /// Number of bytes covered by the hint.
        length: u64,
        /// Whether the range was actually zeroed.
        zeroed: bool,
    },
    /// The capacity was queried.
    Size {
        /// Reported capacity in bytes.
        capacity: u64,
    },
    /// A client session ended.
    Disconnect,
    /// An operation failed validation and touched nothing.
    Rejected {
        /// The rejected operation.
        op: Op,
        /// Why it was rejected.
        error: StoreError,
    },
}

impl StoreEvent {
    /// The operation this event describes.
    pub fn op(&self) -> Op {
        match self {
            Self::Read { .. } => Op::Read,
            Self::Write { .. } => Op::Write,
            Self::Flush => Op::Flush,
            Self::Trim { .. } => Op::Trim,
            Self::Size { .. } => Op::Size,
            Self::Disconnect => Op::Disconnect,
            Self::Rejected { op, .. } => *op,
        }
    }

    /// Whether this event reports a failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Receives a [`StoreEvent`] for every backend call.
///
/// Called synchronously on the caller's thread after the operation has
/// completed and the store lock has been released. Implementations must
/// not block for long.
pub trait StoreObserver: Send + Sync {
    /// Handle one event.
    fn on_event(&self, event: &StoreEvent);
}

/// Observer that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl StoreObserver for NoopObserver {
    fn on_event(&self, _event: &StoreEvent) {}
}
