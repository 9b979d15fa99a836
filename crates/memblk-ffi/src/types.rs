//! C-compatible enums for trim policy and event kinds.

use memblk_core::Op;
use memblk_store::TrimPolicy;

/// Trim behavior for `memblk_config_set_trim_policy`.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemblkTrimPolicy {
    /// Accept trim hints without touching content.
    Ignore = 0,
    /// Zero the hinted range.
    Zero = 1,
}

/// Operation kind carried by `MemblkEvent`.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemblkEventKind {
    /// Byte-range read.
    Read = 0,
    /// Byte-range write.
    Write = 1,
    /// Flush.
    Flush = 2,
    /// Trim hint.
    Trim = 3,
    /// Capacity query.
    Size = 4,
    /// Session end.
    Disconnect = 5,
}

pub(crate) fn parse_trim_policy(raw: i32) -> Option<TrimPolicy> {
    match raw {
        x if x == MemblkTrimPolicy::Ignore as i32 => Some(TrimPolicy::Ignore),
        x if x == MemblkTrimPolicy::Zero as i32 => Some(TrimPolicy::Zero),
        _ => None,
    }
}

impl From<Op> for MemblkEventKind {
    fn from(op: Op) -> Self {
        match op {
            Op::Read => Self::Read,
            Op::Write => Self::Write,
            Op::Flush => Self::Flush,
            Op::Trim => Self::Trim,
            Op::Size => Self::Size,
            Op::Disconnect => Self::Disconnect,
        }
    }
}
