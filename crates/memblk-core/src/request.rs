//! Request and reply types for driving a backend from a protocol host.
//!
//! A block protocol handler decodes its wire requests into [`Request`]
//! values and hands them to a dispatcher, which answers with a [`Reply`].
//! Size queries are not requests: the capacity is negotiated once when
//! the host starts.

use std::fmt;

/// The kind of a block operation, used for logging and status reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// Byte-range read.
    Read,
    /// Byte-range write.
    Write,
    /// Durability barrier.
    Flush,
    /// Advisory discard of a byte range.
    Trim,
    /// Capacity query.
    Size,
    /// End of a client session.
    Disconnect,
}

impl Op {
    /// Stable lowercase name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Flush => "flush",
            Self::Trim => "trim",
            Self::Size => "size",
            Self::Disconnect => "disconnect",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single block request from a protocol host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// Read `length` bytes starting at `offset`.
    Read {
        /// Start of the range.
        offset: u64,
        /// Number of bytes to read.
        length: u64,
    },
    /// Write `data` starting at `offset`.
    Write {
        /// Start of the range.
        offset: u64,
        /// Payload to store.
        data: Vec<u8>,
    },
    /// Make prior writes durable.
    Flush,
    /// Hint that `[offset, offset + length)` is no longer needed.
    Trim {
        /// Start of the range.
        offset: u64,
        /// Number of bytes to discard.
        length: u64,
    },
    /// The client is closing its session.
    Disconnect,
}

impl Request {
    /// The operation kind of this request.
    pub fn op(&self) -> Op {
        match self {
            Self::Read { .. } => Op::Read,
            Self::Write { .. } => Op::Write,
            Self::Flush => Op::Flush,
            Self::Trim { .. } => Op::Trim,
            Self::Disconnect => Op::Disconnect,
        }
    }
}

/// The successful answer to a [`Request`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Bytes answering a [`Request::Read`].
    Data(Vec<u8>),
    /// Acknowledgment of every other request.
    Done,
}

impl Reply {
    /// Consume the reply, returning read data if there was any.
    pub fn into_data(self) -> Option<Vec<u8>> {
        match self {
            Self::Data(data) => Some(data),
            Self::Done => None,
        }
    }
}
