//! Host-side adapter between a block protocol handler and a backend.
//!
//! A protocol host decodes wire requests into [`Request`]s and calls
//! [`Dispatcher::dispatch`]. The dispatcher negotiates the capacity once
//! at construction and checks every read answer before it reaches the
//! wire, so a misbehaving backend surfaces as a typed error instead of a
//! short or oversized reply.

use std::error::Error;
use std::fmt;

use log::{debug, error};

use memblk_core::{BlockBackend, Op, Reply, Request, StoreError};

/// Errors from [`Dispatcher::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// The backend reported a capacity of zero; there is nothing to export.
    ZeroCapacity,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "backend reported zero capacity"),
        }
    }
}

impl Error for DispatchError {}

/// Routes [`Request`]s to a [`BlockBackend`] and validates the answers.
#[derive(Debug)]
pub struct Dispatcher<B> {
    backend: B,
    capacity: u64,
}

impl<B: BlockBackend> Dispatcher<B> {
    /// Query the backend's capacity and wrap it.
    ///
    /// Fails with [`DispatchError::ZeroCapacity`] when the backend has
    /// nothing to export.
    pub fn new(backend: B) -> Result<Self, DispatchError> {
        let capacity = backend.size();
        if capacity == 0 {
            error!(target: "memblk::dispatch", "backend reported zero capacity, refusing to export");
            return Err(DispatchError::ZeroCapacity);
        }
        debug!(target: "memblk::dispatch", "exporting {capacity} bytes");
        Ok(Self { backend, capacity })
    }

    /// Capacity negotiated at construction.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consume the dispatcher, returning the backend.
    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Execute one request.
    ///
    /// Read answers whose length differs from the requested length are
    /// rejected with [`StoreError::LengthMismatch`].
    pub fn dispatch(&self, request: Request) -> Result<Reply, StoreError> {
        let op = request.op();
        let result = match request {
            Request::Read { offset, length } => {
                self.backend.read(offset, length).and_then(|data| {
                    if data.len() as u64 == length {
                        Ok(Reply::Data(data))
                    } else {
                        Err(StoreError::LengthMismatch {
                            expected: length,
                            actual: data.len() as u64,
                        })
                    }
                })
            }
            Request::Write { offset, data } => {
                self.backend.write(offset, &data).map(|()| Reply::Done)
            }
            Request::Flush => self.backend.flush().map(|()| Reply::Done),
            Request::Trim { offset, length } => {
                self.backend.trim(offset, length).map(|()| Reply::Done)
            }
            Request::Disconnect => self.backend.disconnect().map(|()| Reply::Done),
        };
        result.map_err(|e| self.fail(op, e))
    }

    fn fail(&self, op: Op, e: StoreError) -> StoreError {
        debug!(target: "memblk::dispatch", "{op} failed: {e}");
        e
    }
}
