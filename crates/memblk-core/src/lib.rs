//! Core types and traits for the memblk block storage backend.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the abstractions shared by every other memblk crate: validated byte
//! ranges, the error taxonomy, the [`BlockBackend`] seam a protocol
//! handler drives, the [`StoreObserver`] hook and the request model.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod event;
pub mod range;
pub mod request;
pub mod traits;

pub use error::StoreError;
pub use event::{NoopObserver, StoreEvent, StoreObserver};
pub use range::ByteRange;
pub use request::{Op, Reply, Request};
pub use traits::BlockBackend;
