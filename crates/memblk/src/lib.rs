//! memblk: a bounded, zero-initialized in-memory block storage backend.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the memblk sub-crates. A userspace block-device host adds `memblk` as a
//! single dependency, builds a [`store::BoundedBlockStore`], and serves
//! byte-range requests against it, directly or through a
//! [`store::Dispatcher`].
//!
//! # Quick start
//!
//! ```rust
//! use memblk::prelude::*;
//!
//! let store = BoundedBlockStore::new(StoreConfig::new(1024)).unwrap();
//! store.write(0, b"\x01\x02\x03").unwrap();
//! assert_eq!(store.read(0, 3).unwrap(), b"\x01\x02\x03");
//!
//! // 1022 + 4 > 1024: rejected, nothing touched.
//! assert!(matches!(
//!     store.read(1022, 4),
//!     Err(StoreError::OutOfRange { .. })
//! ));
//! assert_eq!(store.size(), 1024);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `memblk-core` | Backend trait, requests, ranges, events, errors |
//! | [`store`] | `memblk-store` | Bounded store, config, observers, metrics, dispatcher |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`memblk-core`).
///
/// Contains the [`types::BlockBackend`] trait every backend implements,
/// the [`types::Request`]/[`types::Reply`] pair hosts dispatch, range
/// validation, and the observer event stream.
pub use memblk_core as types;

/// The bounded in-memory store and its host-side plumbing (`memblk-store`).
///
/// Provides [`store::BoundedBlockStore`], [`store::StoreConfig`], the
/// observers ([`store::LogObserver`], [`store::MetricsObserver`],
/// [`store::ChannelObserver`], [`store::FanoutObserver`]), and
/// [`store::Dispatcher`].
pub use memblk_store as store;

/// Common imports for typical memblk usage.
///
/// ```rust
/// use memblk::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use memblk_core::{BlockBackend, ByteRange, Op, Reply, Request};

    // Errors
    pub use memblk_core::StoreError;
    pub use memblk_store::{ConfigError, DispatchError};

    // Events
    pub use memblk_core::{StoreEvent, StoreObserver};

    // Store
    pub use memblk_store::{
        BoundedBlockStore, Dispatcher, FanoutObserver, LogObserver, MetricsObserver,
        StoreConfig, StoreMetrics, TrimPolicy,
    };
}
