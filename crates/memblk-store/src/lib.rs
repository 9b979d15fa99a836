//! Bounded in-memory block store for userspace block-device hosts.
//!
//! # Architecture
//!
//! ```text
//! protocol host (external)
//! └── Dispatcher<B: BlockBackend>      request → reply, answer checks
//!     └── BoundedBlockStore            Mutex<Vec<u8>>, fixed capacity
//!         └── Arc<dyn StoreObserver>   LogObserver / MetricsObserver /
//!                                      ChannelObserver / FanoutObserver
//! ```
//!
//! The store validates every range before touching memory, so a bound
//! violation never partially applies. Events are emitted after the lock
//! is released.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod metrics;
pub mod observer;
pub mod store;

pub use config::{ConfigError, StoreConfig, TrimPolicy};
pub use dispatch::{DispatchError, Dispatcher};
pub use metrics::{MetricsObserver, StoreMetrics};
pub use observer::{ChannelObserver, FanoutObserver, LogObserver};
pub use store::BoundedBlockStore;
