//! Event sinks for [`StoreObserver`].
//!
//! - [`LogObserver`] writes to the `log` facade.
//! - [`ChannelObserver`] forwards events to another thread without blocking.
//! - [`FanoutObserver`] broadcasts to several observers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{debug, info, warn};

use memblk_core::{StoreEvent, StoreObserver};

/// Observer that logs every event through the `log` facade.
///
/// Data-path events go to `debug`, session events to `info` and
/// rejections to `warn`. Installing a logger is left to the binary.
#[derive(Clone, Debug)]
pub struct LogObserver {
    target: &'static str,
}

impl LogObserver {
    /// Default log target.
    pub const DEFAULT_TARGET: &'static str = "memblk::store";

    /// Log under [`DEFAULT_TARGET`](Self::DEFAULT_TARGET).
    pub fn new() -> Self {
        Self::with_target(Self::DEFAULT_TARGET)
    }

    /// Log under a custom target.
    pub fn with_target(target: &'static str) -> Self {
        Self { target }
    }

    /// The log target in use.
    pub fn target(&self) -> &'static str {
        self.target
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreObserver for LogObserver {
    fn on_event(&self, event: &StoreEvent) {
        let target = self.target;
        match event {
            StoreEvent::Read { offset, length } => {
                debug!(target: target, "reading {length} bytes at {offset}");
            }
            StoreEvent::Write { offset, length } => {
                debug!(target: target, "writing {length} bytes at {offset}");
            }
            StoreEvent::Flush => debug!(target: target, "flush"),
            StoreEvent::Trim {
                offset,
                length,
                zeroed,
            } => {
                debug!(target: target, "trim from {offset} for length {length} (zeroed: {zeroed})");
            }
            StoreEvent::Size { capacity } => {
                info!(target: target, "reporting block size of {capacity} bytes");
            }
            StoreEvent::Disconnect => info!(target: target, "disconnect"),
            StoreEvent::Rejected { op, error } => {
                warn!(target: target, "{op} rejected: {error}");
            }
        }
    }
}

/// Observer that forwards events over a bounded channel.
///
/// Uses `try_send`: when the consumer falls behind, events are dropped
/// and counted rather than stalling the storage path.
#[derive(Debug)]
pub struct ChannelObserver {
    tx: Sender<StoreEvent>,
    dropped: AtomicU64,
}

impl ChannelObserver {
    /// Create an observer and the receiving end of its channel.
    ///
    /// A zero `capacity` gives a rendezvous channel: an event is delivered
    /// only when a receiver is blocked in `recv` at that moment, and is
    /// counted as dropped otherwise.
    pub fn bounded(capacity: usize) -> (Self, Receiver<StoreEvent>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (
            Self {
                tx,
                dropped: AtomicU64::new(0),
            },
            rx,
        )
    }

    /// Number of events dropped because the channel was full or closed.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl StoreObserver for ChannelObserver {
    fn on_event(&self, event: &StoreEvent) {
        match self.tx.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Observer that hands each event to several observers in order.
#[derive(Clone, Default)]
pub struct FanoutObserver {
    observers: Vec<Arc<dyn StoreObserver>>,
}

impl FanoutObserver {
    /// Create an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observer.
    pub fn with(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Number of attached observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are attached.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl StoreObserver for FanoutObserver {
    fn on_event(&self, event: &StoreEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}
