//! Operation counters for a block store.
//!
//! [`MetricsObserver`] accumulates lock-free counters from the event
//! stream; [`StoreMetrics`] is a point-in-time copy for telemetry.

use std::sync::atomic::{AtomicU64, Ordering};

use memblk_core::{StoreEvent, StoreObserver};

/// Cumulative operation counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreMetrics {
    /// Number of successful reads.
    pub reads: u64,
    /// Number of successful writes.
    pub writes: u64,
    /// Total bytes returned by reads.
    pub bytes_read: u64,
    /// Total bytes accepted by writes.
    pub bytes_written: u64,
    /// Number of flushes.
    pub flushes: u64,
    /// Number of accepted trim hints.
    pub trims: u64,
    /// Total bytes covered by trim hints.
    pub bytes_trimmed: u64,
    /// Number of capacity queries.
    pub size_queries: u64,
    /// Number of session disconnects.
    pub disconnects: u64,
    /// Number of rejected operations.
    pub rejections: u64,
}

/// Observer that counts operations with relaxed atomics.
#[derive(Debug, Default)]
pub struct MetricsObserver {
    reads: AtomicU64,
    writes: AtomicU64,
    bytes_read: AtomicU64,
    bytes_written: AtomicU64,
    flushes: AtomicU64,
    trims: AtomicU64,
    bytes_trimmed: AtomicU64,
    size_queries: AtomicU64,
    disconnects: AtomicU64,
    rejections: AtomicU64,
}

impl MetricsObserver {
    /// Create an observer with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the current counter values.
    ///
    /// Counters are read independently, so a snapshot taken while other
    /// threads operate on the store may mix values from adjacent calls.
    pub fn snapshot(&self) -> StoreMetrics {
        StoreMetrics {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            trims: self.trims.load(Ordering::Relaxed),
            bytes_trimmed: self.bytes_trimmed.load(Ordering::Relaxed),
            size_queries: self.size_queries.load(Ordering::Relaxed),
            disconnects: self.disconnects.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
        }
    }
}

impl StoreObserver for MetricsObserver {
    fn on_event(&self, event: &StoreEvent) {
        match event {
            StoreEvent::Read { length, .. } => {
                self.reads.fetch_add(1, Ordering::Relaxed);
                self.bytes_read.fetch_add(*length, Ordering::Relaxed);
            }
            StoreEvent::Write { length, .. } => {
                self.writes.fetch_add(1, Ordering::Relaxed);
                self.bytes_written.fetch_add(*length, Ordering::Relaxed);
            }
            StoreEvent::Flush => {
                self.flushes.fetch_add(1, Ordering::Relaxed);
            }
            StoreEvent::Trim { length, .. } => {
                self.trims.fetch_add(1, Ordering::Relaxed);
                self.bytes_trimmed.fetch_add(*length, Ordering::Relaxed);
            }
            StoreEvent::Size { .. } => {
                self.size_queries.fetch_add(1, Ordering::Relaxed);
            }
            StoreEvent::Disconnect => {
                self.disconnects.fetch_add(1, Ordering::Relaxed);
            }
            StoreEvent::Rejected { .. } => {
                self.rejections.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memblk_core::{Op, StoreError};

    #[test]
    fn default_metrics_are_zero() {
        let m = MetricsObserver::new().snapshot();
        assert_eq!(m, StoreMetrics::default());
        assert_eq!(m.reads, 0);
        assert_eq!(m.rejections, 0);
    }

    #[test]
    fn events_update_matching_counters() {
        let obs = MetricsObserver::new();
        obs.on_event(&StoreEvent::Read { offset: 0, length: 10 });
        obs.on_event(&StoreEvent::Read { offset: 10, length: 6 });
        obs.on_event(&StoreEvent::Write { offset: 0, length: 4 });
        obs.on_event(&StoreEvent::Flush);
        obs.on_event(&StoreEvent::Trim {
            offset: 0,
            length: 512,
            zeroed: false,
        });
        obs.on_event(&StoreEvent::Size { capacity: 1024 });
        obs.on_event(&StoreEvent::Disconnect);
        obs.on_event(&StoreEvent::Rejected {
            op: Op::Read,
            error: StoreError::invalid("x"),
        });

        let m = obs.snapshot();
        assert_eq!(m.reads, 2);
        assert_eq!(m.bytes_read, 16);
        assert_eq!(m.writes, 1);
        assert_eq!(m.bytes_written, 4);
        assert_eq!(m.flushes, 1);
        assert_eq!(m.trims, 1);
        assert_eq!(m.bytes_trimmed, 512);
        assert_eq!(m.size_queries, 1);
        assert_eq!(m.disconnects, 1);
        assert_eq!(m.rejections, 1);
    }

    #[test]
    fn rejected_reads_do_not_count_as_reads() {
        let obs = MetricsObserver::new();
        obs.on_event(&StoreEvent::Rejected {
            op: Op::Read,
            error: StoreError::OutOfRange {
                offset: 0,
                length: 8,
                capacity: 4,
            },
        });
        let m = obs.snapshot();
        assert_eq!(m.reads, 0);
        assert_eq!(m.bytes_read, 0);
        assert_eq!(m.rejections, 1);
    }
}
