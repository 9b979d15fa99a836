//! Test utilities and mock types for memblk development.
//!
//! Provides a recording [`StoreObserver`], deterministic payload
//! generation, and backends that break the [`BlockBackend`] contract on
//! purpose so host-side checks can be exercised.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::{Mutex, PoisonError};

use memblk_core::{BlockBackend, StoreError, StoreEvent, StoreObserver};

pub use fixtures::{patterned_bytes, small_store, small_store_with};

/// Observer that keeps every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<StoreEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events recorded so far, oldest first.
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl StoreObserver for RecordingObserver {
    fn on_event(&self, event: &StoreEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Backend whose reads come back `shortfall` bytes short.
///
/// Every other operation succeeds without storing anything. Used to
/// check that hosts reject answers of the wrong length.
#[derive(Debug)]
pub struct ShortReadBackend {
    capacity: u64,
    shortfall: u64,
}

impl ShortReadBackend {
    pub fn new(capacity: u64, shortfall: u64) -> Self {
        Self {
            capacity,
            shortfall,
        }
    }
}

impl BlockBackend for ShortReadBackend {
    fn read(&self, _offset: u64, length: u64) -> Result<Vec<u8>, StoreError> {
        Ok(vec![0; length.saturating_sub(self.shortfall) as usize])
    }

    fn write(&self, _offset: u64, _data: &[u8]) -> Result<(), StoreError> {
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn trim(&self, _offset: u64, _length: u64) -> Result<(), StoreError> {
        Ok(())
    }

    fn size(&self) -> u64 {
        self.capacity
    }

    fn disconnect(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
