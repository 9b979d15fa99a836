//! The bounded in-memory block store.

use std::fmt;
use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use memblk_core::{BlockBackend, ByteRange, NoopObserver, Op, StoreError, StoreEvent, StoreObserver};

use crate::config::{ConfigError, StoreConfig, TrimPolicy};

/// A fixed-capacity, zero-initialized byte region.
///
/// Every operation validates its range against the capacity before
/// touching memory, so rejected calls have no effect. The region sits
/// behind a single mutex because overlapping byte copies are not atomic;
/// share the store across threads with `Arc<BoundedBlockStore>`.
pub struct BoundedBlockStore {
    data: Mutex<Vec<u8>>,
    capacity: u64,
    trim_policy: TrimPolicy,
    observer: Arc<dyn StoreObserver>,
}

impl BoundedBlockStore {
    /// Allocate a store that reports to no one.
    pub fn new(config: StoreConfig) -> Result<Self, ConfigError> {
        Self::with_observer(config, Arc::new(NoopObserver))
    }

    /// Allocate a store that reports every call to `observer`.
    pub fn with_observer(
        config: StoreConfig,
        observer: Arc<dyn StoreObserver>,
    ) -> Result<Self, ConfigError> {
        let len = config.validate()?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| ConfigError::AllocationFailed {
                capacity: config.capacity,
            })?;
        data.resize(len, 0);
        Ok(Self {
            data: Mutex::new(data),
            capacity: config.capacity,
            trim_policy: config.trim_policy,
            observer,
        })
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// The configured trim behavior.
    pub fn trim_policy(&self) -> TrimPolicy {
        self.trim_policy
    }

    // A panicking writer cannot leave a byte buffer in an invalid state.
    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn index(&self, op: Op, offset: u64, length: u64) -> Result<Range<usize>, StoreError> {
        ByteRange::checked(offset, length, self.capacity)
            .and_then(|range| range.to_index())
            .map_err(|error| self.reject(op, error))
    }

    fn reject(&self, op: Op, error: StoreError) -> StoreError {
        self.observer.on_event(&StoreEvent::Rejected {
            op,
            error: error.clone(),
        });
        error
    }
}

impl BlockBackend for BoundedBlockStore {
    fn read(&self, offset: u64, length: u64) -> Result<Vec<u8>, StoreError> {
        let idx = self.index(Op::Read, offset, length)?;
        let out = self.lock()[idx].to_vec();
        self.observer.on_event(&StoreEvent::Read { offset, length });
        Ok(out)
    }

    fn read_into(&self, offset: u64, buf: &mut [u8]) -> Result<(), StoreError> {
        let length = buf.len() as u64;
        let idx = self.index(Op::Read, offset, length)?;
        buf.copy_from_slice(&self.lock()[idx]);
        self.observer.on_event(&StoreEvent::Read { offset, length });
        Ok(())
    }

    fn write(&self, offset: u64, data: &[u8]) -> Result<(), StoreError> {
        let length = data.len() as u64;
        let idx = self.index(Op::Write, offset, length)?;
        self.lock()[idx].copy_from_slice(data);
        self.observer.on_event(&StoreEvent::Write { offset, length });
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.observer.on_event(&StoreEvent::Flush);
        Ok(())
    }

    fn trim(&self, offset: u64, length: u64) -> Result<(), StoreError> {
        let idx = self.index(Op::Trim, offset, length)?;
        let zeroed = self.trim_policy == TrimPolicy::Zero && !idx.is_empty();
        if zeroed {
            self.lock()[idx].fill(0);
        }
        self.observer.on_event(&StoreEvent::Trim {
            offset,
            length,
            zeroed,
        });
        Ok(())
    }

    fn size(&self) -> u64 {
        self.observer.on_event(&StoreEvent::Size {
            capacity: self.capacity,
        });
        self.capacity
    }

    fn disconnect(&self) -> Result<(), StoreError> {
        self.observer.on_event(&StoreEvent::Disconnect);
        Ok(())
    }
}

impl fmt::Debug for BoundedBlockStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBlockStore")
            .field("capacity", &self.capacity)
            .field("trim_policy", &self.trim_policy)
            .finish_non_exhaustive()
    }
}
