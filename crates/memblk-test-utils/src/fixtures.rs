//! Reusable store fixtures and payload generators.

use std::sync::Arc;

use memblk_core::StoreObserver;
use memblk_store::{BoundedBlockStore, StoreConfig};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// `len` pseudo-random bytes, identical for identical `seed`s.
pub fn patterned_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut out = vec![0u8; len];
    rng.fill_bytes(&mut out);
    out
}

/// A store of `capacity` bytes with the default trim policy.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn small_store(capacity: u64) -> BoundedBlockStore {
    BoundedBlockStore::new(StoreConfig::new(capacity)).expect("test store config must be valid")
}

/// A store built from `config` that reports to `observer`.
///
/// # Panics
///
/// Panics if `config` is invalid.
pub fn small_store_with(
    config: StoreConfig,
    observer: Arc<dyn StoreObserver>,
) -> BoundedBlockStore {
    BoundedBlockStore::with_observer(config, observer).expect("test store config must be valid")
}
