//! Benchmark profiles and workloads for the memblk block store.
//!
//! - [`reference_config`]: 1 MiB store, the size used by the micro-benchmarks
//! - [`stress_config`]: the default 100 MiB store
//! - [`request_mix`]: deterministic read/write/trim traffic via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use memblk_core::Request;
use memblk_store::{StoreConfig, TrimPolicy};
use memblk_test_utils::patterned_bytes;

/// Capacity of [`reference_config`].
pub const REFERENCE_CAPACITY: u64 = 1024 * 1024;

/// Block size used by [`request_mix`].
pub const BLOCK_SIZE: u64 = 4096;

/// Build the reference benchmark profile: 1 MiB, trims zero content.
pub fn reference_config() -> StoreConfig {
    StoreConfig::new(REFERENCE_CAPACITY).with_trim_policy(TrimPolicy::Zero)
}

/// Build the stress profile: the default 100 MiB capacity.
pub fn stress_config() -> StoreConfig {
    StoreConfig::default()
}

/// Generate `n` block-aligned requests against a store of `capacity` bytes.
///
/// Roughly half reads, a third writes, the rest trims with an occasional
/// flush. Identical seeds produce identical traffic.
pub fn request_mix(seed: u64, n: usize, capacity: u64) -> Vec<Request> {
    let blocks = (capacity / BLOCK_SIZE).max(1);
    let mut state = seed;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let offset = ((state >> 33) % blocks) * BLOCK_SIZE;
        let length = BLOCK_SIZE.min(capacity - offset);
        let request = match (state >> 16) % 12 {
            0..=5 => Request::Read { offset, length },
            6..=9 => Request::Write {
                offset,
                data: patterned_bytes(seed ^ i as u64, length as usize),
            },
            10 => Request::Trim { offset, length },
            _ => Request::Flush,
        };
        out.push(request);
    }
    out
}
