//! Store configuration, validation, and error types.

use std::error::Error;
use std::fmt;

/// What [`trim`](crate::BoundedBlockStore) does with the hinted range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrimPolicy {
    /// Accept the hint and leave content untouched.
    #[default]
    Ignore,
    /// Zero the hinted range.
    Zero,
}

/// Configuration for a [`BoundedBlockStore`](crate::BoundedBlockStore).
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Store capacity in bytes.
    ///
    /// Default: 104_857_600 (100 MiB). Must be non-zero and addressable
    /// with `usize`.
    pub capacity: u64,

    /// Trim behavior. Default: [`TrimPolicy::Ignore`].
    pub trim_policy: TrimPolicy,
}

impl StoreConfig {
    /// Default capacity: 100 MiB.
    pub const DEFAULT_CAPACITY: u64 = 100 * 1024 * 1024;

    /// Create a config with the given capacity and the default trim policy.
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            trim_policy: TrimPolicy::default(),
        }
    }

    /// Replace the trim policy.
    pub fn with_trim_policy(mut self, trim_policy: TrimPolicy) -> Self {
        self.trim_policy = trim_policy;
        self
    }

    /// Check structural invariants, returning the capacity as `usize`.
    pub fn validate(&self) -> Result<usize, ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        usize::try_from(self.capacity).map_err(|_| ConfigError::CapacityTooLarge {
            capacity: self.capacity,
        })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Errors detected during [`StoreConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Capacity is zero.
    ZeroCapacity,
    /// Capacity cannot be allocated on this platform.
    CapacityTooLarge {
        /// The configured capacity.
        capacity: u64,
    },
    /// The allocator could not provide the backing region.
    AllocationFailed {
        /// The configured capacity.
        capacity: u64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "capacity must be at least 1 byte"),
            Self::CapacityTooLarge { capacity } => {
                write!(f, "capacity {capacity} exceeds the addressable range")
            }
            Self::AllocationFailed { capacity } => {
                write!(f, "could not allocate {capacity} bytes")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_100_mib() {
        let config = StoreConfig::default();
        assert_eq!(config.capacity, 104_857_600);
        assert_eq!(config.trim_policy, TrimPolicy::Ignore);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(
            StoreConfig::new(0).validate(),
            Err(ConfigError::ZeroCapacity)
        );
    }

    #[test]
    fn validate_returns_usize_capacity() {
        assert_eq!(StoreConfig::new(1024).validate(), Ok(1024));
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn capacity_beyond_usize_rejected() {
        let cap = u64::from(u32::MAX) + 1;
        assert_eq!(
            StoreConfig::new(cap).validate(),
            Err(ConfigError::CapacityTooLarge { capacity: cap })
        );
    }

    #[test]
    fn with_trim_policy_overrides() {
        let config = StoreConfig::new(64).with_trim_policy(TrimPolicy::Zero);
        assert_eq!(config.trim_policy, TrimPolicy::Zero);
        assert_eq!(config.capacity, 64);
    }
}
