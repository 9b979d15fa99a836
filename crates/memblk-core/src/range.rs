//! Validated byte ranges.

use std::fmt;
use std::ops::Range;

use crate::error::StoreError;

/// A half-open byte range `[offset, offset + length)` known to fit inside
/// a store of a given capacity.
///
/// The only way to obtain one is [`ByteRange::checked`], so holding a
/// `ByteRange` means the bound check has already happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ByteRange {
    offset: u64,
    length: u64,
}

impl ByteRange {
    /// Validate `offset` and `length` against `capacity`.
    ///
    /// Fails with [`StoreError::OutOfRange`] when `offset + length`
    /// exceeds `capacity` or overflows `u64`. A zero-length range at
    /// `offset == capacity` is valid.
    pub fn checked(offset: u64, length: u64, capacity: u64) -> Result<Self, StoreError> {
        match offset.checked_add(length) {
            Some(end) if end <= capacity => Ok(Self { offset, length }),
            _ => Err(StoreError::OutOfRange {
                offset,
                length,
                capacity,
            }),
        }
    }

    /// First byte of the range.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of bytes in the range.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// One past the last byte of the range.
    pub fn end(&self) -> u64 {
        // Cannot overflow: checked at construction.
        self.offset + self.length
    }

    /// Whether the range covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Convert to a slice index range.
    ///
    /// Fails with [`StoreError::InvalidArgument`] if the range cannot be
    /// addressed with `usize` on this platform.
    pub fn to_index(&self) -> Result<Range<usize>, StoreError> {
        let start = usize::try_from(self.offset)
            .map_err(|_| StoreError::invalid(format!("offset {} exceeds usize", self.offset)))?;
        let end = usize::try_from(self.end())
            .map_err(|_| StoreError::invalid(format!("range end {} exceeds usize", self.end())))?;
        Ok(start..end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.offset, self.end())
    }
}
