//! The backend seam driven by block protocol hosts.

use crate::error::StoreError;

/// Byte-addressed block storage driven by an external protocol handler.
///
/// All methods take `&self`: implementations that hold mutable state
/// guard it internally so a backend can be shared across request
/// threads behind an `Arc`.
pub trait BlockBackend: Send + Sync {
    /// Return exactly `length` bytes starting at `offset`.
    fn read(&self, offset: u64, length: u64) -> Result<Vec<u8>, StoreError>;

    /// Fill `buf` with the bytes starting at `offset`.
    ///
    /// The default forwards to [`read`](Self::read) and rejects answers
    /// whose length differs from `buf.len()` with
    /// [`StoreError::LengthMismatch`].
    fn read_into(&self, offset: u64, buf: &mut [u8]) -> Result<(), StoreError> {
        let data = self.read(offset, buf.len() as u64)?;
        if data.len() != buf.len() {
            return Err(StoreError::LengthMismatch {
                expected: buf.len() as u64,
                actual: data.len() as u64,
            });
        }
        buf.copy_from_slice(&data);
        Ok(())
    }

    /// Copy `data` into the store starting at `offset`.
    fn write(&self, offset: u64, data: &[u8]) -> Result<(), StoreError>;

    /// Acknowledge that all prior writes are durable.
    fn flush(&self) -> Result<(), StoreError>;

    /// Advisory hint that `[offset, offset + length)` is no longer needed.
    fn trim(&self, offset: u64, length: u64) -> Result<(), StoreError>;

    /// Capacity in bytes. Constant for the lifetime of the backend.
    fn size(&self) -> u64;

    /// A client session ended.
    fn disconnect(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend answering every read with a fixed buffer.
    struct Fixed(Vec<u8>);

    impl BlockBackend for Fixed {
        fn read(&self, _offset: u64, _length: u64) -> Result<Vec<u8>, StoreError> {
            Ok(self.0.clone())
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
            1024
        }
        fn disconnect(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn read_into_copies_matching_answer() {
        let backend = Fixed(vec![1, 2, 3]);
        let mut buf = [0u8; 3];
        backend.read_into(0, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    fn read_into_rejects_short_answer() {
        let backend = Fixed(vec![1, 2]);
        let mut buf = [9u8; 3];
        assert_eq!(
            backend.read_into(0, &mut buf),
            Err(StoreError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(buf, [9, 9, 9], "buffer must be untouched on mismatch");
    }
}
