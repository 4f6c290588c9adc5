//! In-memory source placed at an arbitrary base address

use crate::error::Result;
use crate::source::{read_from_slice, AddressableSource};

/// Owned byte buffer addressable from `base`
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    base: u64,
    data: Vec<u8>,
}

impl MemorySource {
    /// Buffer addressed from zero
    pub fn new(data: Vec<u8>) -> Self {
        Self::at(0, data)
    }

    /// Buffer whose first byte lives at `base`
    pub fn at(base: u64, data: Vec<u8>) -> Self {
        Self { base, data }
    }

    /// Underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for MemorySource {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for MemorySource {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl AddressableSource for MemorySource {
    fn base_address(&self) -> u64 {
        self.base
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn read(&self, address: u64, buf: &mut [u8]) -> Result<()> {
        read_from_slice(&self.data, self.base, address, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_with_base() {
        let source = MemorySource::at(0x4000, b"hello world".to_vec());
        assert_eq!(source.base_address(), 0x4000);
        assert_eq!(source.size(), 11);

        let mut buf = [0u8; 5];
        source.read(0x4006, &mut buf).unwrap();
        assert_eq!(&buf, b"world");

        assert!(source.read(0x4007, &mut buf).is_err());
        assert!(source.read(0, &mut buf).is_err());
    }

    #[test]
    fn test_empty_read_at_end() {
        let source = MemorySource::from(&b"abc"[..]);
        let mut buf = [0u8; 0];
        source.read(3, &mut buf).unwrap();
    }
}
