//! Addressable byte sources
//!
//! A source hands out exact byte ranges by absolute address. Regions over a
//! source are hashed window by window, so a source never has to hold the
//! whole range in memory at once.

mod file;
mod memory;
mod mmap;
mod region;

pub use file::FileSource;
pub use memory::MemorySource;
pub use mmap::MmapSource;
pub use region::Region;

use crate::error::{HashError, Result};

/// Random-access byte provider
///
/// Implementations must fill the whole buffer or fail. Addresses live in
/// `[base_address(), base_address() + size())`.
pub trait AddressableSource: Send + Sync {
    /// First valid address
    fn base_address(&self) -> u64 {
        0
    }

    /// Number of addressable bytes
    fn size(&self) -> u64;

    /// One past the last valid address
    fn end_address(&self) -> u64 {
        self.base_address().saturating_add(self.size())
    }

    /// Read exactly `buf.len()` bytes starting at `address`
    fn read(&self, address: u64, buf: &mut [u8]) -> Result<()>;

    /// Read `length` bytes starting at `address` into a new buffer
    fn read_vec(&self, address: u64, length: u64) -> Result<Vec<u8>> {
        let length = usize::try_from(length).map_err(|_| HashError::SourceRead {
            address,
            length,
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "read length exceeds addressable memory",
            ),
        })?;
        let mut buf = vec![0u8; length];
        self.read(address, &mut buf)?;
        Ok(buf)
    }
}

/// Copy `buf.len()` bytes out of `data`, which is mapped at `base`
pub(crate) fn read_from_slice(data: &[u8], base: u64, address: u64, buf: &mut [u8]) -> Result<()> {
    let expected = buf.len() as u64;
    let offset = address.checked_sub(base).ok_or_else(|| HashError::SourceRead {
        address,
        length: expected,
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("address is below source base {:#x}", base),
        ),
    })?;

    let available = (data.len() as u64).saturating_sub(offset);
    if available < expected {
        return Err(HashError::ShortRead {
            address,
            expected,
            actual: available,
        });
    }

    let start = offset as usize;
    buf.copy_from_slice(&data[start..start + buf.len()]);
    Ok(())
}
