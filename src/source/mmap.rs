//! Memory-mapped file source

use crate::error::{IoResultExt, Result};
use crate::source::{read_from_slice, AddressableSource};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Read-only memory map of a file, addressed from zero
///
/// Zero-length files cannot be mapped, so they are represented without a map.
pub struct MmapSource {
    path: PathBuf,
    map: Option<Mmap>,
}

impl MmapSource {
    /// Map `path` read-only
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_path(path)?;
        let len = file.metadata().with_path(path)?.len();

        let map = if len == 0 {
            None
        } else {
            // SAFETY: the map is read-only; concurrent truncation of the file
            // by another process is outside what this crate can guard against.
            Some(unsafe { Mmap::map(&file) }.with_path(path)?)
        };

        tracing::debug!("Mapped {:?} ({} bytes)", path, len);
        Ok(Self {
            path: path.to_path_buf(),
            map,
        })
    }

    /// Path of the mapped file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }
}

impl AddressableSource for MmapSource {
    fn size(&self) -> u64 {
        self.bytes().len() as u64
    }

    fn read(&self, address: u64, buf: &mut [u8]) -> Result<()> {
        read_from_slice(self.bytes(), 0, address, buf)
    }
}

impl std::fmt::Debug for MmapSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MmapSource")
            .field("path", &self.path)
            .field("size", &self.size())
            .finish()
    }
}
