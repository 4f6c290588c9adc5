//! Positioned-read file source

use crate::error::{HashError, IoResultExt, Result};
use crate::source::AddressableSource;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File read through seek + read, for files that should not be mapped
/// (pipes exposed as files, network filesystems, files that may change size)
pub struct FileSource {
    path: PathBuf,
    file: Mutex<File>,
    size: u64,
}

impl FileSource {
    /// Open `path` for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_path(path)?;
        let size = file.metadata().with_path(path)?.len();
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            size,
        })
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AddressableSource for FileSource {
    fn size(&self) -> u64 {
        self.size
    }

    fn read(&self, address: u64, buf: &mut [u8]) -> Result<()> {
        let length = buf.len() as u64;
        let read_error = |source: std::io::Error| HashError::SourceRead {
            address,
            length,
            source,
        };

        let mut file = self
            .file
            .lock()
            .map_err(|_| read_error(std::io::Error::new(ErrorKind::Other, "file lock poisoned")))?;
        file.seek(SeekFrom::Start(address)).map_err(read_error)?;

        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(HashError::ShortRead {
                        address,
                        expected: length,
                        actual: filled as u64,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(read_error(e)),
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSource")
            .field("path", &self.path)
            .field("size", &self.size)
            .finish()
    }
}
