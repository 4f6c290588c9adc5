//! Chunked region reader
//!
//! Streams a region to a sink one window at a time, in ascending address
//! order, reusing a single window buffer.

use crate::error::{HashError, Result};
use crate::source::{AddressableSource, Region};

/// Default window size (1 MiB)
pub const DEFAULT_WINDOW_SIZE: usize = 1024 * 1024;

/// Receiver of consecutive windows
pub trait TransformSink {
    /// Consume `data`, located `offset` bytes after the region start
    fn transform(&mut self, offset: u64, data: &[u8]) -> Result<()>;
}

/// Sequential window reader over a half-open region
#[derive(Debug, Clone, Copy)]
pub struct ChunkedReader {
    window_size: usize,
}

impl Default for ChunkedReader {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl ChunkedReader {
    /// Create a reader with the given window size
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(HashError::invalid_parameter("window size must be greater than zero"));
        }
        Ok(Self { window_size })
    }

    /// Window size in bytes
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Feed every byte of `region` to `sink`; returns the number of bytes streamed
    ///
    /// A failed or short read stops the stream and is returned as-is.
    pub fn stream<S, T>(&self, region: Region, source: &S, sink: &mut T) -> Result<u64>
    where
        S: AddressableSource + ?Sized,
        T: TransformSink + ?Sized,
    {
        self.stream_from(region, source, 0, sink)
    }

    /// Like [`stream`](Self::stream), but offsets handed to the sink start at
    /// `first_offset`, so consecutive regions can feed one ongoing sink
    pub fn stream_from<S, T>(&self, region: Region, source: &S, first_offset: u64, sink: &mut T) -> Result<u64>
    where
        S: AddressableSource + ?Sized,
        T: TransformSink + ?Sized,
    {
        let window = self.window_size as u64;
        let mut buffer = vec![0u8; region.len().min(window) as usize];
        let mut address = region.start();

        while address < region.end() {
            let length = (region.end() - address).min(window) as usize;
            let chunk = &mut buffer[..length];

            source.read(address, chunk)?;
            tracing::trace!("window {:#x} (+{} bytes)", address, length);
            sink.transform(first_offset + (address - region.start()), chunk)?;

            address = address.saturating_add(window);
        }

        Ok(region.len())
    }
}

/// Stream `region` of `source` into `sink` with the given window size
pub fn stream_region<S, T>(region: Region, source: &S, window_size: usize, sink: &mut T) -> Result<u64>
where
    S: AddressableSource + ?Sized,
    T: TransformSink + ?Sized,
{
    ChunkedReader::new(window_size)?.stream(region, source, sink)
}
