//! Address ranges over a source

use crate::error::{HashError, Result};
use crate::source::AddressableSource;
use serde::{Deserialize, Serialize};

/// Half-open address range `[start, end)`
///
/// The byte at `end` is never part of the region, so `start == end` is the
/// empty region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRegion")]
pub struct Region {
    start: u64,
    end: u64,
}

#[derive(Deserialize)]
struct RawRegion {
    start: u64,
    end: u64,
}

impl TryFrom<RawRegion> for Region {
    type Error = HashError;

    fn try_from(raw: RawRegion) -> Result<Self> {
        Region::new(raw.start, raw.end)
    }
}

impl Region {
    /// Create a region, rejecting `start > end`
    pub fn new(start: u64, end: u64) -> Result<Self> {
        if start > end {
            return Err(HashError::InvalidRegion { start, end });
        }
        Ok(Self { start, end })
    }

    /// Region of `length` bytes starting at `start`
    pub fn with_length(start: u64, length: u64) -> Result<Self> {
        let end = start.checked_add(length).ok_or_else(|| {
            HashError::invalid_parameter(format!(
                "region of {} bytes at {:#x} overflows the address space",
                length, start
            ))
        })?;
        Self::new(start, end)
    }

    /// Region covering every address of a source
    pub fn whole<S: AddressableSource + ?Sized>(source: &S) -> Self {
        Self {
            start: source.base_address(),
            end: source.end_address(),
        }
    }

    /// First address in the region
    pub fn start(&self) -> u64 {
        self.start
    }

    /// One past the last address in the region
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bytes covered
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the region covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `address` lies inside the region
    pub fn contains(&self, address: u64) -> bool {
        address >= self.start && address < self.end
    }

    /// Whether the region lies entirely inside `[base, bound)`
    pub fn fits_within(&self, base: u64, bound: u64) -> bool {
        self.start >= base && self.end <= bound
    }

    /// Split into `[start, mid)` and `[mid, end)`
    pub fn split_at(&self, mid: u64) -> Result<(Region, Region)> {
        if mid < self.start || mid > self.end {
            return Err(HashError::invalid_parameter(format!(
                "split address {:#x} outside region {}",
                mid, self
            )));
        }
        Ok((
            Region { start: self.start, end: mid },
            Region { start: mid, end: self.end },
        ))
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}..{:#x}", self.start, self.end)
    }
}
