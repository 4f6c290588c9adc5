//! # regionhash - streaming digests over addressable byte sources
//!
//! regionhash computes checksums and cryptographic digests over regions of
//! arbitrarily large byte sources (memory-mapped files, in-memory buffers at
//! any base address, positioned file reads) without loading the source into
//! memory. Regions are read in fixed-size windows and fed to the algorithm in
//! address order, so the digest never depends on the window size.
//!
//! ## Features
//!
//! - **Uniform algorithm contract**: checksums, keyed hashes, seeded
//!   checksums and parameterized families behind one trait
//! - **Descriptors**: named algorithm families with editable, serializable
//!   parameter values that are frozen before each run
//! - **Strict handle lifecycle**: every run gets a fresh, single-use handle
//! - **Parallel execution**: independent regions and files on the rayon pool
//!
//! ## Quick Start
//!
//! ```no_run
//! use regionhash::hash::find_descriptor;
//! use regionhash::source::{MmapSource, Region};
//! use std::path::Path;
//!
//! let source = MmapSource::open(Path::new("/data/disk.img")).unwrap();
//! let crc = find_descriptor("crc32").unwrap();
//!
//! let digest = crc.compute(Region::whole(&source), &source).unwrap();
//! println!("{}", digest);
//! ```
//!
//! ## Parameterized Algorithms
//!
//! ```no_run
//! use regionhash::hash::{find_descriptor, ParameterValues};
//! use regionhash::source::{MemorySource, Region};
//!
//! let source = MemorySource::at(0x1000, vec![0u8; 4096]);
//! let mut blake2b = find_descriptor("blake2b").unwrap();
//! blake2b
//!     .set_parameters(ParameterValues::Blake2 {
//!         key: "000102030405060708090a0b0c0d0e0f".to_string(),
//!         salt: String::new(),
//!         personalization: String::new(),
//!         hash_size: 4,
//!     })
//!     .unwrap();
//!
//! let region = Region::new(0x1000, 0x1800).unwrap();
//! let digest = blake2b.compute(region, &source).unwrap();
//! println!("{}", digest);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod hash;
pub mod progress;
pub mod source;

// Re-export commonly used types
pub use error::{HashError, Result};
pub use hash::{compute_digest, find_descriptor, Digest, HashDescriptor, HashExecutor, ParameterValues};
pub use progress::ProgressReporter;
pub use source::{AddressableSource, Region};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use regionhash::prelude::*;
    //! ```

    pub use crate::config::HashConfig;
    pub use crate::error::{HashError, Result};
    pub use crate::hash::{
        builtin_descriptors, compute_digest, find_descriptor, hash_file, hash_regions_parallel,
        Digest, ExecutionConfig, HashDescriptor, HashExecutor, HashJob, HashReport, ParameterValues,
    };
    pub use crate::progress::ProgressReporter;
    pub use crate::source::{AddressableSource, FileSource, MemorySource, MmapSource, Region};
}
