//! Region hashing engine
//!
//! Provides:
//! - A uniform contract over checksum, keyed and cryptographic hash crates
//! - Descriptors binding algorithm names to factories and parameters
//! - A chunked reader streaming regions of any addressable source
//! - The executor running one fresh handle per invocation

mod algorithms;
mod builtin;
mod descriptor;
mod digest;
mod executor;
mod handle;
mod reader;

pub use algorithms::*;
pub use builtin::*;
pub use descriptor::*;
pub use digest::*;
pub use executor::*;
pub use handle::*;
pub use reader::*;
