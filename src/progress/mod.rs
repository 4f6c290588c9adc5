//! Progress reporting module
//!
//! Byte and region progress for long hash runs, with throughput and ETA.

mod reporter;

pub use reporter::*;
