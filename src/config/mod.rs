//! Configuration module for regionhash
//!
//! Provides CLI arguments, the runtime hash configuration and JSON
//! parameter records.

mod settings;

pub use settings::*;
