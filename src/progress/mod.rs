//! Progress reporting module
//!
//! Progress bars and run summaries for multi-file hashing.

mod reporter;

pub use reporter::*;
