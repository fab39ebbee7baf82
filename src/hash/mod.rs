//! QuickXorHash computation and integrity verification
//!
//! `block` and `accumulator` implement the 160-bit hash itself; the other
//! modules wrap it with digest rendering, file hashing and manifests.

pub mod accumulator;
pub mod block;
mod digest;
mod integrity;
mod manifest;

pub use accumulator::{hash_reader, hash_reader_with_buffer, hash_slice, QuickXorHasher, WINDOW_BYTES};
pub use block::{Block, BLOCK_BITS, BLOCK_BYTES};
pub use digest::*;
pub use integrity::*;
pub use manifest::*;
