//! # quickxorhash - QuickXorHash checksums
//!
//! QuickXorHash is a fast, non-cryptographic, order-sensitive and
//! length-aware 160-bit checksum used to detect file content changes.
//! Input bytes are XOR-folded into a 160-byte accumulator, spread across
//! eight rotated 160-bit blocks, combined and mixed with the input length.
//!
//! ## Features
//!
//! - **Streaming**: single pass, any chunking, any `std::io::Read`
//! - **Hex and base64 digests**: matching the reference tool and the form
//!   published by cloud storage APIs
//! - **Parallel batch hashing**: independent hashers on a rayon pool
//! - **Manifests**: record a directory tree, then report what changed
//!
//! ## Quick Start
//!
//! ```
//! use quickxorhash::hash::{hash_slice, QuickXorHasher};
//!
//! let digest = hash_slice(b"abc");
//! assert_eq!(digest.to_hex(), "6110c31800000000000000000300000000000000");
//!
//! let mut hasher = QuickXorHasher::new();
//! hasher.update(b"a");
//! hasher.update(b"bc");
//! assert_eq!(hasher.finalize(), digest);
//! ```
//!
//! ## Files and Manifests
//!
//! ```no_run
//! use quickxorhash::config::HashConfig;
//! use quickxorhash::hash::{hash_file, HashManifest};
//! use quickxorhash::progress::ProgressReporter;
//! use std::path::Path;
//!
//! let result = hash_file(Path::new("/data/disk.img")).unwrap();
//! println!("{}", result.digest.to_base64());
//!
//! let config = HashConfig::default();
//! let progress = ProgressReporter::disabled();
//! let manifest = HashManifest::build(Path::new("/data"), &config, &progress).unwrap();
//! let diff = manifest.check(Path::new("/data"), &config, &progress).unwrap();
//! assert!(diff.is_clean());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod hash;
pub mod progress;

// Re-export commonly used types
pub use config::HashConfig;
pub use error::{QuickXorError, Result};
pub use hash::{hash_reader, hash_slice, Block, Digest, QuickXorHasher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use quickxorhash::prelude::*;
    //! ```

    pub use crate::config::{HashConfig, OutputFormat};
    pub use crate::error::{QuickXorError, Result};
    pub use crate::hash::{
        hash_file, hash_reader, hash_slice, verify_files_match, Block, Digest, DigestEncoding,
        HashManifest, HashResult, QuickXorHasher,
    };
    pub use crate::progress::ProgressReporter;
}
