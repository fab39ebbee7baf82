//! File-level hashing and integrity verification
//!
//! Wraps the accumulator with file and stdin readers, path-aware errors,
//! comparison helpers and parallel batch hashing.

use super::accumulator::hash_reader_with_buffer;
use super::digest::{Digest, DigestEncoding};
use crate::config::HashConfig;
use crate::error::{IoResultExt, QuickXorError, Result};
use crate::progress::ProgressReporter;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Default read buffer for files
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Path that selects standard input
pub const STDIN_PATH: &str = "-";

/// Digest of one input together with its size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashResult {
    /// Input path ("-" for stdin)
    pub path: PathBuf,
    /// QuickXorHash digest
    pub digest: Digest,
    /// Bytes hashed
    pub size: u64,
}

impl HashResult {
    /// Create a new hash result
    pub fn new(path: impl Into<PathBuf>, digest: Digest, size: u64) -> Self {
        Self {
            path: path.into(),
            digest,
            size,
        }
    }

    /// True if both inputs hashed to the same digest
    pub fn verify(&self, other: &HashResult) -> bool {
        self.digest == other.digest
    }

    /// Digest text in the requested encoding
    pub fn encoded(&self, encoding: DigestEncoding) -> String {
        self.digest.encode(encoding)
    }
}

impl std::fmt::Display for HashResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  {}", self.digest, self.path.display())
    }
}

/// Compute the digest of a file
pub fn hash_file(path: &Path) -> Result<HashResult> {
    hash_file_with_buffer(path, DEFAULT_BUFFER_SIZE)
}

/// Compute the digest of a file with a custom read buffer size
pub fn hash_file_with_buffer(path: &Path, buffer_size: usize) -> Result<HashResult> {
    let file = File::open(path).with_path(path)?;
    let (digest, size) = hash_reader_with_buffer(file, buffer_size).with_path(path)?;

    tracing::debug!("Hashed {} ({} bytes): {}", path.display(), size, digest);
    Ok(HashResult::new(path, digest, size))
}

/// Compute the digest of standard input
pub fn hash_stdin(buffer_size: usize) -> Result<HashResult> {
    let stdin = std::io::stdin().lock();
    let (digest, size) = hash_reader_with_buffer(stdin, buffer_size).with_path(STDIN_PATH)?;

    tracing::debug!("Hashed stdin ({} bytes): {}", size, digest);
    Ok(HashResult::new(STDIN_PATH, digest, size))
}

/// Hash a path, treating "-" as standard input
pub fn hash_input(path: &Path, buffer_size: usize) -> Result<HashResult> {
    if path.as_os_str() == STDIN_PATH {
        hash_stdin(buffer_size)
    } else {
        hash_file_with_buffer(path, buffer_size)
    }
}

/// Check a file against an expected digest
pub fn verify_file(path: &Path, expected: &Digest) -> Result<bool> {
    let actual = hash_file(path)?;
    Ok(actual.digest == *expected)
}

/// Like [`verify_file`], but a mismatch is an error
pub fn ensure_file_matches(path: &Path, expected: &Digest) -> Result<HashResult> {
    let actual = hash_file(path)?;
    if actual.digest != *expected {
        return Err(QuickXorError::integrity_mismatch(
            path,
            expected.to_hex(),
            actual.digest.to_hex(),
        ));
    }
    Ok(actual)
}

/// Verify two files have identical content
pub fn verify_files_match(source: &Path, dest: &Path) -> Result<VerificationResult> {
    let source_hash = hash_file(source)?;
    let dest_hash = hash_file(dest)?;

    let matches = source_hash.verify(&dest_hash);

    Ok(VerificationResult {
        source_hash,
        dest_hash,
        matches,
    })
}

/// Result of verifying two files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Hash of the source file
    pub source_hash: HashResult,
    /// Hash of the destination file
    pub dest_hash: HashResult,
    /// Whether the hashes match
    pub matches: bool,
}

/// Batch hash multiple files in parallel.
///
/// Results come back in input order; a failure for one file does not stop
/// the others. Failures are returned, not logged, so callers report each
/// one once.
pub fn hash_files_parallel(
    paths: &[PathBuf],
    config: &HashConfig,
    progress: &ProgressReporter,
) -> Result<Vec<Result<HashResult>>> {
    let threads = config.effective_threads();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| QuickXorError::ThreadPoolError(e.to_string()))?;

    let total_bytes: u64 = paths
        .iter()
        .filter_map(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .sum();
    progress.set_total_files(paths.len() as u64);
    progress.set_total_bytes(total_bytes);

    tracing::info!("Hashing {} files on {} threads", paths.len(), threads);

    let buffer_size = config.buffer_size;
    let results: Vec<Result<HashResult>> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let result = hash_file_with_buffer(path, buffer_size);
                if let Ok(hashed) = &result {
                    progress.file_done(&path.display().to_string(), hashed.size);
                }
                result
            })
            .collect()
    });

    progress.finish();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_slice;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_hash_file_matches_memory() {
        let dir = TempDir::new().unwrap();
        let content: Vec<u8> = (0..5000).map(|i| (i * 7 % 251) as u8).collect();
        let path = create_test_file(dir.path(), "test.bin", &content);

        let file_hash = hash_file(&path).unwrap();
        assert_eq!(file_hash.digest, hash_slice(&content));
        assert_eq!(file_hash.size, 5000);

        // Tiny buffers must not change the result
        let small = hash_file_with_buffer(&path, 3).unwrap();
        assert_eq!(small.digest, file_hash.digest);
    }

    #[test]
    fn test_hash_file_golden() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), "abc.txt", b"abc");

        let result = hash_input(&path, DEFAULT_BUFFER_SIZE).unwrap();
        assert_eq!(result.encoded(DigestEncoding::Hex), "6110c31800000000000000000300000000000000");
        assert_eq!(result.to_string(), format!("6110c31800000000000000000300000000000000  {}", path.display()));
    }

    #[test]
    fn test_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), "empty", b"");

        let result = hash_file(&path).unwrap();
        assert_eq!(result.size, 0);
        assert!(result.digest.block().is_zero());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = hash_file(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, QuickXorError::NotFound(_)));
    }

    #[test]
    fn test_verify_files() {
        let dir = TempDir::new().unwrap();
        let path1 = create_test_file(dir.path(), "file1.bin", b"Identical content");
        let path2 = create_test_file(dir.path(), "file2.bin", b"Identical content");

        let result = verify_files_match(&path1, &path2).unwrap();
        assert!(result.matches);

        std::fs::write(&path2, b"Different content").unwrap();
        let result = verify_files_match(&path1, &path2).unwrap();
        assert!(!result.matches);
    }

    #[test]
    fn test_verify_against_digest() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), "a.txt", b"a");
        let expected: Digest = "YQAAAAAAAAAAAAAAAQAAAAAAAAA=".parse().unwrap();

        assert!(verify_file(&path, &expected).unwrap());
        assert!(ensure_file_matches(&path, &expected).is_ok());

        std::fs::write(&path, b"b").unwrap();
        assert!(!verify_file(&path, &expected).unwrap());
        assert!(matches!(
            ensure_file_matches(&path, &expected),
            Err(QuickXorError::IntegrityMismatch { .. })
        ));
    }

    #[test]
    fn test_hash_files_parallel() {
        let dir = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for i in 0..8 {
            let content = vec![i as u8; 100 * (i + 1)];
            paths.push(create_test_file(dir.path(), &format!("f{}.bin", i), &content));
        }
        paths.push(dir.path().join("missing.bin"));

        let config = HashConfig {
            threads: 3,
            ..Default::default()
        };
        let progress = ProgressReporter::disabled();
        let results = hash_files_parallel(&paths, &config, &progress).unwrap();

        assert_eq!(results.len(), 9);
        for (i, result) in results.iter().take(8).enumerate() {
            let hashed = result.as_ref().unwrap();
            assert_eq!(hashed.path, paths[i]);
            assert_eq!(hashed.digest, hash_slice(&vec![i as u8; 100 * (i + 1)]));
        }
        assert!(results[8].is_err());
        assert_eq!(progress.summary().files_hashed, 8);
    }

    #[test]
    fn test_parallel_failures_are_collected_once() {
        let dir = TempDir::new().unwrap();
        let present = create_test_file(dir.path(), "present.bin", b"abc");
        let missing = dir.path().join("missing.bin");

        let config = HashConfig::default();
        let progress = ProgressReporter::disabled();
        let results = hash_files_parallel(&[present, missing.clone()], &config, &progress).unwrap();

        match crate::error::collect_errors(results) {
            Err(QuickXorError::NotFound(path)) => assert_eq!(path, missing),
            other => panic!("expected a single NotFound, got {:?}", other),
        }
    }
}
