//! Error types for quickxorhash
//!
//! The hash core is total; every error here comes from the I/O and
//! bookkeeping wrapped around it.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for quickxorhash operations
#[derive(Error, Debug)]
pub enum QuickXorError {
    /// I/O error while opening or reading input
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File or directory not found
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Digest text could not be parsed
    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    /// Hash verification failed
    #[error("Integrity check failed for '{path}': expected {expected}, got {actual}")]
    IntegrityMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Manifest parsing/writing error
    #[error("Manifest error: {0}")]
    ManifestError(String),

    /// Thread pool error
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),

    /// Multiple errors occurred
    #[error("Multiple errors occurred ({count} errors)")]
    MultipleErrors {
        count: usize,
        errors: Vec<QuickXorError>,
    },
}

impl QuickXorError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound(path.into());
        }
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an integrity mismatch error
    pub fn integrity_mismatch(
        path: impl Into<PathBuf>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::IntegrityMismatch {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// True for failures to open or read input
    pub fn is_io(&self) -> bool {
        match self {
            Self::Io { .. } | Self::NotFound(_) => true,
            Self::MultipleErrors { errors, .. } => errors.iter().any(|e| e.is_io()),
            _ => false,
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::NotFound(path) | Self::IntegrityMismatch { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }
}

/// Result type alias for quickxorhash operations
pub type Result<T> = std::result::Result<T, QuickXorError>;

impl From<std::io::Error> for QuickXorError {
    fn from(err: std::io::Error) -> Self {
        QuickXorError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for QuickXorError {
    fn from(err: serde_json::Error) -> Self {
        QuickXorError::ManifestError(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| QuickXorError::io(path, e))
    }
}

/// Collects multiple results into a single result
pub fn collect_errors<T>(results: Vec<Result<T>>) -> Result<Vec<T>> {
    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(value) => successes.push(value),
            Err(e) => errors.push(e),
        }
    }

    match errors.len() {
        0 => Ok(successes),
        1 => Err(errors.remove(0)),
        count => Err(QuickXorError::MultipleErrors { count, errors }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = QuickXorError::io("/test/path", io_err);
        assert!(err.is_io());
        assert_eq!(err.path().unwrap(), &PathBuf::from("/test/path"));
    }

    #[test]
    fn test_not_found_is_mapped() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = QuickXorError::io("/missing", io_err);
        assert!(matches!(err, QuickXorError::NotFound(_)));
        assert!(err.is_io());
    }

    #[test]
    fn test_non_io_errors() {
        let err = QuickXorError::InvalidDigest("xyz".to_string());
        assert!(!err.is_io());
        assert!(err.path().is_none());

        let err = QuickXorError::integrity_mismatch("/a", "00", "11");
        assert!(!err.is_io());
        assert!(err.to_string().contains("expected 00"));
    }

    #[test]
    fn test_collect_errors() {
        let results: Vec<Result<i32>> = vec![Ok(1), Ok(2), Ok(3)];
        assert_eq!(collect_errors(results).unwrap(), vec![1, 2, 3]);

        let results: Vec<Result<i32>> = vec![Ok(1), Err(QuickXorError::config("bad"))];
        assert!(matches!(
            collect_errors(results),
            Err(QuickXorError::ConfigError(_))
        ));

        let results: Vec<Result<i32>> = vec![
            Ok(1),
            Err(QuickXorError::config("bad")),
            Err(QuickXorError::NotFound(PathBuf::from("/x"))),
        ];
        match collect_errors(results) {
            Err(QuickXorError::MultipleErrors { count, .. }) => assert_eq!(count, 2),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }
}
