//! Progress reporter implementation
//!
//! Uses indicatif for a file counter and a byte throughput bar while
//! batches of files are hashed.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Progress reporter for hashing runs, shared across worker threads
pub struct ProgressReporter {
    multi: MultiProgress,
    files_bar: ProgressBar,
    bytes_bar: ProgressBar,
    start_time: Instant,
    total_bytes: AtomicU64,
    total_files: AtomicU64,
    bytes_hashed: AtomicU64,
    files_hashed: AtomicU64,
    enabled: AtomicBool,
}

impl ProgressReporter {
    /// Create a new progress reporter drawing to stderr
    pub fn new() -> Self {
        let multi = MultiProgress::new();

        let files_bar = multi.add(ProgressBar::new(0));
        files_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} files {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        files_bar.set_prefix("Files");

        let bytes_bar = multi.add(ProgressBar::new(0));
        bytes_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.green/white}] {bytes}/{total_bytes} ({bytes_per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bytes_bar.set_prefix("Data ");

        Self {
            multi,
            files_bar,
            bytes_bar,
            start_time: Instant::now(),
            total_bytes: AtomicU64::new(0),
            total_files: AtomicU64::new(0),
            bytes_hashed: AtomicU64::new(0),
            files_hashed: AtomicU64::new(0),
            enabled: AtomicBool::new(true),
        }
    }

    /// Create a reporter that counts but never draws
    pub fn disabled() -> Self {
        let reporter = Self::new();
        reporter.enabled.store(false, Ordering::SeqCst);
        reporter.multi.set_draw_target(ProgressDrawTarget::hidden());
        reporter
    }

    /// Set total bytes to hash
    pub fn set_total_bytes(&self, total: u64) {
        self.total_bytes.store(total, Ordering::Relaxed);
        self.bytes_bar.set_length(total);
    }

    /// Set total files to hash
    pub fn set_total_files(&self, total: u64) {
        self.total_files.store(total, Ordering::Relaxed);
        self.files_bar.set_length(total);
    }

    /// Record a finished file
    pub fn file_done(&self, path: &str, bytes: u64) {
        self.bytes_hashed.fetch_add(bytes, Ordering::Relaxed);
        self.files_hashed.fetch_add(1, Ordering::Relaxed);
        self.bytes_bar.inc(bytes);
        self.files_bar.inc(1);
        self.files_bar.set_message(path.to_string());
    }

    /// Clear the bars once the run is over
    pub fn finish(&self) {
        self.files_bar.finish_and_clear();
        self.bytes_bar.finish_and_clear();
    }

    /// Check if progress is drawn
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Get progress summary
    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary {
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
            bytes_hashed: self.bytes_hashed.load(Ordering::Relaxed),
            total_files: self.total_files.load(Ordering::Relaxed),
            files_hashed: self.files_hashed.load(Ordering::Relaxed),
            elapsed: self.start_time.elapsed(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of a hashing run
#[derive(Debug, Clone)]
pub struct ProgressSummary {
    /// Total bytes to hash
    pub total_bytes: u64,
    /// Bytes hashed so far
    pub bytes_hashed: u64,
    /// Total files to hash
    pub total_files: u64,
    /// Files hashed so far
    pub files_hashed: u64,
    /// Elapsed time
    pub elapsed: Duration,
}

impl ProgressSummary {
    /// Completion percentage by bytes
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            (self.bytes_hashed as f64 / self.total_bytes as f64) * 100.0
        }
    }

    /// Throughput in bytes/second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.bytes_hashed as f64 / secs
        } else {
            0.0
        }
    }

    /// One-line human readable summary
    pub fn describe(&self) -> String {
        format!(
            "Hashed {} files, {} in {:.1?} ({}/s)",
            self.files_hashed,
            humansize::format_size(self.bytes_hashed, humansize::BINARY),
            self.elapsed,
            humansize::format_size(self.throughput() as u64, humansize::BINARY)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_reporter() {
        let reporter = ProgressReporter::disabled();
        assert!(!reporter.is_enabled());

        reporter.set_total_bytes(1000);
        reporter.set_total_files(4);
        reporter.file_done("a.bin", 250);
        reporter.file_done("b.bin", 250);

        let summary = reporter.summary();
        assert_eq!(summary.bytes_hashed, 500);
        assert_eq!(summary.files_hashed, 2);
        assert_eq!(summary.percentage(), 50.0);
        assert!(summary.describe().starts_with("Hashed 2 files"));
        reporter.finish();
    }

    #[test]
    fn test_empty_summary() {
        let summary = ProgressReporter::disabled().summary();
        assert_eq!(summary.percentage(), 0.0);
    }
}
