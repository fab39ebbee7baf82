//! Configuration settings for quickxorhash
//!
//! Defines the CLI arguments, subcommands and the runtime configuration
//! derived from them.

use crate::error::{QuickXorError, Result};
use crate::hash::DigestEncoding;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// quickxorhash - 160-bit QuickXorHash checksums for change detection
#[derive(Parser, Debug, Clone)]
#[command(name = "quickxorhash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compute QuickXorHash digests of files")]
#[command(long_about = r#"
Computes the QuickXorHash of each input: a fast, non-cryptographic,
length-aware 160-bit checksum used to detect file content changes.

Examples:
  quickxorhash file.bin                         # <digest>  file.bin
  quickxorhash --bare file.bin                  # digest only
  cat file.bin | quickxorhash                   # hash stdin
  quickxorhash -e base64 *.iso                  # base64 digests
  quickxorhash verify a.bin b.bin               # compare two files
  quickxorhash check file.bin <DIGEST>          # compare against a digest
  quickxorhash manifest create /data -o m.json  # record a directory
  quickxorhash manifest check m.json            # report changed files
"#)]
pub struct CliArgs {
    /// Files to hash ("-" or none reads stdin)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Digest text encoding
    #[arg(short = 'e', long, value_enum, default_value = "hex", value_name = "ENC")]
    pub encoding: DigestEncoding,

    /// Print only the digest (no file name)
    #[arg(long)]
    pub bare: bool,

    /// Number of parallel threads (0 = auto-detect)
    #[arg(short = 't', long, default_value = "0", value_name = "NUM")]
    pub threads: usize,

    /// Read buffer size (e.g., 1M, 64K)
    #[arg(short = 'b', long, default_value = "1M", value_name = "SIZE")]
    pub buffer_size: String,

    /// Output format for reports
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Show a progress bar
    #[arg(short = 'p', long)]
    pub progress: bool,

    /// Follow symbolic links when scanning directories
    #[arg(short = 'L', long)]
    pub follow_symlinks: bool,

    /// Include hidden files when scanning directories
    #[arg(long)]
    pub include_hidden: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check that two files have the same digest
    #[command(name = "verify")]
    Verify {
        /// Source path
        source: PathBuf,
        /// Destination path
        destination: PathBuf,
    },

    /// Compare a file against an expected digest (hex or base64)
    #[command(name = "check")]
    Check {
        /// File to hash
        file: PathBuf,
        /// Expected digest
        digest: String,
    },

    /// Record or re-check digests for a directory tree
    #[command(name = "manifest")]
    Manifest {
        #[command(subcommand)]
        action: ManifestCommand,
    },
}

/// Manifest subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ManifestCommand {
    /// Hash every file under a directory and save the manifest
    #[command(name = "create")]
    Create {
        /// Directory to scan
        root: PathBuf,
        /// Output manifest path
        #[arg(short, long, default_value = "quickxorhash.json")]
        output: PathBuf,
    },

    /// Re-hash a recorded directory and report differences
    #[command(name = "check")]
    Check {
        /// Manifest file path
        manifest: PathBuf,
        /// Directory to check (defaults to the recorded root)
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashConfig {
    /// Thread count (0 = auto-detect)
    pub threads: usize,
    /// Read buffer size in bytes
    pub buffer_size: usize,
    /// Digest text encoding
    pub encoding: DigestEncoding,
    /// Report format
    pub output_format: OutputFormat,
    /// Show progress
    pub progress: bool,
    /// Follow symlinks during scans
    pub follow_symlinks: bool,
    /// Include hidden files during scans
    pub include_hidden: bool,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            buffer_size: 1024 * 1024, // 1MB
            encoding: DigestEncoding::Hex,
            output_format: OutputFormat::Text,
            progress: false,
            follow_symlinks: false,
            include_hidden: false,
        }
    }
}

impl HashConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let buffer_size = parse_size(&args.buffer_size)
            .map_err(|e| QuickXorError::config(format!("Invalid buffer size: {}", e)))?;
        if buffer_size == 0 {
            return Err(QuickXorError::config("Buffer size must be greater than zero"));
        }

        Ok(Self {
            threads: args.threads,
            buffer_size: buffer_size as usize,
            encoding: args.encoding,
            output_format: args.output_format,
            progress: args.progress && !args.quiet,
            follow_symlinks: args.follow_symlinks,
            include_hidden: args.include_hidden,
        })
    }

    /// Thread count with auto-detection resolved
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

/// Parse human-readable size string to bytes
pub fn parse_size(size: &str) -> std::result::Result<u64, String> {
    let size = size.trim().to_uppercase();

    if size.is_empty() {
        return Err("Empty size string".to_string());
    }

    let (num_str, multiplier) = if size.ends_with("GB") || size.ends_with('G') {
        (size.trim_end_matches(['G', 'B']), 1024u64 * 1024 * 1024)
    } else if size.ends_with("MB") || size.ends_with('M') {
        (size.trim_end_matches(['M', 'B']), 1024u64 * 1024)
    } else if size.ends_with("KB") || size.ends_with('K') {
        (size.trim_end_matches(['K', 'B']), 1024u64)
    } else {
        (size.trim_end_matches('B'), 1u64)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", num_str))?;

    if num < 0.0 {
        return Err(format!("Negative size: {}", num_str));
    }

    Ok((num * multiplier as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("1K").unwrap(), 1024);
        assert_eq!(parse_size("64kb").unwrap(), 64 * 1024);
        assert_eq!(parse_size("1M").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("1G").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("1.5M").unwrap(), (1.5 * 1024.0 * 1024.0) as u64);
        assert!(parse_size("").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("-1K").is_err());
    }

    #[test]
    fn test_from_cli_defaults() {
        let args = CliArgs::parse_from(["quickxorhash", "a.bin"]);
        let config = HashConfig::from_cli(&args).unwrap();

        assert_eq!(args.files, vec![PathBuf::from("a.bin")]);
        assert_eq!(config.buffer_size, 1024 * 1024);
        assert_eq!(config.encoding, DigestEncoding::Hex);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert!(config.effective_threads() >= 1);
    }

    #[test]
    fn test_from_cli_options() {
        let args = CliArgs::parse_from([
            "quickxorhash",
            "-e",
            "base64",
            "-b",
            "64K",
            "-t",
            "3",
            "--output-format",
            "json",
            "-p",
            "-q",
            "x",
            "y",
        ]);
        let config = HashConfig::from_cli(&args).unwrap();

        assert_eq!(args.files.len(), 2);
        assert_eq!(config.encoding, DigestEncoding::Base64);
        assert_eq!(config.buffer_size, 64 * 1024);
        assert_eq!(config.effective_threads(), 3);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(!config.progress, "quiet suppresses progress");
    }

    #[test]
    fn test_from_cli_rejects_bad_buffer() {
        let args = CliArgs::parse_from(["quickxorhash", "-b", "0"]);
        assert!(HashConfig::from_cli(&args).is_err());

        let args = CliArgs::parse_from(["quickxorhash", "-b", "lots"]);
        assert!(HashConfig::from_cli(&args).is_err());
    }

    #[test]
    fn test_subcommands() {
        let args = CliArgs::parse_from(["quickxorhash", "verify", "a", "b"]);
        assert!(matches!(args.command, Some(Commands::Verify { .. })));

        let args = CliArgs::parse_from(["quickxorhash", "manifest", "create", "/data", "-o", "m.json"]);
        match args.command {
            Some(Commands::Manifest {
                action: ManifestCommand::Create { root, output },
            }) => {
                assert_eq!(root, PathBuf::from("/data"));
                assert_eq!(output, PathBuf::from("m.json"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
