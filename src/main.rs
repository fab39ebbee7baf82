//! quickxorhash CLI
//!
//! Prints QuickXorHash digests of files or stdin, compares files, and
//! records or re-checks directory manifests.
//!
//! Exit codes: 0 success, 1 usage error / mismatch / changes found,
//! 2 input could not be read.

use clap::Parser;
use quickxorhash::config::{CliArgs, Commands, HashConfig, ManifestCommand, OutputFormat};
use quickxorhash::error::{collect_errors, QuickXorError, Result};
use quickxorhash::hash::{
    hash_files_parallel, hash_input, verify_files_match, Digest, HashManifest, HashResult,
    STDIN_PATH,
};
use quickxorhash::progress::ProgressReporter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = CliArgs::parse();

    init_logging(args.verbose, args.quiet);

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            if let QuickXorError::MultipleErrors { errors, .. } = &e {
                for err in errors {
                    eprintln!("  {}", err);
                }
            }
            std::process::exit(if e.is_io() { 2 } else { 1 });
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns Ok(false) when the command ran but found a mismatch
fn run(args: &CliArgs) -> Result<bool> {
    let config = HashConfig::from_cli(args)?;

    match &args.command {
        Some(Commands::Verify {
            source,
            destination,
        }) => cmd_verify(source, destination, &config, args.quiet),
        Some(Commands::Check { file, digest }) => cmd_check(file, digest, &config, args.quiet),
        Some(Commands::Manifest { action }) => match action {
            ManifestCommand::Create { root, output } => {
                cmd_manifest_create(root, output, &config, args.quiet)
            }
            ManifestCommand::Check { manifest, root } => {
                cmd_manifest_check(manifest, root.as_deref(), &config, args.quiet)
            }
        },
        None => cmd_hash(args, &config),
    }
}

fn progress_for(config: &HashConfig) -> ProgressReporter {
    if config.progress {
        ProgressReporter::new()
    } else {
        ProgressReporter::disabled()
    }
}

/// One line of JSON output
#[derive(Serialize)]
struct DigestLine {
    path: String,
    digest: String,
    size: u64,
}

fn cmd_hash(args: &CliArgs, config: &HashConfig) -> Result<bool> {
    let inputs: Vec<PathBuf> = if args.files.is_empty() {
        vec![PathBuf::from(STDIN_PATH)]
    } else {
        args.files.clone()
    };

    if args.bare && inputs.len() != 1 {
        return Err(QuickXorError::config("--bare takes exactly one input"));
    }

    let reads_stdin = inputs.iter().any(|p| p.as_os_str() == STDIN_PATH);
    let results: Vec<Result<HashResult>> = if inputs.len() == 1 || reads_stdin {
        inputs
            .iter()
            .map(|path| hash_input(path, config.buffer_size))
            .collect()
    } else {
        let progress = progress_for(config);
        let results = hash_files_parallel(&inputs, config, &progress)?;
        if progress.is_enabled() {
            eprintln!("{}", progress.summary().describe());
        }
        results
    };

    let mut hashed = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(r) => hashed.push(r),
            Err(e) => failures.push(Err::<(), _>(e)),
        }
    }

    match config.output_format {
        OutputFormat::Text => {
            for result in &hashed {
                let digest = result.encoded(config.encoding);
                if args.bare {
                    println!("{}", digest);
                } else {
                    println!("{}  {}", digest, result.path.display());
                }
            }
        }
        OutputFormat::Json => {
            let lines: Vec<DigestLine> = hashed
                .iter()
                .map(|r| DigestLine {
                    path: r.path.display().to_string(),
                    digest: r.encoded(config.encoding),
                    size: r.size,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&lines)?);
        }
    }

    collect_errors(failures)?;
    Ok(true)
}

fn cmd_verify(source: &Path, destination: &Path, config: &HashConfig, quiet: bool) -> Result<bool> {
    let result = verify_files_match(source, destination)?;

    match config.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text if !quiet => {
            println!("Source hash:      {}", result.source_hash.encoded(config.encoding));
            println!("Destination hash: {}", result.dest_hash.encoded(config.encoding));
            println!("Match: {}", if result.matches { "YES" } else { "NO" });
        }
        OutputFormat::Text => {}
    }

    Ok(result.matches)
}

fn cmd_check(file: &Path, expected: &str, config: &HashConfig, quiet: bool) -> Result<bool> {
    let expected: Digest = expected.parse()?;
    let actual = hash_input(file, config.buffer_size)?;
    let matches = actual.digest == expected;

    if !matches {
        tracing::warn!(
            "{}",
            QuickXorError::integrity_mismatch(
                file,
                expected.encode(config.encoding),
                actual.encoded(config.encoding)
            )
        );
    }

    if !quiet {
        println!("{}: {}", file.display(), if matches { "OK" } else { "FAILED" });
    }

    Ok(matches)
}

fn cmd_manifest_create(root: &Path, output: &Path, config: &HashConfig, quiet: bool) -> Result<bool> {
    let progress = progress_for(config);
    let exclude = [output.to_path_buf()];
    let manifest = HashManifest::build_excluding(root, &exclude, config, &progress)?;
    manifest.save(output)?;

    if !quiet {
        let total: u64 = manifest.entries.iter().map(|e| e.size).sum();
        println!(
            "Recorded {} files ({}) to {}",
            manifest.entries.len(),
            humansize::format_size(total, humansize::BINARY),
            output.display()
        );
    }

    Ok(true)
}

fn cmd_manifest_check(
    manifest_path: &Path,
    root: Option<&Path>,
    config: &HashConfig,
    quiet: bool,
) -> Result<bool> {
    let manifest = HashManifest::load(manifest_path)?;
    let recorded_root = PathBuf::from(&manifest.root);
    let root = root.unwrap_or(&recorded_root);

    let progress = progress_for(config);
    let diff = manifest.check(root, config, &progress)?;

    match config.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&diff)?),
        OutputFormat::Text => {
            for path in &diff.changed {
                println!("changed  {}", path);
            }
            for path in &diff.added {
                println!("added    {}", path);
            }
            for path in &diff.removed {
                println!("removed  {}", path);
            }
            if !quiet {
                for path in &diff.touched {
                    println!("touched  {}", path);
                }
                println!(
                    "{} unchanged ({} touched), {} changed, {} added, {} removed",
                    diff.unchanged,
                    diff.touched.len(),
                    diff.changed.len(),
                    diff.added.len(),
                    diff.removed.len()
                );
            }
        }
    }

    Ok(diff.is_clean())
}
