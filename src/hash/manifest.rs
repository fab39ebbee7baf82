//! Digest manifests for change detection
//!
//! A manifest records the digest of every file under a root directory.
//! Re-checking hashes the tree again and reports which files changed,
//! appeared or disappeared.
//!
//! Note: paths are stored as UTF-8 strings with lossy conversion and `/`
//! separators, relative to the root. The root itself is stored canonical.
//! A manifest kept inside its own root is left out of every scan.

use super::digest::Digest;
use super::integrity::{hash_files_parallel, HashResult};
use crate::config::HashConfig;
use crate::error::{collect_errors, IoResultExt, QuickXorError, Result};
use crate::progress::ProgressReporter;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::{DirEntry, WalkDir};

/// Current manifest format version
pub const MANIFEST_VERSION: u32 = 1;

/// One hashed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Relative path from root
    pub path: String,
    /// File size in bytes
    pub size: u64,
    /// Modification time (Unix timestamp)
    pub mtime: u64,
    /// QuickXorHash digest
    pub digest: Digest,
}

/// Collection of file digests under one root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashManifest {
    /// Format version
    pub version: u32,
    /// Creation timestamp
    pub created: u64,
    /// Root path, absolute
    pub root: String,
    /// Paths under the root that are never scanned
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<String>,
    /// File entries, sorted by path
    pub entries: Vec<ManifestEntry>,
}

/// Differences between a manifest and the tree on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDiff {
    /// Files whose digest or size changed
    pub changed: Vec<String>,
    /// Files present on disk but not recorded
    pub added: Vec<String>,
    /// Recorded files missing from disk
    pub removed: Vec<String>,
    /// Files whose content is unchanged
    pub unchanged: usize,
    /// Unchanged files with a new modification time
    #[serde(default)]
    pub touched: Vec<String>,
}

impl ManifestDiff {
    /// True if nothing changed
    pub fn is_clean(&self) -> bool {
        self.changed.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }
}

impl HashManifest {
    /// Create a new empty manifest
    pub fn new(root: &str) -> Self {
        Self {
            version: MANIFEST_VERSION,
            created: unix_seconds(SystemTime::now()),
            root: root.to_string(),
            excluded: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Hash every file under `root` and record it
    pub fn build(root: &Path, config: &HashConfig, progress: &ProgressReporter) -> Result<Self> {
        Self::build_excluding(root, &[], config, progress)
    }

    /// Like [`HashManifest::build`], leaving `exclude` out of the scan
    pub fn build_excluding(
        root: &Path,
        exclude: &[PathBuf],
        config: &HashConfig,
        progress: &ProgressReporter,
    ) -> Result<Self> {
        let canonical_root = root.canonicalize().with_path(root)?;
        let mut manifest = Self::new(&canonical_root.to_string_lossy());
        for path in exclude {
            manifest.exclude_path(path);
        }

        let files = scan_files_excluding(root, &manifest.excluded, config)?;
        tracing::info!("Found {} files under {}", files.len(), root.display());

        let hashed = collect_errors(hash_files_parallel(&files, config, progress)?)?;
        for result in hashed {
            manifest.add_entry(entry_for(root, &result)?);
        }
        manifest.entries.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(manifest)
    }

    /// Add a file entry
    pub fn add_entry(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    /// Leave `path` out of future scans if it lies under the root
    pub fn exclude_path(&mut self, path: &Path) {
        if let Some(relative) = relative_to_root(Path::new(&self.root), path) {
            if !self.excluded.contains(&relative) {
                tracing::debug!("Excluding {} from {}", relative, self.root);
                self.excluded.push(relative);
            }
        }
    }

    /// Find entry by relative path
    pub fn find_entry(&self, path: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Re-hash the tree under `root` and compare with the recorded entries
    pub fn check(
        &self,
        root: &Path,
        config: &HashConfig,
        progress: &ProgressReporter,
    ) -> Result<ManifestDiff> {
        let exclude: Vec<PathBuf> = self.excluded.iter().map(|rel| root.join(rel)).collect();
        let current = Self::build_excluding(root, &exclude, config, progress)?;
        Ok(self.diff(&current))
    }

    /// Compare this manifest (the baseline) with another
    pub fn diff(&self, current: &HashManifest) -> ManifestDiff {
        let recorded: HashMap<&str, &ManifestEntry> =
            self.entries.iter().map(|e| (e.path.as_str(), e)).collect();
        let mut seen = HashSet::new();
        let mut diff = ManifestDiff::default();

        for entry in &current.entries {
            seen.insert(entry.path.as_str());
            match recorded.get(entry.path.as_str()) {
                // Digests alone miss some length changes
                Some(old) if old.digest == entry.digest && old.size == entry.size => {
                    diff.unchanged += 1;
                    if old.mtime != entry.mtime {
                        diff.touched.push(entry.path.clone());
                    }
                }
                Some(_) => diff.changed.push(entry.path.clone()),
                None => diff.added.push(entry.path.clone()),
            }
        }

        diff.removed = self
            .entries
            .iter()
            .filter(|e| !seen.contains(e.path.as_str()))
            .map(|e| e.path.clone())
            .collect();

        diff
    }

    /// Save manifest to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_path(path)?;
        tracing::info!("Wrote manifest with {} entries to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Load manifest from JSON file.
    ///
    /// A relative root is taken from the manifest's own directory, and the
    /// manifest file is excluded when it lies under the root.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).with_path(path)?;
        let mut manifest: Self = serde_json::from_str(&json)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(QuickXorError::ManifestError(format!(
                "unsupported manifest version {}",
                manifest.version
            )));
        }

        let root = PathBuf::from(&manifest.root);
        if root.is_relative() {
            let joined = parent_dir(path).join(&root);
            let resolved = joined.canonicalize().unwrap_or(joined);
            manifest.root = resolved.to_string_lossy().into_owned();
        }
        manifest.exclude_path(path);

        Ok(manifest)
    }
}

/// List regular files under `root`, sorted
pub fn scan_files(root: &Path, config: &HashConfig) -> Result<Vec<PathBuf>> {
    scan_files_excluding(root, &[], config)
}

/// List regular files under `root`, skipping the given root-relative paths
pub fn scan_files_excluding(
    root: &Path,
    excluded: &[String],
    config: &HashConfig,
) -> Result<Vec<PathBuf>> {
    let include_hidden = config.include_hidden;
    let walker = WalkDir::new(root)
        .follow_links(config.follow_symlinks)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            QuickXorError::io(path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if !excluded.is_empty() {
            let relative = relative_string(entry.path().strip_prefix(root).unwrap_or(entry.path()));
            if excluded.contains(&relative) {
                continue;
            }
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn entry_for(root: &Path, result: &HashResult) -> Result<ManifestEntry> {
    let metadata = std::fs::metadata(&result.path).with_path(&result.path)?;
    let relative = result.path.strip_prefix(root).unwrap_or(&result.path);

    Ok(ManifestEntry {
        path: relative_string(relative),
        size: result.size,
        mtime: metadata.modified().map(unix_seconds).unwrap_or(0),
        digest: result.digest,
    })
}

fn relative_string(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// `path` relative to `root`, comparing canonical forms.
/// The path itself need not exist yet.
fn relative_to_root(root: &Path, path: &Path) -> Option<String> {
    let root = root.canonicalize().ok()?;
    let resolved = match path.canonicalize() {
        Ok(resolved) => resolved,
        Err(_) => parent_dir(path).canonicalize().ok()?.join(path.file_name()?),
    };
    let relative = relative_string(resolved.strip_prefix(&root).ok()?);
    (!relative.is_empty()).then_some(relative)
}

fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}
