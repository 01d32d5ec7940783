use crate::error::{MatchError, Result};
use crate::index::part_index::PartIndex;
use crate::index::types::{FileId, FileRecord, IndexSummary, ScanConfig};
use crate::utils::{extract_parts, ScanProgress};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use roaring::RoaringBitmap;
use rustc_hash::FxHashMap;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

type Buckets = FxHashMap<String, RoaringBitmap>;

/// A regular file found by the walk, before dedupe
#[derive(Debug)]
struct DiscoveredFile {
    relative_path: PathBuf,
    size: u64,
}

/// Scan `root` and build a fresh part index.
pub fn build_index(root: &Path, config: &ScanConfig) -> Result<(PartIndex, IndexSummary)> {
    build_index_cancellable(root, config, &AtomicBool::new(false))
}

/// Scan `root`, giving up with [`MatchError::Cancelled`] once `cancel` is set.
///
/// The flag is checked between file-system entries and between build phases.
/// A cancelled scan returns nothing; whatever index the caller already holds
/// stays authoritative.
pub fn build_index_cancellable(
    root: &Path,
    config: &ScanConfig,
    cancel: &AtomicBool,
) -> Result<(PartIndex, IndexSummary)> {
    let start = Instant::now();
    let root = resolve_root(root)?;
    let excludes = build_excludes(&config.exclude)?;

    let progress = ScanProgress::new(config.show_progress);
    debug!(root = %root.display(), "scanning directory");

    let result = build_from_walk(&root, config, excludes, cancel, &progress);
    let (index, unreadable_sizes) = match result {
        Ok(built) => built,
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    };

    let summary = IndexSummary {
        part_count: index.part_count(),
        file_count: index.file_count(),
        unreadable_sizes,
        elapsed: start.elapsed(),
    };

    progress.finish(format!(
        "Found {} parts among {} files in {:.2} seconds",
        summary.part_count,
        summary.file_count,
        summary.elapsed_seconds()
    ));
    info!(
        root = %root.display(),
        parts = summary.part_count,
        files = summary.file_count,
        unreadable_sizes = summary.unreadable_sizes,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "index built"
    );

    Ok((index, summary))
}

fn build_from_walk(
    root: &Path,
    config: &ScanConfig,
    excludes: GlobSet,
    cancel: &AtomicBool,
    progress: &ScanProgress,
) -> Result<(PartIndex, usize)> {
    let (discovered, unreadable_sizes) = discover_files(root, config, excludes, cancel, progress)?;

    check_cancelled(cancel)?;
    progress.phase(format!("Extracting parts from {} files...", discovered.len()));
    let files = dedupe_by_key(discovered);

    check_cancelled(cancel)?;
    let buckets = collect_buckets(&files);

    check_cancelled(cancel)?;
    progress.phase(format!("Sorting {} parts...", buckets.len()));
    let index = PartIndex::new(root.to_path_buf(), files, buckets);

    Ok((index, unreadable_sizes))
}

/// Validate and canonicalize the scan root.
fn resolve_root(root: &Path) -> Result<PathBuf> {
    let meta = fs::metadata(root)
        .map_err(|e| MatchError::invalid_directory(root, e.to_string()))?;
    if !meta.is_dir() {
        return Err(MatchError::invalid_directory(root, "not a directory"));
    }
    // A directory we cannot list would otherwise scan as empty
    fs::read_dir(root).map_err(|e| MatchError::invalid_directory(root, e.to_string()))?;

    root.canonicalize()
        .map_err(|e| MatchError::invalid_directory(root, e.to_string()))
}

fn build_excludes(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| MatchError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| MatchError::InvalidPattern {
        pattern: patterns.join(","),
        message: e.to_string(),
    })
}

/// Walk the tree depth-first, collecting regular files and their sizes.
///
/// Symbolic links are never followed nor indexed. Returns the files and the
/// number whose size had to be recorded as 0.
fn discover_files(
    root: &Path,
    config: &ScanConfig,
    excludes: GlobSet,
    cancel: &AtomicBool,
    progress: &ScanProgress,
) -> Result<(Vec<DiscoveredFile>, usize)> {
    let filter_root = root.to_path_buf();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(!config.include_hidden)
        .follow_links(false)
        .filter_entry(move |entry| {
            match entry.path().strip_prefix(&filter_root) {
                Ok(rel) if !rel.as_os_str().is_empty() => !excludes.is_match(rel),
                _ => true,
            }
        })
        .build();

    let mut files = Vec::new();
    let mut unreadable_sizes = 0;

    for result in walker {
        check_cancelled(cancel)?;

        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        if entry.path_is_symlink() {
            continue;
        }
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative_path = rel.to_path_buf();
        let size = file_size(entry.path(), entry.metadata(), &mut unreadable_sizes);

        files.push(DiscoveredFile {
            relative_path,
            size,
        });
        progress.files_found(files.len());
    }

    Ok((files, unreadable_sizes))
}

/// Size from a metadata lookup, or 0 when it failed.
///
/// A failure is logged as [`MatchError::FileSizeUnreadable`] and counted in
/// `unreadable`; it never stops the scan.
fn file_size(
    path: &Path,
    metadata: std::result::Result<fs::Metadata, ignore::Error>,
    unreadable: &mut usize,
) -> u64 {
    match metadata {
        Ok(meta) => meta.len(),
        Err(err) => {
            let message = err.to_string();
            let error = MatchError::FileSizeUnreadable {
                path: path.to_path_buf(),
                source: err.into_io_error().unwrap_or_else(|| io::Error::other(message)),
            };
            warn!("{}", error);
            *unreadable += 1;
            0
        }
    }
}

/// Collapse files whose relative paths differ only by case.
///
/// Candidates are taken in ordinal order of their original relative path and
/// the first one wins, so the kept casing never depends on walk order. The
/// result is ascending by key, which is the order ids are assigned in.
fn dedupe_by_key(mut discovered: Vec<DiscoveredFile>) -> Vec<FileRecord> {
    discovered.sort_unstable_by(|a, b| {
        let a = a.relative_path.as_os_str().as_encoded_bytes();
        let b = b.relative_path.as_os_str().as_encoded_bytes();
        a.cmp(b)
    });

    let mut by_key: BTreeMap<String, FileRecord> = BTreeMap::new();
    for file in discovered {
        let record = FileRecord::from_path(file.relative_path, file.size);
        match by_key.entry(record.key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(kept) => {
                debug!(
                    kept = %kept.get().relative_path,
                    dropped = %record.relative_path,
                    "duplicate key"
                );
            }
        }
    }

    by_key.into_values().collect()
}

/// Tokenize every file in parallel and gather per-part file bitmaps.
fn collect_buckets(files: &[FileRecord]) -> Buckets {
    files
        .par_iter()
        .enumerate()
        .fold(Buckets::default, |mut acc, (id, record)| {
            for part in extract_parts(&record.relative_path) {
                acc.entry(part).or_default().insert(id as FileId);
            }
            acc
        })
        .reduce(Buckets::default, merge_buckets)
}

fn merge_buckets(mut a: Buckets, mut b: Buckets) -> Buckets {
    if a.len() < b.len() {
        std::mem::swap(&mut a, &mut b);
    }
    for (part, bitmap) in b {
        *a.entry(part).or_default() |= bitmap;
    }
    a
}

#[inline]
fn check_cancelled(cancel: &AtomicBool) -> Result<()> {
    if cancel.load(Ordering::Relaxed) {
        Err(MatchError::Cancelled)
    } else {
        Ok(())
    }
}
