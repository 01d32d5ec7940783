use crate::index::types::{FileId, FileRecord};
use roaring::RoaringBitmap;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// Immutable part index for one scanned directory.
///
/// The index owns every [`FileRecord`] in a key-ordered arena; each part maps
/// to a bitmap of arena positions. Records are never duplicated, only
/// referenced by id from as many buckets as they have parts.
#[derive(Debug, Clone)]
pub struct PartIndex {
    root: PathBuf,
    files: Vec<FileRecord>,
    /// All distinct parts, ascending
    parts: Vec<String>,
    /// `postings[i]` holds the files containing `parts[i]`
    postings: Vec<RoaringBitmap>,
}

impl PartIndex {
    /// Assemble an index from a key-ordered file arena and per-part buckets.
    pub(crate) fn new(
        root: PathBuf,
        files: Vec<FileRecord>,
        buckets: FxHashMap<String, RoaringBitmap>,
    ) -> Self {
        debug_assert!(files.windows(2).all(|w| w[0].key < w[1].key));

        let mut entries: Vec<(String, RoaringBitmap)> = buckets.into_iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        let (parts, postings) = entries.into_iter().unzip();

        Self {
            root,
            files,
            parts,
            postings,
        }
    }

    /// An index with no files, rooted nowhere.
    pub fn empty() -> Self {
        Self {
            root: PathBuf::new(),
            files: Vec::new(),
            parts: Vec::new(),
            postings: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every distinct part, ascending.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Every record, ascending by key.
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn file(&self, id: FileId) -> Option<&FileRecord> {
        self.files.get(id as usize)
    }

    pub fn contains_part(&self, part: &str) -> bool {
        self.position(part).is_some()
    }

    /// Bitmap of files containing `part`.
    pub fn posting(&self, part: &str) -> Option<&RoaringBitmap> {
        self.position(part).map(|i| &self.postings[i])
    }

    /// Files containing `part`, ascending by key. Unknown parts yield nothing.
    pub fn files_for_part(&self, part: &str) -> Vec<&FileRecord> {
        match self.posting(part) {
            Some(bitmap) => bitmap
                .iter()
                .filter_map(|id| self.files.get(id as usize))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Arena ids of the files containing `part`, ascending.
    pub fn file_ids_for_part(&self, part: &str) -> Vec<FileId> {
        self.posting(part)
            .map(|bitmap| bitmap.iter().collect())
            .unwrap_or_default()
    }

    /// The contiguous run of parts starting with `prefix`.
    pub fn parts_with_prefix(&self, prefix: &str) -> &[String] {
        prefix_range(&self.parts, prefix)
    }

    /// Look a record up by relative path, ignoring case.
    pub fn find_file(&self, relative_path: &str) -> Option<&FileRecord> {
        let key = normalize_key(relative_path);
        self.files
            .binary_search_by(|f| f.key.as_str().cmp(key.as_str()))
            .ok()
            .map(|i| &self.files[i])
    }

    fn position(&self, part: &str) -> Option<usize> {
        self.parts.binary_search_by(|p| p.as_str().cmp(part)).ok()
    }
}

/// Slice of an ascending list whose entries start with `prefix`.
pub(crate) fn prefix_range<'a>(sorted: &'a [String], prefix: &str) -> &'a [String] {
    let start = sorted.partition_point(|p| p.as_str() < prefix);
    let len = sorted[start..].partition_point(|p| p.starts_with(prefix));
    &sorted[start..start + len]
}

fn normalize_key(relative_path: &str) -> String {
    let trimmed = relative_path
        .trim_start_matches("./")
        .trim_start_matches(".\\");
    if std::path::MAIN_SEPARATOR == '\\' {
        trimmed.replace('/', "\\").to_lowercase()
    } else {
        trimmed.to_lowercase()
    }
}
