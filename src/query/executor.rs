use crate::index::part_index::{prefix_range, PartIndex};
use crate::index::types::{FileId, FileRecord};
use crate::query::parser::{PartQuery, QueryMode};
use crate::utils::distinct_parts;
use memchr::memmem;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Parts of one previously selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LateralScope {
    origin: String,
    parts: Vec<String>,
}

impl LateralScope {
    pub fn from_file(record: &FileRecord) -> Self {
        Self {
            origin: record.relative_path.clone(),
            parts: parts_for_file(record),
        }
    }

    /// Build a scope from arbitrary parts; they are sorted and deduplicated.
    pub fn from_parts(origin: impl Into<String>, parts: impl IntoIterator<Item = String>) -> Self {
        let mut parts: Vec<String> = parts.into_iter().collect();
        parts.sort_unstable();
        parts.dedup();
        Self {
            origin: origin.into(),
            parts,
        }
    }

    /// Relative path of the file the scope was taken from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Parts in scope, ascending
    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

/// Set of parts a query may draw from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Global,
    Lateral(LateralScope),
}

impl Scope {
    pub fn is_lateral(&self) -> bool {
        matches!(self, Scope::Lateral(_))
    }
}

/// Parts matching `query`, ascending.
///
/// `Prefix` and `Substring` queries run over every part in the index.
/// `ScopedPrefix` runs over the lateral scope when one is active and over the
/// whole index otherwise.
pub fn filter_parts<'a>(index: &'a PartIndex, scope: &'a Scope, query: &PartQuery) -> Vec<&'a str> {
    let candidates: &'a [String] = match (query.mode, scope) {
        (QueryMode::ScopedPrefix, Scope::Lateral(lateral)) => lateral.parts(),
        _ => index.parts(),
    };

    match query.mode {
        QueryMode::Prefix | QueryMode::ScopedPrefix => prefix_range(candidates, &query.text)
            .iter()
            .map(String::as_str)
            .collect(),
        QueryMode::Substring => {
            if query.is_match_all() {
                return candidates.iter().map(String::as_str).collect();
            }
            let finder = memmem::Finder::new(query.text.as_bytes());
            candidates
                .iter()
                .filter(|part| finder.find(part.as_bytes()).is_some())
                .map(String::as_str)
                .collect()
        }
    }
}

/// Files containing `part`, ascending by key; empty when the part is unknown.
pub fn files_for_part<'a>(index: &'a PartIndex, part: &str) -> Vec<&'a FileRecord> {
    index.files_for_part(part)
}

/// Distinct parts of a record's relative path, ascending.
///
/// Uses exactly the tokenizer the indexer used, so every returned part has a
/// bucket containing `record`.
pub fn parts_for_file(record: &FileRecord) -> Vec<String> {
    distinct_parts(&record.relative_path)
}

/// Column a file listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileSort {
    /// Key order, as stored in the index
    #[default]
    Key,
    Path,
    Type,
    Size,
}

impl FileSort {
    /// Next column in the cycle used by the interactive view
    pub fn next(self) -> Self {
        match self {
            FileSort::Key => FileSort::Path,
            FileSort::Path => FileSort::Type,
            FileSort::Type => FileSort::Size,
            FileSort::Size => FileSort::Key,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileSort::Key => "key",
            FileSort::Path => "path",
            FileSort::Type => "type",
            FileSort::Size => "size",
        }
    }
}

fn compare_records(a: &FileRecord, b: &FileRecord, sort: FileSort) -> Ordering {
    match sort {
        FileSort::Key => a.key.cmp(&b.key),
        FileSort::Path => a.relative_path.cmp(&b.relative_path),
        FileSort::Type => a.extension.cmp(&b.extension),
        FileSort::Size => a.size_bytes.cmp(&b.size_bytes),
    }
}

/// Reorder a file listing. Stable, so equal entries keep key order.
pub fn sort_files(files: &mut [&FileRecord], sort: FileSort, descending: bool) {
    if descending {
        files.sort_by(|a, b| compare_records(b, a, sort));
    } else {
        files.sort_by(|a, b| compare_records(a, b, sort));
    }
}

/// [`sort_files`] for a listing held as arena ids.
pub fn sort_file_ids(index: &PartIndex, ids: &mut [FileId], sort: FileSort, descending: bool) {
    let record = |id: &FileId| index.file(*id);
    ids.sort_by(|a, b| {
        let ordering = match (record(a), record(b)) {
            (Some(ra), Some(rb)) => compare_records(ra, rb, sort),
            _ => a.cmp(b),
        };
        if descending { ordering.reverse() } else { ordering }
    });
}
