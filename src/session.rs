//! The state one user interaction loop works against.
//!
//! A [`Session`] owns the current [`PartIndex`] and the active [`Scope`].
//! Presentation code drives it through a handful of calls:
//!
//! ```no_run
//! use fpm::index::ScanConfig;
//! use fpm::session::Session;
//!
//! let mut session = Session::new(ScanConfig::default());
//! let summary = session.select_directory("/home/me/Pictures".as_ref())?;
//! println!("{} parts among {} files", summary.part_count, summary.file_count);
//!
//! let parts = session.set_query("ph");
//! let index = session.index().clone();
//! if let Some(first) = parts.first() {
//!     let files = index.files_for_part(first);
//!     if let Some(file) = files.first() {
//!         let lateral = session.explore_laterally(file);
//!         println!("{:?}", lateral);
//!     }
//! }
//! # Ok::<(), fpm::error::MatchError>(())
//! ```

use crate::error::{MatchError, Result};
use crate::index::{build_index, FileRecord, IndexSummary, PartIndex, ScanConfig};
use crate::launch::Launcher;
use crate::query::{filter_parts, parse_part_query, LateralScope, QueryMode, Scope};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Number of global-scope query results remembered between keystrokes
const QUERY_CACHE_SIZE: NonZeroUsize = NonZeroUsize::new(64).unwrap();

pub struct Session {
    config: ScanConfig,
    index: Arc<PartIndex>,
    summary: Option<IndexSummary>,
    scope: Scope,
    /// Results of queries that do not depend on the lateral scope
    query_cache: LruCache<(QueryMode, String), Vec<String>>,
}

impl Session {
    /// A session with no directory selected yet.
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            index: Arc::new(PartIndex::empty()),
            summary: None,
            scope: Scope::Global,
            query_cache: LruCache::new(QUERY_CACHE_SIZE),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Current index. Clone the `Arc` to keep records borrowed across
    /// calls that take `&mut self`.
    pub fn index(&self) -> &Arc<PartIndex> {
        &self.index
    }

    /// Root of the current index, if a directory has been selected.
    pub fn root(&self) -> Option<&Path> {
        self.summary.map(|_| self.index.root())
    }

    pub fn summary(&self) -> Option<IndexSummary> {
        self.summary
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Scan `path` and make the result the current index.
    ///
    /// On error nothing changes: the previous index and scope stay active.
    pub fn select_directory(&mut self, path: &Path) -> Result<IndexSummary> {
        let (index, summary) = build_index(path, &self.config)?;
        self.publish(Arc::new(index), summary);
        Ok(summary)
    }

    /// Replace the current index with one built elsewhere (e.g. a background
    /// scan). Always resets to the global scope.
    pub fn publish(&mut self, index: Arc<PartIndex>, summary: IndexSummary) {
        debug!(root = %index.root().display(), parts = index.part_count(), "publishing index");
        self.index = index;
        self.summary = Some(summary);
        self.scope = Scope::Global;
        self.query_cache.clear();
    }

    /// Parts matching the raw query text, ascending.
    ///
    /// Clearing the text entirely drops a lateral scope.
    pub fn set_query(&mut self, text: &str) -> Vec<String> {
        if text.is_empty() && self.scope.is_lateral() {
            debug!("query cleared, leaving lateral scope");
            self.scope = Scope::Global;
        }

        let query = parse_part_query(text);
        let cacheable = !(query.is_scoped() && self.scope.is_lateral());
        let cache_key = (query.mode, query.text.clone());

        if cacheable {
            if let Some(hit) = self.query_cache.get(&cache_key) {
                return hit.clone();
            }
        }

        let parts: Vec<String> = filter_parts(&self.index, &self.scope, &query)
            .into_iter()
            .map(String::from)
            .collect();

        if cacheable {
            self.query_cache.put(cache_key, parts.clone());
        }
        parts
    }

    /// Files containing `part`, ascending by key. Unknown parts yield nothing.
    pub fn select_part(&self, part: &str) -> Vec<&FileRecord> {
        self.index.files_for_part(part)
    }

    /// Make the parts of `record` the active scope and return them.
    ///
    /// Works from either scope; a lateral scope is replaced, not merged.
    pub fn explore_laterally(&mut self, record: &FileRecord) -> Vec<String> {
        let lateral = LateralScope::from_file(record);
        debug!(origin = lateral.origin(), parts = lateral.parts().len(), "entering lateral scope");
        let parts = lateral.parts().to_vec();
        self.scope = Scope::Lateral(lateral);
        parts
    }

    /// [`Session::explore_laterally`] for a file named by relative path.
    /// Returns `None` when the path is not in the index.
    pub fn explore_laterally_from(&mut self, relative_path: &str) -> Option<Vec<String>> {
        let index = Arc::clone(&self.index);
        let record = index.find_file(relative_path)?;
        Some(self.explore_laterally(record))
    }

    /// Return to the global scope, yielding every part.
    pub fn clear_scope(&mut self) -> Vec<String> {
        self.set_query("")
    }

    /// `root + relative_path` for a record of the current index.
    pub fn absolute_path(&self, record: &FileRecord) -> Result<PathBuf> {
        match self.root() {
            Some(root) => Ok(root.join(record.os_path())),
            None => Err(MatchError::open_failed(
                &record.relative_path,
                "no directory selected",
            )),
        }
    }

    pub fn open_file(&self, record: &FileRecord, launcher: &dyn Launcher) -> Result<()> {
        let path = self.absolute_path(record)?;
        debug!(path = %path.display(), "opening file");
        launcher.open(&path)
    }

    pub fn open_containing_folder(&self, record: &FileRecord, launcher: &dyn Launcher) -> Result<()> {
        let path = self.absolute_path(record)?;
        debug!(path = %path.display(), "opening containing folder");
        launcher.reveal(&path)
    }
}
