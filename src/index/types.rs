use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Position of a record in the index's file arena.
///
/// Ids are handed out in ascending `key` order, so any ascending walk over
/// ids is also a walk in key order.
pub type FileId = u32;

/// One indexed file.
///
/// Identity is the lowercased relative path (`key`). The indexer never keeps
/// two records with the same key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub key: String,
    /// Relative path for display and tokenizing. Names that are not valid
    /// UTF-8 show U+FFFD here; `path` keeps the real bytes.
    pub relative_path: String,
    pub base_name: String,
    /// Uppercased, without the leading dot; empty when the name has none.
    pub extension: String,
    pub size_bytes: u64,
    /// Relative path exactly as the file system returned it
    #[serde(skip)]
    pub path: PathBuf,
}

impl FileRecord {
    pub fn new(relative_path: String, size_bytes: u64) -> Self {
        Self::from_path(PathBuf::from(relative_path), size_bytes)
    }

    /// Record for a relative path as found on disk.
    ///
    /// The key of a non-UTF-8 path spells invalid bytes as `\xNN`, so two
    /// names that only differ in those bytes stay separate records.
    pub fn from_path(path: PathBuf, size_bytes: u64) -> Self {
        let relative_path = path.to_string_lossy().into_owned();
        let key = match path.to_str() {
            Some(utf8) => utf8.to_lowercase(),
            None => escape_invalid_utf8(path.as_os_str()).to_lowercase(),
        };
        let base_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_uppercase())
            .unwrap_or_default();

        Self {
            key,
            relative_path,
            base_name,
            extension,
            size_bytes,
            path,
        }
    }

    /// Path to resolve against the index root when opening the file.
    pub fn os_path(&self) -> &Path {
        if self.path.as_os_str().is_empty() {
            Path::new(&self.relative_path)
        } else {
            &self.path
        }
    }
}

fn escape_invalid_utf8(name: &OsStr) -> String {
    let mut out = String::new();
    for chunk in name.as_encoded_bytes().utf8_chunks() {
        out.push_str(chunk.valid());
        for byte in chunk.invalid() {
            out.push_str(&format!("\\x{:02x}", byte));
        }
    }
    out
}

impl PartialEq for FileRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FileRecord {}

impl Hash for FileRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Outcome of a successful scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub part_count: usize,
    pub file_count: usize,
    /// Files whose size could not be read and were recorded as 0 bytes
    pub unreadable_sizes: usize,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

impl IndexSummary {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Ok(Duration::try_from_secs_f64(secs).unwrap_or_default())
    }
}

/// Configuration for a directory scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Glob patterns matched against relative paths; matching files and
    /// directories are skipped
    pub exclude: Vec<String>,
    /// Index dot-files and dot-directories
    pub include_hidden: bool,
    /// Draw a spinner on stderr while scanning
    pub show_progress: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            include_hidden: true,
            show_progress: false,
        }
    }
}

impl ScanConfig {
    /// Defaults with `FPM_EXCLUDE` / `FPM_SKIP_HIDDEN` applied on top.
    pub fn load() -> Self {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("FPM_EXCLUDE") {
            self.exclude.extend(
                val.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from),
            );
        }

        if let Some(val) = var("FPM_SKIP_HIDDEN") {
            if matches!(val.trim(), "1" | "true" | "yes") {
                self.include_hidden = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_file_record_fields() {
        let record = FileRecord::new("Photos/Trip/IMG_0042.jpeg".to_string(), 2048);
        assert_eq!(record.key, "photos/trip/img_0042.jpeg");
        assert_eq!(record.relative_path, "Photos/Trip/IMG_0042.jpeg");
        assert_eq!(record.base_name, "IMG_0042.jpeg");
        assert_eq!(record.extension, "JPEG");
        assert_eq!(record.size_bytes, 2048);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_keep_distinct_keys() {
        use std::os::unix::ffi::OsStrExt;

        let e_acute = PathBuf::from(OsStr::from_bytes(b"caf\xe9.txt"));
        let e_grave = PathBuf::from(OsStr::from_bytes(b"caf\xe8.txt"));
        let a = FileRecord::from_path(e_acute.clone(), 1);
        let b = FileRecord::from_path(e_grave, 1);

        assert_eq!(a.key, "caf\\xe9.txt");
        assert_ne!(a, b);
        assert_eq!(a.relative_path, "caf\u{FFFD}.txt");
        assert_eq!(a.os_path(), e_acute.as_path());
        assert_eq!(a.extension, "TXT");
    }

    #[test]
    fn test_os_path_falls_back_to_relative_path() {
        let mut record = FileRecord::new("docs/a.txt".to_string(), 0);
        assert_eq!(record.os_path(), Path::new("docs/a.txt"));
        record.path = PathBuf::new();
        assert_eq!(record.os_path(), Path::new("docs/a.txt"));
    }

    #[test]
    fn test_file_record_without_extension() {
        let record = FileRecord::new("bin/Makefile".to_string(), 0);
        assert_eq!(record.extension, "");
        assert_eq!(record.base_name, "Makefile");
    }

    #[test]
    fn test_file_record_equality_by_key() {
        let a = FileRecord::new("Docs/Report.PDF".to_string(), 10);
        let b = FileRecord::new("docs/report.pdf".to_string(), 99);
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_scan_config_default() {
        let config = ScanConfig::default();
        assert!(config.exclude.is_empty());
        assert!(config.include_hidden);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_scan_config_env_overrides() {
        let env: HashMap<&str, &str> =
            [("FPM_EXCLUDE", "*.tmp, build/**,"), ("FPM_SKIP_HIDDEN", "1")]
                .into_iter()
                .collect();

        let mut config = ScanConfig::default();
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.exclude, vec!["*.tmp", "build/**"]);
        assert!(!config.include_hidden);
    }

    #[test]
    fn test_summary_json_seconds() {
        let summary = IndexSummary {
            part_count: 3,
            file_count: 2,
            unreadable_sizes: 0,
            elapsed: Duration::from_millis(1500),
        };
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["elapsed"], 1.5);
        assert_eq!(json["part_count"], 3);
    }
}
