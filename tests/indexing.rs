//! Indexing a real directory tree through the public API.

use fpm::error::MatchError;
use fpm::index::{build_index, build_index_cancellable, PartIndex, ScanConfig};
use fpm::query::{filter_parts, parse_part_query, parts_for_file, LateralScope, Scope};
use fpm::session::Session;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

/// A small photo/document tree with known parts
fn create_fixture_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let root = dir.path();

    fs::create_dir_all(root.join("Photos/Summer2023")).unwrap();
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::create_dir_all(root.join(".cache")).unwrap();

    fs::write(root.join("Photos/Summer2023/photo2023.jpg"), b"jpegdata").unwrap();
    fs::write(root.join("Photos/Summer2023/phase-1.png"), b"png").unwrap();
    fs::write(root.join("Photos/image.gif"), b"gif89a").unwrap();
    fs::write(root.join("docs/Report_final.PDF"), b"%PDF").unwrap();
    fs::write(root.join("docs/café menu.txt"), b"menu").unwrap();
    fs::write(root.join(".cache/blob.bin"), b"").unwrap();

    dir
}

fn build(root: &Path) -> PartIndex {
    build_index(root, &ScanConfig::default()).unwrap().0
}

fn parts(index: &PartIndex, scope: &Scope, query: &str) -> Vec<String> {
    filter_parts(index, scope, &parse_part_query(query))
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn test_parts_of_fixture() {
    let dir = create_fixture_dir();
    let (index, summary) = build_index(dir.path(), &ScanConfig::default()).unwrap();

    assert_eq!(summary.file_count, 6);
    assert_eq!(summary.part_count, index.part_count());
    assert_eq!(summary.unreadable_sizes, 0);

    for expected in ["photo", "summer", "jpg", "phase", "image", "report", "final", "pdf", "café", "menu", "cache", "blob"] {
        assert!(index.contains_part(expected), "missing part {expected}");
    }
    assert!(!index.contains_part("photo2023"));
    assert!(!index.contains_part("summer2023"));
}

#[test]
fn test_query_modes() {
    let dir = create_fixture_dir();
    let index = build(dir.path());

    assert_eq!(parts(&index, &Scope::Global, "ph"), vec!["phase", "photo", "photos"]);
    assert_eq!(parts(&index, &Scope::Global, " oto"), vec!["photo", "photos"]);
    assert_eq!(parts(&index, &Scope::Global, "PH"), vec!["phase", "photo", "photos"]);
    assert!(parts(&index, &Scope::Global, "zzz").is_empty());
    assert_eq!(parts(&index, &Scope::Global, "").len(), index.part_count());
}

#[test]
fn test_round_trip_between_parts_and_files() {
    let dir = create_fixture_dir();
    let index = build(dir.path());

    for file in index.files() {
        for part in parts_for_file(file) {
            let files = index.files_for_part(&part);
            assert!(files.iter().any(|f| f.key == file.key), "{part} does not list {}", file.relative_path);
        }
    }

    for part in index.parts() {
        for file in index.files_for_part(part) {
            assert!(parts_for_file(file).contains(part), "{} lacks {part}", file.relative_path);
        }
    }
}

#[test]
fn test_lateral_scope_restricts_scoped_prefix() {
    let dir = create_fixture_dir();
    let index = build(dir.path());
    let file = index.find_file("photos/summer2023/photo2023.jpg").unwrap();
    let scope = Scope::Lateral(LateralScope::from_file(file));

    assert_eq!(parts(&index, &scope, ">"), vec!["jpg", "photo", "photos", "summer"]);
    assert_eq!(parts(&index, &scope, ">ph"), vec!["photo", "photos"]);
    // phase exists globally but not in this file
    assert!(!parts(&index, &scope, ">pha").contains(&"phase".to_string()));
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let (index, summary) = build_index(dir.path(), &ScanConfig::default()).unwrap();

    assert_eq!(summary.part_count, 0);
    assert_eq!(summary.file_count, 0);
    assert!(parts(&index, &Scope::Global, "").is_empty());
}

#[test]
fn test_skip_hidden_and_excludes() {
    let dir = create_fixture_dir();
    let config = ScanConfig {
        exclude: vec!["**/*.gif".to_string(), "docs".to_string()],
        include_hidden: false,
        ..ScanConfig::default()
    };
    let (index, summary) = build_index(dir.path(), &config).unwrap();

    assert_eq!(summary.file_count, 2);
    assert!(!index.contains_part("cache"));
    assert!(!index.contains_part("gif"));
    assert!(!index.contains_part("report"));
    assert!(index.contains_part("jpg"));
}

#[test]
fn test_bad_exclude_is_invalid_pattern() {
    let dir = create_fixture_dir();
    let config = ScanConfig {
        exclude: vec!["a{b".to_string()],
        ..ScanConfig::default()
    };
    let err = build_index(dir.path(), &config).unwrap_err();
    assert!(matches!(err, MatchError::InvalidPattern { .. }));
}

#[test]
fn test_invalid_directory() {
    let dir = create_fixture_dir();
    let file = dir.path().join("docs/Report_final.PDF");

    let err = build_index(&file, &ScanConfig::default()).unwrap_err();
    assert!(matches!(err, MatchError::InvalidDirectory { .. }));

    let err = build_index(&dir.path().join("missing"), &ScanConfig::default()).unwrap_err();
    assert!(matches!(err, MatchError::InvalidDirectory { .. }));
}

#[test]
fn test_cancelled_scan() {
    let dir = create_fixture_dir();
    let cancel = AtomicBool::new(true);
    let err = build_index_cancellable(dir.path(), &ScanConfig::default(), &cancel).unwrap_err();
    assert!(matches!(err, MatchError::Cancelled));
}

#[cfg(unix)]
#[test]
fn test_symlinks_not_indexed() {
    let dir = create_fixture_dir();
    let outside = tempfile::tempdir().unwrap();
    fs::write(outside.path().join("secret.key"), b"k").unwrap();

    std::os::unix::fs::symlink(outside.path(), dir.path().join("linkdir")).unwrap();
    std::os::unix::fs::symlink(
        dir.path().join("Photos/image.gif"),
        dir.path().join("alias.gif"),
    )
    .unwrap();

    let index = build(dir.path());
    assert_eq!(index.file_count(), 6);
    assert!(!index.contains_part("secret"));
    assert!(!index.contains_part("alias"));
    assert!(!index.contains_part("linkdir"));
}

#[test]
fn test_case_variants_collapse() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Notes.txt"), b"a").unwrap();
    // Case-insensitive file systems merge these on disk already
    let case_sensitive = fs::write(dir.path().join("notes.TXT"), b"bb").is_ok()
        && fs::read_dir(dir.path()).unwrap().count() == 2;

    let (index, summary) = build_index(dir.path(), &ScanConfig::default()).unwrap();
    // Counted after the merge
    assert_eq!(summary.file_count, 1);
    assert_eq!(index.file_count(), 1);
    let record = &index.files()[0];
    assert_eq!(record.key, "notes.txt");
    if case_sensitive {
        // "Notes.txt" < "notes.TXT" ordinally
        assert_eq!(record.relative_path, "Notes.txt");
        assert_eq!(record.size_bytes, 1);
    }
    assert_eq!(index.files_for_part("notes").len(), 1);
}

#[test]
fn test_session_rescan_resets_scope() {
    let dir = create_fixture_dir();
    let other = tempfile::tempdir().unwrap();
    fs::write(other.path().join("solo.md"), b"x").unwrap();

    let mut session = Session::new(ScanConfig::default());
    session.select_directory(dir.path()).unwrap();
    let lateral = session.explore_laterally_from("docs/Report_final.PDF").unwrap();
    assert_eq!(lateral, vec!["docs", "final", "pdf", "report"]);
    assert!(session.scope().is_lateral());

    session.select_directory(other.path()).unwrap();
    assert!(!session.scope().is_lateral());
    assert_eq!(session.set_query(""), vec!["md", "solo"]);

    // A failed selection leaves the current index alone
    assert!(session.select_directory(&other.path().join("nope")).is_err());
    assert_eq!(session.index().file_count(), 1);
}
