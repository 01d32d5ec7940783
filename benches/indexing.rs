//! Performance benchmarks for fpm
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fpm::index::{build_index, PartIndex, ScanConfig};
use fpm::query::{filter_parts, parse_part_query, LateralScope, Scope};
use fpm::utils::extract_parts;
use std::fs;
use tempfile::TempDir;

const WORDS: &[&str] = &[
    "holiday", "beach", "report", "invoice", "draft", "final", "photo", "scan", "budget",
    "summer", "winter", "notes", "backup", "export", "meeting", "family",
];
const EXTENSIONS: &[&str] = &["jpg", "png", "pdf", "txt", "docx", "mp4"];

/// Create a directory tree of `count` files with realistic names
fn create_benchmark_fixtures(count: usize) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    for i in 0..count {
        let dir = temp_dir
            .path()
            .join(WORDS[i % WORDS.len()])
            .join(format!("{}{}", WORDS[(i / 7) % WORDS.len()], 2000 + i % 25));
        fs::create_dir_all(&dir).expect("Failed to create dir");

        let name = format!(
            "{}_{}-{}.{}",
            WORDS[(i * 3) % WORDS.len()],
            WORDS[(i * 5 + 1) % WORDS.len()],
            i,
            EXTENSIONS[i % EXTENSIONS.len()]
        );
        fs::write(dir.join(name), b"x").expect("Failed to write file");
    }

    temp_dir
}

fn bench_tokenizer(c: &mut Criterion) {
    let paths = [
        "photo2023.jpg",
        "Photos/Summer2023/IMG_0042 (copy).JPEG",
        "docs/Reports/Q4/budget-final_v12.xlsx",
        "música/Café del Mar/01 - Entrée.flac",
    ];

    let mut group = c.benchmark_group("extract_parts");
    for path in paths {
        group.bench_with_input(BenchmarkId::from_parameter(path), &path, |b, &p| {
            b.iter(|| extract_parts(black_box(p)))
        });
    }
    group.finish();
}

fn bench_build_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_index");
    group.sample_size(10);

    for count in [1_000, 5_000] {
        let fixture = create_benchmark_fixtures(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &fixture, |b, dir| {
            b.iter(|| build_index(dir.path(), &ScanConfig::default()).expect("Failed to build index"))
        });
    }
    group.finish();
}

fn bench_filter_parts(c: &mut Criterion) {
    let fixture = create_benchmark_fixtures(5_000);
    let (index, _) = build_index(fixture.path(), &ScanConfig::default()).expect("Failed to build index");
    let lateral = lateral_scope(&index);

    let mut group = c.benchmark_group("filter_parts");
    for (name, scope, query) in [
        ("prefix", &Scope::Global, "b"),
        ("prefix_all", &Scope::Global, ""),
        ("substring", &Scope::Global, " in"),
        ("scoped", &lateral, ">s"),
    ] {
        let parsed = parse_part_query(query);
        group.bench_function(name, |b| {
            b.iter(|| filter_parts(black_box(&index), scope, black_box(&parsed)).len())
        });
    }
    group.finish();
}

fn lateral_scope(index: &PartIndex) -> Scope {
    match index.files().first() {
        Some(file) => Scope::Lateral(LateralScope::from_file(file)),
        None => Scope::Global,
    }
}

criterion_group!(benches, bench_tokenizer, bench_build_index, bench_filter_parts);
criterion_main!(benches);
