//! Benchmarks for decoding, querying and encoding brief documents.

use std::fs;
use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use brief::parser::{decode_file, Scanner};
use brief::{decode_str, DecodeOptions};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name)).unwrap()
}

/// The sprites fixture repeated `n` times as separate roots.
fn repeated(source: &str, n: usize) -> String {
    let mut out = String::with_capacity(source.len() * n);
    for _ in 0..n {
        out.push_str(source);
        out.push('\n');
    }
    out
}

// -- Decoding benchmarks --

fn bench_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("decoding");

    let sprites = load_fixture("sprites.brf");
    let large = repeated(&sprites, 100);

    group.bench_function("scan_sprites", |b| {
        b.iter(|| Scanner::new(black_box(&sprites)).count())
    });

    group.bench_function("decode_small", |b| {
        b.iter(|| decode_str(black_box("html\n  body class:main\n    div:d1\n")).unwrap())
    });

    group.bench_function("decode_sprites", |b| {
        b.iter(|| decode_str(black_box(&sprites)).unwrap())
    });

    group.bench_function("decode_sprites_x100", |b| {
        b.iter(|| decode_str(black_box(&large)).unwrap())
    });

    let pages = fixtures_dir().join("pages.brf");
    let options = DecodeOptions::default();
    group.bench_function("decode_with_includes", |b| {
        b.iter(|| decode_file(black_box(&pages), &options).unwrap())
    });

    group.finish();
}

// -- Query benchmarks --

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    let forest = decode_str(&load_fixture("sprites.brf")).unwrap();
    let sheet = forest.root(0).unwrap();
    let frame = sheet.find("frame:attack").unwrap();

    group.bench_function("find_deep", |b| b.iter(|| sheet.find(black_box("frame:attack"))));

    group.bench_function("find_all", |b| b.iter(|| sheet.find_all(black_box("frame"))));

    group.bench_function("lookup", |b| b.iter(|| frame.lookup(black_box("sheet.width"))));

    group.bench_function("collect", |b| {
        b.iter(|| frame.collect(black_box(&["frame", "sprite", "sheet"])))
    });

    group.finish();
}

// -- Encoding benchmarks --

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");

    let sprites = decode_str(&load_fixture("sprites.brf")).unwrap();
    let large = decode_str(&repeated(&load_fixture("sprites.brf"), 100)).unwrap();

    group.bench_function("encode_sprites", |b| b.iter(|| black_box(&sprites).encode()));

    group.bench_function("encode_sprites_x100", |b| b.iter(|| black_box(&large).encode()));

    group.bench_function("round_trip_sprites", |b| {
        b.iter(|| decode_str(&black_box(&sprites).encode_string()).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_decoding, bench_queries, bench_encoding);
criterion_main!(benches);
