//! Criterion benchmarks for the corpus pipeline: morphological
//! decomposition, frequency index construction, and registry queries.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use scriptorium::corpus::{LoaderConfig, TranscriptionLoader};
use scriptorium::morphology::MorphologyExtractor;
use scriptorium::registry::FolioRegistry;
use scriptorium::statistics::{StatsConfig, StatsIndex};
use scriptorium::tables::TableSet;

/// Generate a synthetic corpus shaped like a real transcription.
fn generate_tokens(count: usize) -> Vec<String> {
    let prefixes = ["qok", "qot", "ch", "sh", "ot", "ok", "da"];
    let middles = ["", "e", "ed", "ee", "k", "ke"];
    let suffixes = ["aiin", "ain", "dy", "edy", "y", "ol", "ar"];

    (0..count)
        .map(|i| {
            format!(
                "{}{}{}",
                prefixes[i % prefixes.len()],
                middles[(i / 7) % middles.len()],
                suffixes[(i / 42) % suffixes.len()],
            )
        })
        .collect()
}

fn generate_transcription(rows: usize) -> String {
    generate_tokens(rows)
        .into_iter()
        .enumerate()
        .map(|(i, token)| format!("{}\tf{}r\t{}\n", token, i / 40 + 1, (i / 8) % 5 + 1))
        .collect()
}

fn bench_decompose(c: &mut Criterion) {
    let extractor = MorphologyExtractor::from_tables(TableSet::embedded());
    let tokens = generate_tokens(1000);

    let mut group = c.benchmark_group("morphology");
    group.throughput(Throughput::Elements(tokens.len() as u64));
    group.bench_function("decompose_1000", |b| {
        b.iter(|| {
            for token in &tokens {
                black_box(extractor.decompose(token));
            }
        })
    });
    group.finish();
}

fn bench_stats_build(c: &mut Criterion) {
    let tokens = generate_tokens(10_000);

    let mut group = c.benchmark_group("statistics");
    group.throughput(Throughput::Elements(tokens.len() as u64));
    group.bench_function("build_10k", |b| {
        b.iter(|| black_box(StatsIndex::build(&tokens)))
    });
    group.bench_function("build_parallel_10k", |b| {
        b.iter(|| black_box(StatsIndex::build_parallel(&tokens, StatsConfig::default())))
    });
    group.finish();
}

fn bench_registry(c: &mut Criterion) {
    let loader = TranscriptionLoader::new(LoaderConfig::default());
    let snapshot = loader
        .load_from_reader(std::io::Cursor::new(generate_transcription(10_000)))
        .unwrap();
    let extractor = Arc::new(MorphologyExtractor::from_tables(TableSet::embedded()));

    let mut group = c.benchmark_group("registry");
    group.bench_function("build_10k", |b| {
        b.iter(|| black_box(FolioRegistry::build(&snapshot, Arc::clone(&extractor))))
    });

    let registry = FolioRegistry::build(&snapshot, extractor);
    let queries = generate_tokens(200);
    group.bench_function("count_folios_200", |b| {
        b.iter(|| {
            for token in &queries {
                black_box(registry.count_folios(token));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_decompose, bench_stats_build, bench_registry);
criterion_main!(benches);
