//! Benchmark – `textmend::repair` and `textmend::StreamFilter`
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use textmend::{FilterOptions, StreamFilter, repair};

/// Produce a *deterministic* CSV-like payload of exactly `target_len` bytes.
/// `dirty` controls whether rows carry Windows-1252 bytes and CRLF endings or
/// are clean UTF-8 with LF endings.
fn make_payload(target_len: usize, dirty: bool) -> Vec<u8> {
    let row: &[u8] = if dirty {
        b"caf\xe9,\x93quoted\x94,\x97 dash,na\xc3\xafve,\xef\xbb\xbf\r\n"
    } else {
        "café,“quoted”,— dash,naïve,🦀\n".as_bytes()
    };
    row.iter().copied().cycle().take(target_len).collect()
}

fn run_stream(payload: &[u8], parts: usize) -> usize {
    assert!(parts > 0);
    let chunk_size = payload.len().div_ceil(parts);

    let mut filter = StreamFilter::new(FilterOptions::default());
    let mut produced = 0usize;
    for chunk in payload.chunks(chunk_size) {
        if let Some(text) = filter.feed(chunk) {
            produced += text.len();
        }
    }
    produced + filter.finish().len()
}

fn bench_repair(c: &mut Criterion) {
    let mut group = c.benchmark_group("repair_whole");
    for (name, dirty) in [("clean", false), ("dirty", true)] {
        let payload = make_payload(100_000, dirty);
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &payload, |b, p| {
            b.iter(|| black_box(repair(black_box(p))).len());
        });
    }
    group.finish();
}

fn bench_stream(c: &mut Criterion) {
    let payload = make_payload(100_000, true);

    let mut group = c.benchmark_group("repair_stream_split");
    group.throughput(Throughput::Bytes(payload.len() as u64));
    for &parts in &[10usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(parts), &parts, |b, &n| {
            b.iter(|| black_box(run_stream(black_box(&payload), n)));
        });
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_repair, bench_stream }
criterion_main!(benches);
