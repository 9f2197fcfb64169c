//! Criterion benchmarks for vecscore.
//!
//! Covers the raw kernels, stored-vector decoding and the full
//! set_document/score loop over an in-memory segment.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;
use vecscore::codec::{decode_f64s_into, encode_f64s};
use vecscore::distance::{cosine, dot, l2_similarity, norm_squared};
use vecscore::doc_values::MemorySegment;
use vecscore::engine::VectorScoreEngine;

/// Generate test vectors for benchmarking.
fn generate_test_vectors(count: usize, dimension: usize) -> Vec<Vec<f64>> {
    (0..count)
        .map(|i| {
            (0..dimension)
                .map(|j| ((i as f64 * 0.1 + j as f64 * 0.01).sin() * 0.5 + 0.5) * 2.0 - 1.0)
                .collect()
        })
        .collect()
}

fn bench_kernels(c: &mut Criterion) {
    let vectors = generate_test_vectors(2, 768);
    let (query, doc) = (&vectors[0], &vectors[1]);
    let query_norm = norm_squared(query);

    let mut group = c.benchmark_group("kernels");
    group.throughput(Throughput::Elements(768));
    group.bench_function("dot_768", |b| {
        b.iter(|| dot(black_box(query), black_box(doc)))
    });
    group.bench_function("cosine_768", |b| {
        b.iter(|| cosine(black_box(query), black_box(doc), query_norm))
    });
    group.bench_function("l2_768", |b| {
        b.iter(|| l2_similarity(black_box(query), black_box(doc)))
    });
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let bytes = encode_f64s(&generate_test_vectors(1, 768)[0]).unwrap();
    let mut scratch = Vec::with_capacity(768);

    c.bench_function("decode_768", |b| {
        b.iter(|| decode_f64s_into(black_box(&bytes), 768, &mut scratch))
    });
}

fn bench_segment_scoring(c: &mut Criterion) {
    let docs = 10_000;
    let vectors = generate_test_vectors(docs + 1, 128);

    let mut segment = MemorySegment::new(docs as u32);
    for (id, vector) in vectors[1..].iter().enumerate() {
        segment.add_value(id as u32, "emb", encode_f64s(vector).unwrap()).unwrap();
    }

    let engine = VectorScoreEngine::default();
    let factory = engine
        .bind("cosine", &json!({"field": "emb", "vector": vectors[0]}))
        .unwrap();

    let mut group = c.benchmark_group("segment");
    group.throughput(Throughput::Elements(docs as u64));
    group.bench_function("cosine_10k_x_128", |b| {
        b.iter(|| {
            let mut scorer = factory.new_instance(&segment).unwrap();
            let mut total = 0.0;
            for doc in 0..docs as u32 {
                scorer.set_document(doc);
                total += scorer.score();
            }
            black_box(total)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_kernels, bench_decode, bench_segment_scoring);
criterion_main!(benches);
