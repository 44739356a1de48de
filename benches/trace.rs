use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fptrace::{parse_smiles, trace_from_smiles, TraceConfig};

const METHANE: &str = "C";
const ETHANOL: &str = "CCO";
const BENZENE: &str = "c1ccccc1";
const CAFFEINE: &str = "Cn1cnc2c1c(=O)n(C)c(=O)n2C";
const ASPIRIN: &str = "CC(=O)Oc1ccccc1C(=O)O";

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("methane", |b| {
        b.iter(|| black_box(parse_smiles(black_box(METHANE)).unwrap()))
    });
    group.bench_function("benzene", |b| {
        b.iter(|| black_box(parse_smiles(black_box(BENZENE)).unwrap()))
    });
    group.bench_function("caffeine", |b| {
        b.iter(|| black_box(parse_smiles(black_box(CAFFEINE)).unwrap()))
    });

    group.finish();
}

fn bench_trace(c: &mut Criterion) {
    let cfg = TraceConfig::default();
    let mut group = c.benchmark_group("trace");

    group.bench_function("methane", |b| {
        b.iter(|| black_box(trace_from_smiles(black_box(METHANE), &cfg).unwrap()))
    });
    group.bench_function("ethanol", |b| {
        b.iter(|| black_box(trace_from_smiles(black_box(ETHANOL), &cfg).unwrap()))
    });
    group.bench_function("benzene", |b| {
        b.iter(|| black_box(trace_from_smiles(black_box(BENZENE), &cfg).unwrap()))
    });
    group.bench_function("caffeine", |b| {
        b.iter(|| black_box(trace_from_smiles(black_box(CAFFEINE), &cfg).unwrap()))
    });
    group.bench_function("aspirin", |b| {
        b.iter(|| black_box(trace_from_smiles(black_box(ASPIRIN), &cfg).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_trace);
criterion_main!(benches);
