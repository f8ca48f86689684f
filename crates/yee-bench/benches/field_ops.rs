//! Criterion micro-benchmarks for field-set lifecycle operations.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use yee_core::components::{Ex, Ez};
use yee_fields::{FieldSet, FieldsConfig};

/// Benchmark: build a field set and allocate E on the reference profile.
fn bench_allocate_reference(c: &mut Criterion) {
    let structure = yee_bench::reference_profile().unwrap();

    c.bench_function("allocate_reference", |b| {
        b.iter(|| {
            let mut fields = FieldSet::new(&structure, FieldsConfig::default()).unwrap();
            fields.allocate_component(Ex).unwrap();
            black_box(fields.memory_bytes())
        });
    });
}

/// Benchmark: rebuild the exchange ledger after an invalidation.
fn bench_connect_reference(c: &mut Criterion) {
    let structure = yee_bench::reference_profile().unwrap();
    let mut fields = FieldSet::new(&structure, FieldsConfig::default()).unwrap();
    fields.allocate_component(Ex).unwrap();

    c.bench_function("connect_reference", |b| {
        b.iter(|| {
            fields.finish_phase_in();
            black_box(fields.connect_chunks().total_values())
        });
    });
}

/// Benchmark: clone a mirrored field set with allocated fields.
fn bench_clone_mirrored(c: &mut Criterion) {
    let structure = yee_bench::mirrored_profile().unwrap();
    let mut fields = FieldSet::new(&structure, FieldsConfig::default()).unwrap();
    fields.allocate_component(Ez).unwrap();

    c.bench_function("clone_mirrored", |b| {
        b.iter(|| black_box(fields.clone()));
    });
}

/// Benchmark: zero every buffer, then switch to real fields, on the stress
/// profile.
fn bench_zero_and_real_stress(c: &mut Criterion) {
    let structure = yee_bench::stress_profile().unwrap();
    let mut fields = FieldSet::new(&structure, FieldsConfig::default()).unwrap();
    fields.allocate_component(Ex).unwrap();

    c.bench_function("zero_and_real_stress", |b| {
        b.iter(|| {
            let mut copy = fields.clone();
            copy.zero_fields();
            copy.use_real_fields().unwrap();
            black_box(copy.memory_bytes())
        });
    });
}

criterion_group!(
    benches,
    bench_allocate_reference,
    bench_connect_reference,
    bench_clone_mirrored,
    bench_zero_and_real_stress
);
criterion_main!(benches);
