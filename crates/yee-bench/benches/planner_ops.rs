//! Criterion micro-benchmarks for coupling plans.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use yee_core::{Component, ComponentSet, Dimensionality};
use yee_fields::CouplingTable;
use yee_space::GridVolume;

/// Benchmark: plan every component of a 3D grid.
fn bench_plan_all_components_3d(c: &mut Criterion) {
    let grid = GridVolume::new(Dimensionality::D3, 10.0, &[32, 32, 32]).unwrap();
    let all: ComponentSet = Component::all().collect();

    c.bench_function("plan_all_components_3d", |b| {
        b.iter(|| black_box(CouplingTable::plan(&grid, black_box(&all))));
    });
}

/// Benchmark: plan every subset of the six Cartesian E/H components.
fn bench_plan_subsets_3d(c: &mut Criterion) {
    let grid = GridVolume::new(Dimensionality::D3, 10.0, &[8, 8, 8]).unwrap();
    let base: Vec<Component> = Component::all()
        .filter(|c| (c.is_electric() || c.is_magnetic()) && !c.direction.is_cylindrical())
        .collect();
    let subsets: Vec<ComponentSet> = (0u32..1 << base.len())
        .map(|mask| {
            base.iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, &c)| c)
                .collect()
        })
        .collect();

    c.bench_function("plan_subsets_3d", |b| {
        b.iter(|| {
            for set in &subsets {
                black_box(CouplingTable::plan(&grid, set));
            }
        });
    });
}

criterion_group!(benches, bench_plan_all_components_3d, bench_plan_subsets_3d);
criterion_main!(benches);
