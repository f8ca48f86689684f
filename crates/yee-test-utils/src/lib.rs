//! Test utilities and mock types for Yee development.
//!
//! Provides mock implementations of the collaborator traits
//! ([`SourceSet`], [`FluxMonitor`]) that count how often they are dropped,
//! and a handful of [`Structure`] fixtures used across the test suites.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use yee_arena::{Structure, StructureBuilder};
use yee_core::{Component, Dimensionality, Direction, FluxMonitor, SourceSet};
use yee_space::{GridVolume, SymmetryGroup};

// ── Drop counting ──────────────────────────────────────────────────

/// Shared counter bumped each time a mock collaborator is dropped.
#[derive(Clone, Debug, Default)]
pub struct DropCounter(Arc<AtomicUsize>);

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of drops observed so far.
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mock [`SourceSet`] driving a fixed list of components.
pub struct MockSources {
    label: String,
    components: Vec<Component>,
    drops: DropCounter,
}

impl MockSources {
    pub fn new(label: &str, components: &[Component], drops: &DropCounter) -> Self {
        Self {
            label: label.to_string(),
            components: components.to_vec(),
            drops: drops.clone(),
        }
    }

    /// Boxed, ready to hand to a field set or chunk.
    pub fn boxed(label: &str, components: &[Component], drops: &DropCounter) -> Box<dyn SourceSet> {
        Box::new(Self::new(label, components, drops))
    }
}

impl SourceSet for MockSources {
    fn label(&self) -> &str {
        &self.label
    }

    fn components(&self) -> Vec<Component> {
        self.components.clone()
    }
}

impl Drop for MockSources {
    fn drop(&mut self) {
        self.drops.bump();
    }
}

/// Mock [`FluxMonitor`].
pub struct MockFlux {
    label: String,
    drops: DropCounter,
}

impl MockFlux {
    pub fn boxed(label: &str, drops: &DropCounter) -> Box<dyn FluxMonitor> {
        Box::new(Self {
            label: label.to_string(),
            drops: drops.clone(),
        })
    }
}

impl FluxMonitor for MockFlux {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Drop for MockFlux {
    fn drop(&mut self) {
        self.drops.bump();
    }
}

// ── Structure fixtures ─────────────────────────────────────────────

/// `n × n` two-dimensional grid at resolution 10.
pub fn square_grid(n: usize) -> GridVolume {
    GridVolume::new(Dimensionality::D2, 10.0, &[n, n]).expect("valid square grid")
}

/// Builder for an `n × n` grid at resolution 10, one chunk, vacuum.
pub fn square(n: usize) -> StructureBuilder {
    StructureBuilder::new(square_grid(n))
}

/// `n × n` grid split into `chunks` pieces, all owned by worker 0.
pub fn chunked_square(n: usize, chunks: usize) -> Structure {
    square(n).chunks(chunks).build().expect("valid chunked square")
}

/// One-dimensional line of `n` points at resolution 10.
pub fn line(n: usize) -> StructureBuilder {
    StructureBuilder::new(
        GridVolume::new(Dimensionality::D1, 10.0, &[n]).expect("valid line grid"),
    )
}

/// Three-dimensional `nx × ny × nz` box at resolution 10.
pub fn cuboid(nx: usize, ny: usize, nz: usize) -> StructureBuilder {
    StructureBuilder::new(
        GridVolume::new(Dimensionality::D3, 10.0, &[nx, ny, nz]).expect("valid cuboid grid"),
    )
}

/// Cylindrical `nr × nz` grid starting on the axis.
pub fn cylinder(nr: usize, nz: usize) -> StructureBuilder {
    StructureBuilder::new(
        GridVolume::new(Dimensionality::Cylindrical, 10.0, &[nr, nz]).expect("valid cylinder"),
    )
}

/// Cylindrical `nr × nz` grid whose radial range starts `r0` points off
/// the axis.
pub fn annulus(r0: i64, nr: usize, nz: usize) -> StructureBuilder {
    let grid = GridVolume::new(Dimensionality::Cylindrical, 10.0, &[nr, nz])
        .and_then(|g| g.with_origin(Direction::R, r0))
        .expect("valid annulus");
    StructureBuilder::new(grid)
}

/// `n × n` grid with a mirror plane at `x = plane`.
pub fn mirrored_square(n: usize, plane: f64, phase: f64) -> Structure {
    let mirror = SymmetryGroup::mirror(Direction::X, plane, phase).expect("valid mirror");
    square(n).symmetry(mirror).build().expect("valid mirrored square")
}
