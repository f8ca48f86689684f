//! Sizes and receive buffers for data crossing chunk boundaries.
//!
//! The ledger maps `(field kind, source chunk, destination chunk)` to the
//! number of scalars each [`ConnectionPhase`] carries, and owns one receive
//! buffer per key whose length is exactly the sum of those counts. It does
//! not move data; transport code fills and drains the buffers.
//!
//! Sizes are derived from the coupling plan of the union of allocated
//! components. Every `(partner, derivative axis)` pair the plan reads
//! crosses three kinds of boundary:
//!
//! - a face shared by two chunks (plain copy),
//! - a periodic wrap of the computational cell (Bloch phase, or a plain
//!   copy when the wavevector component is zero),
//! - a mirror plane on a chunk face (copy, or negate when the symmetry
//!   flips the component's sign).
//!
//! Any change to layout, mode, boundaries or symmetry invalidates the
//! ledger; while invalid, no sizes or buffers are handed out.

use indexmap::IndexMap;
use log::debug;
use smallvec::SmallVec;
use yee_core::{BoundarySide, ChunkId, Component, ComponentSet, Direction, FieldKind};
use yee_space::{BoundaryTable, GridVolume, SymmetryGroup};

use crate::chunk::PartitionChunk;
use crate::planner::CouplingTable;

/// How values are transformed on their way across a boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionPhase {
    /// Multiply by a complex Bloch phase.
    Phase,
    /// Flip the sign.
    Negate,
    /// Copy unchanged.
    Copy,
}

impl ConnectionPhase {
    /// Number of phases.
    pub const COUNT: usize = 3;

    /// All phases, in index order.
    pub const ALL: [ConnectionPhase; Self::COUNT] = [
        ConnectionPhase::Phase,
        ConnectionPhase::Negate,
        ConnectionPhase::Copy,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// One ordered transfer direction for one field kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExchangeKey {
    /// Kind of the transferred component.
    pub kind: FieldKind,
    /// Chunk the values are read from.
    pub from: ChunkId,
    /// Chunk the values are needed by.
    pub to: ChunkId,
}

/// Scalar counts per [`ConnectionPhase`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseCounts {
    counts: [usize; ConnectionPhase::COUNT],
}

impl PhaseCounts {
    /// Count for one phase.
    pub fn get(&self, phase: ConnectionPhase) -> usize {
        self.counts[phase.index()]
    }

    /// Sum over all phases.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    fn add(&mut self, phase: ConnectionPhase, n: usize) {
        self.counts[phase.index()] += n;
    }
}

#[derive(Clone, Debug)]
struct Entry {
    counts: PhaseCounts,
    buffer: Vec<f64>,
}

/// Per-pair exchange sizes and receive buffers.
#[derive(Clone, Debug, Default)]
pub struct ExchangeLedger {
    entries: IndexMap<ExchangeKey, Entry>,
    valid: bool,
}

/// Everything the ledger is derived from.
pub(crate) struct LedgerInputs<'a> {
    pub chunks: &'a [PartitionChunk],
    pub grid: &'a GridVolume,
    pub boundaries: &'a BoundaryTable,
    pub k: &'a [f64; Direction::COUNT],
    pub symmetry: &'a SymmetryGroup,
    pub is_real: bool,
}

impl ExchangeLedger {
    /// An empty, invalid ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether sizes and buffers reflect the current layout.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Forget every size and buffer.
    pub fn invalidate(&mut self) {
        if self.valid {
            debug!("exchange ledger invalidated");
        }
        self.valid = false;
        self.entries.clear();
    }

    /// Scalars `key` carries in `phase`; `None` while invalid.
    pub fn size(&self, key: &ExchangeKey, phase: ConnectionPhase) -> Option<usize> {
        self.counts(key).map(|c| c.get(phase))
    }

    /// All phase counts for `key`; `None` while invalid.
    pub fn counts(&self, key: &ExchangeKey) -> Option<PhaseCounts> {
        if !self.valid {
            return None;
        }
        Some(self.entries.get(key).map(|e| e.counts).unwrap_or_default())
    }

    /// Receive buffer for `key`; `None` while invalid or if nothing crosses.
    pub fn buffer(&self, key: &ExchangeKey) -> Option<&[f64]> {
        if !self.valid {
            return None;
        }
        self.entries.get(key).map(|e| e.buffer.as_slice())
    }

    /// Mutable receive buffer for `key`.
    pub fn buffer_mut(&mut self, key: &ExchangeKey) -> Option<&mut [f64]> {
        if !self.valid {
            return None;
        }
        self.entries.get_mut(key).map(|e| e.buffer.as_mut_slice())
    }

    /// Every key with a non-zero count, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&ExchangeKey, PhaseCounts)> + '_ {
        self.entries
            .iter()
            .filter(|_| self.valid)
            .map(|(k, e)| (k, e.counts))
    }

    /// Total scalars across every key; 0 while invalid.
    pub fn total_values(&self) -> usize {
        self.iter().map(|(_, c)| c.total()).sum()
    }

    pub(crate) fn rebuild(&mut self, inputs: &LedgerInputs<'_>) {
        self.entries.clear();
        let slots = if inputs.is_real { 1 } else { 2 };
        let needed = reads_by_axis(inputs);
        let chunks = inputs.chunks;

        for d in Direction::ALL {
            for c in needed[d.index()].iter() {
                // Shared faces between distinct chunks.
                for (i, a) in chunks.iter().enumerate() {
                    for (j, b) in chunks.iter().enumerate() {
                        if i == j || a.grid().face_contact(b.grid(), d).is_none() {
                            continue;
                        }
                        let n = a.grid().cross_section_overlap(b.grid(), d);
                        self.record(c.kind, i, j, ConnectionPhase::Copy, n * slots);
                    }
                }

                // Periodic wrap of the whole cell: one transfer per ordered
                // pair, so a chunk wrapping onto itself counts once.
                if inputs.boundaries.is_periodic(d) {
                    let phase = if inputs.k[d.index()] != 0.0 {
                        ConnectionPhase::Phase
                    } else {
                        ConnectionPhase::Copy
                    };
                    for (i, hi) in chunks.iter().enumerate() {
                        if hi.grid().end(d) != inputs.grid.end(d) {
                            continue;
                        }
                        for (j, lo) in chunks.iter().enumerate() {
                            if lo.grid().origin(d) != inputs.grid.origin(d) {
                                continue;
                            }
                            let n = hi.grid().cross_section_overlap(lo.grid(), d);
                            self.record(c.kind, i, j, phase, n * slots);
                            if i != j {
                                self.record(c.kind, j, i, phase, n * slots);
                            }
                        }
                    }
                }

                // Mirror planes lying on a chunk face.
                for generator in inputs.symmetry.generators() {
                    let Some((axis, plane)) = generator.mirror_plane(inputs.grid.dim()) else {
                        continue;
                    };
                    if axis != d {
                        continue;
                    }
                    let line = (plane * inputs.grid.resolution()).round();
                    let (_, sign) = generator.transform().transform_component(c);
                    let phase = if sign < 0.0 {
                        ConnectionPhase::Negate
                    } else {
                        ConnectionPhase::Copy
                    };
                    for (i, chunk) in chunks.iter().enumerate() {
                        for side in BoundarySide::BOTH {
                            let face = match side {
                                BoundarySide::Low => chunk.grid().origin(d),
                                BoundarySide::High => chunk.grid().end(d),
                            };
                            if face as f64 == line {
                                let n = chunk.grid().cross_section(d);
                                self.record(c.kind, i, i, phase, n * slots);
                            }
                        }
                    }
                }
            }
        }

        for entry in self.entries.values_mut() {
            entry.buffer = vec![0.0; entry.counts.total()];
        }
        self.valid = true;
        debug!(
            "exchange ledger rebuilt: {} keys, {} values",
            self.entries.len(),
            self.total_values()
        );
    }

    fn record(&mut self, kind: FieldKind, from: usize, to: usize, phase: ConnectionPhase, n: usize) {
        if n == 0 {
            return;
        }
        let key = ExchangeKey {
            kind,
            from: ChunkId(from as u32),
            to: ChunkId(to as u32),
        };
        self.entries
            .entry(key)
            .or_insert_with(|| Entry {
                counts: PhaseCounts::default(),
                buffer: Vec::new(),
            })
            .counts
            .add(phase, n);
    }
}

/// For each grid axis, the partner components the union plan differences
/// along it.
fn reads_by_axis(inputs: &LedgerInputs<'_>) -> [ComponentSet; Direction::COUNT] {
    let mut needed = [ComponentSet::empty(); Direction::COUNT];
    let Some(first) = inputs.chunks.first() else {
        return needed;
    };
    let union = inputs
        .chunks
        .iter()
        .fold(ComponentSet::empty(), |acc, ch| acc.union(&ch.storage().allocated()));
    let plan = CouplingTable::plan(first.grid(), &union);
    let dim = inputs.grid.dim();
    let reads: SmallVec<[(Component, Direction); 16]> = plan
        .iter()
        .map(|(_, k)| (k.partner, k.derivative))
        .filter(|&(_, d)| dim.has_direction(d))
        .collect();
    for (c, d) in reads {
        needed[d.index()].insert(c);
    }
    needed
}
