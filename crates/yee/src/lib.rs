//! Yee: the field-state and domain-decomposition core of an FDTD solver.
//!
//! This is the facade crate that re-exports the public API of the Yee
//! sub-crates. For most users, adding `yee` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use yee::prelude::*;
//! use yee::types::components::{Ex, Hy, Hz};
//!
//! // A 10×10 cell at 10 points per unit, split into two chunks.
//! let grid = GridVolume::new(Dimensionality::D2, 10.0, &[10, 10]).unwrap();
//! let structure = StructureBuilder::new(grid).chunks(2).build().unwrap();
//! let mut fields = FieldSet::new(&structure, FieldsConfig::default()).unwrap();
//!
//! fields.allocate_component(Ex).unwrap();
//! assert!(fields.have_component(Hz));
//! assert!(!fields.have_component(Hy));
//!
//! let ledger = fields.connect_chunks();
//! assert!(ledger.total_values() > 0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `yee-core` | Directions, components, component sets, IDs, collaborator traits |
//! | [`space`] | `yee-space` | Grid and geometric volumes, boundary tables, symmetry groups |
//! | [`arena`] | `yee-arena` | Structures, shared materials, aliased component storage |
//! | [`fields`] | `yee-fields` | Field sets, chunks, coupling plans, exchange ledgers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core vocabulary (`yee-core`).
///
/// [`types::Direction`], [`types::Component`] and [`types::ComponentSet`],
/// plus the [`types::SourceSet`] and [`types::FluxMonitor`] traits for
/// collaborators the field set holds.
pub use yee_core as types;

/// Geometry (`yee-space`).
///
/// [`space::GridVolume`], [`space::GeometricVolume`],
/// [`space::BoundaryTable`] and [`space::SymmetryGroup`].
pub use yee_space as space;

/// Material and storage (`yee-arena`).
///
/// [`arena::StructureBuilder`] builds a chunked [`arena::Structure`];
/// [`arena::ComponentStorage`] holds per-chunk field buffers.
pub use yee_arena as arena;

/// Field state (`yee-fields`).
///
/// [`fields::FieldSet`] is the entry point.
pub use yee_fields as fields;

/// Common imports for typical Yee usage.
///
/// ```rust
/// use yee::prelude::*;
/// ```
pub mod prelude {
    // Core vocabulary
    pub use yee_core::{
        BoundarySide, ChunkId, Component, ComponentSet, Dimensionality, Direction, FieldKind,
        FluxMonitor, SourceSet, WorkerRank,
    };

    // Geometry
    pub use yee_space::{
        BoundaryCondition, GeometricVolume, GridVolume, SpaceError, SymmetryGroup,
    };

    // Material and storage
    pub use yee_arena::{ArenaError, FieldMode, Structure, StructureBuilder, IMAG, REAL};

    // Field state
    pub use yee_fields::{
        ConfigError, ConnectionPhase, CouplingTable, ExchangeKey, ExchangeLedger, FieldSet,
        FieldsConfig, PartitionChunk,
    };
}
