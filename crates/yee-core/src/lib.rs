//! Core vocabulary for the Yee FDTD field-state core.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! directions, dimensionalities, field kinds and components shared by
//! every other crate, the [`ComponentSet`] bitset, identifiers, and the
//! collaborator traits for sources and monitors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod component;
pub mod component_set;
pub mod id;
pub mod traits;

pub use component::{
    components, cross, cross_negative, BoundarySide, Component, Dimensionality, Direction,
    FieldKind,
};
pub use component_set::ComponentSet;
pub use id::{ChunkId, WorkerRank};
pub use traits::{FluxMonitor, SourceSet};
