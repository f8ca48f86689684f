//! Geometry for the Yee FDTD core.
//!
//! Integer [`GridVolume`]s describe the points a chunk owns; continuous
//! [`GeometricVolume`]s describe the region they cover. A
//! [`SymmetryGroup`] maps volumes and components onto their images, and a
//! [`BoundaryTable`] records the condition applied on each face of the
//! computational cell.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod error;
pub mod symmetry;
pub mod volume;

pub use boundary::{BoundaryCondition, BoundaryTable};
pub use error::SpaceError;
pub use symmetry::{SignedDirection, SymmetryGenerator, SymmetryGroup, Transform};
pub use volume::{GeometricVolume, GridVolume};
