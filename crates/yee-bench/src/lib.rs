//! Benchmark profiles for the Yee field-state core.
//!
//! - [`reference_profile`]: 3D 64×64×64 box split into 8 chunks
//! - [`stress_profile`]: 3D 96×96×96 box split into 24 chunks
//! - [`mirrored_profile`]: 2D 512×512 cell with a mirror plane through the middle

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use yee_arena::{ArenaError, Structure, StructureBuilder};
use yee_core::{Dimensionality, Direction};
use yee_space::{GridVolume, SymmetryGroup};

/// 64³ points at resolution 20, split into 8 chunks.
pub fn reference_profile() -> Result<Structure, ArenaError> {
    let grid = GridVolume::new(Dimensionality::D3, 20.0, &[64, 64, 64])?;
    StructureBuilder::new(grid).chunks(8).build()
}

/// 96³ points at resolution 20, split into 24 chunks, with an absorbing
/// layer along z.
pub fn stress_profile() -> Result<Structure, ArenaError> {
    let grid = GridVolume::new(Dimensionality::D3, 20.0, &[96, 96, 96])?;
    StructureBuilder::new(grid)
        .chunks(24)
        .pml(Direction::Z)
        .build()
}

/// 512² points at resolution 50, mirrored across `x = 5.12`, 4 chunks.
pub fn mirrored_profile() -> Result<Structure, ArenaError> {
    let grid = GridVolume::new(Dimensionality::D2, 50.0, &[512, 512])?;
    let mirror = SymmetryGroup::mirror(Direction::X, 5.12, 1.0)?;
    StructureBuilder::new(grid).symmetry(mirror).chunks(4).build()
}
