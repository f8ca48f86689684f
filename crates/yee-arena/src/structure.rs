//! Partitioned geometry and material: [`Structure`] and its builder.

use std::path::{Path, PathBuf};

use log::debug;
use yee_core::{Dimensionality, Direction, WorkerRank};
use yee_space::{GeometricVolume, GridVolume, SymmetryGroup};

use crate::error::ArenaError;
use crate::material::{MaterialChunk, Polarizability};
use crate::shared::SharedMaterial;

/// One partition of a [`Structure`].
#[derive(Clone, Debug)]
pub struct StructureChunk {
    grid: GridVolume,
    owner: WorkerRank,
    material: SharedMaterial,
}

impl StructureChunk {
    /// Assemble a chunk from its parts.
    pub fn new(grid: GridVolume, owner: WorkerRank, material: SharedMaterial) -> Self {
        Self {
            grid,
            owner,
            material,
        }
    }

    /// The chunk's grid points.
    pub fn grid(&self) -> &GridVolume {
        &self.grid
    }

    /// Worker that materialises this chunk's fields.
    pub fn owner(&self) -> WorkerRank {
        self.owner
    }

    /// Shared material handle.
    pub fn material(&self) -> &SharedMaterial {
        &self.material
    }
}

/// Geometry, material and partition layout of a simulation.
///
/// Cloning a structure shares every chunk's material; writes go through
/// [`Structure::material_mut`], which privatises the chunk first.
#[derive(Clone, Debug)]
pub struct Structure {
    a: f64,
    courant: f64,
    grid: GridVolume,
    user_grid: GridVolume,
    user_volume: GeometricVolume,
    symmetry: SymmetryGroup,
    chunks: Vec<StructureChunk>,
    outdir: PathBuf,
}

impl Structure {
    /// Dimensionality of the grid.
    pub fn dim(&self) -> Dimensionality {
        self.grid.dim()
    }

    /// Resolution in points per unit length.
    pub fn resolution(&self) -> f64 {
        self.a
    }

    /// Courant number.
    pub fn courant(&self) -> f64 {
        self.courant
    }

    /// Time step, `courant / a`.
    pub fn dt(&self) -> f64 {
        self.courant / self.a
    }

    /// Computational grid after symmetry reduction.
    pub fn grid(&self) -> &GridVolume {
        &self.grid
    }

    /// The grid the user asked for.
    pub fn user_grid(&self) -> &GridVolume {
        &self.user_grid
    }

    /// Continuous region the user asked for.
    pub fn user_volume(&self) -> &GeometricVolume {
        &self.user_volume
    }

    /// Symmetry group used to reduce the domain.
    pub fn symmetry(&self) -> &SymmetryGroup {
        &self.symmetry
    }

    /// All chunks, in partition order.
    pub fn chunks(&self) -> &[StructureChunk] {
        &self.chunks
    }

    /// Number of chunks.
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Chunk `i`.
    pub fn chunk(&self, i: usize) -> Result<&StructureChunk, ArenaError> {
        let count = self.chunks.len();
        self.chunks
            .get(i)
            .ok_or(ArenaError::UnknownChunk { index: i, count })
    }

    /// Private, mutable material of chunk `i`.
    pub fn material_mut(&mut self, i: usize) -> Result<&mut MaterialChunk, ArenaError> {
        let count = self.chunks.len();
        let chunk = self
            .chunks
            .get_mut(i)
            .ok_or(ArenaError::UnknownChunk { index: i, count })?;
        Ok(chunk.material.make_private())
    }

    /// Drop dispersive terms from every chunk.
    pub fn remove_polarizabilities(&mut self) {
        for chunk in &mut self.chunks {
            if !chunk.material.polarizabilities().is_empty() {
                chunk.material.make_private().remove_polarizabilities();
            }
        }
    }

    /// Directory downstream writers put their output in.
    pub fn outdir(&self) -> &Path {
        &self.outdir
    }
}

/// Builder for [`Structure`].
///
/// # Examples
///
/// ```
/// use yee_arena::StructureBuilder;
/// use yee_core::Dimensionality;
/// use yee_space::GridVolume;
///
/// let gv = GridVolume::new(Dimensionality::D2, 10.0, &[10, 10]).unwrap();
/// let s = StructureBuilder::new(gv).chunks(2).epsilon(2.25).build().unwrap();
/// assert_eq!(s.num_chunks(), 2);
/// assert_eq!(s.chunk(1).unwrap().material().eps()[0], 2.25);
/// ```
pub struct StructureBuilder {
    user_grid: GridVolume,
    chunks: usize,
    workers: u32,
    courant: f64,
    symmetry: SymmetryGroup,
    outdir: PathBuf,
    epsilon: f64,
    mu: f64,
    pml: Vec<Direction>,
    polarizabilities: Vec<(f64, f64, f64)>,
}

impl StructureBuilder {
    /// Start from the user's grid, with one chunk, one worker, Courant 0.5,
    /// no symmetry, vacuum and output directory `.`.
    pub fn new(user_grid: GridVolume) -> Self {
        Self {
            user_grid,
            chunks: 1,
            workers: 1,
            courant: 0.5,
            symmetry: SymmetryGroup::identity(),
            outdir: PathBuf::from("."),
            epsilon: 1.0,
            mu: 1.0,
            pml: Vec::new(),
            polarizabilities: Vec::new(),
        }
    }

    /// Number of partitions.
    pub fn chunks(mut self, n: usize) -> Self {
        self.chunks = n;
        self
    }

    /// Number of workers; chunk `i` is owned by worker `i % workers`.
    pub fn workers(mut self, n: u32) -> Self {
        self.workers = n;
        self
    }

    /// Courant number.
    pub fn courant(mut self, c: f64) -> Self {
        self.courant = c;
        self
    }

    /// Symmetry group.
    pub fn symmetry(mut self, s: SymmetryGroup) -> Self {
        self.symmetry = s;
        self
    }

    /// Output directory.
    pub fn outdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.outdir = dir.into();
        self
    }

    /// Uniform permittivity.
    pub fn epsilon(mut self, eps: f64) -> Self {
        self.epsilon = eps;
        self
    }

    /// Uniform permeability.
    pub fn mu(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    /// Absorbing layer along `d`, in every chunk.
    pub fn pml(mut self, d: Direction) -> Self {
        self.pml.push(d);
        self
    }

    /// Uniform Lorentzian polarizability.
    pub fn polarizability(mut self, omega: f64, gamma: f64, sigma: f64) -> Self {
        self.polarizabilities.push((omega, gamma, sigma));
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<Structure, ArenaError> {
        if !(self.courant > 0.0 && self.courant <= 1.0) {
            return Err(ArenaError::InvalidCourant {
                value: self.courant,
            });
        }
        if self.workers == 0 {
            return Err(ArenaError::NoWorkers);
        }
        let grid = reduce_by_symmetry(&self.user_grid, &self.symmetry)?;
        let pieces = grid.split(self.chunks)?;
        let chunks = pieces
            .into_iter()
            .enumerate()
            .map(|(i, piece)| {
                let mut material = MaterialChunk::uniform(piece.ntot(), self.epsilon);
                material.set_uniform_mu(self.mu);
                for &d in &self.pml {
                    material.add_pml(d);
                }
                for &(omega, gamma, sigma) in &self.polarizabilities {
                    material.add_polarizability(Polarizability {
                        omega,
                        gamma,
                        sigma: vec![sigma; piece.ntot()],
                    });
                }
                let owner = WorkerRank(i as u32 % self.workers);
                StructureChunk::new(piece, owner, SharedMaterial::new(material))
            })
            .collect::<Vec<_>>();
        debug!(
            "built {} structure: {} chunks over {} points",
            grid.dim(),
            chunks.len(),
            grid.ntot()
        );
        Ok(Structure {
            a: self.user_grid.resolution(),
            courant: self.courant,
            user_volume: self.user_grid.interior(),
            grid,
            user_grid: self.user_grid,
            symmetry: self.symmetry,
            chunks,
            outdir: self.outdir,
        })
    }
}

/// Keep the high half of the grid across every mirror plane through the
/// cell centre. A plane on a cell edge keeps the grid whole; any other
/// plane is rejected.
fn reduce_by_symmetry(
    user_grid: &GridVolume,
    symmetry: &SymmetryGroup,
) -> Result<GridVolume, ArenaError> {
    let mut grid = user_grid.clone();
    for generator in symmetry.generators() {
        let Some((d, plane)) = generator.mirror_plane(grid.dim()) else {
            continue;
        };
        let exact = plane * grid.resolution();
        let line = exact.round();
        let (lo, hi) = (grid.origin(d), grid.end(d));
        if (exact - line).abs() > 1e-9 * line.abs().max(1.0) {
            return Err(ArenaError::InvalidMirrorPlane { direction: d, plane });
        }
        let line = line as i64;
        if line == lo || line == hi {
            continue;
        }
        if 2 * line != lo + hi {
            return Err(ArenaError::InvalidMirrorPlane { direction: d, plane });
        }
        grid = grid.with_extent(d, line, (hi - line) as usize)?;
    }
    Ok(grid)
}
