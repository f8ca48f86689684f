//! The whole-simulation field state.
//!
//! A [`FieldSet`] owns one [`PartitionChunk`] per structure chunk, the
//! symmetry group, the boundary table and Bloch wavevector, the elapsed
//! step counter and the [`ExchangeLedger`]. Operations that can fail check
//! everything first and only then mutate, so an `Err` leaves the set as it
//! was.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use yee_arena::{Structure, REAL};
use yee_core::{
    BoundarySide, Component, Dimensionality, Direction, FieldKind, FluxMonitor, SourceSet,
    WorkerRank,
};
use yee_space::{
    BoundaryCondition, BoundaryTable, GeometricVolume, GridVolume, SpaceError, SymmetryGroup,
};

use crate::chunk::PartitionChunk;
use crate::config::{ConfigError, FieldsConfig};
use crate::ledger::{ExchangeLedger, LedgerInputs};
use crate::metrics::{Activity, TimeSinks};

/// Field state for every chunk of a simulation.
pub struct FieldSet {
    grid: GridVolume,
    user_grid: GridVolume,
    user_volume: GeometricVolume,
    symmetry: SymmetryGroup,
    a: f64,
    dt: f64,
    m: f64,
    rank: WorkerRank,
    chunks: Vec<PartitionChunk>,
    boundaries: BoundaryTable,
    k: [f64; Direction::COUNT],
    is_real: bool,
    steps: u64,
    phasein_time: u64,
    outdir: PathBuf,
    sources: Option<Box<dyn SourceSet>>,
    fluxes: Option<Box<dyn FluxMonitor>>,
    ledger: ExchangeLedger,
    times: TimeSinks,
}

impl FieldSet {
    /// Build field state for `structure`.
    ///
    /// Every wall the grid has starts metallic. An axis with walls on both
    /// sides (other than r) whose user grid is one point thick becomes
    /// periodic with zero Bloch phase. Cylindrical runs add the r → −r
    /// identification for mode `m` to the structure's symmetry group.
    pub fn new(structure: &Structure, config: FieldsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = structure.grid().clone();
        let mut symmetry = structure.symmetry().clone();
        if grid.dim() == Dimensionality::Cylindrical {
            symmetry = symmetry + SymmetryGroup::r_to_minus_r(config.m as i32);
        }
        let chunks = structure
            .chunks()
            .iter()
            .map(|sc| PartitionChunk::new(sc, config.m, config.store_pol_energy, config.rank))
            .collect::<Vec<_>>();

        let mut boundaries = BoundaryTable::default();
        for side in BoundarySide::BOTH {
            for d in Direction::ALL {
                if grid.has_boundary(side, d) {
                    boundaries.set(side, d, BoundaryCondition::Metallic);
                }
            }
        }

        let mut fields = Self {
            a: structure.resolution(),
            dt: structure.dt(),
            m: config.m,
            rank: config.rank,
            user_grid: structure.user_grid().clone(),
            user_volume: *structure.user_volume(),
            symmetry,
            chunks,
            boundaries,
            k: [0.0; Direction::COUNT],
            is_real: false,
            steps: 0,
            phasein_time: 0,
            outdir: structure.outdir().to_path_buf(),
            sources: None,
            fluxes: None,
            ledger: ExchangeLedger::new(),
            times: TimeSinks::new(),
            grid,
        };
        for d in Direction::ALL {
            if fields.grid.has_boundary(BoundarySide::High, d)
                && fields.grid.has_boundary(BoundarySide::Low, d)
                && d != Direction::R
                && fields.user_grid.num_direction(d) == 1
            {
                fields.set_bloch(d, 0.0);
            }
        }
        info!(
            "fields: {} grid, {} chunks, resolution {}, dt {}",
            fields.grid.dim(),
            fields.chunks.len(),
            fields.a,
            fields.dt
        );
        Ok(fields)
    }

    // ── Whole-set lifecycle ────────────────────────────────────────

    /// Drop sources and flux monitors, zero every field and rewind time.
    pub fn reset(&mut self) {
        self.remove_sources();
        self.remove_fluxes();
        self.zero_fields();
        self.steps = 0;
    }

    /// Zero every field buffer without releasing it.
    pub fn zero_fields(&mut self) {
        for chunk in &mut self.chunks {
            chunk.zero_fields();
        }
    }

    /// Allocate `c` (and everything that lives with it) in every owned chunk.
    pub fn allocate_component(&mut self, c: Component) -> Result<(), ConfigError> {
        let mut changed = false;
        for chunk in &mut self.chunks {
            changed |= chunk.allocate_component(c)?;
        }
        if changed {
            self.ledger.invalidate();
        }
        Ok(())
    }

    /// Whether any chunk has storage for `c`.
    pub fn have_component(&self, c: Component) -> bool {
        self.chunks.iter().any(|ch| ch.field(c, REAL).is_some())
    }

    /// Switch every chunk to real fields.
    ///
    /// Refused while a periodic axis carries a non-zero Bloch wavevector.
    pub fn use_real_fields(&mut self) -> Result<(), ConfigError> {
        for d in self.grid.dim().grid_directions() {
            let k = self.k[d.index()];
            if self.boundaries.get(BoundarySide::High, d) == BoundaryCondition::Periodic
                && k != 0.0
            {
                return Err(ConfigError::RealFieldsWithBloch { direction: d, k });
            }
        }
        self.is_real = true;
        for chunk in &mut self.chunks {
            chunk.use_real_fields();
        }
        self.ledger.invalidate();
        Ok(())
    }

    /// Make `d` periodic with Bloch wavevector component `k`.
    pub fn use_bloch(&mut self, d: Direction, k: f64) -> Result<(), ConfigError> {
        self.check_bloch(d, k)?;
        self.set_bloch(d, k);
        Ok(())
    }

    /// Make every grid axis periodic with the matching entry of `k`.
    pub fn use_bloch_vector(&mut self, k: [f64; Direction::COUNT]) -> Result<(), ConfigError> {
        let axes = self.grid.dim().grid_directions();
        for &d in &axes {
            self.check_bloch(d, k[d.index()])?;
        }
        for d in axes {
            self.set_bloch(d, k[d.index()]);
        }
        Ok(())
    }

    fn check_bloch(&self, d: Direction, k: f64) -> Result<(), ConfigError> {
        if !self.grid.dim().has_direction(d) {
            return Err(SpaceError::NotAGridAxis {
                direction: d,
                dim: self.grid.dim(),
            }
            .into());
        }
        if self.is_real && k != 0.0 {
            return Err(ConfigError::BlochWithRealFields { direction: d, k });
        }
        Ok(())
    }

    fn set_bloch(&mut self, d: Direction, k: f64) {
        self.k[d.index()] = k;
        for side in BoundarySide::BOTH {
            self.boundaries.set(side, d, BoundaryCondition::Periodic);
        }
        self.ledger.invalidate();
    }

    /// Replace the condition on one face.
    pub fn set_boundary(&mut self, side: BoundarySide, d: Direction, cond: BoundaryCondition) {
        self.boundaries.set(side, d, cond);
        self.ledger.invalidate();
    }

    /// Replace the symmetry group.
    pub fn set_symmetry(&mut self, symmetry: SymmetryGroup) {
        self.symmetry = symmetry;
        self.ledger.invalidate();
    }

    /// Shift the radial origin of every chunk.
    ///
    /// Only valid in cylindrical coordinates, for volumes that do not
    /// contain r = 0.
    pub fn set_rshift(&mut self, rshift: f64) -> Result<(), ConfigError> {
        let dim = self.grid.dim();
        if dim != Dimensionality::Cylindrical {
            return Err(ConfigError::RadialShiftNotCylindrical { dim });
        }
        let r_min = self.user_volume.in_direction_min(Direction::R);
        let r_max = self.user_volume.in_direction_max(Direction::R);
        if r_min <= 0.0 && r_max >= 0.0 {
            return Err(ConfigError::RadialShiftContainsOrigin { r_min, r_max });
        }
        for chunk in &mut self.chunks {
            chunk.set_rshift(rshift);
        }
        Ok(())
    }

    // ── Material phase-in ──────────────────────────────────────────

    /// Start blending towards `structure`'s material over `time`.
    ///
    /// The structure must be partitioned exactly like this set: same chunk
    /// count, resolution and per-chunk grids. Returns the horizon in steps.
    /// A horizon of zero swaps the new material in immediately.
    pub fn phase_in_material(&mut self, structure: &Structure, time: f64) -> Result<u64, ConfigError> {
        if structure.num_chunks() != self.chunks.len() {
            return Err(ConfigError::ChunkCountMismatch {
                expected: self.chunks.len(),
                got: structure.num_chunks(),
            });
        }
        if structure.resolution() != self.a {
            return Err(ConfigError::InvalidResolution {
                expected: self.a,
                got: structure.resolution(),
            });
        }
        if let Some(index) = self
            .chunks
            .iter()
            .zip(structure.chunks())
            .position(|(chunk, sc)| chunk.grid() != sc.grid())
        {
            return Err(ConfigError::ChunkLayoutMismatch { index });
        }
        if !time.is_finite() || time < 0.0 {
            return Err(ConfigError::InvalidPhaseInTime { value: time });
        }
        for (chunk, sc) in self.chunks.iter_mut().zip(structure.chunks()) {
            if chunk.is_mine() {
                chunk.phase_in_material(sc.material().clone());
            }
        }
        self.phasein_time = (time / self.dt) as u64;
        if self.phasein_time == 0 {
            warn!("phase-in over {time} is shorter than one step; applying at once");
            self.finish_phase_in();
        }
        Ok(self.phasein_time)
    }

    /// Whether a material phase-in is in progress.
    pub fn is_phasing(&self) -> bool {
        self.phasein_time > 0
    }

    /// Steps left in the current phase-in.
    pub fn phasein_time(&self) -> u64 {
        self.phasein_time
    }

    /// Swap every pending material in and end the phase-in.
    pub fn finish_phase_in(&mut self) {
        let mut swapped = 0;
        for chunk in &mut self.chunks {
            swapped += usize::from(chunk.finish_phase_in());
        }
        self.phasein_time = 0;
        self.ledger.invalidate();
        debug!("phase-in finished on {swapped} chunks");
    }

    // ── Collaborators ──────────────────────────────────────────────

    /// Hold `sources` until they are removed.
    pub fn attach_sources(&mut self, sources: Box<dyn SourceSet>) {
        self.sources = Some(sources);
    }

    /// Hold `fluxes` until they are removed.
    pub fn attach_fluxes(&mut self, fluxes: Box<dyn FluxMonitor>) {
        self.fluxes = Some(fluxes);
    }

    /// The attached sources.
    pub fn sources(&self) -> Option<&dyn SourceSet> {
        self.sources.as_deref()
    }

    /// The attached flux monitors.
    pub fn fluxes(&self) -> Option<&dyn FluxMonitor> {
        self.fluxes.as_deref()
    }

    /// Drop the global and per-chunk sources.
    pub fn remove_sources(&mut self) {
        self.sources = None;
        for chunk in &mut self.chunks {
            chunk.remove_sources();
        }
    }

    /// Drop the flux monitors.
    pub fn remove_fluxes(&mut self) {
        self.fluxes = None;
    }

    /// Drop polarization state and dispersive terms in every chunk.
    pub fn remove_polarizabilities(&mut self) {
        for chunk in &mut self.chunks {
            chunk.remove_polarizabilities();
        }
    }

    // ── Exchange ───────────────────────────────────────────────────

    /// Rebuild the exchange ledger if anything invalidated it.
    pub fn connect_chunks(&mut self) -> &ExchangeLedger {
        if !self.ledger.is_valid() {
            self.times.am_now_working_on(Activity::Connecting);
            self.ledger.rebuild(&LedgerInputs {
                chunks: &self.chunks,
                grid: &self.grid,
                boundaries: &self.boundaries,
                k: &self.k,
                symmetry: &self.symmetry,
                is_real: self.is_real,
            });
            self.times.finished_working();
        }
        &self.ledger
    }

    /// The exchange ledger, valid or not.
    pub fn ledger(&self) -> &ExchangeLedger {
        &self.ledger
    }

    /// Mutable ledger, for transport code filling receive buffers.
    pub fn ledger_mut(&mut self) -> &mut ExchangeLedger {
        &mut self.ledger
    }

    // ── Time ───────────────────────────────────────────────────────

    /// Count one elapsed step; a running phase-in finishes when its
    /// horizon runs out.
    pub fn advance(&mut self) -> u64 {
        self.steps += 1;
        if self.phasein_time > 0 {
            self.phasein_time -= 1;
            if self.phasein_time == 0 {
                self.finish_phase_in();
            }
        }
        self.steps
    }

    /// Elapsed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Elapsed time, `steps × dt`.
    pub fn time(&self) -> f64 {
        self.steps as f64 * self.dt
    }

    /// Wall-time accounting.
    pub fn times(&self) -> &TimeSinks {
        &self.times
    }

    /// Mutable wall-time accounting, for collaborators timing their work.
    pub fn times_mut(&mut self) -> &mut TimeSinks {
        &mut self.times
    }

    // ── Layout queries ─────────────────────────────────────────────

    /// Whether `self` and `other` partition the same space the same way.
    pub fn equal_layout(&self, other: &FieldSet) -> bool {
        if self.a != other.a
            || self.chunks.len() != other.chunks.len()
            || self.grid != other.grid
            || self.symmetry != other.symmetry
            || self.k != other.k
        {
            return false;
        }
        self.chunks.iter().zip(&other.chunks).all(|(a, b)| {
            a.grid().resolution() == b.grid().resolution() && a.grid() == b.grid()
        })
    }

    /// The region the simulation represents, including the parts covered
    /// only through symmetry.
    pub fn total_volume(&self) -> GeometricVolume {
        let base = self.grid.interior();
        let mut total = base;
        for n in 1..self.symmetry.multiplicity() {
            total = total | self.symmetry.transform_volume(&base, n);
        }
        if total.dim() == Dimensionality::Cylindrical
            && total.in_direction_min(Direction::R) < 0.0
        {
            total.set_direction_min(Direction::R, 0.0);
        }
        total
    }

    /// Whether `d` is a one-point periodic axis standing in for a missing
    /// dimension.
    pub fn nosize_direction(&self, d: Direction) -> bool {
        self.grid.has_boundary(BoundarySide::Low, d)
            && self.grid.has_boundary(BoundarySide::High, d)
            && self.boundaries.is_periodic(d)
            && self.grid.num_direction(d) == 1
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// The chunks, in structure order.
    pub fn chunks(&self) -> &[PartitionChunk] {
        &self.chunks
    }

    /// Chunk `i`.
    pub fn chunk(&self, i: usize) -> Option<&PartitionChunk> {
        self.chunks.get(i)
    }

    /// Mutable chunk `i`.
    ///
    /// Changes made through the chunk are invisible to the ledger, so this
    /// invalidates it.
    pub fn chunk_mut(&mut self, i: usize) -> Option<&mut PartitionChunk> {
        self.ledger.invalidate();
        self.chunks.get_mut(i)
    }

    /// Number of chunks.
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Computational grid.
    pub fn grid(&self) -> &GridVolume {
        &self.grid
    }

    /// The region the user asked for.
    pub fn user_volume(&self) -> &GeometricVolume {
        &self.user_volume
    }

    /// Grid dimensionality.
    pub fn dim(&self) -> Dimensionality {
        self.grid.dim()
    }

    /// Resolution in points per unit length.
    pub fn resolution(&self) -> f64 {
        self.a
    }

    /// Time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Angular mode number.
    pub fn m(&self) -> f64 {
        self.m
    }

    /// Rank of the worker this view belongs to.
    pub fn rank(&self) -> WorkerRank {
        self.rank
    }

    /// Symmetry group in use.
    pub fn symmetry(&self) -> &SymmetryGroup {
        &self.symmetry
    }

    /// Condition on one face.
    pub fn boundary(&self, side: BoundarySide, d: Direction) -> BoundaryCondition {
        self.boundaries.get(side, d)
    }

    /// Bloch wavevector, one entry per direction.
    pub fn k(&self) -> &[f64; Direction::COUNT] {
        &self.k
    }

    /// Whether fields are real.
    pub fn is_real(&self) -> bool {
        self.is_real
    }

    /// Output directory for downstream writers.
    pub fn outdir(&self) -> &Path {
        &self.outdir
    }

    /// Bytes held by every chunk's field buffers.
    pub fn memory_bytes(&self) -> usize {
        self.chunks.iter().map(PartitionChunk::memory_bytes).sum()
    }

    /// Number of chunks holding storage for field kind `kind`.
    pub fn chunks_with(&self, kind: FieldKind) -> usize {
        self.chunks
            .iter()
            .filter(|ch| {
                ch.storage()
                    .allocated()
                    .iter()
                    .any(|c| c.kind == kind)
            })
            .count()
    }
}

impl Clone for FieldSet {
    /// Deep-copy every chunk's fields; materials stay shared.
    ///
    /// Sources and flux monitors are not copied, and the ledger starts
    /// invalid.
    fn clone(&self) -> Self {
        Self {
            grid: self.grid.clone(),
            user_grid: self.user_grid.clone(),
            user_volume: self.user_volume,
            symmetry: self.symmetry.clone(),
            a: self.a,
            dt: self.dt,
            m: self.m,
            rank: self.rank,
            chunks: self.chunks.clone(),
            boundaries: self.boundaries.clone(),
            k: self.k,
            is_real: self.is_real,
            steps: self.steps,
            phasein_time: self.phasein_time,
            outdir: self.outdir.clone(),
            sources: None,
            fluxes: None,
            ledger: ExchangeLedger::new(),
            times: TimeSinks::new(),
        }
    }
}

impl Drop for FieldSet {
    fn drop(&mut self) {
        self.times.log_summary();
    }
}

impl std::fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSet")
            .field("grid", &self.grid)
            .field("chunks", &self.chunks)
            .field("k", &self.k)
            .field("is_real", &self.is_real)
            .field("steps", &self.steps)
            .field("ledger_valid", &self.ledger.is_valid())
            .finish_non_exhaustive()
    }
}
