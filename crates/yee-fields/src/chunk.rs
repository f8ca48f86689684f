//! One spatial partition of the field state.
//!
//! A [`PartitionChunk`] owns the field buffers for its grid points, shares
//! its material with every other holder of the same structure chunk, and
//! derives its [`CouplingTable`] lazily from whatever is allocated. Every
//! change to the allocated set goes through one invalidation point, so the
//! table a reader sees always matches the buffers that exist.

use std::cell::OnceCell;

use log::debug;
use yee_arena::{
    ArenaError, ComponentStorage, FieldMode, MaterialChunk, SharedMaterial, StructureChunk, REAL,
};
use yee_core::{Component, Direction, FieldKind, SourceSet, WorkerRank};
use yee_space::GridVolume;

use crate::planner::CouplingTable;
use crate::polarization::PolarizationState;

/// Field state of one partition.
pub struct PartitionChunk {
    grid: GridVolume,
    owner: WorkerRank,
    mine: bool,
    m: f64,
    store_pol_energy: bool,
    material: SharedMaterial,
    pending: Option<SharedMaterial>,
    fields: ComponentStorage,
    backup: ComponentStorage,
    previous: ComponentStorage,
    plan: OnceCell<CouplingTable>,
    pol: Option<PolarizationState>,
    old_pol: Option<PolarizationState>,
    b_sources: Option<Box<dyn SourceSet>>,
    d_sources: Option<Box<dyn SourceSet>>,
    rshift: f64,
}

impl PartitionChunk {
    /// Build the chunk for `sc`, as seen by worker `rank`.
    ///
    /// The material is shared, not copied. No buffers exist yet.
    pub fn new(sc: &StructureChunk, m: f64, store_pol_energy: bool, rank: WorkerRank) -> Self {
        let len = sc.grid().ntot();
        let material = sc.material().clone();
        let pol = PolarizationState::set_up(&material, FieldMode::Uninitialized, store_pol_energy);
        Self {
            grid: sc.grid().clone(),
            owner: sc.owner(),
            mine: sc.owner() == rank,
            m,
            store_pol_energy,
            old_pol: pol.clone(),
            pol,
            material,
            pending: None,
            fields: ComponentStorage::new(len),
            backup: ComponentStorage::new(len),
            previous: ComponentStorage::new(len),
            plan: OnceCell::new(),
            b_sources: None,
            d_sources: None,
            rshift: 0.0,
        }
    }

    // ── Allocation ─────────────────────────────────────────────────

    /// Allocate `c` and every component that lives alongside it.
    ///
    /// On a chunk owned by this worker, every non-magnetic component that
    /// exists on the grid and is "like" `c` gets zeroed storage. Then each
    /// H without storage shares its B's buffer, unless the material needs
    /// them apart along that direction. Components that cannot exist here
    /// are ignored. Returns `true` if anything was allocated.
    pub fn allocate_component(&mut self, c: Component) -> Result<bool, ArenaError> {
        if !self.mine {
            return Ok(false);
        }
        let dim = self.grid.dim();
        let mut changed = false;
        for other in Component::all() {
            if !self.grid.has_field(other) || !dim.is_like(c, other) || other.is_magnetic() {
                continue;
            }
            let fresh = self.fields.allocate(other);
            if fresh && other.is_electric() {
                for pol in self.pol.iter_mut().chain(self.old_pol.iter_mut()) {
                    pol.allocate(other);
                }
            }
            changed |= fresh;
        }
        for d in Direction::ALL {
            let h = Component::new(FieldKind::Magnetic, d);
            let b = Component::new(FieldKind::Induction, d);
            if self.fields.owner_of(h, REAL).is_some() || !self.fields.is_owned(b, REAL) {
                continue;
            }
            if self.material.needs_separate_magnetic(d) {
                self.fields.allocate(h);
            } else {
                self.fields.alias(h, b)?;
            }
            changed = true;
        }
        if changed {
            debug!(
                "allocated {c} on {} chunk of {} points ({} buffers)",
                dim,
                self.grid.ntot(),
                self.fields.owned_buffers()
            );
            self.plan.take();
        }
        Ok(changed)
    }

    /// The coupling table for the components allocated right now.
    pub fn coupling(&self) -> &CouplingTable {
        self.plan
            .get_or_init(|| CouplingTable::plan(&self.grid, &self.fields.allocated()))
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Zero every field, shadow and (if owned) polarization buffer.
    pub fn zero_fields(&mut self) {
        self.fields.zero_all();
        self.backup.zero_all();
        self.previous.zero_all();
        if self.mine {
            for pol in self.pol.iter_mut().chain(self.old_pol.iter_mut()) {
                pol.zero_fields();
            }
        }
    }

    /// Release every imaginary buffer and stay real from now on.
    pub fn use_real_fields(&mut self) {
        let freed = self.fields.drop_imaginary()
            + self.backup.drop_imaginary()
            + self.previous.drop_imaginary();
        if self.mine {
            for pol in self.pol.iter_mut().chain(self.old_pol.iter_mut()) {
                pol.use_real_fields();
            }
        }
        if freed > 0 {
            debug!("released {freed} imaginary buffers");
        }
    }

    /// Record `material` as the target of a gradual material change.
    pub fn phase_in_material(&mut self, material: SharedMaterial) {
        self.pending = Some(material);
    }

    /// Whether a material change is pending.
    pub fn is_phasing_in(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending material, if any.
    pub fn pending_material(&self) -> Option<&SharedMaterial> {
        self.pending.as_ref()
    }

    /// Swap in the pending material. Returns `false` if there was none.
    pub fn finish_phase_in(&mut self) -> bool {
        match self.pending.take() {
            Some(material) => {
                self.material = material;
                true
            }
            None => false,
        }
    }

    /// Private, mutable material for in-place edits.
    pub fn material_mut(&mut self) -> &mut MaterialChunk {
        self.material.make_private()
    }

    /// Shared material handle.
    pub fn material(&self) -> &SharedMaterial {
        &self.material
    }

    /// Hand sources for B or D updates to this chunk.
    ///
    /// Magnetic kinds go to the B sources, electric kinds to the D sources.
    pub fn attach_sources(&mut self, kind: FieldKind, sources: Box<dyn SourceSet>) {
        match kind {
            FieldKind::Magnetic | FieldKind::Induction => self.b_sources = Some(sources),
            FieldKind::Electric | FieldKind::Displacement => self.d_sources = Some(sources),
        }
    }

    /// Whether any sources are attached.
    pub fn has_sources(&self) -> bool {
        self.b_sources.is_some() || self.d_sources.is_some()
    }

    /// Drop both source sets.
    pub fn remove_sources(&mut self) {
        self.b_sources = None;
        self.d_sources = None;
    }

    /// Drop polarization state and the material's dispersive terms.
    pub fn remove_polarizabilities(&mut self) {
        self.pol = None;
        self.old_pol = None;
        self.material.make_private().remove_polarizabilities();
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// Values of `(c, cmp)`, or `None` if nothing is allocated.
    pub fn field(&self, c: Component, cmp: usize) -> Option<&[f64]> {
        self.fields.get(c, cmp)
    }

    /// Mutable values of `(c, cmp)`.
    pub fn field_mut(&mut self, c: Component, cmp: usize) -> Option<&mut [f64]> {
        self.fields.get_mut(c, cmp)
    }

    /// The field buffers.
    pub fn storage(&self) -> &ComponentStorage {
        &self.fields
    }

    /// Backup copies kept by collaborators.
    pub fn backup(&self) -> &ComponentStorage {
        &self.backup
    }

    /// Mutable backup store.
    pub fn backup_mut(&mut self) -> &mut ComponentStorage {
        &mut self.backup
    }

    /// Previous-step copies kept by collaborators.
    pub fn previous(&self) -> &ComponentStorage {
        &self.previous
    }

    /// Mutable previous-step store.
    pub fn previous_mut(&mut self) -> &mut ComponentStorage {
        &mut self.previous
    }

    /// Polarization state, if the material is dispersive.
    pub fn polarization(&self) -> Option<&PolarizationState> {
        self.pol.as_ref()
    }

    /// Mutable polarization state.
    pub fn polarization_mut(&mut self) -> Option<&mut PolarizationState> {
        self.pol.as_mut()
    }

    /// Whether this worker materialises the chunk.
    pub fn is_mine(&self) -> bool {
        self.mine
    }

    /// Owning worker.
    pub fn owner(&self) -> WorkerRank {
        self.owner
    }

    /// Whether the chunk has switched to real fields.
    pub fn is_real(&self) -> bool {
        self.fields.mode() == FieldMode::Real
    }

    /// The chunk's grid points.
    pub fn grid(&self) -> &GridVolume {
        &self.grid
    }

    /// Angular mode number.
    pub fn m(&self) -> f64 {
        self.m
    }

    /// Radial shift applied to cylindrical coordinates.
    pub fn rshift(&self) -> f64 {
        self.rshift
    }

    pub(crate) fn set_rshift(&mut self, rshift: f64) {
        self.rshift = rshift;
    }

    /// Bytes held by field and shadow buffers.
    pub fn memory_bytes(&self) -> usize {
        self.fields.memory_bytes() + self.backup.memory_bytes() + self.previous.memory_bytes()
    }
}

impl Clone for PartitionChunk {
    /// Deep-copy the fields, keeping alias tags; share the current and
    /// any pending material.
    ///
    /// Sources and shadow stores are not copied, and polarization state
    /// starts from zero.
    fn clone(&self) -> Self {
        let len = self.grid.ntot();
        let mode = self.fields.mode();
        let mut pol = PolarizationState::set_up(&self.material, mode, self.store_pol_energy);
        if let Some(pol) = pol.as_mut() {
            for c in self.fields.allocated().iter().filter(|c| c.is_electric()) {
                pol.allocate(c);
            }
        }
        Self {
            grid: self.grid.clone(),
            owner: self.owner,
            mine: self.mine,
            m: self.m,
            store_pol_energy: self.store_pol_energy,
            material: self.material.clone(),
            pending: self.pending.clone(),
            fields: self.fields.clone(),
            backup: ComponentStorage::with_mode(len, mode),
            previous: ComponentStorage::with_mode(len, mode),
            plan: self.plan.clone(),
            old_pol: pol.clone(),
            pol,
            b_sources: None,
            d_sources: None,
            rshift: self.rshift,
        }
    }
}

impl std::fmt::Debug for PartitionChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartitionChunk")
            .field("grid", &self.grid)
            .field("owner", &self.owner)
            .field("mine", &self.mine)
            .field("mode", &self.fields.mode())
            .field("allocated", &self.fields.allocated())
            .field("phasing_in", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yee_arena::{StructureBuilder, IMAG};
    use yee_core::components::*;
    use yee_core::Dimensionality;

    fn chunk_with(builder: StructureBuilder) -> PartitionChunk {
        let s = builder.build().unwrap();
        PartitionChunk::new(&s.chunks()[0], 0.0, false, WorkerRank(0))
    }

    fn d2(n: usize) -> StructureBuilder {
        StructureBuilder::new(GridVolume::new(Dimensionality::D2, 10.0, &[n, n]).unwrap())
    }

    #[test]
    fn coupling_before_allocation_is_empty() {
        let chunk = chunk_with(d2(4));
        assert!(chunk.coupling().coupled().is_empty());
        assert!(chunk.field(Ex, REAL).is_none());
    }

    #[test]
    fn allocating_te_component_skips_tm_components() {
        let mut chunk = chunk_with(d2(4));
        assert!(chunk.allocate_component(Ex).unwrap());
        for c in [Ex, Ey, Dx, Dy, Bz] {
            assert!(chunk.field(c, REAL).is_some(), "{c} missing");
        }
        for c in [Ez, Dz, Bx, By, Hx, Hy] {
            assert!(chunk.field(c, REAL).is_none(), "{c} unexpectedly allocated");
        }
        assert!(chunk.storage().shares_storage(Hz, Bz, REAL));
        assert!(!chunk.storage().is_owned(Hz, REAL));
    }

    #[test]
    fn coupling_is_recomputed_after_allocation() {
        let mut chunk = chunk_with(d2(4));
        assert!(chunk.coupling().plus(Ex).is_none());
        chunk.allocate_component(Ex).unwrap();
        assert_eq!(chunk.coupling().plus(Ex).map(|k| k.partner), Some(Hz));
    }

    #[test]
    fn pml_forces_separate_magnetic_storage() {
        let mut chunk = chunk_with(d2(4).pml(Direction::X));
        chunk.allocate_component(Ex).unwrap();
        assert!(chunk.storage().is_owned(Hz, REAL));
        assert!(!chunk.storage().shares_storage(Hz, Bz, REAL));
    }

    #[test]
    fn foreign_chunks_stay_empty() {
        let s = d2(4).workers(2).chunks(2).build().unwrap();
        let mut theirs = PartitionChunk::new(&s.chunks()[1], 0.0, false, WorkerRank(0));
        assert!(!theirs.is_mine());
        assert!(!theirs.allocate_component(Ex).unwrap());
        assert!(theirs.field(Ex, REAL).is_none());
    }

    #[test]
    fn use_real_fields_is_idempotent() {
        let mut chunk = chunk_with(d2(4));
        chunk.allocate_component(Ez).unwrap();
        chunk.use_real_fields();
        assert!(chunk.is_real());
        for c in Component::all() {
            assert!(chunk.field(c, IMAG).is_none());
        }
        let before = chunk.memory_bytes();
        chunk.use_real_fields();
        assert_eq!(chunk.memory_bytes(), before);
        assert!(chunk.field(Ez, REAL).is_some());
    }

    #[test]
    fn zero_fields_clears_values_and_polarization() {
        let mut chunk = chunk_with(d2(4).polarizability(1.0, 0.1, 0.5));
        chunk.allocate_component(Ez).unwrap();
        chunk.field_mut(Ez, REAL).unwrap().fill(1.0);
        chunk.field_mut(Hx, IMAG).unwrap()[0] = 2.0;
        chunk.zero_fields();
        assert!(chunk.field(Ez, REAL).unwrap().iter().all(|&v| v == 0.0));
        assert!(chunk.field(Bx, IMAG).unwrap().iter().all(|&v| v == 0.0));
        let pol = chunk.polarization().unwrap();
        assert!(pol.terms()[0].polarization().get(Ez, REAL).is_some());
    }

    #[test]
    fn zero_fields_clears_shadow_stores_and_polarization() {
        let mut chunk = chunk_with(d2(4).polarizability(1.0, 0.1, 0.5));
        chunk.allocate_component(Ez).unwrap();
        chunk.backup_mut().allocate(Ez);
        chunk.previous_mut().allocate(Hx);
        chunk.backup_mut().get_mut(Ez, REAL).unwrap().fill(3.0);
        chunk.previous_mut().get_mut(Hx, IMAG).unwrap()[2] = -1.0;
        let term = &mut chunk.polarization_mut().unwrap().terms_mut()[0];
        term.polarization_mut().get_mut(Ez, IMAG).unwrap().fill(0.5);

        chunk.zero_fields();
        for store in [chunk.backup(), chunk.previous()] {
            for c in store.allocated().iter() {
                for cmp in [REAL, IMAG] {
                    assert!(store.get(c, cmp).unwrap().iter().all(|&v| v == 0.0), "{c}");
                }
            }
        }
        assert_eq!(chunk.backup().get(Ez, REAL), Some(&[0.0; 16][..]));
        assert_eq!(chunk.previous().get(Hx, IMAG), Some(&[0.0; 16][..]));
        let p = chunk.polarization().unwrap().terms()[0].polarization();
        assert_eq!(p.get(Ez, REAL), Some(&[0.0; 16][..]));
        assert_eq!(p.get(Ez, IMAG), Some(&[0.0; 16][..]));
    }

    #[test]
    fn clone_copies_values_and_shares_material() {
        let mut chunk = chunk_with(d2(4));
        chunk.allocate_component(Ex).unwrap();
        chunk.field_mut(Bz, REAL).unwrap()[3] = 5.0;
        chunk.attach_sources(FieldKind::Electric, Box::new(NoSources));
        let mut copy = chunk.clone();
        assert_eq!(chunk.material().share_count(), 2);
        assert!(!copy.has_sources());
        assert_eq!(copy.field(Hz, REAL).unwrap()[3], 5.0);
        assert!(copy.storage().shares_storage(Hz, Bz, REAL));
        copy.field_mut(Bz, REAL).unwrap()[3] = 1.0;
        assert_eq!(chunk.field(Bz, REAL).unwrap()[3], 5.0);
    }

    #[test]
    fn clone_sets_up_polarization_for_foreign_chunks_too() {
        let s = d2(4).polarizability(1.0, 0.1, 0.5).workers(2).chunks(2).build().unwrap();
        let theirs = PartitionChunk::new(&s.chunks()[1], 0.0, false, WorkerRank(0));
        assert!(!theirs.is_mine());
        assert!(theirs.polarization().is_some());
        assert!(theirs.clone().polarization().is_some());
    }

    #[test]
    fn clone_shares_pending_material() {
        let old = d2(4).epsilon(1.0).build().unwrap();
        let new = d2(4).epsilon(4.0).build().unwrap();
        let mut chunk = PartitionChunk::new(&old.chunks()[0], 0.0, false, WorkerRank(0));
        chunk.phase_in_material(new.chunks()[0].material().clone());
        let mut copy = chunk.clone();
        assert!(copy.is_phasing_in());
        assert_eq!(new.chunks()[0].material().share_count(), 3);
        assert!(copy.finish_phase_in());
        assert_eq!(copy.material().eps()[0], 4.0);
        assert!(chunk.is_phasing_in());
    }

    #[test]
    fn material_mut_privatises_shared_material() {
        let s = d2(4).epsilon(2.0).build().unwrap();
        let mut chunk = PartitionChunk::new(&s.chunks()[0], 0.0, false, WorkerRank(0));
        chunk.material_mut().eps_mut()[0] = 9.0;
        assert_eq!(s.chunks()[0].material().eps()[0], 2.0);
        assert_eq!(chunk.material().share_count(), 1);
    }

    #[test]
    fn remove_polarizabilities_drops_state_and_terms() {
        let mut chunk = chunk_with(d2(4).polarizability(1.0, 0.1, 0.5));
        assert!(chunk.polarization().is_some());
        chunk.remove_polarizabilities();
        assert!(chunk.polarization().is_none());
        assert!(chunk.material().polarizabilities().is_empty());
    }

    #[test]
    fn finish_phase_in_swaps_material() {
        let old = d2(4).epsilon(1.0).build().unwrap();
        let new = d2(4).epsilon(4.0).build().unwrap();
        let mut chunk = PartitionChunk::new(&old.chunks()[0], 0.0, false, WorkerRank(0));
        chunk.phase_in_material(new.chunks()[0].material().clone());
        assert!(chunk.is_phasing_in());
        assert!(chunk.finish_phase_in());
        assert_eq!(chunk.material().eps()[0], 4.0);
        assert!(!chunk.finish_phase_in());
    }

    struct NoSources;

    impl SourceSet for NoSources {
        fn label(&self) -> &str {
            "none"
        }

        fn components(&self) -> Vec<Component> {
            Vec::new()
        }
    }
}
