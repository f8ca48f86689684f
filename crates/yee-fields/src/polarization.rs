//! Per-chunk state for dispersive (Lorentzian) materials.
//!
//! Each polarizability term of a chunk's material gets a polarization
//! field store, and optionally an energy store. The integration that fills
//! them lives outside this crate; here they are only allocated, zeroed and
//! narrowed to real storage alongside the electric fields they track.

use yee_arena::{ComponentStorage, FieldMode, MaterialChunk};
use yee_core::Component;

/// Polarization storage for one polarizability term.
#[derive(Clone, Debug)]
pub struct PolarizationTerm {
    omega: f64,
    gamma: f64,
    p: ComponentStorage,
    energy: Option<ComponentStorage>,
}

impl PolarizationTerm {
    /// Resonance frequency.
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Damping rate.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Polarization field per electric component.
    pub fn polarization(&self) -> &ComponentStorage {
        &self.p
    }

    /// Mutable polarization field.
    pub fn polarization_mut(&mut self) -> &mut ComponentStorage {
        &mut self.p
    }

    /// Stored energy per electric component, when enabled.
    pub fn energy(&self) -> Option<&ComponentStorage> {
        self.energy.as_ref()
    }
}

/// Polarization state of one chunk.
#[derive(Clone, Debug)]
pub struct PolarizationState {
    terms: Vec<PolarizationTerm>,
}

impl PolarizationState {
    /// State for `material`'s polarizabilities, or `None` if it has none.
    pub fn set_up(material: &MaterialChunk, mode: FieldMode, store_energy: bool) -> Option<Self> {
        if material.polarizabilities().is_empty() {
            return None;
        }
        let len = material.len();
        let terms = material
            .polarizabilities()
            .iter()
            .map(|pol| PolarizationTerm {
                omega: pol.omega,
                gamma: pol.gamma,
                p: ComponentStorage::with_mode(len, mode),
                energy: store_energy.then(|| ComponentStorage::with_mode(len, FieldMode::Real)),
            })
            .collect();
        Some(Self { terms })
    }

    /// The terms, in material order.
    pub fn terms(&self) -> &[PolarizationTerm] {
        &self.terms
    }

    /// Mutable terms.
    pub fn terms_mut(&mut self) -> &mut [PolarizationTerm] {
        &mut self.terms
    }

    /// Allocate zeroed storage for electric component `c` in every term.
    pub fn allocate(&mut self, c: Component) {
        for term in &mut self.terms {
            term.p.allocate(c);
            if let Some(energy) = &mut term.energy {
                energy.allocate(c);
            }
        }
    }

    /// Zero every buffer.
    pub fn zero_fields(&mut self) {
        for term in &mut self.terms {
            term.p.zero_all();
            if let Some(energy) = &mut term.energy {
                energy.zero_all();
            }
        }
    }

    /// Release the imaginary polarization slots.
    pub fn use_real_fields(&mut self) {
        for term in &mut self.terms {
            term.p.drop_imaginary();
        }
    }
}
