//! Per-chunk material coefficients.

use yee_core::Direction;

/// One Lorentzian polarizability term.
#[derive(Clone, Debug, PartialEq)]
pub struct Polarizability {
    /// Resonance frequency.
    pub omega: f64,
    /// Damping rate.
    pub gamma: f64,
    /// Per-point oscillator strength.
    pub sigma: Vec<f64>,
}

/// Material coefficients for one chunk's grid points.
///
/// Values are stored per point in the chunk's row-major order. A missing
/// permeability array means μ = 1 everywhere.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialChunk {
    eps: Vec<f64>,
    mu: Option<Vec<f64>>,
    pml: [bool; Direction::COUNT],
    polarizabilities: Vec<Polarizability>,
}

impl MaterialChunk {
    /// A chunk of `len` points with uniform permittivity and μ = 1.
    pub fn uniform(len: usize, eps: f64) -> Self {
        Self {
            eps: vec![eps; len],
            mu: None,
            pml: [false; Direction::COUNT],
            polarizabilities: Vec::new(),
        }
    }

    /// Number of grid points covered.
    pub fn len(&self) -> usize {
        self.eps.len()
    }

    /// Returns `true` if the chunk covers no points.
    pub fn is_empty(&self) -> bool {
        self.eps.is_empty()
    }

    /// Permittivity per point.
    pub fn eps(&self) -> &[f64] {
        &self.eps
    }

    /// Mutable permittivity per point.
    pub fn eps_mut(&mut self) -> &mut [f64] {
        &mut self.eps
    }

    /// Permeability per point, if not uniformly 1.
    pub fn mu(&self) -> Option<&[f64]> {
        self.mu.as_deref()
    }

    /// Replace the permeability with a uniform value.
    pub fn set_uniform_mu(&mut self, mu: f64) {
        self.mu = if mu == 1.0 {
            None
        } else {
            Some(vec![mu; self.eps.len()])
        };
    }

    /// Mark an absorbing layer along `d`.
    pub fn add_pml(&mut self, d: Direction) {
        self.pml[d.index()] = true;
    }

    /// Whether an absorbing layer exists along `d`.
    pub fn has_pml(&self, d: Direction) -> bool {
        self.pml[d.index()]
    }

    /// Append a polarizability term.
    pub fn add_polarizability(&mut self, p: Polarizability) {
        self.polarizabilities.push(p);
    }

    /// The dispersive terms.
    pub fn polarizabilities(&self) -> &[Polarizability] {
        &self.polarizabilities
    }

    /// Drop every dispersive term.
    pub fn remove_polarizabilities(&mut self) {
        self.polarizabilities.clear();
    }

    /// Whether H along `d` needs a buffer separate from B along `d`.
    ///
    /// True when μ ≠ 1 somewhere, or when an absorbing layer exists along a
    /// direction other than `d`.
    pub fn needs_separate_magnetic(&self, d: Direction) -> bool {
        let non_unit_mu = self
            .mu
            .as_ref()
            .is_some_and(|mu| mu.iter().any(|&v| v != 1.0));
        non_unit_mu || Direction::ALL.iter().any(|&e| e != d && self.has_pml(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacuum_never_needs_separate_magnetic() {
        let m = MaterialChunk::uniform(16, 1.0);
        for d in Direction::ALL {
            assert!(!m.needs_separate_magnetic(d));
        }
    }

    #[test]
    fn pml_splits_transverse_components_only() {
        let mut m = MaterialChunk::uniform(16, 1.0);
        m.add_pml(Direction::X);
        assert!(!m.needs_separate_magnetic(Direction::X));
        assert!(m.needs_separate_magnetic(Direction::Y));
        assert!(m.needs_separate_magnetic(Direction::Z));
    }

    #[test]
    fn non_unit_mu_splits_everything() {
        let mut m = MaterialChunk::uniform(4, 2.0);
        m.set_uniform_mu(1.0);
        assert!(m.mu().is_none());
        m.set_uniform_mu(3.0);
        assert_eq!(m.mu().map(<[f64]>::len), Some(4));
        assert!(Direction::ALL.iter().all(|&d| m.needs_separate_magnetic(d)));
    }

    #[test]
    fn remove_polarizabilities_clears_terms() {
        let mut m = MaterialChunk::uniform(4, 1.0);
        m.add_polarizability(Polarizability {
            omega: 1.0,
            gamma: 0.1,
            sigma: vec![0.5; 4],
        });
        assert_eq!(m.polarizabilities().len(), 1);
        m.remove_polarizabilities();
        assert!(m.polarizabilities().is_empty());
    }
}
