//! Curl coupling plans.
//!
//! For every allocated component, [`CouplingTable::plan`] finds the two
//! transverse components whose derivatives drive its curl update: the
//! "plus" partner and the "minus" partner. The pairing follows Maxwell's
//! equations on the Yee grid (E and D are driven by H, H and B by E), and
//! the sign comes from the cyclic order of the two directions.

use yee_core::{cross, cross_negative, Component, ComponentSet, Dimensionality, Direction};
use yee_space::GridVolume;

/// One derivative term: read `partner` and difference it along `derivative`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coupling {
    /// The component whose spatial derivative contributes.
    pub partner: Component,
    /// The axis the derivative is taken along.
    pub derivative: Direction,
}

/// Plus/minus derivative partners per component, plus the stride table
/// update kernels walk the grid with.
#[derive(Clone, Debug, PartialEq)]
pub struct CouplingTable {
    plus: [Option<Coupling>; Component::COUNT],
    minus: [Option<Coupling>; Component::COUNT],
    num: [usize; Direction::COUNT],
    stride: [usize; Direction::COUNT],
}

fn drives(c1: Component, c2: Component) -> bool {
    ((c1.is_electric() || c1.is_d()) && c2.is_magnetic())
        || ((c1.is_magnetic() || c1.is_b()) && c2.is_electric())
}

impl CouplingTable {
    /// Derive the table for the `allocated` components of `grid`.
    pub fn plan(grid: &GridVolume, allocated: &ComponentSet) -> Self {
        let dim = grid.dim();
        let mut plus = [None; Component::COUNT];
        let mut minus = [None; Component::COUNT];
        for c1 in allocated.iter().filter(|&c| grid.has_field(c)) {
            let dc1 = c1.direction;
            for c2 in Component::all() {
                if !drives(c1, c2) || c2.direction == dc1 || !grid.has_field(c2) {
                    continue;
                }
                let dc2 = c2.direction;
                let derivative = cross(dc1, dc2);
                let on_grid = dim.has_direction(derivative)
                    || (dim == Dimensionality::Cylindrical && dim.has_field_direction(derivative));
                if !on_grid {
                    continue;
                }
                let coupling = Some(Coupling {
                    partner: c2,
                    derivative,
                });
                if cross_negative(dc2, dc1) {
                    minus[c1.index()] = coupling;
                } else {
                    plus[c1.index()] = coupling;
                }
            }
        }
        let mut num = [1; Direction::COUNT];
        let mut stride = [0; Direction::COUNT];
        for d in dim.grid_directions() {
            num[d.index()] = grid.num_direction(d);
            stride[d.index()] = grid.stride(d);
        }
        Self {
            plus,
            minus,
            num,
            stride,
        }
    }

    /// The plus-side partner of `c`.
    pub fn plus(&self, c: Component) -> Option<Coupling> {
        self.plus[c.index()]
    }

    /// The minus-side partner of `c`.
    pub fn minus(&self, c: Component) -> Option<Coupling> {
        self.minus[c.index()]
    }

    /// Points along `d`; 1 for directions that are not grid axes.
    pub fn num_direction(&self, d: Direction) -> usize {
        self.num[d.index()]
    }

    /// Row-major stride along `d`; 0 for directions that are not grid axes.
    pub fn stride(&self, d: Direction) -> usize {
        self.stride[d.index()]
    }

    /// Components with at least one partner.
    pub fn coupled(&self) -> ComponentSet {
        Component::all()
            .filter(|&c| self.plus(c).is_some() || self.minus(c).is_some())
            .collect()
    }

    /// Every `(component, coupling)` pair, plus side first.
    pub fn iter(&self) -> impl Iterator<Item = (Component, Coupling)> + '_ {
        Component::all().flat_map(move |c| {
            self.plus(c)
                .into_iter()
                .chain(self.minus(c))
                .map(move |k| (c, k))
        })
    }
}
