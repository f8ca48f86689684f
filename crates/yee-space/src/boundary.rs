//! Boundary conditions indexed by side and direction.

use yee_core::{BoundarySide, Direction};

/// What happens to fields at the edge of the computational cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryCondition {
    /// Perfect electric conductor: tangential E is zero on the wall.
    Metallic,
    /// Fields wrap to the opposite side, multiplied by the Bloch phase.
    Periodic,
    /// No boundary along this side (not a grid axis).
    None,
}

/// Boundary condition for every (side, direction) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryTable {
    table: [[BoundaryCondition; Direction::COUNT]; 2],
}

impl BoundaryTable {
    /// A table with every entry set to `fill`.
    pub fn filled(fill: BoundaryCondition) -> Self {
        Self {
            table: [[fill; Direction::COUNT]; 2],
        }
    }

    /// Condition on one side of one direction.
    pub fn get(&self, side: BoundarySide, d: Direction) -> BoundaryCondition {
        self.table[side.index()][d.index()]
    }

    /// Replace the condition on one side of one direction.
    pub fn set(&mut self, side: BoundarySide, d: Direction, cond: BoundaryCondition) {
        self.table[side.index()][d.index()] = cond;
    }

    /// Whether both sides of `d` are periodic.
    pub fn is_periodic(&self, d: Direction) -> bool {
        BoundarySide::BOTH
            .iter()
            .all(|&side| self.get(side, d) == BoundaryCondition::Periodic)
    }
}

impl Default for BoundaryTable {
    fn default() -> Self {
        Self::filled(BoundaryCondition::None)
    }
}
