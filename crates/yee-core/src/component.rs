//! Directions, dimensionality, field kinds and the 20 Yee-grid components.
//!
//! Everything here is plain `Copy` data with dense integer indices so that
//! per-component tables can be fixed-size arrays.

use smallvec::SmallVec;
use std::fmt;

// ── Direction ──────────────────────────────────────────────────────

/// A spatial direction: the three Cartesian axes plus the cylindrical
/// radius and azimuth.
///
/// The discriminant order is significant: the Bloch wavevector and every
/// per-direction table are indexed by [`Direction::index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Cartesian x.
    X = 0,
    /// Cartesian y.
    Y = 1,
    /// Cartesian (and cylindrical) z.
    Z = 2,
    /// Cylindrical radius.
    R = 3,
    /// Cylindrical azimuth (phi).
    P = 4,
}

impl Direction {
    /// Number of directions.
    pub const COUNT: usize = 5;

    /// All directions in index order.
    pub const ALL: [Direction; 5] = [
        Direction::X,
        Direction::Y,
        Direction::Z,
        Direction::R,
        Direction::P,
    ];

    /// Dense index in `0..5`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`index`](Self::index).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether this is one of the cylindrical directions (R or P).
    pub fn is_cylindrical(self) -> bool {
        matches!(self, Direction::R | Direction::P)
    }

    /// Fold R onto X and P onto Y; Cartesian directions are unchanged.
    fn fold(self) -> usize {
        match self {
            Direction::R => 0,
            Direction::P => 1,
            d => d.index(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::X => "x",
            Direction::Y => "y",
            Direction::Z => "z",
            Direction::R => "r",
            Direction::P => "p",
        };
        f.write_str(s)
    }
}

/// Direction orthogonal to both `a` and `b`, by the cyclic cross product
/// over (x, y, z).
///
/// R and P are folded onto x and y for the arithmetic. If either input was
/// cylindrical and the result lands on x or y, it is unfolded back to R or
/// P, so `cross(R, Z) == P`.
///
/// # Panics
///
/// Panics if `a == b`; callers filter equal directions first.
pub fn cross(a: Direction, b: Direction) -> Direction {
    assert!(a != b, "cross expects different directions, got {a} twice");
    let cylindrical = a.is_cylindrical() || b.is_cylindrical();
    let (fa, fb) = (a.fold(), b.fold());
    let c = (3 + 2 * fa - fb) % 3;
    match (c, cylindrical) {
        (0, true) => Direction::R,
        (1, true) => Direction::P,
        (0, false) => Direction::X,
        (1, false) => Direction::Y,
        _ => Direction::Z,
    }
}

/// Whether `b` precedes `a` in the cyclic order (x → y → z → x), after
/// folding R/P onto x/y.
///
/// The coupling planner calls this as `cross_negative(dir(partner),
/// dir(component))`; `true` means the partner enters the curl with a
/// minus sign.
pub fn cross_negative(a: Direction, b: Direction) -> bool {
    (3 + b.fold() - a.fold()) % 3 == 2
}

// ── Dimensionality ─────────────────────────────────────────────────

/// Dimensionality of the simulation grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimensionality {
    /// One dimension along z.
    D1,
    /// Two dimensions in the x/y plane.
    D2,
    /// Full three dimensions.
    D3,
    /// Rotationally symmetric cylindrical (r, z) with an angular mode number.
    Cylindrical,
}

impl Dimensionality {
    /// Whether `d` is a grid axis (something the grid has points along).
    pub fn has_direction(self, d: Direction) -> bool {
        match self {
            Dimensionality::D1 => d == Direction::Z,
            Dimensionality::D2 => matches!(d, Direction::X | Direction::Y),
            Dimensionality::D3 => matches!(d, Direction::X | Direction::Y | Direction::Z),
            Dimensionality::Cylindrical => matches!(d, Direction::R | Direction::Z),
        }
    }

    /// Whether a field component may point along `d`.
    ///
    /// Cylindrical runs carry r, phi and z components; everything else
    /// carries x, y and z.
    pub fn has_field_direction(self, d: Direction) -> bool {
        match self {
            Dimensionality::Cylindrical => d != Direction::X && d != Direction::Y,
            _ => !d.is_cylindrical(),
        }
    }

    /// The grid axes, in index order.
    pub fn grid_directions(self) -> SmallVec<[Direction; 3]> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.has_direction(d))
            .collect()
    }

    /// Whether component `c` exists at all in this dimensionality.
    ///
    /// One-dimensional runs only carry the Ex/Hy polarisation (and the
    /// matching Dx/By).
    pub fn has_field(self, c: Component) -> bool {
        match self {
            Dimensionality::D1 => matches!(
                (c.kind, c.direction),
                (FieldKind::Electric, Direction::X)
                    | (FieldKind::Magnetic, Direction::Y)
                    | (FieldKind::Displacement, Direction::X)
                    | (FieldKind::Induction, Direction::Y)
            ),
            _ => self.has_field_direction(c.direction),
        }
    }

    /// Whether `c1` and `c2` belong to the same polarisation class.
    ///
    /// In 2D the TM set (Hx, Hy, Bx, By, Ez, Dz) never mixes with the TE
    /// set; in every other dimensionality all components are alike.
    pub fn is_like(self, c1: Component, c2: Component) -> bool {
        self != Dimensionality::D2 || c1.is_tm() == c2.is_tm()
    }
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dimensionality::D1 => "1d",
            Dimensionality::D2 => "2d",
            Dimensionality::D3 => "3d",
            Dimensionality::Cylindrical => "cylindrical",
        };
        f.write_str(s)
    }
}

// ── FieldKind ──────────────────────────────────────────────────────

/// The physical quantity a component belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    /// Electric field E.
    Electric = 0,
    /// Magnetic field H.
    Magnetic = 1,
    /// Electric displacement D.
    Displacement = 2,
    /// Magnetic induction B.
    Induction = 3,
}

impl FieldKind {
    /// Number of field kinds.
    pub const COUNT: usize = 4;

    /// All kinds, in index order (E, H, D, B).
    pub const ALL: [FieldKind; 4] = [
        FieldKind::Electric,
        FieldKind::Magnetic,
        FieldKind::Displacement,
        FieldKind::Induction,
    ];

    /// Dense index in `0..4`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this kind transforms as a pseudovector (H and B).
    pub fn is_pseudovector(self) -> bool {
        matches!(self, FieldKind::Magnetic | FieldKind::Induction)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldKind::Electric => "E",
            FieldKind::Magnetic => "H",
            FieldKind::Displacement => "D",
            FieldKind::Induction => "B",
        };
        f.write_str(s)
    }
}

// ── Component ──────────────────────────────────────────────────────

/// One scalar field component on the Yee grid: a kind along a direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Component {
    /// Physical quantity.
    pub kind: FieldKind,
    /// Spatial direction of the component.
    pub direction: Direction,
}

impl Component {
    /// Total number of components (4 kinds × 5 directions).
    pub const COUNT: usize = FieldKind::COUNT * Direction::COUNT;

    /// Construct a component.
    pub const fn new(kind: FieldKind, direction: Direction) -> Self {
        Self { kind, direction }
    }

    /// Dense index in `0..20`: `kind * 5 + direction`.
    pub fn index(self) -> usize {
        self.kind.index() * Direction::COUNT + self.direction.index()
    }

    /// Inverse of [`index`](Self::index).
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= Self::COUNT {
            return None;
        }
        let kind = FieldKind::ALL[index / Direction::COUNT];
        let direction = Direction::ALL[index % Direction::COUNT];
        Some(Self { kind, direction })
    }

    /// Iterate every component in index order.
    pub fn all() -> impl Iterator<Item = Component> {
        (0..Self::COUNT).filter_map(Self::from_index)
    }

    /// `true` for E components.
    pub fn is_electric(self) -> bool {
        self.kind == FieldKind::Electric
    }

    /// `true` for H components.
    pub fn is_magnetic(self) -> bool {
        self.kind == FieldKind::Magnetic
    }

    /// `true` for D components.
    pub fn is_d(self) -> bool {
        self.kind == FieldKind::Displacement
    }

    /// `true` for B components.
    pub fn is_b(self) -> bool {
        self.kind == FieldKind::Induction
    }

    /// Membership in the 2D TM polarisation: Hx, Hy, Bx, By, Ez, Dz.
    pub fn is_tm(self) -> bool {
        use Direction::{X, Y, Z};
        match self.kind {
            FieldKind::Magnetic | FieldKind::Induction => matches!(self.direction, X | Y),
            FieldKind::Electric | FieldKind::Displacement => self.direction == Z,
        }
    }

    /// The B component sharing this H component's direction, and vice versa.
    ///
    /// Returns `None` for E and D components.
    pub fn magnetic_partner(self) -> Option<Component> {
        match self.kind {
            FieldKind::Magnetic => Some(Component::new(FieldKind::Induction, self.direction)),
            FieldKind::Induction => Some(Component::new(FieldKind::Magnetic, self.direction)),
            _ => None,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.direction)
    }
}

/// Shorthand constructors for the commonly named components.
#[allow(non_upper_case_globals)]
pub mod components {
    use super::{Component, Direction, FieldKind};

    /// Ex.
    pub const Ex: Component = Component::new(FieldKind::Electric, Direction::X);
    /// Ey.
    pub const Ey: Component = Component::new(FieldKind::Electric, Direction::Y);
    /// Ez.
    pub const Ez: Component = Component::new(FieldKind::Electric, Direction::Z);
    /// Er.
    pub const Er: Component = Component::new(FieldKind::Electric, Direction::R);
    /// Ep.
    pub const Ep: Component = Component::new(FieldKind::Electric, Direction::P);
    /// Hx.
    pub const Hx: Component = Component::new(FieldKind::Magnetic, Direction::X);
    /// Hy.
    pub const Hy: Component = Component::new(FieldKind::Magnetic, Direction::Y);
    /// Hz.
    pub const Hz: Component = Component::new(FieldKind::Magnetic, Direction::Z);
    /// Hr.
    pub const Hr: Component = Component::new(FieldKind::Magnetic, Direction::R);
    /// Hp.
    pub const Hp: Component = Component::new(FieldKind::Magnetic, Direction::P);
    /// Dx.
    pub const Dx: Component = Component::new(FieldKind::Displacement, Direction::X);
    /// Dy.
    pub const Dy: Component = Component::new(FieldKind::Displacement, Direction::Y);
    /// Dz.
    pub const Dz: Component = Component::new(FieldKind::Displacement, Direction::Z);
    /// Bx.
    pub const Bx: Component = Component::new(FieldKind::Induction, Direction::X);
    /// By.
    pub const By: Component = Component::new(FieldKind::Induction, Direction::Y);
    /// Bz.
    pub const Bz: Component = Component::new(FieldKind::Induction, Direction::Z);
}

// ── Boundary side ──────────────────────────────────────────────────

/// Which end of an axis a boundary sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundarySide {
    /// The minimum-coordinate end.
    Low = 0,
    /// The maximum-coordinate end.
    High = 1,
}

impl BoundarySide {
    /// Both sides, low first.
    pub const BOTH: [BoundarySide; 2] = [BoundarySide::Low, BoundarySide::High];

    /// Dense index in `0..2`.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::components::*;
    use super::*;

    #[test]
    fn cross_is_cyclic_on_cartesian_axes() {
        assert_eq!(cross(Direction::X, Direction::Y), Direction::Z);
        assert_eq!(cross(Direction::Y, Direction::Z), Direction::X);
        assert_eq!(cross(Direction::Z, Direction::X), Direction::Y);
        assert_eq!(cross(Direction::Y, Direction::X), Direction::Z);
    }

    #[test]
    fn cross_unfolds_cylindrical_results() {
        assert_eq!(cross(Direction::R, Direction::Z), Direction::P);
        assert_eq!(cross(Direction::P, Direction::Z), Direction::R);
        assert_eq!(cross(Direction::R, Direction::P), Direction::Z);
    }

    #[test]
    #[should_panic(expected = "cross expects different directions")]
    fn cross_rejects_equal_directions() {
        cross(Direction::X, Direction::X);
    }

    #[test]
    fn cross_negative_marks_reverse_cyclic_pairs() {
        // y follows x, so (y, x) is the reverse rotation.
        assert!(cross_negative(Direction::Y, Direction::X));
        assert!(!cross_negative(Direction::Z, Direction::X));
        assert!(cross_negative(Direction::P, Direction::R));
    }

    #[test]
    fn component_index_round_trips() {
        for c in Component::all() {
            assert_eq!(Component::from_index(c.index()), Some(c));
        }
        assert_eq!(Component::all().count(), 20);
        assert!(Component::from_index(20).is_none());
    }

    #[test]
    fn tm_set_matches_2d_polarisation() {
        let tm: Vec<_> = Component::all().filter(|c| c.is_tm()).collect();
        assert_eq!(tm, vec![Ez, Hx, Hy, Dz, Bx, By]);
    }

    #[test]
    fn like_check_only_splits_in_2d() {
        assert!(!Dimensionality::D2.is_like(Ex, Ez));
        assert!(Dimensionality::D2.is_like(Ex, Hz));
        assert!(Dimensionality::D3.is_like(Ex, Ez));
    }

    #[test]
    fn d1_carries_one_polarisation() {
        let present: Vec<_> = Component::all()
            .filter(|&c| Dimensionality::D1.has_field(c))
            .collect();
        assert_eq!(present, vec![Ex, Hy, Dx, By]);
    }

    #[test]
    fn cylindrical_fields_use_r_p_z() {
        assert!(Dimensionality::Cylindrical.has_field(Er));
        assert!(Dimensionality::Cylindrical.has_field(Hp));
        assert!(Dimensionality::Cylindrical.has_field(Ez));
        assert!(!Dimensionality::Cylindrical.has_field(Ex));
        assert_eq!(
            Dimensionality::Cylindrical.grid_directions().as_slice(),
            &[Direction::Z, Direction::R]
        );
    }

    #[test]
    fn magnetic_partner_pairs_h_and_b() {
        assert_eq!(Hx.magnetic_partner(), Some(Bx));
        assert_eq!(Bz.magnetic_partner(), Some(Hz));
        assert_eq!(Ex.magnetic_partner(), None);
    }
}
