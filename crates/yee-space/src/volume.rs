//! Integer grid volumes and continuous geometric volumes.
//!
//! A [`GridVolume`] is a box of grid points: an integer origin and a point
//! count along every grid axis of its [`Dimensionality`]. A
//! [`GeometricVolume`] is the continuous box those points cover, in the
//! same length units as the resolution.

use std::ops::BitOr;

use yee_core::{BoundarySide, Component, Dimensionality, Direction};

use crate::error::SpaceError;

// ── GridVolume ─────────────────────────────────────────────────────

/// A box of Yee-grid points.
///
/// Directions that are not grid axes have origin 0 and a count of 1, so
/// products over all directions equal products over grid axes.
///
/// # Examples
///
/// ```
/// use yee_core::{Dimensionality, Direction};
/// use yee_space::GridVolume;
///
/// let gv = GridVolume::new(Dimensionality::D2, 10.0, &[10, 20]).unwrap();
/// assert_eq!(gv.ntot(), 200);
/// assert_eq!(gv.num_direction(Direction::Y), 20);
/// // Row-major: the last grid axis is contiguous.
/// assert_eq!(gv.stride(Direction::Y), 1);
/// assert_eq!(gv.stride(Direction::X), 20);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridVolume {
    dim: Dimensionality,
    a: f64,
    origin: [i64; Direction::COUNT],
    num: [usize; Direction::COUNT],
}

impl GridVolume {
    /// Create a volume at the origin with `counts[i]` points along the
    /// i-th grid axis (in [`Dimensionality::grid_directions`] order).
    pub fn new(dim: Dimensionality, a: f64, counts: &[usize]) -> Result<Self, SpaceError> {
        if !a.is_finite() || a <= 0.0 {
            return Err(SpaceError::InvalidResolution { value: a });
        }
        let axes = dim.grid_directions();
        if counts.len() != axes.len() {
            return Err(SpaceError::WrongAxisCount {
                dim,
                expected: axes.len(),
                got: counts.len(),
            });
        }
        if counts.contains(&0) {
            return Err(SpaceError::EmptyVolume);
        }
        let mut num = [1usize; Direction::COUNT];
        for (&d, &n) in axes.iter().zip(counts) {
            num[d.index()] = n;
        }
        Ok(Self {
            dim,
            a,
            origin: [0; Direction::COUNT],
            num,
        })
    }

    /// Move the origin along a grid axis.
    pub fn with_origin(mut self, d: Direction, origin: i64) -> Result<Self, SpaceError> {
        if !self.dim.has_direction(d) {
            return Err(SpaceError::NotAGridAxis {
                direction: d,
                dim: self.dim,
            });
        }
        self.origin[d.index()] = origin;
        Ok(self)
    }

    /// Replace origin and point count along a grid axis.
    pub fn with_extent(self, d: Direction, origin: i64, count: usize) -> Result<Self, SpaceError> {
        if count == 0 {
            return Err(SpaceError::EmptyVolume);
        }
        let mut gv = self.with_origin(d, origin)?;
        gv.num[d.index()] = count;
        Ok(gv)
    }

    /// Grid dimensionality.
    pub fn dim(&self) -> Dimensionality {
        self.dim
    }

    /// Resolution in points per unit length.
    pub fn resolution(&self) -> f64 {
        self.a
    }

    /// Total number of grid points.
    pub fn ntot(&self) -> usize {
        self.num.iter().product()
    }

    /// Number of points along `d` (1 for non-grid directions).
    pub fn num_direction(&self, d: Direction) -> usize {
        self.num[d.index()]
    }

    /// First point index along `d`.
    pub fn origin(&self, d: Direction) -> i64 {
        self.origin[d.index()]
    }

    /// One past the last point index along `d`.
    pub fn end(&self, d: Direction) -> i64 {
        self.origin[d.index()] + self.num[d.index()] as i64
    }

    /// Memory stride between neighbouring points along `d`.
    ///
    /// Zero for non-grid directions.
    pub fn stride(&self, d: Direction) -> usize {
        if !self.dim.has_direction(d) {
            return 0;
        }
        self.dim
            .grid_directions()
            .iter()
            .skip_while(|&&g| g != d)
            .skip(1)
            .map(|&g| self.num_direction(g))
            .product()
    }

    /// Whether component `c` exists on this grid.
    pub fn has_field(&self, c: Component) -> bool {
        self.dim.has_field(c)
    }

    /// Whether the computational cell has a wall on `side` of `d`.
    ///
    /// In cylindrical coordinates the low radial side only counts as a
    /// wall when the grid does not start on the axis.
    pub fn has_boundary(&self, side: BoundarySide, d: Direction) -> bool {
        match self.dim {
            Dimensionality::Cylindrical => match d {
                Direction::Z => true,
                Direction::R => side == BoundarySide::High || self.origin(Direction::R) > 0,
                _ => false,
            },
            dim => dim.has_direction(d),
        }
    }

    /// The continuous box covered by this grid's points.
    pub fn interior(&self) -> GeometricVolume {
        let mut gv = GeometricVolume::new(self.dim);
        for d in self.dim.grid_directions() {
            gv.min[d.index()] = self.origin(d) as f64 / self.a;
            gv.max[d.index()] = self.end(d) as f64 / self.a;
        }
        gv
    }

    /// Number of points in the cross-section orthogonal to `d`.
    pub fn cross_section(&self, d: Direction) -> usize {
        self.dim
            .grid_directions()
            .iter()
            .filter(|&&g| g != d)
            .map(|&g| self.num_direction(g))
            .product()
    }

    /// Number of points shared by the cross-sections of `self` and
    /// `other` orthogonal to `d`.
    pub fn cross_section_overlap(&self, other: &GridVolume, d: Direction) -> usize {
        self.dim
            .grid_directions()
            .iter()
            .filter(|&&g| g != d)
            .map(|&g| {
                let lo = self.origin(g).max(other.origin(g));
                let hi = self.end(g).min(other.end(g));
                (hi - lo).max(0) as usize
            })
            .product()
    }

    /// Which face of `self` touches `other` across `d`, if any.
    ///
    /// `High` means `self` ends where `other` begins.
    pub fn face_contact(&self, other: &GridVolume, d: Direction) -> Option<BoundarySide> {
        if !self.dim.has_direction(d) {
            return None;
        }
        if self.end(d) == other.origin(d) {
            Some(BoundarySide::High)
        } else if self.origin(d) == other.end(d) {
            Some(BoundarySide::Low)
        } else {
            None
        }
    }

    /// Split into `n` contiguous pieces along the longest grid axis.
    ///
    /// Pieces differ in length by at most one point; the earlier pieces
    /// take the remainder.
    pub fn split(&self, n: usize) -> Result<Vec<GridVolume>, SpaceError> {
        let axes = self.dim.grid_directions();
        let longest = axes
            .iter()
            .copied()
            .max_by(|&a, &b| {
                self.num_direction(a)
                    .cmp(&self.num_direction(b))
                    .then(b.cmp(&a))
            })
            .ok_or(SpaceError::EmptyVolume)?;
        let len = self.num_direction(longest);
        if n == 0 || n > len {
            return Err(SpaceError::InvalidSplit {
                requested: n,
                max: len,
            });
        }
        let base = len / n;
        let extra = len % n;
        let mut pieces = Vec::with_capacity(n);
        let mut cursor = self.origin(longest);
        for i in 0..n {
            let count = base + usize::from(i < extra);
            let mut piece = self.clone();
            piece.origin[longest.index()] = cursor;
            piece.num[longest.index()] = count;
            cursor += count as i64;
            pieces.push(piece);
        }
        Ok(pieces)
    }
}

// ── GeometricVolume ────────────────────────────────────────────────

/// A continuous axis-aligned box.
///
/// Non-grid directions have zero extent. Union (`|`) is the bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometricVolume {
    dim: Dimensionality,
    min: [f64; Direction::COUNT],
    max: [f64; Direction::COUNT],
}

impl GeometricVolume {
    /// A degenerate box at the origin.
    pub fn new(dim: Dimensionality) -> Self {
        Self {
            dim,
            min: [0.0; Direction::COUNT],
            max: [0.0; Direction::COUNT],
        }
    }

    /// Builder-style setter for the extent along `d`.
    pub fn with_extent(mut self, d: Direction, min: f64, max: f64) -> Self {
        self.min[d.index()] = min;
        self.max[d.index()] = max;
        self
    }

    /// Dimensionality.
    pub fn dim(&self) -> Dimensionality {
        self.dim
    }

    /// Lower bound along `d`.
    pub fn in_direction_min(&self, d: Direction) -> f64 {
        self.min[d.index()]
    }

    /// Upper bound along `d`.
    pub fn in_direction_max(&self, d: Direction) -> f64 {
        self.max[d.index()]
    }

    /// Replace the lower bound along `d`.
    pub fn set_direction_min(&mut self, d: Direction, value: f64) {
        self.min[d.index()] = value;
    }

    /// Replace the upper bound along `d`.
    pub fn set_direction_max(&mut self, d: Direction, value: f64) {
        self.max[d.index()] = value;
    }

    /// Lower corner, indexed by direction.
    pub fn min_corner(&self) -> [f64; Direction::COUNT] {
        self.min
    }

    /// Upper corner, indexed by direction.
    pub fn max_corner(&self) -> [f64; Direction::COUNT] {
        self.max
    }

    /// Box spanned by two corners, in any order.
    pub fn from_corners(
        dim: Dimensionality,
        a: [f64; Direction::COUNT],
        b: [f64; Direction::COUNT],
    ) -> Self {
        let mut gv = Self::new(dim);
        for i in 0..Direction::COUNT {
            gv.min[i] = a[i].min(b[i]);
            gv.max[i] = a[i].max(b[i]);
        }
        gv
    }

    /// Bounding box of `self` and `other`.
    pub fn union(&self, other: &GeometricVolume) -> GeometricVolume {
        let mut gv = *self;
        for i in 0..Direction::COUNT {
            gv.min[i] = self.min[i].min(other.min[i]);
            gv.max[i] = self.max[i].max(other.max[i]);
        }
        gv
    }

    /// Physical volume (length, area or volume depending on dimensionality).
    ///
    /// Cylindrical volumes integrate `2πr` over the radial range; a
    /// negative radial minimum is treated as the axis.
    pub fn computed_volume(&self) -> f64 {
        let extent = |d: Direction| self.in_direction_max(d) - self.in_direction_min(d);
        match self.dim {
            Dimensionality::Cylindrical => {
                let r_max = self.in_direction_max(Direction::R);
                let r_min = self.in_direction_min(Direction::R).max(0.0);
                std::f64::consts::PI * (r_max * r_max - r_min * r_min) * extent(Direction::Z)
            }
            dim => dim.grid_directions().iter().map(|&d| extent(d)).product(),
        }
    }
}

impl BitOr for GeometricVolume {
    type Output = GeometricVolume;

    fn bitor(self, rhs: GeometricVolume) -> GeometricVolume {
        self.union(&rhs)
    }
}
