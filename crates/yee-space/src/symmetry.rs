//! Finite symmetry groups of volume-preserving transforms.
//!
//! A [`SymmetryGroup`] is a list of cyclic generators (mirror planes,
//! 2- and 4-fold rotations, and the cylindrical r → −r map). The group
//! elements are the products of generator powers, numbered in mixed radix:
//! element `n` takes power `n mod order₀` of generator 0, then
//! `(n / order₀) mod order₁` of generator 1, and so on. Element 0 is the
//! identity.

use std::ops::Add;

use smallvec::SmallVec;
use yee_core::{Component, Dimensionality, Direction};

use crate::error::SpaceError;
use crate::volume::GeometricVolume;

/// Image of a direction under a transform, with orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignedDirection {
    /// Direction the source axis maps onto.
    pub direction: Direction,
    /// Whether the axis is reversed.
    pub flipped: bool,
}

impl SignedDirection {
    fn sign(self) -> f64 {
        if self.flipped {
            -1.0
        } else {
            1.0
        }
    }
}

/// An affine signed-permutation map `x' = S·x + t`, with a field phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    map: [SignedDirection; Direction::COUNT],
    shift: [f64; Direction::COUNT],
    phase: f64,
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            map: Direction::ALL.map(|direction| SignedDirection {
                direction,
                flipped: false,
            }),
            shift: [0.0; Direction::COUNT],
            phase: 1.0,
        }
    }

    /// Image of direction `d`.
    pub fn direction(&self, d: Direction) -> SignedDirection {
        self.map[d.index()]
    }

    /// Phase the transform multiplies fields by.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Apply to a point indexed by direction.
    pub fn apply_point(&self, p: [f64; Direction::COUNT]) -> [f64; Direction::COUNT] {
        let mut out = [0.0; Direction::COUNT];
        for d in Direction::ALL {
            let sd = self.map[d.index()];
            let target = sd.direction.index();
            out[target] = sd.sign() * p[d.index()] + self.shift[target];
        }
        out
    }

    /// Apply to a box: the image of its two corners, re-sorted.
    pub fn apply_volume(&self, v: &GeometricVolume) -> GeometricVolume {
        GeometricVolume::from_corners(
            v.dim(),
            self.apply_point(v.min_corner()),
            self.apply_point(v.max_corner()),
        )
    }

    /// `next ∘ self`: apply `self` first, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        let mut out = Transform::identity();
        for d in Direction::ALL {
            let first = self.map[d.index()];
            let second = next.map[first.direction.index()];
            out.map[d.index()] = SignedDirection {
                direction: second.direction,
                flipped: first.flipped != second.flipped,
            };
        }
        out.shift = next.shift;
        for e in Direction::ALL {
            let second = next.map[e.index()];
            out.shift[second.direction.index()] += second.sign() * self.shift[e.index()];
        }
        out.phase = self.phase * next.phase;
        out
    }

    /// Determinant of the linear part: +1 for proper rotations, −1 for
    /// reflections.
    pub fn determinant(&self) -> f64 {
        let mut seen = [false; Direction::COUNT];
        let mut parity = 1.0;
        for start in 0..Direction::COUNT {
            if seen[start] {
                continue;
            }
            let mut len = 0;
            let mut i = start;
            while !seen[i] {
                seen[i] = true;
                i = self.map[i].direction.index();
                len += 1;
            }
            if len % 2 == 0 {
                parity = -parity;
            }
        }
        self.map.iter().fold(parity, |acc, sd| acc * sd.sign())
    }

    /// Image of component `c` and the sign it picks up.
    ///
    /// E and D transform as vectors; H and B as pseudovectors, which adds
    /// the determinant. The transform's phase multiplies both.
    pub fn transform_component(&self, c: Component) -> (Component, f64) {
        let sd = self.direction(c.direction);
        let mut sign = sd.sign() * self.phase;
        if c.kind.is_pseudovector() {
            sign *= self.determinant();
        }
        (Component::new(c.kind, sd.direction), sign)
    }
}

/// One cyclic generator of a symmetry group.
#[derive(Clone, Debug, PartialEq)]
pub struct SymmetryGenerator {
    order: u32,
    transform: Transform,
}

impl SymmetryGenerator {
    /// Order of the cyclic subgroup this generator spans.
    pub fn order(&self) -> u32 {
        self.order
    }

    /// The generator as a transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// `transform^k`.
    pub fn power(&self, k: u32) -> Transform {
        (0..k).fold(Transform::identity(), |acc, _| acc.then(&self.transform))
    }

    /// If this generator is a plain mirror across one grid axis of `dim`,
    /// the mirrored axis and the plane coordinate.
    pub fn mirror_plane(&self, dim: Dimensionality) -> Option<(Direction, f64)> {
        if self.order != 2 {
            return None;
        }
        let mut flipped = Direction::ALL.into_iter().filter(|&d| {
            let sd = self.transform.direction(d);
            sd.flipped || sd.direction != d
        });
        let d = flipped.next()?;
        if flipped.any(|e| dim.has_direction(e)) || !dim.has_direction(d) {
            return None;
        }
        // x' = -x + shift, so the fixed plane sits at shift / 2.
        Some((d, self.transform.shift[d.index()] / 2.0))
    }
}

/// A finite group of volume-preserving transforms.
///
/// # Examples
///
/// ```
/// use yee_core::Direction;
/// use yee_space::SymmetryGroup;
///
/// let s = SymmetryGroup::mirror(Direction::X, 0.0, 1.0).unwrap()
///     + SymmetryGroup::mirror(Direction::Y, 0.0, -1.0).unwrap();
/// assert_eq!(s.multiplicity(), 4);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SymmetryGroup {
    generators: SmallVec<[SymmetryGenerator; 2]>,
}

impl SymmetryGroup {
    /// The trivial group.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Reflection across the plane `d = plane`, multiplying fields by `phase`.
    pub fn mirror(d: Direction, plane: f64, phase: f64) -> Result<Self, SpaceError> {
        check_phase(phase)?;
        if d == Direction::P {
            return Err(SpaceError::InvalidSymmetry {
                reason: "cannot mirror the azimuthal direction".into(),
            });
        }
        let mut t = Transform::identity();
        t.map[d.index()].flipped = true;
        t.shift[d.index()] = 2.0 * plane;
        t.phase = phase;
        Ok(Self::single(2, t))
    }

    /// Rotation by π about the Cartesian `axis` through `center`.
    pub fn rotate2(
        axis: Direction,
        center: [f64; Direction::COUNT],
        phase: f64,
    ) -> Result<Self, SpaceError> {
        check_phase(phase)?;
        let (b, c) = transverse_pair(axis)?;
        let mut t = Transform::identity();
        t.map[b.index()].flipped = true;
        t.map[c.index()].flipped = true;
        t.shift[b.index()] = 2.0 * center[b.index()];
        t.shift[c.index()] = 2.0 * center[c.index()];
        t.phase = phase;
        Ok(Self::single(2, t))
    }

    /// Rotation by π/2 about the Cartesian `axis` through `center`.
    pub fn rotate4(
        axis: Direction,
        center: [f64; Direction::COUNT],
        phase: f64,
    ) -> Result<Self, SpaceError> {
        check_phase(phase)?;
        let (b, c) = transverse_pair(axis)?;
        let mut t = Transform::identity();
        t.map[b.index()] = SignedDirection {
            direction: c,
            flipped: false,
        };
        t.map[c.index()] = SignedDirection {
            direction: b,
            flipped: true,
        };
        // x'_c = x_b - c_b + c_c ; x'_b = -x_c + c_c + c_b
        t.shift[c.index()] = center[c.index()] - center[b.index()];
        t.shift[b.index()] = center[c.index()] + center[b.index()];
        t.phase = phase;
        Ok(Self::single(4, t))
    }

    /// The cylindrical r → −r identification for angular mode number `m`.
    ///
    /// Flipping both r and φ is a rotation by π about the axis; the fields
    /// pick up `(-1)^m`.
    pub fn r_to_minus_r(m: i32) -> Self {
        let mut t = Transform::identity();
        t.map[Direction::R.index()].flipped = true;
        t.map[Direction::P.index()].flipped = true;
        t.phase = if m % 2 == 0 { 1.0 } else { -1.0 };
        Self::single(2, t)
    }

    fn single(order: u32, transform: Transform) -> Self {
        let mut generators = SmallVec::new();
        generators.push(SymmetryGenerator { order, transform });
        Self { generators }
    }

    /// Number of group elements.
    pub fn multiplicity(&self) -> usize {
        self.generators.iter().map(|g| g.order as usize).product()
    }

    /// The generators, in composition order.
    pub fn generators(&self) -> &[SymmetryGenerator] {
        &self.generators
    }

    /// Element `n` of the group (`n < multiplicity()`).
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn element(&self, n: usize) -> Transform {
        assert!(
            n < self.multiplicity(),
            "symmetry element {n} out of range (multiplicity {})",
            self.multiplicity()
        );
        let mut rest = n;
        let mut t = Transform::identity();
        for g in &self.generators {
            let order = g.order as usize;
            t = t.then(&g.power((rest % order) as u32));
            rest /= order;
        }
        t
    }

    /// Image of `v` under element `n`.
    pub fn transform_volume(&self, v: &GeometricVolume, n: usize) -> GeometricVolume {
        self.element(n).apply_volume(v)
    }

    /// Image of component `c` under element `n`, with its sign.
    pub fn transform_component(&self, c: Component, n: usize) -> (Component, f64) {
        self.element(n).transform_component(c)
    }

    /// Sign element `n` applies to component `c`.
    pub fn component_phase(&self, c: Component, n: usize) -> f64 {
        self.transform_component(c, n).1
    }
}

impl Add for SymmetryGroup {
    type Output = SymmetryGroup;

    fn add(mut self, rhs: SymmetryGroup) -> SymmetryGroup {
        self.generators.extend(rhs.generators);
        self
    }
}

fn check_phase(phase: f64) -> Result<(), SpaceError> {
    if !phase.is_finite() || phase == 0.0 {
        return Err(SpaceError::InvalidSymmetry {
            reason: format!("phase must be finite and non-zero, got {phase}"),
        });
    }
    Ok(())
}

fn transverse_pair(axis: Direction) -> Result<(Direction, Direction), SpaceError> {
    match axis {
        Direction::X => Ok((Direction::Y, Direction::Z)),
        Direction::Y => Ok((Direction::Z, Direction::X)),
        Direction::Z => Ok((Direction::X, Direction::Y)),
        d => Err(SpaceError::InvalidSymmetry {
            reason: format!("rotation axis must be cartesian, got {d}"),
        }),
    }
}
