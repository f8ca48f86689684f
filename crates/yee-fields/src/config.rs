//! Field-set configuration, validation, and error types.
//!
//! [`FieldsConfig`] carries the per-run parameters that are not part of
//! the [`Structure`](yee_arena::Structure). [`ConfigError`] covers every
//! way a field-set operation can refuse to run; all of them are detected
//! before any state is touched.

use std::error::Error;
use std::fmt;

use yee_arena::ArenaError;
use yee_core::{Dimensionality, Direction, WorkerRank};
use yee_space::SpaceError;

// ── FieldsConfig ───────────────────────────────────────────────────

/// Parameters for [`FieldSet::new`](crate::FieldSet::new).
#[derive(Clone, Debug, PartialEq)]
pub struct FieldsConfig {
    /// Angular mode number for cylindrical runs. Default: 0.
    pub m: f64,
    /// Whether polarization state keeps an energy store. Default: false.
    pub store_pol_energy: bool,
    /// Rank of the current worker; chunks owned by other ranks stay empty.
    /// Default: 0.
    pub rank: WorkerRank,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            m: 0.0,
            store_pol_energy: false,
            rank: WorkerRank(0),
        }
    }
}

impl FieldsConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.m.is_finite() {
            return Err(ConfigError::InvalidAngularMode { value: self.m });
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors raised by field-set configuration and mode changes.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Real fields were requested while a periodic axis has a non-zero
    /// Bloch wavevector.
    RealFieldsWithBloch {
        /// The offending axis.
        direction: Direction,
        /// Its wavevector component.
        k: f64,
    },
    /// A non-zero Bloch wavevector was requested after switching to real
    /// fields.
    BlochWithRealFields {
        /// The requested axis.
        direction: Direction,
        /// The rejected wavevector component.
        k: f64,
    },
    /// A radial shift only makes sense in cylindrical coordinates.
    RadialShiftNotCylindrical {
        /// The actual dimensionality.
        dim: Dimensionality,
    },
    /// A radial shift is undefined when the volume contains r = 0.
    RadialShiftContainsOrigin {
        /// Radial minimum of the volume.
        r_min: f64,
        /// Radial maximum of the volume.
        r_max: f64,
    },
    /// Phase-in needs a structure with the same number of chunks.
    ChunkCountMismatch {
        /// Chunks in the field set.
        expected: usize,
        /// Chunks in the incoming structure.
        got: usize,
    },
    /// Phase-in needs every chunk to cover the same grid points.
    ChunkLayoutMismatch {
        /// First chunk whose grid differs.
        index: usize,
    },
    /// Phase-in needs a structure with the same resolution.
    InvalidResolution {
        /// Resolution of the field set.
        expected: f64,
        /// Resolution of the incoming structure.
        got: f64,
    },
    /// The angular mode number is NaN or infinite.
    InvalidAngularMode {
        /// The rejected value.
        value: f64,
    },
    /// The phase-in horizon is negative, NaN or infinite.
    InvalidPhaseInTime {
        /// The rejected value.
        value: f64,
    },
    /// Geometry rejected the request.
    Space(SpaceError),
    /// Storage rejected the request.
    Arena(ArenaError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RealFieldsWithBloch { direction, k } => write!(
                f,
                "cannot use real fields with Bloch boundary conditions (k_{direction} = {k})"
            ),
            Self::BlochWithRealFields { direction, k } => write!(
                f,
                "cannot set Bloch wavevector k_{direction} = {k} after switching to real fields"
            ),
            Self::RadialShiftNotCylindrical { dim } => {
                write!(f, "radial shift is only for cylindrical coordinates, not {dim}")
            }
            Self::RadialShiftContainsOrigin { r_min, r_max } => write!(
                f,
                "radial shift is invalid when the volume contains r = 0 (r in [{r_min}, {r_max}])"
            ),
            Self::ChunkCountMismatch { expected, got } => write!(
                f,
                "can only phase in similar sets of chunks: {got} vs {expected}"
            ),
            Self::ChunkLayoutMismatch { index } => {
                write!(f, "can only phase in similar sets of chunks: chunk {index} differs")
            }
            Self::InvalidResolution { expected, got } => {
                write!(f, "resolution mismatch: expected {expected}, got {got}")
            }
            Self::InvalidAngularMode { value } => {
                write!(f, "angular mode number must be finite, got {value}")
            }
            Self::InvalidPhaseInTime { value } => {
                write!(f, "phase-in time must be finite and non-negative, got {value}")
            }
            Self::Space(e) => write!(f, "space: {e}"),
            Self::Arena(e) => write!(f, "arena: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<ArenaError> for ConfigError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = FieldsConfig::default();
        assert_eq!(cfg.m, 0.0);
        assert!(!cfg.store_pol_energy);
        assert_eq!(cfg.rank, WorkerRank(0));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn non_finite_m_is_rejected() {
        let cfg = FieldsConfig {
            m: f64::NAN,
            ..FieldsConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidAngularMode { .. })
        ));
    }

    #[test]
    fn wrapped_errors_expose_source() {
        let err = ConfigError::from(SpaceError::EmptyVolume);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("space:"));
        let err = ConfigError::ChunkCountMismatch {
            expected: 2,
            got: 3,
        };
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "can only phase in similar sets of chunks: 3 vs 2");
    }
}
