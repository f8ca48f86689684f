//! Error types for volume and symmetry construction.

use std::fmt;

use yee_core::{Dimensionality, Direction};

/// Errors arising from volume construction, splitting or symmetry setup.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceError {
    /// A volume was requested with zero points along some grid axis.
    EmptyVolume,
    /// The resolution must be finite and strictly positive.
    InvalidResolution {
        /// The rejected value.
        value: f64,
    },
    /// The number of per-axis point counts does not match the dimensionality.
    WrongAxisCount {
        /// The dimensionality being constructed.
        dim: Dimensionality,
        /// Number of grid axes the dimensionality has.
        expected: usize,
        /// Number of counts supplied.
        got: usize,
    },
    /// An operation named a direction that is not a grid axis.
    NotAGridAxis {
        /// The offending direction.
        direction: Direction,
        /// The dimensionality of the volume.
        dim: Dimensionality,
    },
    /// A split into `requested` pieces is impossible along the longest axis.
    InvalidSplit {
        /// Number of pieces requested.
        requested: usize,
        /// Maximum number of non-empty pieces.
        max: usize,
    },
    /// A symmetry generator is malformed.
    InvalidSymmetry {
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyVolume => write!(f, "volume must have at least one point per axis"),
            Self::InvalidResolution { value } => {
                write!(f, "resolution must be finite and positive, got {value}")
            }
            Self::WrongAxisCount { dim, expected, got } => {
                write!(f, "{dim} volume needs {expected} axis counts, got {got}")
            }
            Self::NotAGridAxis { direction, dim } => {
                write!(f, "direction {direction} is not a grid axis in {dim}")
            }
            Self::InvalidSplit { requested, max } => {
                write!(f, "cannot split into {requested} chunks (at most {max})")
            }
            Self::InvalidSymmetry { reason } => write!(f, "invalid symmetry: {reason}"),
        }
    }
}

impl std::error::Error for SpaceError {}
