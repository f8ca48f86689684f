//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use yee_core::{Component, Direction};
use yee_space::SpaceError;

/// Errors that can occur while building structures or managing storage.
#[derive(Clone, Debug, PartialEq)]
pub enum ArenaError {
    /// A chunk index past the end of the structure's chunk list.
    UnknownChunk {
        /// The requested index.
        index: usize,
        /// Number of chunks in the structure.
        count: usize,
    },
    /// An alias was requested onto a slot with no owned buffer.
    AliasTargetAbsent {
        /// Component that would become the alias.
        component: Component,
        /// Component that has no owned buffer.
        target: Component,
    },
    /// A component cannot alias itself.
    SelfAlias {
        /// The offending component.
        component: Component,
    },
    /// Only an H/B pair along the same direction may share storage.
    UnlikeAlias {
        /// Component that would become the alias.
        component: Component,
        /// The incompatible target.
        target: Component,
    },
    /// The slot already has storage of its own.
    AlreadyAllocated {
        /// The component whose slot is occupied.
        component: Component,
    },
    /// The Courant number must lie in `(0, 1]`.
    InvalidCourant {
        /// The rejected value.
        value: f64,
    },
    /// A mirror plane must lie on a grid line at the centre or an edge of
    /// the cell.
    InvalidMirrorPlane {
        /// Axis the mirror flips.
        direction: Direction,
        /// Plane position, in length units.
        plane: f64,
    },
    /// A worker count of zero was requested.
    NoWorkers,
    /// Volume or symmetry construction failed.
    Space(SpaceError),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownChunk { index, count } => {
                write!(f, "unknown chunk {index} (structure has {count})")
            }
            Self::AliasTargetAbsent { component, target } => {
                write!(f, "cannot alias {component} to {target}: target has no storage")
            }
            Self::SelfAlias { component } => write!(f, "{component} cannot alias itself"),
            Self::UnlikeAlias { component, target } => {
                write!(f, "{component} and {target} cannot share storage")
            }
            Self::AlreadyAllocated { component } => {
                write!(f, "{component} already has storage")
            }
            Self::InvalidCourant { value } => {
                write!(f, "Courant number must be in (0, 1], got {value}")
            }
            Self::InvalidMirrorPlane { direction, plane } => write!(
                f,
                "mirror plane {direction} = {plane} is not on the centre or an edge of the cell"
            ),
            Self::NoWorkers => write!(f, "at least one worker is required"),
            Self::Space(e) => write!(f, "geometry: {e}"),
        }
    }
}

impl Error for ArenaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ArenaError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}
