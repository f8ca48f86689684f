//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a chunk (spatial partition) within a field set.
///
/// `ChunkId(n)` is the n-th chunk of the structure the field set was
/// built from; the numbering is identical on every worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub u32);

impl ChunkId {
    /// The chunk index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ChunkId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies an execution context (process/worker) in a distributed run.
///
/// A chunk is "mine" on the worker whose rank matches the chunk's owner.
/// Single-process runs use rank 0 for everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerRank(pub u32);

impl fmt::Display for WorkerRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WorkerRank {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
