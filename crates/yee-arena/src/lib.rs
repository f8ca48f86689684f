//! Material chunks, copy-on-write sharing and field storage for Yee.
//!
//! # Architecture
//!
//! ```text
//! Structure
//! ├── GridVolume (user grid, symmetry-reduced grid)
//! ├── SymmetryGroup
//! └── StructureChunk × n
//!     ├── GridVolume (local points)
//!     ├── WorkerRank (owner)
//!     └── SharedMaterial → Arc<MaterialChunk>
//!
//! ComponentStorage (one per field chunk, plus shadow copies)
//! └── [Slot; 2] × 20 components: Absent | Owned(buffer) | AliasedTo(component)
//! ```
//!
//! Material is shared between field sets until someone writes to it;
//! [`SharedMaterial::make_private`] is the only way to get a mutable
//! reference. Field buffers are never shared between chunks, but H may
//! alias B within one chunk.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod material;
pub mod shared;
pub mod storage;
pub mod structure;

pub use error::ArenaError;
pub use material::{MaterialChunk, Polarizability};
pub use shared::SharedMaterial;
pub use storage::{ComponentStorage, FieldMode, Slot, IMAG, REAL};
pub use structure::{Structure, StructureBuilder, StructureChunk};
