//! Field state and domain decomposition for the Yee FDTD core.
//!
//! A [`FieldSet`] is built from a [`yee_arena::Structure`] and holds one
//! [`PartitionChunk`] per structure chunk. Chunks allocate components on
//! demand, derive their [`CouplingTable`] lazily, and share material with
//! the structure until someone writes to it. The [`ExchangeLedger`] records
//! how many scalars cross each chunk boundary, and in which
//! [`ConnectionPhase`]; it is rebuilt by [`FieldSet::connect_chunks`] after
//! any change that could move those numbers.
//!
//! ```
//! use yee_arena::StructureBuilder;
//! use yee_core::{components::Ez, Dimensionality};
//! use yee_fields::{FieldSet, FieldsConfig};
//! use yee_space::GridVolume;
//!
//! let grid = GridVolume::new(Dimensionality::D2, 10.0, &[8, 8]).unwrap();
//! let structure = StructureBuilder::new(grid).chunks(2).build().unwrap();
//! let mut fields = FieldSet::new(&structure, FieldsConfig::default()).unwrap();
//! fields.allocate_component(Ez).unwrap();
//! assert!(fields.have_component(Ez));
//! assert!(fields.connect_chunks().is_valid());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod chunk;
pub mod config;
pub mod fields;
pub mod ledger;
pub mod metrics;
pub mod planner;
pub mod polarization;

pub use chunk::PartitionChunk;
pub use config::{ConfigError, FieldsConfig};
pub use fields::FieldSet;
pub use ledger::{ConnectionPhase, ExchangeKey, ExchangeLedger, PhaseCounts};
pub use metrics::{Activity, TimeSinks};
pub use planner::{Coupling, CouplingTable};
pub use polarization::{PolarizationState, PolarizationTerm};
