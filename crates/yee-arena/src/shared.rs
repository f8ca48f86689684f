//! Copy-on-write handle for material chunks.
//!
//! [`SharedMaterial`] lets several field sets read the same
//! [`MaterialChunk`] without copying it. The only path to a mutable
//! reference is [`SharedMaterial::make_private`], which clones the chunk
//! first if anyone else still holds it.

use std::ops::Deref;
use std::sync::Arc;

use log::debug;

use crate::material::MaterialChunk;

/// Shared, copy-on-write reference to a [`MaterialChunk`].
///
/// Cloning the handle shares the chunk and bumps [`share_count`]. The chunk
/// is freed when the last handle drops.
///
/// [`share_count`]: SharedMaterial::share_count
#[derive(Clone, Debug)]
pub struct SharedMaterial(Arc<MaterialChunk>);

impl SharedMaterial {
    /// Wrap a freshly built chunk.
    pub fn new(chunk: MaterialChunk) -> Self {
        Self(Arc::new(chunk))
    }

    /// Number of handles that currently share this chunk.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Whether `self` and `other` point at the same allocation.
    pub fn shares_storage_with(&self, other: &SharedMaterial) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Mutable access, privatising the chunk first if it is shared.
    ///
    /// After this returns, `share_count()` is 1 and every other holder
    /// still sees the old values.
    pub fn make_private(&mut self) -> &mut MaterialChunk {
        if Arc::strong_count(&self.0) > 1 {
            debug!(
                "privatising material chunk of {} points ({} shares)",
                self.0.len(),
                Arc::strong_count(&self.0)
            );
        }
        Arc::make_mut(&mut self.0)
    }
}

impl Deref for SharedMaterial {
    type Target = MaterialChunk;

    fn deref(&self) -> &MaterialChunk {
        &self.0
    }
}
