//! Collaborator traits for objects the field set holds but does not interpret.

use crate::component::Component;

/// A set of current sources injected into the fields each step.
///
/// The waveform evaluation and injection arithmetic live with the
/// implementor. The field-state core only holds sources and releases them
/// on `remove_sources`/`reset`.
pub trait SourceSet: Send {
    /// Human-readable label for logging.
    fn label(&self) -> &str;

    /// Components this source set drives.
    fn components(&self) -> Vec<Component>;
}

/// A flux or frequency-domain monitor accumulating over time.
///
/// Held by the field set and released on `remove_fluxes`/`reset`.
pub trait FluxMonitor: Send {
    /// Human-readable label for logging.
    fn label(&self) -> &str;
}
