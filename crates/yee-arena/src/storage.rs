//! Per-component field buffers with tagged aliasing.
//!
//! Each of the 20 components has two slots, real and imaginary. A slot is
//! either empty, owns a zero-initialised buffer, or is an alias of another
//! component's slot with the same index. Aliases always point at an owned
//! slot, never at another alias, so resolving one is a single hop and
//! releasing storage never has to compare pointers.
//!
//! [`FieldMode`] narrows the slot shape: once a store is `Real`, the
//! imaginary slots are gone and are never allocated again.

use yee_core::{Component, ComponentSet};

use crate::error::ArenaError;

/// Index of the real slot.
pub const REAL: usize = 0;
/// Index of the imaginary slot.
pub const IMAG: usize = 1;

/// Contents of one (component, real/imaginary) slot.
#[derive(Clone, Debug, PartialEq)]
pub enum Slot {
    /// No storage.
    Absent,
    /// A buffer owned by this slot.
    Owned(Box<[f64]>),
    /// Reads and writes go to the same slot of another component.
    AliasedTo(Component),
}

/// Whether buffers are complex (two slots) or real (one).
///
/// Transitions are `Uninitialized → Complex` on first allocation and
/// `Uninitialized | Complex → Real`. There is no way back from `Real`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldMode {
    /// Nothing allocated yet and no real-field request seen.
    #[default]
    Uninitialized,
    /// Real and imaginary slots.
    Complex,
    /// Real slot only.
    Real,
}

impl FieldMode {
    /// Number of slots allocated per component in this mode.
    pub fn slot_count(self) -> usize {
        match self {
            FieldMode::Real => 1,
            FieldMode::Uninitialized | FieldMode::Complex => 2,
        }
    }
}

/// Buffers for every component of one chunk.
#[derive(Clone, Debug)]
pub struct ComponentStorage {
    len: usize,
    mode: FieldMode,
    slots: [[Slot; 2]; Component::COUNT],
}

impl ComponentStorage {
    /// An empty store whose buffers will hold `len` points.
    pub fn new(len: usize) -> Self {
        Self::with_mode(len, FieldMode::Uninitialized)
    }

    /// An empty store that starts in `mode`.
    pub fn with_mode(len: usize, mode: FieldMode) -> Self {
        Self {
            len,
            mode,
            slots: std::array::from_fn(|_| [Slot::Absent, Slot::Absent]),
        }
    }

    /// Points per buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if buffers hold no points.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current mode.
    pub fn mode(&self) -> FieldMode {
        self.mode
    }

    /// Raw slot contents, without alias resolution.
    pub fn slot(&self, c: Component, cmp: usize) -> &Slot {
        &self.slots[c.index()][cmp]
    }

    /// Give `c` its own zeroed buffer in every active slot.
    ///
    /// An aliased slot is split off: it gets a private copy of the values it
    /// was reading. Returns `true` if any slot changed.
    pub fn allocate(&mut self, c: Component) -> bool {
        if self.mode == FieldMode::Uninitialized {
            self.mode = FieldMode::Complex;
        }
        let len = self.len;
        let mut changed = false;
        for cmp in 0..self.mode.slot_count() {
            let fresh = match &self.slots[c.index()][cmp] {
                Slot::Owned(_) => continue,
                Slot::Absent => vec![0.0; len].into_boxed_slice(),
                Slot::AliasedTo(target) => match &self.slots[target.index()][cmp] {
                    Slot::Owned(buf) => buf.clone(),
                    _ => vec![0.0; len].into_boxed_slice(),
                },
            };
            self.slots[c.index()][cmp] = Slot::Owned(fresh);
            changed = true;
        }
        changed
    }

    /// Make every active slot of `c` an alias of `target`'s slot.
    ///
    /// Only an H/B pair along the same direction may alias, `target` must
    /// own its buffers and `c` must not.
    pub fn alias(&mut self, c: Component, target: Component) -> Result<(), ArenaError> {
        if c == target {
            return Err(ArenaError::SelfAlias { component: c });
        }
        if c.magnetic_partner() != Some(target) {
            return Err(ArenaError::UnlikeAlias {
                component: c,
                target,
            });
        }
        for cmp in 0..self.mode.slot_count() {
            if !matches!(self.slots[target.index()][cmp], Slot::Owned(_)) {
                return Err(ArenaError::AliasTargetAbsent {
                    component: c,
                    target,
                });
            }
            if matches!(self.slots[c.index()][cmp], Slot::Owned(_)) {
                return Err(ArenaError::AlreadyAllocated { component: c });
            }
        }
        for cmp in 0..self.mode.slot_count() {
            self.slots[c.index()][cmp] = Slot::AliasedTo(target);
        }
        Ok(())
    }

    /// The component whose buffer `(c, cmp)` resolves to.
    pub fn owner_of(&self, c: Component, cmp: usize) -> Option<Component> {
        match self.slots.get(c.index())?.get(cmp)? {
            Slot::Absent => None,
            Slot::Owned(_) => Some(c),
            Slot::AliasedTo(target) => match self.slots[target.index()][cmp] {
                Slot::Owned(_) => Some(*target),
                _ => None,
            },
        }
    }

    /// Values of `(c, cmp)`, following an alias.
    pub fn get(&self, c: Component, cmp: usize) -> Option<&[f64]> {
        let owner = self.owner_of(c, cmp)?;
        match &self.slots[owner.index()][cmp] {
            Slot::Owned(buf) => Some(buf),
            _ => None,
        }
    }

    /// Mutable values of `(c, cmp)`, following an alias.
    pub fn get_mut(&mut self, c: Component, cmp: usize) -> Option<&mut [f64]> {
        let owner = self.owner_of(c, cmp)?;
        match &mut self.slots[owner.index()][cmp] {
            Slot::Owned(buf) => Some(buf),
            _ => None,
        }
    }

    /// Whether `(c, cmp)` owns its buffer.
    pub fn is_owned(&self, c: Component, cmp: usize) -> bool {
        matches!(self.slots[c.index()][cmp], Slot::Owned(_))
    }

    /// The alias target of `(c, cmp)`, if it is an alias.
    pub fn alias_target(&self, c: Component, cmp: usize) -> Option<Component> {
        match self.slots[c.index()][cmp] {
            Slot::AliasedTo(target) => Some(target),
            _ => None,
        }
    }

    /// Whether `a` and `b` resolve to the same buffer in slot `cmp`.
    pub fn shares_storage(&self, a: Component, b: Component, cmp: usize) -> bool {
        match (self.owner_of(a, cmp), self.owner_of(b, cmp)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Components with a readable real slot.
    pub fn allocated(&self) -> ComponentSet {
        Component::all()
            .filter(|&c| self.owner_of(c, REAL).is_some())
            .collect()
    }

    /// Number of owned buffers across both slots.
    pub fn owned_buffers(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|s| matches!(s, Slot::Owned(_)))
            .count()
    }

    /// Total bytes held by owned buffers.
    pub fn memory_bytes(&self) -> usize {
        self.owned_buffers() * self.len * std::mem::size_of::<f64>()
    }

    /// Switch to [`FieldMode::Real`], releasing every imaginary slot.
    ///
    /// Aliases into the imaginary slots are unwound before any buffer is
    /// dropped. Returns the number of buffers released; a second call
    /// releases nothing.
    pub fn drop_imaginary(&mut self) -> usize {
        self.mode = FieldMode::Real;
        for pair in self.slots.iter_mut() {
            if matches!(pair[IMAG], Slot::AliasedTo(_)) {
                pair[IMAG] = Slot::Absent;
            }
        }
        let mut freed = 0;
        for pair in self.slots.iter_mut() {
            if matches!(pair[IMAG], Slot::Owned(_)) {
                freed += 1;
            }
            pair[IMAG] = Slot::Absent;
        }
        freed
    }

    /// Zero every owned buffer in place.
    pub fn zero_all(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            if let Slot::Owned(buf) = slot {
                buf.fill(0.0);
            }
        }
    }
}
