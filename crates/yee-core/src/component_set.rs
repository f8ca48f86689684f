//! The [`ComponentSet`] bitset.

use crate::component::Component;

/// A set of components implemented as a fixed 20-bit bitset.
///
/// Used to describe which components a chunk has allocated, which are
/// active anywhere in a field set, and which a coupling plan reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ComponentSet {
    bits: u32,
}

impl ComponentSet {
    const MASK: u32 = (1u32 << Component::COUNT) - 1;

    /// Create an empty set.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Insert a component into the set.
    pub fn insert(&mut self, c: Component) {
        self.bits |= 1u32 << c.index();
    }

    /// Remove a component from the set.
    pub fn remove(&mut self, c: Component) {
        self.bits &= !(1u32 << c.index());
    }

    /// Check whether the set contains a component.
    pub fn contains(&self, c: Component) -> bool {
        self.bits & (1u32 << c.index()) != 0
    }

    /// Return the union of two sets (`self | other`).
    pub fn union(&self, other: &Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Return the intersection of two sets (`self & other`).
    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Return the set difference (`self - other`).
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            bits: self.bits & !other.bits & Self::MASK,
        }
    }

    /// Check whether `self` is a subset of `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.bits & !other.bits == 0
    }

    /// Returns `true` if the set contains no components.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns the number of components in the set.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterate over the components in the set, in ascending index order.
    pub fn iter(&self) -> ComponentSetIter {
        ComponentSetIter { bits: self.bits }
    }
}

impl FromIterator<Component> for ComponentSet {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        let mut set = Self::empty();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

impl IntoIterator for &ComponentSet {
    type Item = Component;
    type IntoIter = ComponentSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`ComponentSet`], yielding components in index order.
pub struct ComponentSetIter {
    bits: u32,
}

impl Iterator for ComponentSetIter {
    type Item = Component;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let idx = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Component::from_index(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_set() -> impl Strategy<Value = ComponentSet> {
        prop::collection::vec(0usize..Component::COUNT, 0..12).prop_map(|ids| {
            ids.into_iter()
                .filter_map(Component::from_index)
                .collect::<ComponentSet>()
        })
    }

    proptest! {
        #[test]
        fn union_commutative(a in arb_set(), b in arb_set()) {
            prop_assert_eq!(a.union(&b), b.union(&a));
        }

        #[test]
        fn intersection_commutative(a in arb_set(), b in arb_set()) {
            prop_assert_eq!(a.intersection(&b), b.intersection(&a));
        }

        #[test]
        fn union_identity(a in arb_set()) {
            prop_assert_eq!(a.union(&ComponentSet::empty()), a);
        }

        #[test]
        fn difference_removes_common(a in arb_set(), b in arb_set()) {
            let diff = a.difference(&b);
            for c in diff.iter() {
                prop_assert!(a.contains(c), "diff element {c} not in a");
                prop_assert!(!b.contains(c), "diff element {c} in b");
            }
        }

        #[test]
        fn distributive_intersection_over_union(
            a in arb_set(),
            b in arb_set(),
            c in arb_set(),
        ) {
            prop_assert_eq!(
                a.intersection(&b.union(&c)),
                a.intersection(&b).union(&a.intersection(&c))
            );
        }

        #[test]
        fn subset_reflexive(a in arb_set()) {
            prop_assert!(a.is_subset(&a));
            prop_assert!(ComponentSet::empty().is_subset(&a));
        }

        #[test]
        fn len_matches_iter_count(a in arb_set()) {
            prop_assert_eq!(a.len(), a.iter().count());
        }

        #[test]
        fn iter_is_ascending(a in arb_set()) {
            let idx: Vec<usize> = a.iter().map(|c| c.index()).collect();
            let mut sorted = idx.clone();
            sorted.sort_unstable();
            prop_assert_eq!(idx, sorted);
        }
    }

    #[test]
    fn insert_then_remove() {
        let mut set = ComponentSet::empty();
        let c = Component::from_index(7).unwrap();
        set.insert(c);
        assert!(set.contains(c));
        assert_eq!(set.len(), 1);
        set.remove(c);
        assert!(set.is_empty());
    }
}
