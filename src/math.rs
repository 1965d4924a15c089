use std::collections::BTreeSet;

use itertools::Itertools;

use crate::{Show, StateIndex};

/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// A partition is a different view on an equivalence relation, by grouping states into
/// their respective classes under the relation. Classes are kept sorted by their least element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition(Vec<BTreeSet<StateIndex>>);

impl std::ops::Deref for Partition {
    type Target = Vec<BTreeSet<StateIndex>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a BTreeSet<StateIndex>;
    type IntoIter = std::slice::Iter<'a, BTreeSet<StateIndex>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Partition {
    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a new partition from an iterator that yields iterators over the elements
    /// of each class. Empty classes are dropped.
    pub fn new<X: IntoIterator<Item = StateIndex>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|it| it.into_iter().collect::<BTreeSet<_>>())
                .filter(|class| !class.is_empty())
                .sorted_by_key(|class| class.first().copied())
                .collect(),
        )
    }

    /// Returns the class containing `state`, if any.
    pub fn class_of(&self, state: StateIndex) -> Option<&BTreeSet<StateIndex>> {
        self.0.iter().find(|class| class.contains(&state))
    }
}

impl Show for Partition {
    fn show(&self) -> String {
        self.0
            .iter()
            .map(|class| format!("{{{}}}", class.iter().join(", ")))
            .join(" ")
    }
}

/// Disjoint set forest over the states `0..size`, with path halving and union by size.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    /// Creates a forest in which every element is its own root.
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            size: vec![1; size],
        }
    }

    /// Returns the representative of the set containing `x`.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets containing `x` and `y`. Returns `false` if they were already merged.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let (mut rx, mut ry) = (self.find(x), self.find(y));
        if rx == ry {
            return false;
        }
        if self.size[rx] < self.size[ry] {
            std::mem::swap(&mut rx, &mut ry);
        }
        self.parent[ry] = rx;
        self.size[rx] += self.size[ry];
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Partition, UnionFind};

    #[test]
    fn partition_sorted_by_least_element() {
        let partition = Partition::new([vec![4, 2], vec![], vec![0, 1]]);
        assert_eq!(partition.size(), 2);
        assert_eq!(partition[0].iter().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert!(partition.class_of(4).unwrap().contains(&2));
        assert!(partition.class_of(3).is_none());
    }

    #[test]
    fn union_find_merges() {
        let mut uf = UnionFind::new(4);
        assert!(uf.union(0, 2));
        assert!(uf.union(2, 3));
        assert!(!uf.union(0, 3));
        assert_eq!(uf.find(3), uf.find(0));
        assert_ne!(uf.find(1), uf.find(0));
    }
}
