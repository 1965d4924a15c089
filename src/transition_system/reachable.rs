use std::collections::VecDeque;

use bit_set::BitSet;
use itertools::Itertools;
use tracing::{debug, trace};

use crate::{error::InvalidInput, Show, StateIndex};

use super::TransitionTable;

/// Allows iterating over the reachable states of a transition table in breadth-first order,
/// starting with the origin. Every state is yielded exactly once.
#[derive(Debug, Clone)]
pub struct Reachable<'a> {
    table: &'a TransitionTable,
    seen: BitSet,
    queue: VecDeque<StateIndex>,
}

impl<'a> Reachable<'a> {
    /// Creates a new iterator that will yield the reachable states of the table starting from
    /// `origin`. Fails if `origin` is not a state of `table`.
    pub fn new(table: &'a TransitionTable, origin: StateIndex) -> Result<Self, InvalidInput> {
        table.check_state(origin)?;
        Ok(Self::unchecked(table, origin))
    }

    pub(crate) fn unchecked(table: &'a TransitionTable, origin: StateIndex) -> Self {
        let mut seen = BitSet::with_capacity(table.size());
        seen.insert(origin);
        let mut queue = VecDeque::with_capacity(table.size());
        queue.push_back(origin);
        Self { table, seen, queue }
    }

    /// Drives the iterator to completion and returns the set of all states it saw.
    pub fn into_set(mut self) -> ReachableSet {
        while self.next().is_some() {}
        ReachableSet(self.seen)
    }
}

impl<'a> Iterator for Reachable<'a> {
    type Item = StateIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let q = self.queue.pop_front()?;
        for symbol in self.table.alphabet().universe() {
            let p = self.table.step(q, symbol);
            if self.seen.insert(p) {
                trace!("discovered state {p} via {q} on symbol {symbol}");
                self.queue.push_back(p);
            }
        }
        Some(q)
    }
}

/// The set of states that are reachable from some origin, iterated in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReachableSet(BitSet);

impl ReachableSet {
    /// Returns `true` if `state` is reachable.
    pub fn contains(&self, state: StateIndex) -> bool {
        self.0.contains(state)
    }

    /// The number of reachable states.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no state is reachable, which never happens for sets computed from a valid origin.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the reachable states in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.0.iter()
    }
}

impl FromIterator<StateIndex> for ReachableSet {
    fn from_iter<T: IntoIterator<Item = StateIndex>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Show for ReachableSet {
    fn show(&self) -> String {
        format!("{{{}}}", self.iter().join(", "))
    }
}

/// Computes the set of all states that can be reached from `start` in `table` by following zero or
/// more transitions. Fails with [`InvalidInput::StateOutOfRange`] if `start` does not exist.
///
/// # Example
/// ```
/// use automata_minimize::prelude::*;
///
/// let table = TransitionTable::from_rows(Alphabet::of_size(1), [vec![1], vec![1], vec![0]]).unwrap();
/// let reachable = reachable_states(&table, 0).unwrap();
/// assert_eq!(reachable.iter().collect::<Vec<_>>(), vec![0, 1]);
/// assert!(reachable_states(&table, 3).is_err());
/// ```
pub fn reachable_states(
    table: &TransitionTable,
    start: StateIndex,
) -> Result<ReachableSet, InvalidInput> {
    let reachable = Reachable::new(table, start)?.into_set();
    debug!(
        "{} of {} states are reachable from {start}",
        reachable.len(),
        table.size()
    );
    Ok(reachable)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::prelude::*;

    fn table() -> TransitionTable {
        TransitionTable::from_rows(
            Alphabet::of_size(2),
            [vec![1, 0], vec![2, 0], vec![2, 2], vec![3, 0]],
        )
        .unwrap()
    }

    #[test]
    fn reachable_bfs_order() {
        let table = table();
        assert_eq!(Reachable::new(&table, 0).unwrap().collect_vec(), vec![0, 1, 2]);
        assert_eq!(Reachable::new(&table, 3).unwrap().collect_vec(), vec![3, 0, 1, 2]);
        assert_eq!(Reachable::new(&table, 2).unwrap().collect_vec(), vec![2]);
    }

    #[test_log::test]
    fn reachable_set() {
        let table = table();
        let reachable = reachable_states(&table, 0).unwrap();
        assert!(reachable.contains(0));
        assert!(!reachable.contains(3));
        assert_eq!(reachable.len(), 3);
        assert_eq!(reachable.show(), "{0, 1, 2}");
    }

    #[test]
    fn start_out_of_range() {
        assert_eq!(
            reachable_states(&table(), 4),
            Err(InvalidInput::StateOutOfRange { state: 4, size: 4 })
        );
    }

    #[test]
    fn empty_alphabet_only_start() {
        let table = TransitionTable::from_rows(
            Alphabet::of_size(0),
            [Vec::<StateIndex>::new(), vec![]],
        )
        .unwrap();
        assert_eq!(reachable_states(&table, 1).unwrap().iter().collect_vec(), vec![1]);
    }
}
