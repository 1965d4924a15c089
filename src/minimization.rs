use bit_set::BitSet;
use tracing::debug;

use crate::{
    automaton::DFA,
    error::InvalidInput,
    math::Partition,
    transition_system::{
        reachable::{reachable_states, ReachableSet},
        TransitionTable,
    },
    StateIndex,
};

mod table_filling;
pub use table_filling::{table_filling, Equivalence, PairTable, TableFilling};

#[cfg(all(test, feature = "random"))]
mod properties;

/// The result of minimizing an automaton: the states that are reachable from the initial state, together with
/// the equivalence of these states as computed by the table-filling algorithm. Unreachable states take no part in
/// any pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minimization {
    reachable: ReachableSet,
    equivalence: Equivalence,
}

impl Minimization {
    /// The states that are reachable from the initial state.
    pub fn reachable(&self) -> &ReachableSet {
        &self.reachable
    }

    /// The equivalence relation on the reachable states.
    pub fn equivalence(&self) -> &Equivalence {
        &self.equivalence
    }

    /// The equivalent pairs of reachable states, see [`Equivalence::pairs`].
    pub fn pairs(&self) -> Vec<(StateIndex, StateIndex)> {
        self.equivalence.pairs()
    }

    /// The reachable states grouped into equivalence classes, see [`Equivalence::classes`].
    pub fn classes(&self) -> Partition {
        self.equivalence.classes()
    }
}

impl DFA {
    /// Removes the states that are not reachable from the initial state and computes which of the remaining
    /// states are equivalent with the table-filling algorithm.
    ///
    /// # Example
    /// ```
    /// use automata_minimize::prelude::*;
    ///
    /// let dfa = TableBuilder::with_alphabet_size(1)
    ///     .with_edges([(0, 0, 1), (1, 0, 1), (2, 0, 1)])
    ///     .with_accepting([1])
    ///     .into_dfa(0)
    ///     .unwrap();
    /// let min = dfa.minimize();
    /// assert_eq!(min.reachable().len(), 2);
    /// assert!(min.pairs().is_empty());
    /// ```
    pub fn minimize(&self) -> Minimization {
        let reachable = self.reachable_states();
        debug!(
            "minimizing automaton with {} states, {} of which are reachable",
            self.size(),
            reachable.len()
        );
        let equivalence =
            TableFilling::unchecked(self.table(), self.accepting(), reachable.iter().collect())
                .run();
        Minimization {
            reachable,
            equivalence,
        }
    }
}

/// Runs the whole pipeline on the raw parts of an automaton: first the states reachable from `start` are
/// determined, then the table-filling algorithm is run on them. Fails if `start` or some accepting state
/// does not exist.
pub fn minimize(
    table: &TransitionTable,
    accepting: &BitSet,
    start: StateIndex,
) -> Result<Minimization, InvalidInput> {
    let reachable = reachable_states(table, start)?;
    let equivalence = table_filling(table, accepting, reachable.iter())?;
    Ok(Minimization {
        reachable,
        equivalence,
    })
}

#[cfg(test)]
mod tests {
    use bit_set::BitSet;
    use itertools::Itertools;

    use super::minimize;
    use crate::prelude::*;

    fn accepting(states: impl IntoIterator<Item = StateIndex>) -> BitSet {
        states.into_iter().collect()
    }

    #[test]
    fn scenario_distinct_acceptance() {
        let table =
            TransitionTable::from_rows(Alphabet::of_size(1), [vec![0], vec![1]]).unwrap();
        let min = minimize(&table, &accepting([1]), 0).unwrap();
        // state 1 is not reachable from 0 here, so there is nothing left to compare
        assert_eq!(min.reachable().iter().collect_vec(), vec![0]);
        assert!(min.pairs().is_empty());

        let dfa = DFA::new(table, accepting([1]), 0).unwrap();
        let min = table_filling(dfa.table(), dfa.accepting(), 0..2).unwrap();
        assert_eq!(min.marked_pairs(), vec![(0, 1)]);
        assert!(min.pairs().is_empty());
    }

    #[test_log::test]
    fn scenario_shared_successor() {
        let dfa = TableBuilder::with_alphabet_size(1)
            .with_edges([(0, 0, 1), (1, 0, 1), (2, 0, 1)])
            .with_accepting([1])
            .into_dfa(0)
            .unwrap();
        let all = table_filling(dfa.table(), dfa.accepting(), 0..3).unwrap();
        assert_eq!(all.pairs(), vec![(0, 2)]);
        assert_eq!(all.marked_pairs(), vec![(0, 1), (1, 2)]);

        let min = dfa.minimize();
        assert_eq!(min.reachable().iter().collect_vec(), vec![0, 1]);
        assert!(min.pairs().is_empty());
    }

    #[test]
    fn scenario_unreachable_excluded() {
        // state 3 behaves exactly like state 0 but has no incoming transition
        let dfa = TableBuilder::with_alphabet_size(2)
            .with_edges([
                (0, 0, 1),
                (0, 1, 2),
                (1, 0, 1),
                (1, 1, 2),
                (2, 0, 2),
                (2, 1, 2),
                (3, 0, 1),
                (3, 1, 2),
            ])
            .with_accepting([2])
            .into_dfa(0)
            .unwrap();
        let min = dfa.minimize();
        assert!(!min.reachable().contains(3));
        assert_eq!(min.pairs(), vec![(0, 1)]);
        assert!(min.pairs().iter().all(|&(p, q)| p != 3 && q != 3));
        assert!(min.classes().class_of(3).is_none());
    }

    #[test]
    fn start_state_is_a_parameter() {
        let table =
            TransitionTable::from_rows(Alphabet::of_size(1), [vec![1], vec![1], vec![1]]).unwrap();
        let min = minimize(&table, &accepting([1]), 2).unwrap();
        assert_eq!(min.reachable().iter().collect_vec(), vec![1, 2]);
        assert_eq!(
            minimize(&table, &accepting([1]), 3),
            Err(InvalidInput::StateOutOfRange { state: 3, size: 3 })
        );
    }

    #[test]
    fn deterministic_output() {
        let dfa = crate::tests::wiki_dfa();
        let first = dfa.minimize();
        let second = dfa.minimize();
        assert_eq!(first, second);
        assert_eq!(first.pairs(), second.pairs());
        assert_eq!(first.classes().size(), 3);
    }
}
