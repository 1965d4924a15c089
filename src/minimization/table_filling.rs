use bit_set::BitSet;
use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    error::InvalidInput,
    math::{Partition, UnionFind},
    transition_system::TransitionTable,
    Show, StateIndex,
};

/// Stores for every canonical pair `(p, q)` with `p < q` of a fixed set of states whether it is marked,
/// i.e. whether `p` and `q` are known to be distinguishable. The pairs are laid out as the lower triangle
/// of a matrix indexed by the positions of the states in the (ascending) state list, so the marks fit
/// into a single bit set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairTable {
    states: Vec<StateIndex>,
    position: Vec<Option<usize>>,
    marked: BitSet,
}

impl PairTable {
    /// Creates a table without any marks. `states` must be sorted, free of duplicates and every state
    /// must be smaller than `size`.
    fn new(states: Vec<StateIndex>, size: usize) -> Self {
        let mut position = vec![None; size];
        for (i, &q) in states.iter().enumerate() {
            position[q] = Some(i);
        }
        let pairs = states.len() * states.len().saturating_sub(1) / 2;
        Self {
            states,
            position,
            marked: BitSet::with_capacity(pairs),
        }
    }

    fn triangle(i: usize, j: usize) -> usize {
        debug_assert!(i < j);
        j * (j - 1) / 2 + i
    }

    fn bit(&self, p: StateIndex, q: StateIndex) -> Option<usize> {
        let i = (*self.position.get(p)?)?;
        let j = (*self.position.get(q)?)?;
        match i.cmp(&j) {
            std::cmp::Ordering::Less => Some(Self::triangle(i, j)),
            std::cmp::Ordering::Greater => Some(Self::triangle(j, i)),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The states that pairs are formed from, in ascending order.
    pub fn states(&self) -> &[StateIndex] {
        &self.states
    }

    /// Returns `true` if `state` is among the states that pairs are formed from.
    pub fn contains(&self, state: StateIndex) -> bool {
        matches!(self.position.get(state), Some(Some(_)))
    }

    /// Returns whether the pair formed by `p` and `q` is marked. The order of `p` and `q` does not matter.
    /// A state is never distinguishable from itself, and pairs involving states that are not considered
    /// are never marked.
    pub fn is_marked(&self, p: StateIndex, q: StateIndex) -> bool {
        self.bit(p, q).is_some_and(|bit| self.marked.contains(bit))
    }

    /// Marks the pair of `p` and `q`. Returns `true` if the pair was not marked before.
    fn mark(&mut self, p: StateIndex, q: StateIndex) -> bool {
        match self.bit(p, q) {
            Some(bit) => self.marked.insert(bit),
            None => false,
        }
    }

    /// The number of marked pairs.
    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    /// Iterates over all canonical pairs in ascending order of `p`, then `q`.
    pub fn candidates(&self) -> impl Iterator<Item = (StateIndex, StateIndex)> + '_ {
        self.states.iter().enumerate().flat_map(move |(i, &p)| {
            self.states[i + 1..].iter().map(move |&q| (p, q))
        })
    }
}

/// The table-filling algorithm, which computes the pairs of equivalent states by first marking all pairs that
/// disagree on acceptance and then repeatedly marking pairs that lead into an already marked pair on some symbol.
/// Once a pass over all pairs marks nothing new, the unmarked pairs are precisely the equivalent ones.
///
/// Marking is monotone, each pass can only add marks. For inspecting intermediate states, the refinement can be
/// driven pass by pass through [`Self::pass`], otherwise [`Self::run`] goes straight to the fixpoint.
#[derive(Debug, Clone)]
pub struct TableFilling<'a> {
    table: &'a TransitionTable,
    pairs: PairTable,
    passes: usize,
    stable: bool,
}

impl<'a> TableFilling<'a> {
    /// Sets up the algorithm for the given states and performs the base marking. Fails if some state or some
    /// accepting state does not exist in `table`, or if a successor of a considered state is not considered itself.
    pub fn new(
        table: &'a TransitionTable,
        accepting: &BitSet,
        states: impl IntoIterator<Item = StateIndex>,
    ) -> Result<Self, InvalidInput> {
        if let Some(state) = accepting.iter().find(|&q| !table.contains_state(q)) {
            return Err(InvalidInput::AcceptingOutOfRange {
                state,
                size: table.size(),
            });
        }
        let states: Vec<StateIndex> = states.into_iter().sorted().dedup().collect();
        for &state in &states {
            table.check_state(state)?;
        }
        let considered: BitSet = states.iter().copied().collect();
        for &state in &states {
            for symbol in table.alphabet().universe() {
                let target = table.step(state, symbol);
                if !considered.contains(target) {
                    return Err(InvalidInput::SuccessorOutsideStates {
                        state,
                        symbol,
                        target,
                    });
                }
            }
        }
        Ok(Self::unchecked(table, accepting, states))
    }

    /// Same as [`Self::new`], but `states` must already be sorted, free of duplicates and closed under
    /// successors in `table`.
    pub(crate) fn unchecked(
        table: &'a TransitionTable,
        accepting: &BitSet,
        states: Vec<StateIndex>,
    ) -> Self {
        let mut pairs = PairTable::new(states, table.size());
        let base = pairs
            .candidates()
            .filter(|&(p, q)| accepting.contains(p) != accepting.contains(q))
            .collect_vec();
        for (p, q) in base {
            pairs.mark(p, q);
        }
        debug!(
            "base marking distinguishes {} pairs of {} states",
            pairs.marked_count(),
            pairs.states().len()
        );

        Self {
            table,
            pairs,
            passes: 0,
            stable: false,
        }
    }

    /// Performs one refinement pass over all unmarked pairs and returns the number of pairs that were newly
    /// marked. Marks made during a pass are already visible to later pairs of the same pass.
    pub fn pass(&mut self) -> usize {
        self.passes += 1;
        let m = self.pairs.states.len();
        let mut newly_marked = 0;

        for i in 0..m {
            let p = self.pairs.states[i];
            for j in i + 1..m {
                let q = self.pairs.states[j];
                if self.pairs.is_marked(p, q) {
                    continue;
                }
                let witness = self.table.alphabet().universe().find(|&symbol| {
                    self.pairs
                        .is_marked(self.table.step(p, symbol), self.table.step(q, symbol))
                });
                if let Some(symbol) = witness {
                    trace!(
                        "marking {} as successors on symbol {symbol} are distinguishable",
                        (p, q).show()
                    );
                    self.pairs.mark(p, q);
                    newly_marked += 1;
                }
            }
        }

        if newly_marked == 0 {
            self.stable = true;
        }
        newly_marked
    }

    /// Returns `true` once a pass has marked nothing new, which means the fixpoint is reached.
    pub fn is_stable(&self) -> bool {
        self.stable
    }

    /// Gives access to the current marks.
    pub fn pairs(&self) -> &PairTable {
        &self.pairs
    }

    /// Repeats refinement passes until the fixpoint is reached and returns the result.
    pub fn run(mut self) -> Equivalence {
        while !self.stable {
            self.pass();
        }
        debug!(
            "table filling stabilized after {} passes with {} distinguishable pairs",
            self.passes,
            self.pairs.marked_count()
        );
        Equivalence {
            pairs: self.pairs,
            passes: self.passes,
        }
    }
}

/// The outcome of the table-filling algorithm on a set of states. The primary output are the equivalent
/// pairs as given by [`Self::pairs`], the grouping into classes through [`Self::classes`] is derived
/// from these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equivalence {
    pairs: PairTable,
    passes: usize,
}

impl Equivalence {
    /// The states that were compared, in ascending order.
    pub fn states(&self) -> &[StateIndex] {
        self.pairs.states()
    }

    /// Returns all canonical pairs `(p, q)` with `p < q` that are equivalent, ordered ascending by `p` and
    /// then by `q`. Equivalent states are reported pairwise, so three mutually equivalent states lead to
    /// three pairs.
    pub fn pairs(&self) -> Vec<(StateIndex, StateIndex)> {
        self.pairs
            .candidates()
            .filter(|&(p, q)| !self.pairs.is_marked(p, q))
            .collect()
    }

    /// Returns all canonical pairs that are distinguishable, in the same order as [`Self::pairs`].
    pub fn marked_pairs(&self) -> Vec<(StateIndex, StateIndex)> {
        self.pairs
            .candidates()
            .filter(|&(p, q)| self.pairs.is_marked(p, q))
            .collect()
    }

    /// Returns `true` if both states were compared and found to be equivalent. Every compared state is
    /// equivalent to itself.
    pub fn is_equivalent(&self, p: StateIndex, q: StateIndex) -> bool {
        self.pairs.contains(p) && self.pairs.contains(q) && !self.pairs.is_marked(p, q)
    }

    /// The number of refinement passes, including the final pass which did not mark anything.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Groups the compared states into equivalence classes by merging the states of every equivalent pair.
    pub fn classes(&self) -> Partition {
        let size = self.pairs.position.len();
        let mut forest = UnionFind::new(size);
        for (p, q) in self.pairs() {
            forest.union(p, q);
        }
        let classes = self
            .states()
            .iter()
            .map(|&q| (forest.find(q), q))
            .into_group_map();
        Partition::new(classes.into_values())
    }
}

/// Runs the table-filling algorithm on `states` and returns which pairs among them are equivalent. The states
/// need to be closed under successors, which is the case for instance for the states that are reachable from some
/// state, see [`reachable_states`](crate::transition_system::reachable::reachable_states).
///
/// # Example
/// ```
/// use automata_minimize::prelude::*;
/// use bit_set::BitSet;
///
/// let table = TransitionTable::from_rows(Alphabet::of_size(1), [vec![1], vec![1], vec![1]]).unwrap();
/// let accepting: BitSet = [1].into_iter().collect();
/// let equivalence = table_filling(&table, &accepting, [0, 1, 2]).unwrap();
/// assert_eq!(equivalence.pairs(), vec![(0, 2)]);
/// ```
pub fn table_filling(
    table: &TransitionTable,
    accepting: &BitSet,
    states: impl IntoIterator<Item = StateIndex>,
) -> Result<Equivalence, InvalidInput> {
    Ok(TableFilling::new(table, accepting, states)?.run())
}

#[cfg(test)]
mod tests {
    use bit_set::BitSet;
    use itertools::Itertools;

    use super::TableFilling;
    use crate::prelude::*;

    fn accepting(states: impl IntoIterator<Item = StateIndex>) -> BitSet {
        states.into_iter().collect()
    }

    #[test]
    fn pair_table_is_symmetric() {
        let table = TransitionTable::from_rows(
            Alphabet::of_size(1),
            [vec![1], vec![2], vec![0], vec![3]],
        )
        .unwrap();
        let filling = TableFilling::new(&table, &accepting([2]), [2, 0, 1, 0]).unwrap();
        let pairs = filling.pairs();
        assert_eq!(pairs.states(), &[0, 1, 2]);
        assert!(pairs.is_marked(0, 2));
        assert!(pairs.is_marked(2, 0));
        assert!(!pairs.is_marked(0, 1));
        assert!(!pairs.is_marked(1, 1));
        assert!(!pairs.is_marked(0, 3));
        assert_eq!(
            pairs.candidates().collect_vec(),
            vec![(0, 1), (0, 2), (1, 2)]
        );
    }

    #[test_log::test]
    fn marking_is_monotone() {
        // a chain 0 -> 1 -> 2 -> 3 -> 4 where only 4 accepts, every pair is eventually distinguishable
        let table = TransitionTable::from_rows(
            Alphabet::of_size(1),
            [vec![1], vec![2], vec![3], vec![4], vec![4]],
        )
        .unwrap();
        let mut filling = TableFilling::new(&table, &accepting([4]), 0..5).unwrap();
        let mut previous = filling.pairs().clone();
        while !filling.is_stable() {
            filling.pass();
            for (p, q) in previous.candidates() {
                if previous.is_marked(p, q) {
                    assert!(filling.pairs().is_marked(p, q));
                }
            }
            assert!(filling.pairs().marked_count() >= previous.marked_count());
            previous = filling.pairs().clone();
        }
        let equivalence = filling.run();
        assert!(equivalence.pairs().is_empty());
        assert_eq!(equivalence.marked_pairs().len(), 10);
        assert!(equivalence.passes() <= 25);
    }

    #[test]
    fn successors_must_be_considered() {
        let table =
            TransitionTable::from_rows(Alphabet::of_size(1), [vec![1], vec![2], vec![2]]).unwrap();
        assert_eq!(
            table_filling(&table, &accepting([2]), [0, 1]).map(|e| e.pairs()),
            Err(InvalidInput::SuccessorOutsideStates {
                state: 1,
                symbol: 0,
                target: 2
            })
        );
        assert_eq!(
            table_filling(&table, &accepting([2]), [0, 5]).map(|e| e.pairs()),
            Err(InvalidInput::StateOutOfRange { state: 5, size: 3 })
        );
        assert_eq!(
            table_filling(&table, &accepting([3]), [0, 1, 2]).map(|e| e.pairs()),
            Err(InvalidInput::AcceptingOutOfRange { state: 3, size: 3 })
        );
    }

    #[test]
    fn three_equivalent_states_yield_three_pairs() {
        // states 1, 2 and 3 all loop into each other and accept, 0 rejects
        let table = TransitionTable::from_rows(
            Alphabet::of_size(2),
            [vec![1, 2], vec![2, 3], vec![3, 1], vec![1, 1]],
        )
        .unwrap();
        let equivalence = table_filling(&table, &accepting([1, 2, 3]), 0..4).unwrap();
        assert_eq!(equivalence.pairs(), vec![(1, 2), (1, 3), (2, 3)]);
        assert!(equivalence.is_equivalent(3, 1));
        assert!(equivalence.is_equivalent(0, 0));
        assert!(!equivalence.is_equivalent(0, 1));
        assert!(!equivalence.is_equivalent(0, 4));

        let classes = equivalence.classes();
        assert_eq!(classes.size(), 2);
        assert_eq!(classes[0].iter().copied().collect_vec(), vec![0]);
        assert_eq!(classes[1].iter().copied().collect_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn no_alphabet_groups_by_acceptance() {
        let table = TransitionTable::from_rows(
            Alphabet::of_size(0),
            vec![Vec::<StateIndex>::new(); 4],
        )
        .unwrap();
        let equivalence = table_filling(&table, &accepting([1, 3]), 0..4).unwrap();
        assert_eq!(equivalence.pairs(), vec![(0, 2), (1, 3)]);
        assert_eq!(equivalence.passes(), 1);
    }
}
