use std::collections::VecDeque;

use bit_set::BitSet;

use crate::{
    alphabet::{Alphabet, SymbolIndex},
    error::InvalidInput,
    math::Map,
    transition_system::{
        reachable::{Reachable, ReachableSet},
        TransitionTable,
    },
    StateIndex,
};

/// A deterministic finite automaton (DFA) consists of a total [`TransitionTable`], a set of accepting
/// states and a designated initial state. It accepts a finite word if the state that the word reaches
/// from the initial state is accepting.
///
/// All parts are validated on construction, so every state index that a `DFA` hands out is a state
/// of its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DFA {
    table: TransitionTable,
    accepting: BitSet,
    initial: StateIndex,
}

impl DFA {
    /// Creates a new DFA. Fails if the table has no states, if some accepting state does not exist or
    /// if `initial` does not exist.
    pub fn new(
        table: TransitionTable,
        accepting: BitSet,
        initial: StateIndex,
    ) -> Result<Self, InvalidInput> {
        if table.is_empty() {
            return Err(InvalidInput::EmptyAutomaton);
        }
        if let Some(state) = accepting.iter().find(|&q| !table.contains_state(q)) {
            return Err(InvalidInput::AcceptingOutOfRange {
                state,
                size: table.size(),
            });
        }
        table.check_state(initial)?;
        Ok(Self {
            table,
            accepting,
            initial,
        })
    }

    /// Returns the same automaton with a different initial state.
    pub fn with_initial(self, initial: StateIndex) -> Result<Self, InvalidInput> {
        self.table.check_state(initial)?;
        Ok(Self { initial, ..self })
    }

    /// Returns a reference to the underlying transition table.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Returns a reference to the alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        self.table.alphabet()
    }

    /// The number of states, including unreachable ones.
    pub fn size(&self) -> usize {
        self.table.size()
    }

    /// The initial state.
    pub fn initial(&self) -> StateIndex {
        self.initial
    }

    /// Returns the set of accepting states.
    pub fn accepting(&self) -> &BitSet {
        &self.accepting
    }

    /// Returns `true` if `state` is accepting.
    pub fn is_accepting(&self, state: StateIndex) -> bool {
        self.accepting.contains(state)
    }

    /// Returns the indices of all states that are accepting, in ascending order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.accepting.iter()
    }

    /// Returns the indices of all states that are rejecting, in ascending order.
    pub fn rejecting_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.table
            .state_indices()
            .filter(|&q| !self.accepting.contains(q))
    }

    /// Runs `word` starting in `origin` and returns the state that is reached. If `origin` does not
    /// exist or the word contains a symbol outside of the alphabet, `None` is returned.
    pub fn reached_state_from<W>(&self, origin: StateIndex, word: W) -> Option<StateIndex>
    where
        W: IntoIterator<Item = SymbolIndex>,
    {
        word.into_iter()
            .try_fold(origin, |q, symbol| self.table.successor(q, symbol))
            .filter(|&q| self.table.contains_state(q))
    }

    /// Runs `word` from the initial state, see [`Self::reached_state_from`].
    pub fn reached_state<W>(&self, word: W) -> Option<StateIndex>
    where
        W: IntoIterator<Item = SymbolIndex>,
    {
        self.reached_state_from(self.initial, word)
    }

    /// Returns whether the automaton accepts the given finite word when started in `origin`. Words
    /// containing symbols outside of the alphabet are rejected.
    pub fn accepts_from<W>(&self, origin: StateIndex, word: W) -> bool
    where
        W: IntoIterator<Item = SymbolIndex>,
    {
        self.reached_state_from(origin, word)
            .is_some_and(|q| self.is_accepting(q))
    }

    /// Returns whether the automaton accepts the given finite word.
    pub fn accepts<W>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = SymbolIndex>,
    {
        self.accepts_from(self.initial, word)
    }

    /// Iterates over the states that are reachable from the initial state in breadth-first order.
    pub fn reachable_state_indices(&self) -> Reachable<'_> {
        Reachable::unchecked(&self.table, self.initial)
    }

    /// Computes the set of states that are reachable from the initial state.
    pub fn reachable_states(&self) -> ReachableSet {
        self.reachable_state_indices().into_set()
    }

    /// Attempts to separate the state `left` from the state `right` by finding a word that leads one of
    /// them into an accepting and the other one into a rejecting state. The returned word is among the
    /// shortest such words. Gives back `None` if the states are equivalent or one of them does not exist.
    ///
    /// # Example
    /// ```
    /// use automata_minimize::prelude::*;
    ///
    /// let dfa = TableBuilder::with_alphabet_size(1)
    ///     .with_edges([(0, 0, 1), (1, 0, 2), (2, 0, 2)])
    ///     .with_accepting([2])
    ///     .into_dfa(0)
    ///     .unwrap();
    /// assert_eq!(dfa.separate(0, 1), Some(vec![0]));
    /// assert_eq!(dfa.separate(2, 2), None);
    /// ```
    pub fn separate(&self, left: StateIndex, right: StateIndex) -> Option<Vec<SymbolIndex>> {
        if !self.table.contains_state(left) || !self.table.contains_state(right) {
            return None;
        }

        let mut parent: Map<(StateIndex, StateIndex), Option<((StateIndex, StateIndex), SymbolIndex)>> =
            Map::default();
        parent.insert((left, right), None);
        let mut queue = VecDeque::from([(left, right)]);

        while let Some((p, q)) = queue.pop_front() {
            if self.is_accepting(p) != self.is_accepting(q) {
                let mut word = vec![];
                let mut current = (p, q);
                while let Some(Some((previous, symbol))) = parent.get(&current) {
                    word.push(*symbol);
                    current = *previous;
                }
                word.reverse();
                return Some(word);
            }
            for symbol in self.alphabet().universe() {
                let successor = (self.table.step(p, symbol), self.table.step(q, symbol));
                if successor.0 != successor.1 && !parent.contains_key(&successor) {
                    parent.insert(successor, Some(((p, q), symbol)));
                    queue.push_back(successor);
                }
            }
        }
        None
    }

    /// Returns a string representation of the transition table, where the initial state is prefixed
    /// with `→` and accepting states are suffixed with `*`.
    pub fn build_transition_table(&self) -> String {
        self.table.build_transition_table(|q| {
            format!(
                "{}{q}{}",
                if q == self.initial { "→ " } else { "" },
                if self.is_accepting(q) { "*" } else { "" }
            )
        })
    }
}
