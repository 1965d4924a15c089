use bit_set::BitSet;

use crate::{
    alphabet::{Alphabet, SymbolIndex},
    automaton::DFA,
    error::InvalidInput,
    math::Map,
    StateIndex,
};

use super::TransitionTable;

/// Helper struct for the construction of a [`TransitionTable`] or [`DFA`] edge by edge. It stores a
/// list of edges as triples `(source, symbol, target)` and a list of accepting states. The number of
/// states is derived from the largest state that is mentioned, unless it is fixed with [`Self::with_size`].
///
/// # Example
///
/// We want to create a DFA with two states 0 and 1 over an alphabet with two symbols, where
/// - state 0 goes to state 0 on symbol 0 and to state 1 on symbol 1,
/// - state 1 goes to state 1 on symbol 0 and to state 0 on symbol 1,
///
/// and state 1 is the only accepting state.
/// ```
/// use automata_minimize::prelude::*;
///
/// let dfa = TableBuilder::with_alphabet_size(2)
///     .with_edges([(0, 0, 0), (0, 1, 1), (1, 0, 1), (1, 1, 0)])
///     .with_accepting([1])
///     .into_dfa(0) // 0 is the initial state
///     .unwrap();
/// assert!(dfa.accepts([1, 0]));
/// ```
#[derive(Debug, Clone)]
pub struct TableBuilder {
    alphabet: Alphabet,
    size: Option<usize>,
    edges: Vec<(StateIndex, SymbolIndex, StateIndex)>,
    accepting: Vec<StateIndex>,
}

impl TableBuilder {
    /// Creates an empty builder for the given alphabet.
    pub fn for_alphabet(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            size: None,
            edges: vec![],
            accepting: vec![],
        }
    }

    /// Creates an empty builder for an alphabet of `size` symbols, see [`Alphabet::of_size`].
    pub fn with_alphabet_size(size: usize) -> Self {
        Self::for_alphabet(Alphabet::of_size(size))
    }

    /// Fixes the number of states to `size`. Without this, the number of states is one more than the
    /// largest state that appears in an edge or among the accepting states.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Adds the given edges, which are triples `(source, symbol, target)`.
    pub fn with_edges(
        mut self,
        edges: impl IntoIterator<Item = (StateIndex, SymbolIndex, StateIndex)>,
    ) -> Self {
        self.edges.extend(edges);
        self
    }

    /// Marks the given states as accepting.
    pub fn with_accepting(mut self, states: impl IntoIterator<Item = StateIndex>) -> Self {
        self.accepting.extend(states);
        self
    }

    fn size(&self) -> usize {
        self.size.unwrap_or_else(|| {
            self.edges
                .iter()
                .flat_map(|&(p, _, q)| [p, q])
                .chain(self.accepting.iter().copied())
                .max()
                .map_or(0, |max| max + 1)
        })
    }

    /// Collects the edges into a [`TransitionTable`]. Fails if some state lacks a transition, if a
    /// state has two different targets on one symbol or if some index is out of range.
    pub fn into_table(self) -> Result<TransitionTable, InvalidInput> {
        let size = self.size();
        let k = self.alphabet.size();

        let mut targets: Map<(StateIndex, SymbolIndex), StateIndex> = Map::default();
        for &(state, symbol, target) in &self.edges {
            if state >= size {
                return Err(InvalidInput::StateOutOfRange { state, size });
            }
            if symbol >= k || target >= size {
                return Err(InvalidInput::TargetOutOfRange {
                    state,
                    symbol,
                    target,
                    size,
                });
            }
            match targets.insert((state, symbol), target) {
                Some(previous) if previous != target => {
                    return Err(InvalidInput::Nondeterministic { state, symbol })
                }
                _ => {}
            }
        }

        let rows: Vec<Vec<StateIndex>> = (0..size)
            .map(|state| {
                (0..k)
                    .map(|symbol| {
                        targets
                            .get(&(state, symbol))
                            .copied()
                            .ok_or(InvalidInput::MissingTransition { state, symbol })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, InvalidInput>>()?;

        TransitionTable::from_rows(self.alphabet, rows)
    }

    /// Builds a [`DFA`] with the given initial state.
    pub fn into_dfa(self, initial: StateIndex) -> Result<DFA, InvalidInput> {
        let accepting: BitSet = self.accepting.iter().copied().collect();
        let table = self.into_table()?;
        DFA::new(table, accepting, initial)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn builder_detects_problems() {
        assert_eq!(
            TableBuilder::with_alphabet_size(2)
                .with_edges([(0, 0, 0), (0, 1, 1), (1, 0, 1)])
                .into_table(),
            Err(InvalidInput::MissingTransition {
                state: 1,
                symbol: 1
            })
        );
        assert_eq!(
            TableBuilder::with_alphabet_size(1)
                .with_edges([(0, 0, 0), (0, 0, 1), (1, 0, 1)])
                .into_table(),
            Err(InvalidInput::Nondeterministic {
                state: 0,
                symbol: 0
            })
        );
        assert_eq!(
            TableBuilder::with_alphabet_size(1)
                .with_size(1)
                .with_edges([(0, 0, 0)])
                .with_accepting([1])
                .into_dfa(0)
                .map(|_| ()),
            Err(InvalidInput::AcceptingOutOfRange { state: 1, size: 1 })
        );
    }

    #[test]
    fn builder_size_from_accepting() {
        let table = TableBuilder::with_alphabet_size(0)
            .with_accepting([2])
            .into_table()
            .unwrap();
        assert_eq!(table.size(), 3);
    }
}
