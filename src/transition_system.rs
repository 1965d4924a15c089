use itertools::Itertools;
use tracing::trace;

use crate::{
    alphabet::{Alphabet, SymbolIndex},
    error::InvalidInput,
    StateIndex,
};

mod builder;
pub use builder::TableBuilder;

/// Breadth-first exploration of the states that can be reached from some origin.
pub mod reachable;

/// A total deterministic transition function over the states `0..size()` and the symbols of an
/// [`Alphabet`]. Every state has precisely one successor for every symbol, which is guaranteed
/// when the table is constructed. After that, the table is immutable.
///
/// The successors are stored row by row, so the successor of state `q` on the symbol with index
/// `a` sits at position `q * k + a` where `k` is the size of the alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    alphabet: Alphabet,
    size: usize,
    targets: Vec<StateIndex>,
}

impl TransitionTable {
    /// Builds a table from one row per state. The `i`-th row lists the successors of state `i`,
    /// one for each symbol of `alphabet` in order.
    ///
    /// # Example
    /// ```
    /// use automata_minimize::prelude::*;
    ///
    /// let table = TransitionTable::from_rows(Alphabet::of_size(1), [vec![1], vec![1]]).unwrap();
    /// assert_eq!(table.successor(0, 0), Some(1));
    /// assert!(TransitionTable::from_rows(Alphabet::of_size(1), [vec![2]]).is_err());
    /// ```
    pub fn from_rows<R>(
        alphabet: Alphabet,
        rows: impl IntoIterator<Item = R>,
    ) -> Result<Self, InvalidInput>
    where
        R: IntoIterator<Item = StateIndex>,
    {
        let rows: Vec<Vec<StateIndex>> = rows
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect();
        let size = rows.len();
        let expected = alphabet.size();

        let mut targets = Vec::with_capacity(size * expected);
        for (state, row) in rows.into_iter().enumerate() {
            if row.len() != expected {
                return Err(InvalidInput::RowLength {
                    state,
                    expected,
                    found: row.len(),
                });
            }
            for (symbol, target) in row.into_iter().enumerate() {
                if target >= size {
                    return Err(InvalidInput::TargetOutOfRange {
                        state,
                        symbol,
                        target,
                        size,
                    });
                }
                targets.push(target);
            }
        }
        trace!("built transition table with {size} states and {expected} symbols");

        Ok(Self {
            alphabet,
            size,
            targets,
        })
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the table has no states at all.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Gives a reference to the underlying alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Iterates over all state indices in ascending order.
    pub fn state_indices(&self) -> std::ops::Range<StateIndex> {
        0..self.size
    }

    /// Returns `true` if `state` is a state of this table.
    pub fn contains_state(&self, state: StateIndex) -> bool {
        state < self.size
    }

    /// Returns the successor of `state` on the symbol with index `symbol`, or `None` if either
    /// of them does not exist.
    pub fn successor(&self, state: StateIndex, symbol: SymbolIndex) -> Option<StateIndex> {
        if state >= self.size || symbol >= self.alphabet.size() {
            return None;
        }
        Some(self.step(state, symbol))
    }

    /// Returns all successors of `state`, ordered by symbol.
    pub fn row(&self, state: StateIndex) -> Option<&[StateIndex]> {
        if state >= self.size {
            return None;
        }
        let k = self.alphabet.size();
        Some(&self.targets[state * k..(state + 1) * k])
    }

    /// Unchecked successor lookup, callers make sure both indices are in range.
    pub(crate) fn step(&self, state: StateIndex, symbol: SymbolIndex) -> StateIndex {
        self.targets[state * self.alphabet.size() + symbol]
    }

    /// Fails with [`InvalidInput::StateOutOfRange`] if `state` does not exist.
    pub(crate) fn check_state(&self, state: StateIndex) -> Result<(), InvalidInput> {
        if self.contains_state(state) {
            Ok(())
        } else {
            Err(InvalidInput::StateOutOfRange {
                state,
                size: self.size,
            })
        }
    }

    /// Returns a string representation of the transition table. `state_decorator` renders the
    /// leftmost column, every other cell shows the target state.
    pub fn build_transition_table<SD>(&self, state_decorator: SD) -> String
    where
        SD: Fn(StateIndex) -> String,
    {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string())
                .chain(self.alphabet.universe().map(|s| self.alphabet[s].to_string())),
        );
        for q in self.state_indices() {
            builder.push_record(
                std::iter::once(state_decorator(q)).chain(
                    self.alphabet
                        .universe()
                        .map(|a| self.step(q, a).to_string())
                        .collect_vec(),
                ),
            );
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}
