use thiserror::Error;

use crate::{alphabet::SymbolIndex, StateIndex};

/// Raised whenever an automaton description that is handed to the library is malformed or
/// inconsistent. Each variant names the state (and symbol) that caused the problem.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("state {state} does not exist in an automaton with {size} states")]
    StateOutOfRange { state: StateIndex, size: usize },
    #[error("transition from state {state} on symbol {symbol} leads to {target}, but there are only {size} states")]
    TargetOutOfRange {
        state: StateIndex,
        symbol: SymbolIndex,
        target: StateIndex,
        size: usize,
    },
    #[error("accepting state {state} does not exist in an automaton with {size} states")]
    AcceptingOutOfRange { state: StateIndex, size: usize },
    #[error("row of state {state} has {found} successors, expected {expected}")]
    RowLength {
        state: StateIndex,
        expected: usize,
        found: usize,
    },
    #[error("state {state} has no transition on symbol {symbol}")]
    MissingTransition { state: StateIndex, symbol: SymbolIndex },
    #[error("state {state} has more than one target on symbol {symbol}")]
    Nondeterministic { state: StateIndex, symbol: SymbolIndex },
    #[error("transition from state {state} on symbol {symbol} leads to {target}, which is not among the considered states")]
    SuccessorOutsideStates {
        state: StateIndex,
        symbol: SymbolIndex,
        target: StateIndex,
    },
    #[error("row of state {state} is given more than once")]
    DuplicateRow { state: StateIndex },
    #[error("row of state {state} is missing")]
    MissingRow { state: StateIndex },
    #[error("automaton has no states")]
    EmptyAutomaton,
}
