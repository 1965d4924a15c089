//! Library for minimizing deterministic finite automata in Rust.
//!
//! A [`DFA`](automaton::DFA) consists of a total [`TransitionTable`](transition_system::TransitionTable) over an
//! [`Alphabet`] whose symbols are only ever addressed by their position, a set of accepting states and a designated
//! initial state. Minimization proceeds in two steps. First, all states that cannot be reached from the initial state
//! are discarded, which is done by a breadth-first traversal (see [`transition_system::reachable`]). Then the remaining
//! states are compared pairwise with the table-filling algorithm of Moore and Myhill (see [`minimization`]): a pair of
//! states is marked as soon as some word leads one of them into an accepting state and the other one into a rejecting
//! state. Pairs that remain unmarked once no further marks can be added are exactly the pairs of equivalent states.
//!
//! The result of a run is reported as a flat list of canonical pairs `(p, q)` with `p < q`, in ascending order.
//! Grouping those pairs into equivalence classes is available through [`minimization::Equivalence::classes`].
//!
//! Besides the core, the crate contains a parser for the batch text format in [`input`], a reporter that renders
//! results in [`output`] and, behind the `random` feature, generators for random automata in [`random`].
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_minimize::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{Alphabet, SymbolIndex},
        automaton::DFA,
        error::InvalidInput,
        math,
        minimization::{minimize, table_filling, Equivalence, Minimization},
        transition_system::{
            reachable::{reachable_states, Reachable, ReachableSet},
            TableBuilder, TransitionTable,
        },
        Show, StateIndex,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Module that contains definitions for dealing with alphabets.
pub mod alphabet;
pub use alphabet::Alphabet;

/// Defines the error that is raised when an automaton description is malformed.
pub mod error;
pub use error::InvalidInput;

/// This module defines transition tables, how they are built and which states are reachable in them.
pub mod transition_system;

/// Defines deterministic finite automata.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;

/// Contains the table-filling algorithm that determines which states of an automaton are equivalent.
pub mod minimization;

/// Parsing of the batch text format which describes a sequence of automata.
pub mod input;

/// Rendering of minimization results for the terminal.
pub mod output;

/// Implements the generation of random automata.
#[cfg(feature = "random")]
pub mod random;

use itertools::Itertools;

/// States are identified by their position in the transition table.
pub type StateIndex = usize;

/// Helper trait which can be used to display states, pairs of states and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state index that is simply
    /// the number and for a pair of states `(0, 2)` it is `(0, 2)`.
    fn show(&self) -> String;
    /// Show a collection of the thing, for a collection of states this should be `{0, 1, 2}`.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}
