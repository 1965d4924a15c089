//! The batch format lists a number of test cases, each describing one automaton:
//!
//! ```text
//! 2        number of test cases
//! 3        number of states of the first case
//! a b      the alphabet, separated by whitespace
//! 1        the accepting states, this line may be empty
//! 0 1 2    one row per state: the state, followed by its successor on each symbol
//! 1 1 1
//! 2 1 2
//! 1        the second case starts here
//! a
//!
//! 0 0
//! ```
//!
//! Parsing happens in two stages. [`parse_batch`] only checks the layout and fails with a [`ParseError`]
//! if it is broken, since there is no way to find the start of the next case then. Each resulting
//! [`TestCase`] is validated separately when it is turned into a [`DFA`] via [`TestCase::to_dfa`], which
//! allows skipping malformed cases.
use std::str::FromStr;

use bit_set::BitSet;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    alphabet::Alphabet,
    automaton::DFA,
    error::InvalidInput,
    transition_system::TransitionTable,
    StateIndex,
};

/// Errors in the layout of a batch of test cases. Line numbers start at 1.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("input ended in line {line}, expected {expected}")]
    MissingLine { line: usize, expected: &'static str },
    #[error("could not parse `{token}` in line {line} as a number")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line} should contain a transition row but is empty")]
    EmptyRow { line: usize },
    #[error("test case {case} is malformed: {source}")]
    Invalid {
        case: usize,
        #[source]
        source: InvalidInput,
    },
}

/// One transition row as it appears in the input, i.e. before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// The line in which the row appears.
    pub line: usize,
    /// The state that the row belongs to.
    pub state: StateIndex,
    /// The successors on each symbol.
    pub targets: Vec<StateIndex>,
}

/// A single test case of a batch, as it was read from the input and before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Position of the case in the batch, starting at 1.
    pub number: usize,
    /// The line in which the case starts.
    pub line: usize,
    /// The declared number of states.
    pub size: usize,
    /// The alphabet, only its size is relevant for the transitions.
    pub alphabet: Alphabet,
    /// The accepting states.
    pub accepting: Vec<StateIndex>,
    /// The transition rows in the order in which they appear.
    pub rows: Vec<Row>,
}

impl TestCase {
    /// Validates the case and turns it into a [`DFA`] with the given initial state. Rows may appear in any
    /// order, but each state needs precisely one row with one successor per symbol.
    pub fn to_dfa(&self, initial: StateIndex) -> Result<DFA, InvalidInput> {
        let mut slots: Vec<Option<&Vec<StateIndex>>> = vec![None; self.size];
        for row in &self.rows {
            let slot = slots
                .get_mut(row.state)
                .ok_or(InvalidInput::StateOutOfRange {
                    state: row.state,
                    size: self.size,
                })?;
            if slot.replace(&row.targets).is_some() {
                return Err(InvalidInput::DuplicateRow { state: row.state });
            }
        }
        let rows = slots
            .into_iter()
            .enumerate()
            .map(|(state, slot)| {
                slot.map(|targets| targets.iter().copied())
                    .ok_or(InvalidInput::MissingRow { state })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let table = TransitionTable::from_rows(self.alphabet.clone(), rows)?;
        let accepting: BitSet = self.accepting.iter().copied().collect();
        DFA::new(table, accepting, initial)
    }
}

/// A batch of test cases.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Batch(pub Vec<TestCase>);

impl Batch {
    /// Turns every case into a [`DFA`], failing on the first malformed case.
    pub fn to_dfas(&self, initial: StateIndex) -> Result<Vec<DFA>, ParseError> {
        self.0
            .iter()
            .map(|case| {
                case.to_dfa(initial).map_err(|source| ParseError::Invalid {
                    case: case.number,
                    source,
                })
            })
            .collect()
    }
}

impl std::ops::Deref for Batch {
    type Target = Vec<TestCase>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for Batch {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_batch(s).map(Batch)
    }
}

struct Lines<'a> {
    it: std::iter::Peekable<std::iter::Enumerate<std::str::Lines<'a>>>,
    last: usize,
}

impl<'a> Lines<'a> {
    /// Line numbers refer to `input` as given, leading blank lines are skipped but still counted.
    fn new(input: &'a str) -> Self {
        let mut it = input.lines().enumerate().peekable();
        let mut last = 0;
        while let Some((i, _)) = it.next_if(|(_, line)| line.trim().is_empty()) {
            last = i + 1;
        }
        Self { it, last }
    }

    fn next_line(&mut self, expected: &'static str) -> Result<(usize, &'a str), ParseError> {
        match self.it.next() {
            Some((i, line)) => {
                self.last = i + 1;
                Ok((i + 1, line.trim()))
            }
            None => Err(ParseError::MissingLine {
                line: self.last + 1,
                expected,
            }),
        }
    }
}

fn parse_number(line: usize, token: &str) -> Result<usize, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

fn parse_numbers(line: usize, content: &str) -> Result<Vec<usize>, ParseError> {
    content
        .split_whitespace()
        .map(|token| parse_number(line, token))
        .collect()
}

/// Parses a batch of test cases, see the [module documentation](crate::input) for the layout. Leading and trailing
/// whitespace of the input is ignored, lines after the last announced case are ignored as well.
pub fn parse_batch(input: &str) -> Result<Vec<TestCase>, ParseError> {
    let mut lines = Lines::new(input);
    let (line, content) = lines.next_line("the number of test cases")?;
    let count = parse_number(line, content)?;
    debug!("reading {count} test cases");

    let mut cases = Vec::with_capacity(count.min(1024));
    for number in 1..=count {
        let (start, content) = lines.next_line("the number of states")?;
        let size = parse_number(start, content)?;
        let (_, content) = lines.next_line("the alphabet")?;
        let alphabet = Alphabet::new(content.split_whitespace());
        let (line, content) = lines.next_line("the accepting states")?;
        let accepting = parse_numbers(line, content)?;

        let mut rows = Vec::with_capacity(size.min(1024));
        for _ in 0..size {
            let (line, content) = lines.next_line("a transition row")?;
            let mut numbers = parse_numbers(line, content)?.into_iter();
            let state = numbers.next().ok_or(ParseError::EmptyRow { line })?;
            rows.push(Row {
                line,
                state,
                targets: numbers.collect(),
            });
        }

        trace!(
            "read case {number} with {size} states over {} symbols",
            alphabet.size()
        );
        cases.push(TestCase {
            number,
            line: start,
            size,
            alphabet,
            accepting,
            rows,
        });
    }
    Ok(cases)
}
