use bit_set::BitSet;
use tracing::debug;

use crate::{
    alphabet::{Alphabet, SymbolIndex},
    automaton::DFA,
    transition_system::TransitionTable,
};

/// Generate a random [`DFA`] with `size` states over an alphabet of `symbols` symbols by drawing every
/// transition uniformly at random and making each state accepting with probability one half. State 0
/// is initial. Depending on the drawn transitions, some states may be unreachable.
///
/// Returns `None` if `size` is zero, as there is no automaton without states.
pub fn generate_random_dfa(symbols: usize, size: usize) -> Option<DFA> {
    generate_random_dfa_with(&mut fastrand::Rng::new(), symbols, size)
}

/// Works as [`generate_random_dfa`], but draws from the given generator, which makes the result
/// reproducible when the generator is seeded.
pub fn generate_random_dfa_with(
    rng: &mut fastrand::Rng,
    symbols: usize,
    size: usize,
) -> Option<DFA> {
    if size == 0 {
        return None;
    }
    let rows: Vec<Vec<_>> = (0..size)
        .map(|_| (0..symbols).map(|_| rng.usize(..size)).collect())
        .collect();
    let table = TransitionTable::from_rows(Alphabet::of_size(symbols), rows).ok()?;
    let accepting: BitSet = (0..size).filter(|_| rng.bool()).collect();
    debug!(
        "generated random dfa with {size} states over {symbols} symbols, {} accepting",
        accepting.len()
    );
    DFA::new(table, accepting, 0).ok()
}

/// Generates `count` random words over an alphabet of `symbols` symbols, where the length of each word
/// is drawn uniformly from `0..=max_len`.
pub fn generate_random_words(
    rng: &mut fastrand::Rng,
    symbols: usize,
    max_len: usize,
    count: usize,
) -> Vec<Vec<SymbolIndex>> {
    if symbols == 0 {
        return vec![vec![]; count];
    }
    (0..count)
        .map(|_| {
            let len = rng.usize(..=max_len);
            (0..len).map(|_| rng.usize(..symbols)).collect()
        })
        .collect()
}
