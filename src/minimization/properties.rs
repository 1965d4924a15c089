use itertools::Itertools;

use crate::{
    prelude::*,
    random::{generate_random_dfa_with, generate_random_words},
};

/// All words over `symbols` symbols of length at most `max_len`, shortest first.
fn words_up_to(symbols: usize, max_len: usize) -> Vec<Vec<SymbolIndex>> {
    let mut words = vec![vec![]];
    let mut layer: Vec<Vec<SymbolIndex>> = vec![vec![]];
    for _ in 0..max_len {
        layer = layer
            .iter()
            .flat_map(|w| {
                (0..symbols).map(move |a| {
                    let mut next = w.clone();
                    next.push(a);
                    next
                })
            })
            .collect();
        words.extend(layer.iter().cloned());
    }
    words
}

fn random_dfas(seed: u64) -> impl Iterator<Item = DFA> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..60).filter_map(move |i| {
        let symbols = 1 + i % 3;
        let size = 1 + i % 7;
        generate_random_dfa_with(&mut rng, symbols, size)
    })
}

#[test]
fn reachable_states_are_exactly_those_reached_by_words() {
    for dfa in random_dfas(11) {
        // every reachable state is reached by a word shorter than the number of states
        let reached = words_up_to(dfa.alphabet().size(), dfa.size())
            .into_iter()
            .filter_map(|w| dfa.reached_state(w))
            .sorted()
            .dedup()
            .collect_vec();
        let reachable = dfa.reachable_states();
        assert_eq!(reachable.iter().collect_vec(), reached);
        assert!(reachable.contains(dfa.initial()));
    }
}

#[test]
fn reported_pairs_agree_on_all_words() {
    for dfa in random_dfas(23) {
        let min = dfa.minimize();
        let words = words_up_to(dfa.alphabet().size(), dfa.size().min(5));
        for (p, q) in min.pairs() {
            assert!(min.reachable().contains(p) && min.reachable().contains(q));
            for w in &words {
                assert_eq!(
                    dfa.accepts_from(p, w.iter().copied()),
                    dfa.accepts_from(q, w.iter().copied()),
                    "{} disagree on {w:?}",
                    (p, q).show()
                );
            }
            assert_eq!(dfa.separate(p, q), None);
        }
    }
}

#[test]
fn marked_pairs_are_separated() {
    for dfa in random_dfas(37) {
        let min = dfa.minimize();
        for (p, q) in min.equivalence().marked_pairs() {
            let word = dfa
                .separate(p, q)
                .expect("marked pairs must be distinguishable");
            assert_ne!(
                dfa.accepts_from(p, word.iter().copied()),
                dfa.accepts_from(q, word.iter().copied())
            );
            if dfa.is_accepting(p) != dfa.is_accepting(q) {
                assert!(word.is_empty());
            }
        }
    }
}

#[test]
fn base_case_and_pass_bound() {
    for dfa in random_dfas(41) {
        let min = dfa.minimize();
        let states = min.equivalence().states();
        for (p, q) in states.iter().copied().tuple_combinations() {
            if dfa.is_accepting(p) != dfa.is_accepting(q) {
                assert!(!min.equivalence().is_equivalent(p, q));
            }
        }
        let n = states.len();
        assert!(min.equivalence().passes() <= n * n);
    }
}

#[test]
fn runs_are_deterministic() {
    for dfa in random_dfas(53) {
        let first = dfa.minimize();
        let second = dfa.clone().minimize();
        assert_eq!(first.pairs(), second.pairs());
        assert_eq!(first, second);
    }
}

#[test]
fn equivalent_states_agree_on_random_long_words() {
    let mut rng = fastrand::Rng::with_seed(5);
    for dfa in random_dfas(67) {
        let words = generate_random_words(&mut rng, dfa.alphabet().size(), 30, 50);
        let classes = dfa.minimize().classes();
        for class in &classes {
            for w in &words {
                let verdicts = class
                    .iter()
                    .map(|&q| dfa.accepts_from(q, w.iter().copied()))
                    .dedup()
                    .count();
                assert_eq!(verdicts, 1);
            }
        }
    }
}
