use bit_set::BitSet;
use tracing::debug;

use crate::{
    alphabet::{Alphabet, Label},
    automaton::{Automaton, TransitionMap},
    transition_system::StateId,
};

/// Parameters for [`random_automaton`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomParams {
    /// Number of symbols, the alphabet consists of the first `symbols` letters.
    pub symbols: usize,
    /// Number of states, these are labelled `q0`, `q1`, ...
    pub states: usize,
    /// Probability with which a transition between two states on some symbol exists.
    pub transition_probability: f64,
    /// Probability with which an epsilon transition between two states exists.
    pub epsilon_probability: f64,
    /// Probability with which a state is final.
    pub accepting_probability: f64,
}

impl Default for RandomParams {
    fn default() -> Self {
        Self {
            symbols: 2,
            states: 4,
            transition_probability: 0.3,
            epsilon_probability: 0.0,
            accepting_probability: 0.3,
        }
    }
}

/// Draws a random automaton. For every pair of states `p, q` and every symbol `a`, the
/// transition `p a q` is present with probability `transition_probability`, and the epsilon
/// transition from `p` to `q` with probability `epsilon_probability`. Each state is final with
/// probability `accepting_probability`. The initial state is `q0`.
///
/// # Panics
/// If `params.symbols` exceeds 26, as the alphabet consists of the letters `a` to `z`.
pub fn random_automaton(rng: &mut fastrand::Rng, params: &RandomParams) -> Automaton {
    let states = params.states.max(1);
    let alphabet = Alphabet::of_size(params.symbols);

    let mut finals = BitSet::with_capacity(states);
    let mut transitions = vec![TransitionMap::default(); states];
    for (p, map) in transitions.iter_mut().enumerate() {
        if rng.f64() < params.accepting_probability {
            finals.insert(p);
        }
        for q in 0..states {
            let mut labels = alphabet
                .universe()
                .map(Label::Symbol)
                .filter(|_| rng.f64() < params.transition_probability)
                .collect::<Vec<_>>();
            if rng.f64() < params.epsilon_probability {
                labels.push(Label::Epsilon);
            }
            for label in labels {
                map.entry(label).or_default().insert(StateId::from_index(q));
            }
        }
    }
    debug!(
        "drew random automaton with {states} states and {} final states",
        finals.len()
    );

    Automaton::from_parts(
        alphabet,
        (0..states).map(|i| format!("q{i}")).collect(),
        transitions,
        StateId::from_index(0),
        finals,
    )
}

/// Generates a random word over the symbols of `alphabet`, whose length is drawn uniformly
/// from `min_len..=max_len`. If `max_len` is smaller than `min_len`, words have length
/// `min_len`.
pub fn random_word(
    rng: &mut fastrand::Rng,
    alphabet: &Alphabet,
    min_len: usize,
    max_len: usize,
) -> Vec<String> {
    let names = alphabet.names().collect::<Vec<_>>();
    if names.is_empty() {
        return vec![];
    }
    let length = rng.usize(min_len..=max_len.max(min_len));
    (0..length)
        .map(|_| names[rng.usize(..names.len())].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    const SEEDS: std::ops::Range<u64> = 0..40;

    fn params(epsilon_probability: f64) -> RandomParams {
        RandomParams {
            symbols: 2,
            states: 5,
            transition_probability: 0.25,
            epsilon_probability,
            accepting_probability: 0.3,
        }
    }

    #[test_log::test]
    fn generates_requested_shape() {
        let mut rng = fastrand::Rng::with_seed(7);
        let aut = random_automaton(&mut rng, &params(0.0));
        assert_eq!(aut.size(), 5);
        assert_eq!(aut.alphabet().size(), 2);
        assert_eq!(aut.state_label(aut.initial()), Some("q0"));
        assert!(!aut.has_epsilon_transitions());

        for _ in 0..20 {
            let w = random_word(&mut rng, aut.alphabet(), 1, 4);
            assert!((1..=4).contains(&w.len()));
            assert!(w.iter().all(|s| aut.alphabet().contains(s)));
        }
    }

    #[test_log::test]
    fn word_length_bounds_are_clamped() {
        let mut rng = fastrand::Rng::with_seed(3);
        let alphabet = Alphabet::of_size(2);
        for _ in 0..10 {
            assert_eq!(random_word(&mut rng, &alphabet, 4, 1).len(), 4);
        }
        assert!(random_word(&mut rng, &Alphabet::of_size(0), 1, 3).is_empty());
    }

    #[test]
    #[should_panic(expected = "Alphabet is too large")]
    fn too_many_symbols_panic() {
        let params = RandomParams {
            symbols: 27,
            ..RandomParams::default()
        };
        random_automaton(&mut fastrand::Rng::with_seed(0), &params);
    }

    #[test_log::test]
    fn empty_word_is_accepted_iff_initial_is_final() {
        for seed in SEEDS {
            let mut rng = fastrand::Rng::with_seed(seed);
            let aut = random_automaton(&mut rng, &params(0.0));
            let expected = if aut.is_final(aut.initial()) {
                Verdict::Accepted
            } else {
                Verdict::Rejected
            };
            assert_eq!(classify::<_, &str>(&aut, &[]), expected);
        }
    }

    #[test_log::test]
    fn foreign_symbols_are_invalid() {
        for seed in SEEDS {
            let mut rng = fastrand::Rng::with_seed(seed);
            let aut = random_automaton(&mut rng, &params(0.2));
            let mut w = random_word(&mut rng, aut.alphabet(), 0, 6);
            let position = rng.usize(..=w.len());
            w.insert(position, "z".to_string());
            assert_eq!(classify(&aut, &w), Verdict::Invalid);
            assert_eq!(classify_with_epsilon(&aut, &w), Verdict::Invalid);
        }
    }

    #[test_log::test]
    fn determinization_preserves_the_language() {
        for seed in SEEDS {
            let mut rng = fastrand::Rng::with_seed(seed);
            let nfa = random_automaton(&mut rng, &params(0.0));
            let epsilon_nfa = random_automaton(&mut rng, &params(0.15));
            let dfa = determinize(&nfa);
            let epsilon_dfa = determinize(&epsilon_nfa);

            for _ in 0..30 {
                let w = random_word(&mut rng, nfa.alphabet(), 0, 7);
                assert_eq!(classify(&nfa, &w), classify(&dfa, &w), "{w:?}");
                assert_eq!(
                    classify_with_epsilon(&nfa, &w),
                    classify(&nfa, &w),
                    "{w:?}"
                );
                assert_eq!(
                    classify_with_epsilon(&epsilon_nfa, &w),
                    classify(&epsilon_dfa, &w),
                    "{w:?}"
                );
            }
        }
    }

    #[test_log::test]
    fn determinized_automata_are_total() {
        for seed in SEEDS {
            let mut rng = fastrand::Rng::with_seed(seed);
            let dfa = determinize(&random_automaton(&mut rng, &params(0.1)));
            for state in dfa.state_ids() {
                for symbol in dfa.alphabet().universe() {
                    assert_eq!(dfa.successors(state, symbol).count(), 1);
                }
            }
        }
    }

    #[test_log::test]
    fn determinization_is_idempotent_up_to_isomorphism() {
        for seed in SEEDS {
            let mut rng = fastrand::Rng::with_seed(seed);
            let dfa = determinize(&random_automaton(&mut rng, &params(0.1)));
            let twice = determinize(&dfa);
            let via_automaton = determinize(&dfa.clone().into_automaton());
            assert_eq!(twice.size(), dfa.size());
            assert_eq!(via_automaton.size(), dfa.size());

            for _ in 0..30 {
                let w = random_word(&mut rng, dfa.alphabet(), 0, 7);
                assert_eq!(classify(&dfa, &w), classify(&twice, &w), "{w:?}");
                assert_eq!(classify(&dfa, &w), classify(&via_automaton, &w), "{w:?}");
            }
        }
    }

    #[test_log::test]
    fn subsets_are_closed_and_reached_consistently() {
        for seed in SEEDS {
            let mut rng = fastrand::Rng::with_seed(seed);
            let nfa = random_automaton(&mut rng, &params(0.2));
            let dfa = determinize(&nfa);
            for state in dfa.state_ids() {
                let subset = dfa.subset(state).unwrap().clone();
                assert_eq!(closure(&nfa, subset.clone()), subset);
                assert_eq!(
                    dfa.is_final(state),
                    subset.iter().any(|q| nfa.is_final(q))
                );
            }
        }
    }
}
