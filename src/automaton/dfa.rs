use bit_set::BitSet;

use crate::{
    alphabet::{Alphabet, Label, Symbol},
    determinization::StateSet,
    math,
    transition_system::{StateId, TransitionSystem},
};

use super::{Automaton, TransitionMap};

/// A deterministic finite automaton as it is produced by the subset construction.
///
/// Every state corresponds to a set of states of the automaton it was computed from and is
/// labelled canonically by that set. The transition function is total, for every state and
/// every symbol of the alphabet there is exactly one successor. The alphabet never declares
/// epsilon.
#[derive(Clone)]
pub struct Dfa {
    alphabet: Alphabet,
    labels: math::Bijection<String, StateId>,
    subsets: Vec<StateSet>,
    transitions: Vec<Vec<StateId>>,
    initial: StateId,
    finals: BitSet,
}

impl Dfa {
    /// Assembles a [`Dfa`]. The `i`-th entry of `labels`, `subsets` and `transitions` belongs
    /// to the state with index `i`, the transitions of a state are given in alphabet order.
    pub(crate) fn from_parts(
        alphabet: Alphabet,
        labels: Vec<String>,
        subsets: Vec<StateSet>,
        transitions: Vec<Vec<StateId>>,
        initial: StateId,
        finals: BitSet,
    ) -> Self {
        debug_assert_eq!(labels.len(), subsets.len());
        debug_assert!(transitions.iter().all(|row| row.len() == alphabet.size()));
        Self {
            labels: labels
                .into_iter()
                .enumerate()
                .map(|(i, label)| (label, StateId::from_index(i)))
                .collect(),
            alphabet,
            subsets,
            transitions,
            initial,
            finals,
        }
    }

    /// The unique successor of `state` on `symbol`. Returns `None` only if `state` or
    /// `symbol` do not exist.
    pub fn successor(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        self.transitions
            .get(state.index())?
            .get(symbol.index())
            .copied()
    }

    /// Returns the set of original states that `state` stands for.
    pub fn subset(&self, state: StateId) -> Option<&StateSet> {
        self.subsets.get(state.index())
    }

    /// Looks up the state with the given canonical label.
    pub fn state_id(&self, label: &str) -> Option<StateId> {
        self.labels.get_by_left(label).copied()
    }

    /// Runs `word` from the initial state and returns the reached state, or `None` if some
    /// symbol is not part of the alphabet.
    pub fn reached_state<S: AsRef<str>>(&self, word: &[S]) -> Option<StateId> {
        word.iter().try_fold(self.initial, |state, symbol| {
            self.successor(state, self.alphabet.symbol(symbol.as_ref())?)
        })
    }

    /// Converts `self` into the general [`Automaton`] representation, keeping labels and
    /// state ids.
    pub fn into_automaton(self) -> Automaton {
        let labels = (0..self.subsets.len())
            .map(|i| {
                self.labels
                    .get_by_right(&StateId::from_index(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect();
        let transitions = self
            .transitions
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, target)| {
                        (
                            Label::Symbol(Symbol::from_index(i)),
                            math::OrderedSet::from([*target]),
                        )
                    })
                    .collect::<TransitionMap>()
            })
            .collect();
        Automaton::from_parts(
            self.alphabet,
            labels,
            transitions,
            self.initial,
            self.finals,
        )
    }
}

impl TransitionSystem for Dfa {
    type Successors<'this> = std::option::IntoIter<StateId>
    where
        Self: 'this;

    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn size(&self) -> usize {
        self.subsets.len()
    }

    fn initial(&self) -> StateId {
        self.initial
    }

    fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(state.index())
    }

    fn state_label(&self, state: StateId) -> Option<&str> {
        self.labels.get_by_right(&state).map(String::as_str)
    }

    fn successors(&self, state: StateId, symbol: Symbol) -> Self::Successors<'_> {
        self.successor(state, symbol).into_iter()
    }

    fn epsilon_successors(&self, _state: StateId) -> Self::Successors<'_> {
        None.into_iter()
    }
}

impl std::fmt::Debug for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DFA\n{}", self.transition_table())
    }
}

#[cfg(test)]
mod tests {
    use crate::{automaton::tests::ends_with_ab, prelude::*};

    #[test_log::test]
    fn total_and_labelled() {
        let dfa = determinize(&ends_with_ab());
        assert!(!dfa.alphabet().declares_epsilon());
        assert!(!dfa.has_epsilon_transitions());
        for state in dfa.state_ids() {
            for symbol in dfa.alphabet().universe() {
                assert_eq!(dfa.successors(state, symbol).count(), 1);
            }
        }
        let initial = dfa.initial();
        assert_eq!(dfa.state_label(initial), Some("{s,p}"));
        assert_eq!(dfa.state_id("{s,p}"), Some(initial));
        assert_eq!(
            dfa.subset(initial).unwrap().len(),
            2,
            "initial subset is the closure of s"
        );
    }

    #[test_log::test]
    fn reached_state_follows_the_word() {
        let dfa = determinize(&ends_with_ab());
        let reached = dfa.reached_state(&["b", "a", "b"]).unwrap();
        assert_eq!(dfa.state_label(reached), Some("{p,r}"));
        assert!(dfa.is_final(reached));
        assert_eq!(dfa.reached_state(&["c"]), None);
        assert_eq!(dfa.reached_state::<&str>(&[]), Some(dfa.initial()));
    }

    #[test_log::test]
    fn converts_into_deterministic_automaton() {
        let dfa = determinize(&ends_with_ab());
        let size = dfa.size();
        let aut = dfa.clone().into_automaton();
        assert!(aut.is_deterministic());
        assert_eq!(aut.size(), size);
        assert_eq!(aut.state_id("{p,q}"), dfa.state_id("{p,q}"));
        for state in dfa.state_ids() {
            assert_eq!(aut.is_final(state), dfa.is_final(state));
            for symbol in dfa.alphabet().universe() {
                assert!(aut.successors(state, symbol).eq(dfa.successors(state, symbol)));
            }
        }
    }
}
