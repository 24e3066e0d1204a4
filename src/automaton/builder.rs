use bit_set::BitSet;
use itertools::Itertools;
use tracing::trace;

use crate::{
    alphabet::{Alphabet, Label, EPSILON},
    math,
    transition_system::StateId,
};

use super::{Automaton, MalformedAutomaton, TransitionMap};

/// Helper struct for the construction of an [`Automaton`] from textual labels. It collects the
/// alphabet, the states, the final states, the initial state and a list of transitions, which
/// are only checked for consistency once [`AutomatonBuilder::build`] is called.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let aut = Automaton::builder()
///     .with_alphabet(["a", "b"])
///     .with_states(["q0", "q1"])
///     .with_final_states(["q1"])
///     .with_initial("q0")
///     .with_transitions([("q0", "a", "q1"), ("q1", "b", "q0")])
///     .with_epsilon_transitions([("q1", "q0")])
///     .build()
///     .unwrap();
/// assert_eq!(aut.size(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    symbols: Vec<String>,
    declares_epsilon: bool,
    states: Vec<String>,
    finals: Vec<String>,
    initial: Option<String>,
    transitions: Vec<(String, Option<String>, String)>,
}

impl AutomatonBuilder {
    /// Adds the given symbols to the alphabet. The epsilon marker [`EPSILON`] is never a
    /// symbol, passing it has the same effect as [`AutomatonBuilder::declaring_epsilon`].
    pub fn with_alphabet<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Records that the epsilon marker is part of the declared alphabet.
    pub fn declaring_epsilon(mut self, declares_epsilon: bool) -> Self {
        self.declares_epsilon = declares_epsilon;
        self
    }

    /// Declares the given states, in order. Repeated labels denote the same state.
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Marks the given states as final.
    pub fn with_final_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.finals.extend(states.into_iter().map(Into::into));
        self
    }

    /// Sets the initial state.
    pub fn with_initial<S: Into<String>>(mut self, state: S) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Adds transitions given as `(origin, symbol, destination)` triples.
    pub fn with_transitions<I, X, Y, Z>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (X, Y, Z)>,
        X: Into<String>,
        Y: Into<String>,
        Z: Into<String>,
    {
        for (from, on, to) in transitions {
            self.add_transition(from, Some(on.into()), to);
        }
        self
    }

    /// Adds epsilon transitions given as `(origin, destination)` pairs.
    pub fn with_epsilon_transitions<I, X, Z>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (X, Z)>,
        X: Into<String>,
        Z: Into<String>,
    {
        for (from, to) in transitions {
            self.add_transition(from, None, to);
        }
        self
    }

    /// Adds a single transition, `None` denotes an epsilon transition.
    pub fn add_transition<X, Z>(&mut self, from: X, on: Option<String>, to: Z)
    where
        X: Into<String>,
        Z: Into<String>,
    {
        self.transitions.push((from.into(), on, to.into()));
    }

    /// Checks the collected data for consistency and builds the [`Automaton`].
    pub fn build(self) -> Result<Automaton, MalformedAutomaton> {
        let labels = self.states.into_iter().unique().collect_vec();
        if labels.is_empty() {
            return Err(MalformedAutomaton::NoStates);
        }
        let ids: math::Map<&str, StateId> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), StateId::from_index(i)))
            .collect();
        let (markers, symbols): (Vec<_>, Vec<_>) =
            self.symbols.into_iter().partition(|symbol| symbol == EPSILON);
        let alphabet =
            Alphabet::new(symbols).with_epsilon(self.declares_epsilon || !markers.is_empty());

        let initial = match self.initial {
            None => return Err(MalformedAutomaton::MissingInitialState),
            Some(initial) => *ids
                .get(initial.as_str())
                .ok_or(MalformedAutomaton::UnknownInitialState(initial))?,
        };

        let mut finals = BitSet::with_capacity(labels.len());
        for state in self.finals {
            let Some(id) = ids.get(state.as_str()) else {
                return Err(MalformedAutomaton::UnknownFinalState(state));
            };
            finals.insert(id.index());
        }

        let mut transitions = vec![TransitionMap::default(); labels.len()];
        for (from, on, to) in self.transitions {
            let rule = format!(
                "{from} {} {to}",
                on.as_deref().unwrap_or(EPSILON)
            );
            let unknown_state = |state: &str| MalformedAutomaton::UnknownState {
                state: state.to_string(),
                rule: rule.clone(),
            };
            let source = *ids.get(from.as_str()).ok_or_else(|| unknown_state(&from))?;
            let target = *ids.get(to.as_str()).ok_or_else(|| unknown_state(&to))?;
            let label = match on {
                None => Label::Epsilon,
                Some(symbol) if symbol == EPSILON => Label::Epsilon,
                Some(symbol) => match alphabet.symbol(&symbol) {
                    Some(symbol) => Label::Symbol(symbol),
                    None => return Err(MalformedAutomaton::UnknownSymbol { symbol, rule }),
                },
            };
            trace!("adding transition {rule}");
            transitions[source.index()]
                .entry(label)
                .or_default()
                .insert(target);
        }

        Ok(Automaton::from_parts(
            alphabet,
            labels,
            transitions,
            initial,
            finals,
        ))
    }
}
