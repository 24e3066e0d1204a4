use std::fmt::Debug;

use itertools::Itertools;

use crate::alphabet::{Alphabet, Label, Symbol, EPSILON};

/// Identifies a state of an automaton. States are stored in an arena, a [`StateId`] is the
/// position of the state in it.
#[derive(Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) u32);

impl StateId {
    /// Creates the id of the state at position `index`.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the position of the state in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Debug for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Iterator over all state ids of a [`TransitionSystem`].
pub type StateIds = std::iter::Map<std::ops::Range<usize>, fn(usize) -> StateId>;

/// The structural view of a finite automaton that both the word processor and the
/// determinization operate on. It is implemented by the possibly nondeterministic
/// [`crate::Automaton`] as well as the deterministic [`crate::Dfa`].
///
/// Every query is total: asking for the successors of a state on a symbol without transition
/// yields an empty iterator.
pub trait TransitionSystem {
    /// Iterator over the targets of the transitions on one label from some state.
    type Successors<'this>: Iterator<Item = StateId>
    where
        Self: 'this;

    /// The alphabet over which the transitions are labelled.
    fn alphabet(&self) -> &Alphabet;

    /// The number of states.
    fn size(&self) -> usize;

    /// The designated initial state.
    fn initial(&self) -> StateId;

    /// Returns true if `state` is a final (accepting) state.
    fn is_final(&self, state: StateId) -> bool;

    /// The unique textual label of `state`, if it exists.
    fn state_label(&self, state: StateId) -> Option<&str>;

    /// The states that are reachable from `state` by consuming exactly `symbol`.
    fn successors(&self, state: StateId, symbol: Symbol) -> Self::Successors<'_>;

    /// The states that are reachable from `state` through a single epsilon transition.
    fn epsilon_successors(&self, state: StateId) -> Self::Successors<'_>;

    /// Dispatches to [`Self::successors`] or [`Self::epsilon_successors`].
    fn successors_on(&self, state: StateId, label: Label) -> Self::Successors<'_> {
        match label {
            Label::Epsilon => self.epsilon_successors(state),
            Label::Symbol(symbol) => self.successors(state, symbol),
        }
    }

    /// Iterates over the ids of all states in ascending order.
    fn state_ids(&self) -> StateIds {
        (0..self.size()).map(StateId::from_index as fn(usize) -> StateId)
    }

    /// Iterates over the ids of all final states in ascending order.
    fn final_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.state_ids().filter(|state| self.is_final(*state))
    }

    /// Returns true if at least one epsilon transition exists.
    fn has_epsilon_transitions(&self) -> bool {
        self.state_ids()
            .any(|state| self.epsilon_successors(state).next().is_some())
    }

    /// Returns a string representation of the transition table. The initial state is marked
    /// with an arrow and final states are highlighted.
    fn transition_table(&self) -> String {
        use owo_colors::OwoColorize;

        let epsilon = self.has_epsilon_transitions();
        let mut labels = self
            .alphabet()
            .universe()
            .map(Label::Symbol)
            .collect::<Vec<_>>();
        if epsilon {
            labels.push(Label::Epsilon);
        }

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(labels.iter().map(|label| match label {
                Label::Epsilon => EPSILON.to_string(),
                Label::Symbol(symbol) => self.alphabet().name(*symbol).unwrap_or("?").to_string(),
            })),
        );
        for state in self.state_ids() {
            let name = self.state_label(state).unwrap_or("?");
            let marker = if state == self.initial() { "→ " } else { "" };
            let mut row = vec![if self.is_final(state) {
                format!("{marker}{}", name.bold())
            } else {
                format!("{marker}{name}")
            }];
            for label in &labels {
                let targets = self
                    .successors_on(state, *label)
                    .map(|target| self.state_label(target).unwrap_or("?"))
                    .join(", ");
                row.push(if targets.is_empty() {
                    "-".to_string()
                } else {
                    format!("{{{targets}}}")
                });
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}
