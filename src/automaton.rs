use bit_set::BitSet;
use thiserror::Error;

use crate::{
    alphabet::{Alphabet, Label, Symbol},
    math,
    transition_system::{StateId, TransitionSystem},
};

mod builder;
pub use builder::AutomatonBuilder;

mod dfa;
pub use dfa::Dfa;

/// Structural violations that prevent an [`Automaton`] from being constructed.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum MalformedAutomaton {
    /// No state was declared.
    #[error("automaton must have at least one state")]
    NoStates,
    /// No initial state was given.
    #[error("automaton has no initial state")]
    MissingInitialState,
    /// The initial state is not among the declared states.
    #[error("initial state `{0}` is not declared")]
    UnknownInitialState(String),
    /// A final state is not among the declared states.
    #[error("final state `{0}` is not declared")]
    UnknownFinalState(String),
    /// A transition starts or ends in a state that is not declared.
    #[error("transition `{rule}` refers to undeclared state `{state}`")]
    UnknownState {
        /// The undeclared state.
        state: String,
        /// The offending transition.
        rule: String,
    },
    /// A transition is labelled with a symbol outside of the alphabet.
    #[error("transition `{rule}` uses symbol `{symbol}` which is not in the alphabet")]
    UnknownSymbol {
        /// The undeclared symbol.
        symbol: String,
        /// The offending transition.
        rule: String,
    },
}

/// Outgoing transitions of a single state, grouped by label.
pub(crate) type TransitionMap = math::OrderedMap<Label, math::OrderedSet<StateId>>;

/// A finite automaton that may be nondeterministic and may have epsilon transitions.
///
/// States live in an arena and are addressed through [`StateId`]s, each state also carries a
/// unique textual label. The transition relation maps a state and a [`Label`] to a set of
/// target states, a missing entry means that there is no such transition.
///
/// Values of this type are always well-formed, which is checked once when they are built
/// through an [`AutomatonBuilder`]. Afterwards an automaton is never mutated.
#[derive(Clone)]
pub struct Automaton {
    alphabet: Alphabet,
    states: math::Bijection<String, StateId>,
    transitions: Vec<TransitionMap>,
    initial: StateId,
    finals: BitSet,
}

impl Automaton {
    /// Returns a new [`AutomatonBuilder`].
    pub fn builder() -> AutomatonBuilder {
        AutomatonBuilder::default()
    }

    /// Assembles an automaton from parts that are known to be consistent.
    pub(crate) fn from_parts(
        alphabet: Alphabet,
        labels: Vec<String>,
        transitions: Vec<TransitionMap>,
        initial: StateId,
        finals: BitSet,
    ) -> Self {
        debug_assert_eq!(labels.len(), transitions.len());
        let states = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| (label, StateId::from_index(i)))
            .collect();
        Self {
            alphabet,
            states,
            transitions,
            initial,
            finals,
        }
    }

    /// Looks up the state with the given label.
    pub fn state_id(&self, label: &str) -> Option<StateId> {
        self.states.get_by_left(label).copied()
    }

    /// Returns true if no state has an epsilon transition and every state has at most one
    /// successor on each symbol.
    pub fn is_deterministic(&self) -> bool {
        self.transitions.iter().all(|map| {
            map.iter().all(|(label, targets)| match label {
                Label::Epsilon => targets.is_empty(),
                Label::Symbol(_) => targets.len() <= 1,
            })
        })
    }

    fn targets(&self, state: StateId, label: Label) -> Option<&math::OrderedSet<StateId>> {
        self.transitions.get(state.index())?.get(&label)
    }
}

impl TransitionSystem for Automaton {
    type Successors<'this> = std::iter::Copied<
        std::iter::Flatten<std::option::IntoIter<&'this math::OrderedSet<StateId>>>,
    >
    where
        Self: 'this;

    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn size(&self) -> usize {
        self.transitions.len()
    }

    fn initial(&self) -> StateId {
        self.initial
    }

    fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(state.index())
    }

    fn state_label(&self, state: StateId) -> Option<&str> {
        self.states.get_by_right(&state).map(String::as_str)
    }

    fn successors(&self, state: StateId, symbol: Symbol) -> Self::Successors<'_> {
        self.targets(state, Label::Symbol(symbol))
            .into_iter()
            .flatten()
            .copied()
    }

    fn epsilon_successors(&self, state: StateId) -> Self::Successors<'_> {
        self.targets(state, Label::Epsilon)
            .into_iter()
            .flatten()
            .copied()
    }
}

impl std::fmt::Debug for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Automaton\n{}", self.transition_table())
    }
}
