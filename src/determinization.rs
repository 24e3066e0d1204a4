use std::collections::VecDeque;

use bit_set::BitSet;
use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    alphabet::Symbol,
    automaton::Dfa,
    math,
    transition_system::{StateId, TransitionSystem},
};

/// A set of states of some automaton. Iteration is in ascending order of the [`StateId`]s,
/// which makes the set usable as a canonical key for the subset construction.
#[derive(Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct StateSet(math::OrderedSet<StateId>);

impl StateSet {
    /// Creates a set containing only `state`.
    pub fn singleton(state: StateId) -> Self {
        Self(math::OrderedSet::from([state]))
    }

    /// Iterates over the contained states in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.0.iter().copied()
    }

    /// The number of states in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty, in the subset construction this is the dead state.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `state` is in the set.
    pub fn contains(&self, state: StateId) -> bool {
        self.0.contains(&state)
    }

    /// Adds `state`, returns true if it was not present before.
    pub fn insert(&mut self, state: StateId) -> bool {
        self.0.insert(state)
    }

    /// Computes the canonical label of the set by joining the labels of its members (taken
    /// from `ts`) in ascending id order, e.g. `{q0,q2}`. The empty set is labelled `{}`.
    ///
    /// Occurrences of `{`, `}`, `,` and `\` in member labels are escaped with a backslash,
    /// so distinct sets over the same automaton always receive distinct labels. A state
    /// labelled `p,q` thus yields `{p\,q}` and not `{p,q}`.
    pub fn label<T: TransitionSystem>(&self, ts: &T) -> String {
        format!(
            "{{{}}}",
            self.iter()
                .map(|q| match ts.state_label(q) {
                    Some(label) => escape(label),
                    None => format!("{q:?}"),
                })
                .join(",")
        )
    }
}

fn escape(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '{' | '}' | ',' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<StateId> for StateSet {
    fn extend<I: IntoIterator<Item = StateId>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl IntoIterator for StateSet {
    type Item = StateId;
    type IntoIter = std::collections::btree_set::IntoIter<StateId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl std::fmt::Debug for StateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "∅")
        } else {
            write!(f, "{{{}}}", self.iter().map(|q| format!("{q:?}")).join(", "))
        }
    }
}

/// Computes the epsilon closure of `set`, i.e. the smallest superset of `set` that is closed
/// under taking epsilon transitions. Without epsilon transitions this is `set` itself.
pub fn closure<T: TransitionSystem>(ts: &T, mut set: StateSet) -> StateSet {
    let mut stack = set.iter().collect_vec();
    while let Some(state) = stack.pop() {
        for successor in ts.epsilon_successors(state) {
            if set.insert(successor) {
                stack.push(successor);
            }
        }
    }
    set
}

/// Collects all states that are reachable from some state in `set` by consuming `symbol`.
/// This is the `move` operation of the subset construction.
pub fn step<T: TransitionSystem>(ts: &T, set: &StateSet, symbol: Symbol) -> StateSet {
    set.iter()
        .flat_map(|state| ts.successors(state, symbol))
        .collect()
}

/// Computes a [`Dfa`] that accepts the same language as `ts` through the subset construction,
/// resolving epsilon transitions by taking closures.
///
/// States of the result are numbered in the order in which their subsets are discovered by
/// a breadth-first exploration from the closure of the initial state, which is state `0`.
/// Symbols are explored in alphabet order. Every subset that is reachable is registered,
/// including the empty set, so the resulting transition function is total.
pub fn determinize<T: TransitionSystem>(ts: &T) -> Dfa {
    let alphabet = ts.alphabet().without_epsilon();

    let initial = closure(ts, StateSet::singleton(ts.initial()));
    let mut ids: math::Map<StateSet, StateId> = math::Map::default();
    let mut subsets = vec![];
    let mut transitions: Vec<Vec<StateId>> = vec![];
    let mut finals = BitSet::new();
    let mut queue = VecDeque::new();

    let mut register = |subset: StateSet,
                        subsets: &mut Vec<StateSet>,
                        transitions: &mut Vec<Vec<StateId>>,
                        queue: &mut VecDeque<StateId>| {
        if let Some(id) = ids.get(&subset) {
            return *id;
        }
        let id = StateId::from_index(subsets.len());
        trace!("discovered subset {} as {id:?}", subset.label(ts));
        ids.insert(subset.clone(), id);
        subsets.push(subset);
        transitions.push(Vec::with_capacity(alphabet.size()));
        queue.push_back(id);
        id
    };

    let initial_id = register(initial, &mut subsets, &mut transitions, &mut queue);

    while let Some(current) = queue.pop_front() {
        let subset = subsets[current.index()].clone();
        if subset.iter().any(|state| ts.is_final(state)) {
            finals.insert(current.index());
        }
        let row = alphabet
            .universe()
            .map(|symbol| {
                let target = closure(ts, step(ts, &subset, symbol));
                register(target, &mut subsets, &mut transitions, &mut queue)
            })
            .collect();
        transitions[current.index()] = row;
    }

    debug!(
        "determinized automaton with {} states into {} subsets",
        ts.size(),
        subsets.len()
    );

    let labels = subsets.iter().map(|subset| subset.label(ts)).collect();
    Dfa::from_parts(alphabet, labels, subsets, transitions, initial_id, finals)
}
