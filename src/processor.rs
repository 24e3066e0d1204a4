use std::fmt::Display;

use tracing::trace;

use crate::{
    alphabet::{Alphabet, Symbol},
    math,
    transition_system::{StateId, TransitionSystem},
};

/// The outcome of classifying a word with an automaton.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Verdict {
    /// Some run on the word ends in a final state.
    Accepted,
    /// The word only uses symbols of the alphabet, but no run ends in a final state.
    Rejected,
    /// The word contains a symbol that is not part of the alphabet.
    Invalid,
}

impl Verdict {
    /// Returns true for [`Verdict::Accepted`].
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Verdict::Accepted => "ACCEPTED",
                Verdict::Rejected => "REJECTED",
                Verdict::Invalid => "INVALID",
            }
        )
    }
}

/// Determines how a [`Processor`] treats epsilon transitions.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub enum EpsilonPolicy {
    /// Epsilon transitions are never taken, every step of a run consumes one symbol.
    #[default]
    Ignore,
    /// Epsilon transitions may be taken at any point of a run without consuming input.
    Follow,
}

/// Decides whether words are accepted by an automaton by exploring all of its runs.
///
/// Runs are explored depth first on an explicit stack and the search stops as soon as an
/// accepting run is found. Each search node is a state together with the number of symbols
/// consumed so far. A node that was already explored is skipped, which does not change the
/// verdict but keeps the search polynomial and makes it terminate on epsilon cycles.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Processor {
    epsilon: EpsilonPolicy,
}

impl Processor {
    /// Creates a processor that ignores epsilon transitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the [`EpsilonPolicy`].
    pub fn with_epsilon_policy(mut self, policy: EpsilonPolicy) -> Self {
        self.epsilon = policy;
        self
    }

    /// The configured [`EpsilonPolicy`].
    pub fn epsilon_policy(&self) -> EpsilonPolicy {
        self.epsilon
    }

    /// Classifies `word` with `ts`.
    ///
    /// Symbols are looked up in the alphabet at the point where a run first consumes them,
    /// encountering an unknown symbol immediately ends the search with [`Verdict::Invalid`].
    /// If all runs die before that point, the rest of the word is still checked, so any word
    /// containing a symbol outside of the alphabet is [`Verdict::Invalid`].
    pub fn classify<T, S>(&self, ts: &T, word: &[S]) -> Verdict
    where
        T: TransitionSystem,
        S: AsRef<str>,
    {
        let mut symbols = Symbols::new(ts.alphabet(), word);
        let mut seen: math::Set<(StateId, usize)> = math::Set::default();
        let mut stack = vec![(ts.initial(), 0usize)];

        while let Some((state, position)) = stack.pop() {
            if !seen.insert((state, position)) {
                continue;
            }
            trace!("exploring {state:?} after {position} symbols");

            if position == word.len() {
                if ts.is_final(state) {
                    return Verdict::Accepted;
                }
            } else {
                let Some(symbol) = symbols.resolve(position) else {
                    trace!("symbol at position {position} is not in the alphabet");
                    return Verdict::Invalid;
                };
                let successors: Vec<_> = ts.successors(state, symbol).collect();
                stack.extend(successors.into_iter().rev().map(|q| (q, position + 1)));
            }

            if self.epsilon == EpsilonPolicy::Follow {
                stack.extend(ts.epsilon_successors(state).map(|q| (q, position)));
            }
        }

        if symbols.all_known() {
            Verdict::Rejected
        } else {
            Verdict::Invalid
        }
    }
}

/// Lazily resolves the symbols of a word against an alphabet, front to back.
struct Symbols<'a, S> {
    alphabet: &'a Alphabet,
    word: &'a [S],
    resolved: Vec<Symbol>,
}

impl<'a, S: AsRef<str>> Symbols<'a, S> {
    fn new(alphabet: &'a Alphabet, word: &'a [S]) -> Self {
        Self {
            alphabet,
            word,
            resolved: Vec::with_capacity(word.len()),
        }
    }

    /// Resolves all symbols up to and including `position`, returns `None` if one of them is
    /// not part of the alphabet.
    fn resolve(&mut self, position: usize) -> Option<Symbol> {
        while self.resolved.len() <= position {
            let symbol = self.word.get(self.resolved.len())?;
            self.resolved.push(self.alphabet.symbol(symbol.as_ref())?);
        }
        self.resolved.get(position).copied()
    }

    fn all_known(&mut self) -> bool {
        self.word.is_empty() || self.resolve(self.word.len() - 1).is_some()
    }
}

/// Classifies `word` with `ts`, without taking epsilon transitions.
pub fn classify<T: TransitionSystem, S: AsRef<str>>(ts: &T, word: &[S]) -> Verdict {
    Processor::new().classify(ts, word)
}

/// Classifies `word` with `ts`, where epsilon transitions may be taken at any point.
pub fn classify_with_epsilon<T: TransitionSystem, S: AsRef<str>>(ts: &T, word: &[S]) -> Verdict {
    Processor::new()
        .with_epsilon_policy(EpsilonPolicy::Follow)
        .classify(ts, word)
}
