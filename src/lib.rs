//! Library for working with finite automata over finite words in Rust.
//!
//! An [`Automaton`] consists of a finite set of states that are connected by transitions. Each transition is labelled either with a symbol from a finite [`Alphabet`] or with epsilon, in which case it can be taken without consuming any input. An automaton may be nondeterministic, meaning that a state can have several outgoing transitions on the same symbol. One state is designated as initial and any subset of the states may be final.
//!
//! The crate implements two operations on automata. The [`processor`] decides whether a word is accepted by exploring all runs of an automaton on it, yielding a [`Verdict`]. A word that contains a symbol outside of the alphabet is reported as [`Verdict::Invalid`] rather than rejected. The [`determinization`] module implements the subset construction, which turns any automaton into an equivalent [`Dfa`] whose states are canonically labelled sets of states of the original automaton.
//!
//! Both operations work through the [`TransitionSystem`] trait, which provides structural access to states, successors and epsilon successors. It is implemented by [`Automaton`] as well as [`Dfa`], so the result of a determinization can again be classified against or determinized.
//!
//! Automata are usually built with an [`AutomatonBuilder`] from textual labels, or read from a textual description with a [`Loader`]. Structural consistency is checked exactly once, when the automaton is built, malformed automata are reported as [`MalformedAutomaton`].
//!
//! ```
//! use finite_automata::prelude::*;
//!
//! let nfa = load("a b\ns p q\nq\ns\ns & p\np a p\np b p\np a q\n").unwrap();
//! assert_eq!(classify_with_epsilon(&nfa, &["b", "a"]), Verdict::Accepted);
//! assert_eq!(classify_with_epsilon(&nfa, &["b", "c"]), Verdict::Invalid);
//!
//! let dfa = determinize(&nfa);
//! assert_eq!(classify(&dfa, &["b", "a"]), Verdict::Accepted);
//! assert_eq!(dfa.state_label(dfa.initial()), Some("{s,p}"));
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use finite_automata::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{Alphabet, Label, Symbol, EPSILON},
        automaton::{Automaton, AutomatonBuilder, Dfa, MalformedAutomaton},
        determinization::{closure, determinize, step, StateSet},
        loader::{describe, load, load_path, LoadError, Loader, MalformedInput},
        math,
        processor::{classify, classify_with_epsilon, EpsilonPolicy, Processor, Verdict},
        transition_system::{StateId, TransitionSystem},
    };

    #[cfg(feature = "random")]
    pub use super::random::{random_automaton, random_word, RandomParams};
}

/// This module contains some type aliases for the collections which are used throughout the crate.
pub mod math;

/// Defines alphabets, the interned symbols they consist of and the labels of transitions.
pub mod alphabet;
pub use alphabet::Alphabet;

/// Defines the [`TransitionSystem`] trait through which automata are accessed structurally.
pub mod transition_system;
pub use transition_system::{StateId, TransitionSystem};

/// Defines nondeterministic automata with epsilon transitions, how to build them and the
/// deterministic automata that result from determinization.
pub mod automaton;
pub use automaton::{Automaton, AutomatonBuilder, Dfa, MalformedAutomaton};

/// Classification of words through exhaustive exploration of runs.
pub mod processor;
pub use processor::{classify, classify_with_epsilon, Verdict};

/// Epsilon closures and the subset construction.
pub mod determinization;
pub use determinization::determinize;

/// Reading automata from and writing them to their textual description.
pub mod loader;
pub use loader::Loader;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;
