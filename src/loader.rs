use std::{io::BufRead, path::Path};

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    alphabet::{Label, EPSILON},
    automaton::{Automaton, MalformedAutomaton},
    math,
    transition_system::{StateId, TransitionSystem},
};

/// The number of lines that precede the transition rules in a description.
const HEADER_LINES: usize = 4;

/// Abstracts the types of errors that can occur when parsing an [`Automaton`] from its textual
/// description. Line numbers start at 1.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum MalformedInput {
    /// Fewer than four lines were given.
    #[error(
        "description has {0} lines, expected alphabet, states, final states and initial state"
    )]
    MissingHeader(usize),
    /// The initial state line does not consist of exactly one state.
    #[error("line {line}: expected exactly one initial state, found `{found}`")]
    InitialState {
        /// Line of the initial state.
        line: usize,
        /// Content of the line.
        found: String,
    },
    /// A transition rule does not have the form `origin symbol destination`.
    #[error("line {line}: rule `{rule}` is not of the form `origin symbol destination`")]
    MalformedRule {
        /// Line of the rule.
        line: usize,
        /// Content of the line.
        rule: String,
    },
    /// A transition rule uses a symbol that was not declared.
    #[error("line {line}: symbol `{symbol}` is not part of the alphabet")]
    UnknownSymbol {
        /// Line of the rule.
        line: usize,
        /// The undeclared symbol.
        symbol: String,
    },
    /// A transition rule or the final states refer to a state that was not declared.
    #[error("line {line}: state `{state}` is not declared")]
    UnknownState {
        /// Line of the offending reference.
        line: usize,
        /// The undeclared state.
        state: String,
    },
    /// The description is syntactically fine, but does not describe a valid automaton.
    #[error(transparent)]
    Automaton(#[from] MalformedAutomaton),
}

/// Errors that can occur when loading an [`Automaton`] from a reader or a file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading the description failed.
    #[error("could not read automaton description: {0}")]
    Io(#[from] std::io::Error),
    /// The description is malformed.
    #[error(transparent)]
    Input(#[from] MalformedInput),
}

/// Reads automata from their textual description, which consists of
///
/// ```text
/// <alphabet symbols>
/// <states>
/// <final states>
/// <initial state>
/// <origin symbol destination>
/// ...
/// ```
///
/// where items on a line are separated by whitespace. The final state line may be empty and
/// blank lines between the rules are skipped. Rules using the epsilon marker (by default `&`)
/// as their symbol are epsilon transitions.
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let aut = Loader::default()
///     .parse_str("a b\nq0 q1\nq1\nq0\nq0 a q1\nq1 b q0\n")
///     .unwrap();
/// assert_eq!(classify(&aut, &["a", "b", "a"]), Verdict::Accepted);
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Loader {
    epsilon: String,
}

impl Default for Loader {
    fn default() -> Self {
        Self {
            epsilon: EPSILON.to_string(),
        }
    }
}

impl Loader {
    /// Creates a loader that uses the default epsilon marker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the marker that denotes epsilon transitions.
    pub fn with_epsilon<S: Into<String>>(mut self, marker: S) -> Self {
        self.epsilon = marker.into();
        self
    }

    /// The marker that denotes epsilon transitions.
    pub fn epsilon(&self) -> &str {
        &self.epsilon
    }

    /// Parses an automaton from the given lines.
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<Automaton, MalformedInput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = lines.into_iter().collect_vec();
        if lines.len() < HEADER_LINES {
            return Err(MalformedInput::MissingHeader(lines.len()));
        }
        let tokens = |i: usize| lines[i].as_ref().split_whitespace().collect_vec();

        let (epsilon, symbols): (Vec<_>, Vec<_>) = tokens(0)
            .into_iter()
            .partition(|symbol| *symbol == self.epsilon || *symbol == EPSILON);
        let states = tokens(1);
        let finals = tokens(2);
        let initial = match tokens(3).as_slice() {
            [initial] => initial.to_string(),
            _ => {
                return Err(MalformedInput::InitialState {
                    line: 4,
                    found: lines[3].as_ref().trim().to_string(),
                })
            }
        };
        trace!(
            "read {} symbols, {} states and {} final states",
            symbols.len(),
            states.len(),
            finals.len()
        );

        let declared_symbols: math::Set<&str> = symbols.iter().copied().collect();
        let declared_states: math::Set<&str> = states.iter().copied().collect();
        if let Some(state) = finals.iter().find(|q| !declared_states.contains(*q)) {
            return Err(MalformedInput::UnknownState {
                line: 3,
                state: state.to_string(),
            });
        }

        let mut builder = Automaton::builder()
            .with_alphabet(symbols.iter().copied())
            .declaring_epsilon(!epsilon.is_empty())
            .with_states(states.iter().copied())
            .with_final_states(finals.iter().copied())
            .with_initial(initial);

        for (i, line) in lines.iter().enumerate().skip(HEADER_LINES) {
            let line_number = i + 1;
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            let parts = line.split_whitespace().collect_vec();
            let &[from, on, to] = parts.as_slice() else {
                return Err(MalformedInput::MalformedRule {
                    line: line_number,
                    rule: line.to_string(),
                });
            };
            for state in [from, to] {
                if !declared_states.contains(state) {
                    return Err(MalformedInput::UnknownState {
                        line: line_number,
                        state: state.to_string(),
                    });
                }
            }
            let on = if on == self.epsilon {
                None
            } else if declared_symbols.contains(on) {
                Some(on.to_string())
            } else {
                return Err(MalformedInput::UnknownSymbol {
                    line: line_number,
                    symbol: on.to_string(),
                });
            };
            builder.add_transition(from, on, to);
        }

        let automaton = builder.build()?;
        debug!("loaded automaton with {} states", automaton.size());
        Ok(automaton)
    }

    /// Parses an automaton from a string.
    pub fn parse_str(&self, input: &str) -> Result<Automaton, MalformedInput> {
        self.parse_lines(input.lines())
    }

    /// Reads and parses an automaton from the given reader.
    pub fn from_reader<R: BufRead>(&self, read: R) -> Result<Automaton, LoadError> {
        let lines = read.lines().collect::<Result<Vec<_>, _>>()?;
        Ok(self.parse_lines(lines)?)
    }

    /// Reads and parses an automaton from the file at `path`.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Automaton, LoadError> {
        debug!("reading automaton from {}", path.as_ref().display());
        let file = std::fs::File::open(path)?;
        self.from_reader(std::io::BufReader::new(file))
    }

    /// Renders `ts` as a description that this loader can read back. States and symbols
    /// appear in id order, rules are ordered by origin, then symbol, then destination and
    /// epsilon rules come last for each origin.
    pub fn describe<T: TransitionSystem>(&self, ts: &T) -> String {
        let alphabet = ts.alphabet();
        let state = |q: StateId| ts.state_label(q).unwrap_or_default();

        let mut symbols = alphabet.names().collect_vec();
        if alphabet.declares_epsilon() {
            symbols.push(&self.epsilon);
        }
        let mut lines = vec![
            symbols.join(" "),
            ts.state_ids().map(state).join(" "),
            ts.final_states().map(state).join(" "),
            state(ts.initial()).to_string(),
        ];

        let labels = alphabet
            .universe()
            .map(Label::Symbol)
            .chain(std::iter::once(Label::Epsilon))
            .collect_vec();
        for q in ts.state_ids() {
            for label in &labels {
                let on = match label {
                    Label::Epsilon => self.epsilon.as_str(),
                    Label::Symbol(symbol) => alphabet.name(*symbol).unwrap_or_default(),
                };
                for target in ts.successors_on(q, *label) {
                    lines.push(format!("{} {on} {}", state(q), state(target)));
                }
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Parses an automaton from a string using the default [`Loader`].
pub fn load(input: &str) -> Result<Automaton, MalformedInput> {
    Loader::default().parse_str(input)
}

/// Reads an automaton from the file at `path` using the default [`Loader`].
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Automaton, LoadError> {
    Loader::default().from_path(path)
}

/// Renders `ts` as a description using the default [`Loader`].
pub fn describe<T: TransitionSystem>(ts: &T) -> String {
    Loader::default().describe(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    const CYCLE: &str = "a b
q0 q1 q2 q3
q0 q3
q0
q0 a q1
q0 b q2
q1 a q0
q1 b q3
q2 a q3
q2 b q0
q3 a q1
q3 b q2
";

    #[test_log::test]
    fn loads_canonical_example() {
        let aut = load(CYCLE).unwrap();
        assert_eq!(aut.size(), 4);
        assert_eq!(aut.alphabet().size(), 2);
        assert_eq!(aut.state_label(aut.initial()), Some("q0"));
        assert_eq!(aut.final_states().count(), 2);
        assert!(aut.is_deterministic());
        assert_eq!(classify(&aut, &["a", "a", "b"]), Verdict::Rejected);
        assert_eq!(classify(&aut, &["a", "b"]), Verdict::Accepted);
    }

    #[test_log::test]
    fn loads_epsilon_rules() {
        let aut = load("a &\nq0 q1\nq1\nq0\nq0 & q1\n\nq1 a q1\n").unwrap();
        assert!(aut.alphabet().declares_epsilon());
        assert_eq!(aut.alphabet().size(), 1);
        assert!(aut.has_epsilon_transitions());
        assert_eq!(classify_with_epsilon(&aut, &["a"]), Verdict::Accepted);

        // epsilon rules are allowed without declaring the marker
        let aut = load("a\nq0 q1\nq1\nq0\nq0 & q1\n").unwrap();
        assert!(!aut.alphabet().declares_epsilon());
        assert!(aut.has_epsilon_transitions());

        let aut = Loader::new()
            .with_epsilon("eps")
            .parse_str("a\nq0 q1\nq1\nq0\nq0 eps q1\n")
            .unwrap();
        assert!(aut.has_epsilon_transitions());
        assert!(load("a\nq0 q1\nq1\nq0\nq0 eps q1\n").is_err());

        // `&` is never interned as a symbol, also not with another marker
        let aut = Loader::new()
            .with_epsilon("eps")
            .parse_str("a &\nq0 q1\nq1\nq0\nq0 eps q1\n")
            .unwrap();
        assert!(aut.alphabet().declares_epsilon());
        assert!(!aut.alphabet().contains(EPSILON));
        assert_eq!(
            Loader::new()
                .with_epsilon("eps")
                .parse_str("a &\nq0 q1\nq1\nq0\nq0 & q1\n")
                .unwrap_err(),
            MalformedInput::UnknownSymbol {
                line: 5,
                symbol: "&".into()
            }
        );
    }

    #[test_log::test]
    fn empty_final_line() {
        let aut = load("a\nq0\n\nq0\nq0 a q0").unwrap();
        assert_eq!(aut.final_states().count(), 0);
        assert_eq!(classify(&aut, &["a"]), Verdict::Rejected);
    }

    #[test_log::test]
    fn rejects_incomplete_header() {
        assert_eq!(
            load("a b\nq0 q1\nq1").unwrap_err(),
            MalformedInput::MissingHeader(3)
        );
        assert_eq!(load("").unwrap_err(), MalformedInput::MissingHeader(0));
    }

    #[test_log::test]
    fn rejects_bad_initial_state() {
        assert_eq!(
            load("a\nq0 q1\n\nq0 q1\n").unwrap_err(),
            MalformedInput::InitialState {
                line: 4,
                found: "q0 q1".into()
            }
        );
        assert_eq!(
            load("a\nq0\n\nq1\n").unwrap_err(),
            MalformedInput::Automaton(MalformedAutomaton::UnknownInitialState("q1".into()))
        );
        assert_eq!(
            load("a\n\n\nq1\n").unwrap_err(),
            MalformedInput::Automaton(MalformedAutomaton::NoStates)
        );
    }

    #[test_log::test]
    fn rejects_bad_rules() {
        assert_eq!(
            load("a\nq0\n\nq0\nq0 a\n").unwrap_err(),
            MalformedInput::MalformedRule {
                line: 5,
                rule: "q0 a".into()
            }
        );
        assert_eq!(
            load("a\nq0\n\nq0\n\nq0 a q0 q0\n").unwrap_err(),
            MalformedInput::MalformedRule {
                line: 6,
                rule: "q0 a q0 q0".into()
            }
        );
        assert_eq!(
            load("a\nq0\n\nq0\nq0 b q0\n").unwrap_err(),
            MalformedInput::UnknownSymbol {
                line: 5,
                symbol: "b".into()
            }
        );
        assert_eq!(
            load("a\nq0\n\nq0\nq0 a q1\n").unwrap_err(),
            MalformedInput::UnknownState {
                line: 5,
                state: "q1".into()
            }
        );
        assert_eq!(
            load("a\nq0\nq2\nq0\n").unwrap_err(),
            MalformedInput::UnknownState {
                line: 3,
                state: "q2".into()
            }
        );
    }

    #[test_log::test]
    fn reads_from_reader_and_path() {
        let aut = Loader::default()
            .from_reader(std::io::Cursor::new(CYCLE))
            .unwrap();
        assert_eq!(aut.size(), 4);

        let err = load_path("this/path/does/not/exist.txt").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));

        let err = Loader::default()
            .from_reader(std::io::Cursor::new("a\n"))
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Input(MalformedInput::MissingHeader(1))
        ));
    }

    #[test_log::test]
    fn describe_round_trip() {
        let aut = load(CYCLE).unwrap();
        assert_eq!(describe(&aut), CYCLE);

        let nfa = load("a b &\ns p q\nq\ns\ns & p\np a p\np a q\np b p\n").unwrap();
        assert_eq!(
            describe(&nfa),
            "a b &\ns p q\nq\ns\ns & p\np a p\np a q\np b p\n"
        );
    }

    #[test_log::test]
    fn describes_determinized_automata() {
        let nfa = load("a b\ns p q\nq\ns\ns & p\np a p\np a q\np b p\n").unwrap();
        let dfa = determinize(&nfa);
        let text = describe(&dfa);
        assert_eq!(
            text.lines().take(4).collect::<Vec<_>>(),
            vec!["a b", "{s,p} {p,q} {p}", "{p,q}", "{s,p}"]
        );

        let reloaded = load(&text).unwrap();
        assert!(reloaded.is_deterministic());
        for w in [&["a"][..], &["a", "b"], &["b", "a"], &["a", "a"], &[]] {
            assert_eq!(classify(&reloaded, w), classify(&dfa, w));
        }
    }
}
