use std::fmt::Debug;

use itertools::Itertools;

use crate::math;

/// The textual marker that denotes an epsilon transition in automaton descriptions.
pub const EPSILON: &str = "&";

/// A symbol of an [`Alphabet`]. Symbols are interned, a [`Symbol`] is simply the position
/// at which the corresponding textual symbol was declared in its alphabet.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Symbol(pub(crate) u32);

impl Symbol {
    /// Creates the symbol at the given position.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Returns the position of `self` in its alphabet.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Labels the transitions of an automaton. A transition either consumes a [`Symbol`] or
/// it is an epsilon transition, which can be taken without reading any input.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Label {
    /// Taken without consuming input.
    Epsilon,
    /// Consumes exactly the given symbol.
    Symbol(Symbol),
}

impl From<Symbol> for Label {
    fn from(value: Symbol) -> Self {
        Label::Symbol(value)
    }
}

/// A finite alphabet of textual symbols.
///
/// The alphabet keeps the order in which symbols were declared, duplicates are dropped. Each
/// symbol is interned into a [`Symbol`], which is what transitions are labelled with. Whether
/// the alphabet was declared with the epsilon marker is remembered, but epsilon is never a
/// [`Symbol`] and thus never part of the [`Alphabet::universe`].
#[derive(Clone, Eq, PartialEq)]
pub struct Alphabet {
    symbols: math::Bijection<String, Symbol>,
    epsilon: bool,
}

impl Alphabet {
    /// Creates a new alphabet from the given symbols. Later duplicates of a symbol are ignored.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = math::Bijection::new();
        for symbol in symbols.into_iter().map(Into::into).unique() {
            let id = Symbol::from_index(out.len());
            out.insert(symbol, id);
        }
        Self {
            symbols: out,
            epsilon: false,
        }
    }

    /// Creates an alphabet consisting of the first `size` letters, i.e. 'a' to 'z'.
    ///
    /// # Panics
    /// If `size` exceeds 26.
    pub fn of_size(size: usize) -> Self {
        assert!(size <= 26, "Alphabet is too large");
        Self::new((0..size).map(|i| ((b'a' + i as u8) as char).to_string()))
    }

    /// Marks whether the epsilon marker was declared as part of this alphabet.
    pub fn with_epsilon(mut self, epsilon: bool) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Returns true if the epsilon marker was declared as part of the alphabet.
    pub fn declares_epsilon(&self) -> bool {
        self.epsilon
    }

    /// Returns a copy of `self` that does not declare the epsilon marker.
    pub fn without_epsilon(&self) -> Self {
        self.clone().with_epsilon(false)
    }

    /// The number of (non-epsilon) symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Looks up the [`Symbol`] that `symbol` was interned as, if it belongs to the alphabet.
    pub fn symbol(&self, symbol: &str) -> Option<Symbol> {
        self.symbols.get_by_left(symbol).copied()
    }

    /// Returns true if `symbol` belongs to the alphabet.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains_left(symbol)
    }

    /// Returns the textual form of the given symbol.
    pub fn name(&self, symbol: Symbol) -> Option<&str> {
        self.symbols.get_by_right(&symbol).map(String::as_str)
    }

    /// Iterates over all symbols in declaration order.
    pub fn universe(&self) -> impl Iterator<Item = Symbol> + '_ {
        (0..self.size()).map(Symbol::from_index)
    }

    /// Iterates over the textual symbols in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.universe().filter_map(|symbol| self.name(symbol))
    }
}

impl Debug for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.names().join(", "))?;
        if self.epsilon {
            write!(f, "+{EPSILON}")?;
        }
        Ok(())
    }
}
