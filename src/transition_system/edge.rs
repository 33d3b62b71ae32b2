use std::fmt::Debug;

use itertools::Itertools;

use crate::{math::Set, prelude::*};

/// Common view on the outgoing edges of a state, shared by deterministic and pushdown
/// transitions. Source and target are handles into the arena that owns the states.
pub trait Edge: Clone + Debug {
    /// The state the edge leaves.
    fn source(&self) -> StateId;
    /// The consumed input symbol.
    fn symbol(&self) -> &Symbol;
    /// The state the edge leads to.
    fn target(&self) -> StateId;
    /// Label used when rendering the edge.
    fn label(&self) -> String {
        self.symbol().to_string()
    }
}

/// A transition of a deterministic automaton, consisting of a source state, the consumed
/// symbol and a destination.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Transition {
    pub(crate) source: StateId,
    pub(crate) symbol: Symbol,
    pub(crate) target: StateId,
}

impl Transition {
    /// Creates a new transition.
    pub fn new(source: StateId, symbol: Symbol, target: StateId) -> Self {
        Self {
            source,
            symbol,
            target,
        }
    }
}

impl Edge for Transition {
    fn source(&self) -> StateId {
        self.source
    }
    fn symbol(&self) -> &Symbol {
        &self.symbol
    }
    fn target(&self) -> StateId {
        self.target
    }
}

/// A sequence of stack symbols that a pushdown transition pops or pushes. The sequence
/// consisting of the single symbol [`Symbol::lambda`] denotes "no stack effect".
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StackWord(Vec<Symbol>);

impl StackWord {
    /// The stack word without effect.
    pub fn lambda() -> Self {
        Self(vec![Symbol::lambda()])
    }

    /// Splits `text` into individual stack symbols, each of which has to be part of the
    /// given stack alphabet. Absent or blank text yields [`StackWord::lambda`].
    pub fn parse(text: Option<&str>, stack_alphabet: &Alphabet) -> Result<Self, ConstructionError> {
        let symbols = text
            .unwrap_or_default()
            .chars()
            .map(Symbol::from)
            .filter(|symbol| !symbol.is_lambda())
            .collect_vec();
        if symbols.is_empty() {
            return Ok(Self::lambda());
        }

        let unknown = symbols
            .iter()
            .filter(|symbol| !stack_alphabet.contains(symbol))
            .unique()
            .join(", ");
        if !unknown.is_empty() {
            return Err(ConstructionError::UnknownStackSymbol(unknown));
        }
        Ok(Self(symbols))
    }

    /// Returns true if the word has no stack effect.
    pub fn is_lambda(&self) -> bool {
        self.0.iter().all(Symbol::is_lambda)
    }

    /// The symbols in the order in which they were given.
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    /// Order insensitive comparison of the contained symbols.
    pub fn set_equal(&self, other: &StackWord) -> bool {
        self.0.iter().collect::<Set<_>>() == other.0.iter().collect::<Set<_>>()
    }

    /// A word can be popped if it has no effect, or if the topmost symbols of the stack
    /// (the end of the slice) spell it.
    pub fn satisfied_by(&self, stack: &[Symbol]) -> bool {
        self.is_lambda() || stack.ends_with(&self.0)
    }
}

impl Show for StackWord {
    fn show(&self) -> String {
        self.0.iter().join("")
    }
}

/// A transition of a pushdown automaton. Besides the consumed input symbol, which may be
/// [`Symbol::lambda`], it carries the stack symbols to pop (listed bottom to top) and the
/// stack symbols to push (in insertion order).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PdaTransition {
    pub(crate) source: StateId,
    pub(crate) symbol: Symbol,
    pub(crate) to_pop: StackWord,
    pub(crate) to_push: StackWord,
    pub(crate) target: StateId,
}

impl PdaTransition {
    /// The stack symbols that are required on top of the stack and removed.
    pub fn to_pop(&self) -> &StackWord {
        &self.to_pop
    }

    /// The stack symbols that are inserted after popping.
    pub fn to_push(&self) -> &StackWord {
        &self.to_push
    }
}

impl Edge for PdaTransition {
    fn source(&self) -> StateId {
        self.source
    }
    fn symbol(&self) -> &Symbol {
        &self.symbol
    }
    fn target(&self) -> StateId {
        self.target
    }
    fn label(&self) -> String {
        format!(
            "{}, {}/{}",
            self.symbol,
            self.to_pop.show(),
            self.to_push.show()
        )
    }
}
