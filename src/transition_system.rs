use std::collections::{BTreeSet, VecDeque};

use thiserror::Error;
use tracing::trace;

use crate::{math::Map, prelude::*};

mod id;
pub use id::{DefaultIdType, StateId};

mod edge;
pub use edge::{Edge, PdaTransition, StackWord, Transition};

/// Contains a builder for assembling deterministic automata from textual names.
pub mod builder;

/// Renders automata in the graphviz DOT format.
pub mod dot;

/// Problems detected while assembling states and transitions. All of them indicate a
/// malformed automaton.
#[allow(missing_docs)]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("symbol `{0}` is declared more than once")]
    DuplicateSymbol(String),
    #[error("symbol `{0}` is not part of the alphabet")]
    UnknownSymbol(String),
    #[error("stack symbols not present in the stack alphabet: {0}")]
    UnknownStackSymbol(String),
    #[error("state {0} is declared more than once")]
    DuplicateState(String),
    #[error("state {0} was not declared")]
    UnknownState(String),
    #[error("state {state} already has a transition on symbol `{symbol}`")]
    DuplicateTransition { state: String, symbol: String },
    #[error("state {state} cannot have a transition consuming {}", crate::alphabet::LAMBDA)]
    IllegalLambda { state: String },
    #[error("state {state} already has a transition on `{symbol}` with ambiguous pop sequence: existing `{existing}`, inserted `{inserted}`")]
    AmbiguousTransition {
        state: String,
        symbol: String,
        existing: String,
        inserted: String,
    },
    #[error("symbol `{0}` of a deterministic automaton has to be a single character")]
    MultiCharacterSymbol(String),
    #[error("state {state} lists {found} destinations but the alphabet has {expected} symbols")]
    RowLength {
        state: String,
        expected: usize,
        found: usize,
    },
}

/// A named state that owns its outgoing edges. Equality and hashing only consider the name.
#[derive(Clone, Debug)]
pub struct State<E> {
    name: String,
    edges: Vec<E>,
}

impl<E> State<E> {
    /// Creates an isolated state without any edges.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            edges: vec![],
        }
    }

    /// The unique name of the state.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The outgoing edges in the order in which they were added.
    pub fn edges(&self) -> &[E] {
        &self.edges
    }
}

impl<E> PartialEq for State<E> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
impl<E> Eq for State<E> {}

impl<E> std::hash::Hash for State<E> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

/// Arena of [`State`]s over a fixed [`Alphabet`]. States are addressed through [`StateId`]s,
/// edges refer to their endpoints through these handles as well. The stack alphabet is only
/// consulted by pushdown transitions.
#[derive(Clone, Debug)]
pub struct TransitionSystem<E> {
    alphabet: Alphabet,
    stack_alphabet: Alphabet,
    states: Vec<State<E>>,
    names: Map<String, StateId>,
}

/// Deterministic transition system, at most one transition per state and symbol.
pub type DTS = TransitionSystem<Transition>;
/// Transition system of a pushdown automaton.
pub type PTS = TransitionSystem<PdaTransition>;

impl<E: Edge> TransitionSystem<E> {
    /// Creates an empty transition system over the given alphabet.
    pub fn for_alphabet(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            stack_alphabet: Alphabet::default(),
            states: vec![],
            names: Map::default(),
        }
    }

    /// Returns the input alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Adds an isolated state with the given name and returns its handle.
    pub fn add_state<S: Into<String>>(&mut self, name: S) -> Result<StateId, ConstructionError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(ConstructionError::DuplicateState(name));
        }
        let id = StateId::from_usize(self.states.len());
        self.names.insert(name.clone(), id);
        self.states.push(State::new(name));
        Ok(id)
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Iterates over the handles of all states in insertion order.
    pub fn state_indices(&self) -> impl Iterator<Item = StateId> + '_ {
        (0..self.states.len()).map(StateId::from_usize)
    }

    /// Gives access to the state behind `id`.
    pub fn state(&self, id: StateId) -> Option<&State<E>> {
        self.states.get(id.index())
    }

    /// Looks up a state by its name.
    pub fn find_by_name(&self, name: &str) -> Option<StateId> {
        self.names.get(name).copied()
    }

    /// Name of the state behind `id`, falls back to the handle for foreign handles.
    pub fn name(&self, id: StateId) -> String {
        self.state(id)
            .map(|state| state.name.clone())
            .unwrap_or_else(|| id.show())
    }

    /// Returns the outgoing edges of `id`, or `None` if the state does not exist.
    pub fn edges_from(&self, id: StateId) -> Option<&[E]> {
        self.state(id).map(|state| state.edges())
    }

    /// Resolves the given text to a symbol of the input alphabet.
    pub fn symbol(&self, text: &str) -> Result<Symbol, ConstructionError> {
        self.alphabet
            .get_by_text(text)
            .cloned()
            .ok_or_else(|| ConstructionError::UnknownSymbol(Symbol::new(text).to_string()))
    }

    /// Computes the states that can be reached from `origin`.
    pub fn reachable_from(&self, origin: StateId) -> BTreeSet<StateId> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([origin]);
        while let Some(q) = queue.pop_front() {
            if !seen.insert(q) {
                continue;
            }
            for edge in self.edges_from(q).unwrap_or_default() {
                if !seen.contains(&edge.target()) {
                    queue.push_back(edge.target());
                }
            }
        }
        seen
    }

    fn check_state(&self, id: StateId) -> Result<(), ConstructionError> {
        match self.state(id) {
            Some(_) => Ok(()),
            None => Err(ConstructionError::UnknownState(id.show())),
        }
    }
}

impl DTS {
    /// Adds a transition from `source` on `symbol` to `target`. A state may have at most
    /// one transition per symbol and transitions may not consume [`Symbol::lambda`].
    pub fn add_transition(
        &mut self,
        source: StateId,
        symbol: Symbol,
        target: StateId,
    ) -> Result<(), ConstructionError> {
        self.check_state(source)?;
        self.check_state(target)?;
        if symbol.is_lambda() {
            return Err(ConstructionError::IllegalLambda {
                state: self.name(source),
            });
        }
        if !self.alphabet.contains(&symbol) {
            return Err(ConstructionError::UnknownSymbol(symbol.to_string()));
        }
        if self.transition(source, &symbol).is_some() {
            return Err(ConstructionError::DuplicateTransition {
                state: self.name(source),
                symbol: symbol.to_string(),
            });
        }

        trace!("adding transition {source:?} --{symbol}--> {target:?}");
        self.states[source.index()]
            .edges
            .push(Transition::new(source, symbol, target));
        Ok(())
    }

    /// Returns the destination of the transition leaving `source` on `symbol`.
    pub fn transition(&self, source: StateId, symbol: &Symbol) -> Option<StateId> {
        self.edges_from(source)?
            .iter()
            .find(|edge| edge.symbol() == symbol)
            .map(Edge::target)
    }
}

impl PTS {
    /// Creates an empty pushdown transition system with the given input and stack alphabets.
    pub fn for_alphabets(alphabet: Alphabet, stack_alphabet: Alphabet) -> Self {
        Self {
            stack_alphabet,
            ..Self::for_alphabet(alphabet)
        }
    }

    /// Returns the stack alphabet.
    pub fn stack_alphabet(&self) -> &Alphabet {
        &self.stack_alphabet
    }

    /// Adds a pushdown transition. Absent or blank `to_pop`/`to_push` mean "no stack effect",
    /// any other text is split into single-character stack symbols. Two transitions of the
    /// same state on the same symbol must have pop sequences that can be told apart by
    /// looking at the stack: neither may be empty and they may not contain the same symbols.
    pub fn add_pda_transition(
        &mut self,
        source: StateId,
        symbol: Symbol,
        to_pop: Option<&str>,
        to_push: Option<&str>,
        target: StateId,
    ) -> Result<(), ConstructionError> {
        self.check_state(source)?;
        self.check_state(target)?;
        if !symbol.is_lambda() && !self.alphabet.contains(&symbol) {
            return Err(ConstructionError::UnknownSymbol(symbol.to_string()));
        }
        let to_pop = StackWord::parse(to_pop, &self.stack_alphabet)?;
        let to_push = StackWord::parse(to_push, &self.stack_alphabet)?;

        let conflict = self.states[source.index()].edges.iter().find(|edge| {
            edge.symbol == symbol
                && (edge.to_pop.is_lambda() || to_pop.is_lambda() || edge.to_pop.set_equal(&to_pop))
        });
        if let Some(existing) = conflict {
            return Err(ConstructionError::AmbiguousTransition {
                state: self.name(source),
                symbol: symbol.to_string(),
                existing: existing.to_pop.show(),
                inserted: to_pop.show(),
            });
        }

        self.states[source.index()].edges.push(PdaTransition {
            source,
            symbol,
            to_pop,
            to_push,
            target,
        });
        Ok(())
    }
}
