use std::collections::BTreeSet;

use thiserror::Error;

use crate::prelude::*;

mod dfa;
pub use dfa::DFA;

mod pda;
pub use pda::{RunConfig, PDA};

/// Reasons for which an automaton does not accept a word. A rejection is an expected
/// outcome of [`Run::run`] and carries the state, remaining input and (for pushdown
/// automata) the stack at the moment execution stopped.
#[allow(missing_docs)]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("no transition for symbol `{symbol}` in state {state}, remaining input \"{remaining}\"")]
    NoTransition {
        state: String,
        symbol: char,
        remaining: String,
    },
    #[error("rejected: input exhausted in state {state}, which is not final")]
    NotFinal { state: String },
    #[error("no applicable transition in state {state} for remaining input \"{remaining}\" with stack {stack}")]
    NoApplicableTransition {
        state: String,
        remaining: String,
        stack: String,
    },
    #[error("could not pop `{expected}` in state {state}, stack was {stack}")]
    StackMismatch {
        state: String,
        expected: String,
        stack: String,
    },
    #[error("state {state} was entered through a loop of more than {limit} {} moves", crate::alphabet::LAMBDA)]
    LambdaLoop { state: String, limit: usize },
}

/// The execution contract shared by all automata.
pub trait Run {
    /// Runs the automaton on `word`, returning `Ok(())` if the word is accepted and the
    /// reason for the rejection otherwise.
    fn run(&self, word: &str) -> Result<(), Rejection>;

    /// Returns true if and only if `word` is accepted.
    fn accepts(&self, word: &str) -> bool {
        self.run(word).is_ok()
    }
}

/// An automaton is a [`TransitionSystem`] together with a designated initial state and a
/// set of final states. It is immutable once built, all mutation happens on the transition
/// system before it is handed over.
#[derive(Clone, Debug)]
pub struct Automaton<E> {
    ts: TransitionSystem<E>,
    initial: StateId,
    final_states: BTreeSet<StateId>,
}

impl<E: Edge> Automaton<E> {
    /// Combines the given transition system with an initial state and final states. Fails
    /// if one of the states does not belong to `ts`.
    pub fn new<I>(
        ts: TransitionSystem<E>,
        initial: StateId,
        final_states: I,
    ) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = StateId>,
    {
        let final_states: BTreeSet<_> = final_states.into_iter().collect();
        if let Some(unknown) = std::iter::once(&initial)
            .chain(&final_states)
            .find(|q| ts.state(**q).is_none())
        {
            return Err(ConstructionError::UnknownState(unknown.show()));
        }
        Ok(Self {
            ts,
            initial,
            final_states,
        })
    }

    /// Gives a reference to the underlying transition system.
    pub fn ts(&self) -> &TransitionSystem<E> {
        &self.ts
    }

    /// Returns the input alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        self.ts.alphabet()
    }

    /// Returns the initial state.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Iterates over all states in insertion order.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.ts.state_indices()
    }

    /// Returns the final states.
    pub fn final_states(&self) -> &BTreeSet<StateId> {
        &self.final_states
    }

    /// Returns true if `state` is final.
    pub fn is_final(&self, state: StateId) -> bool {
        self.final_states.contains(&state)
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.ts.size()
    }

    /// Name of the given state.
    pub fn name(&self, state: StateId) -> String {
        self.ts.name(state)
    }

    /// Looks up a state by its name.
    pub fn state_by_name(&self, name: &str) -> Option<StateId> {
        self.ts.find_by_name(name)
    }

    /// Outgoing edges of `state`, empty for states that do not exist.
    pub fn edges_from(&self, state: StateId) -> &[E] {
        self.ts.edges_from(state).unwrap_or_default()
    }

    /// Computes the states reachable from the initial state.
    pub fn reachable_states(&self) -> BTreeSet<StateId> {
        self.ts.reachable_from(self.initial)
    }
}
