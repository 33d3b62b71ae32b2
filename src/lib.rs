//! Library for working with deterministic finite automata and pushdown automata in Rust,
//! centered around the minimization of deterministic finite automata.
//!
//! An automaton consists of a transition system (TS) together with a designated initial
//! state and a set of final states. A TS is a finite collection of named states over an
//! [`Alphabet`], which are connected by directed edges. States live in an arena and are
//! addressed through [`StateId`]s, each state owns its outgoing edges. For deterministic
//! transition systems ([`DTS`]) an edge is labelled with a single symbol and each state has
//! at most one outgoing edge per symbol. Pushdown transition systems ([`PTS`]) additionally
//! carry a sequence of stack symbols to pop and to push on each edge, and may move without
//! consuming input.
//!
//! Both kinds of automata implement [`Run`], which either accepts a word or returns a
//! [`Rejection`] that describes where and why execution stopped. Running an automaton never
//! modifies it, so the same automaton can be run any number of times.
//!
//! The main algorithm is `DFA::minimize` (behind the `minimize` feature), which computes
//! the minimal DFA through Moore's partition refinement. DFAs can be assembled with the
//! [`transition_system::builder::DFABuilder`] or read from a textual description like
//! `E(2):p,q;A(1):a;T(2):p->{q},q->{p};I(1):p;F(1):q;`, whose syntax is checked by a
//! hand-written pushdown automaton. Automata can be rendered as graphviz DOT (see
//! [`transition_system::dot::Dottable`]), and the `random` feature provides generators for
//! random automata and for words that a given DFA accepts.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_minimize::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "minimize")]
    pub use super::minimization::{refine, MinimizationError, Refinement};
    #[cfg(feature = "random")]
    pub use super::random::{
        generate_random_dfa, generate_random_word, generate_random_words, generate_word,
        WordGenerator,
    };
    pub use super::{
        alphabet::{Alphabet, Symbol, LAMBDA},
        automaton::{Automaton, Rejection, Run, RunConfig, DFA, PDA},
        math,
        parse::{parse_dfa, ParseError},
        syntax::validate_syntax,
        transition_system::{
            builder::DFABuilder, dot::Dottable, ConstructionError, Edge, PdaTransition,
            StackWord, State, StateId, Transition, TransitionSystem, DTS, PTS,
        },
        Show,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Module that contains definitions for dealing with alphabets.
pub mod alphabet;
pub use alphabet::{Alphabet, Symbol};

/// This module defines transition systems, their states and edges.
pub mod transition_system;
pub use transition_system::{StateId, TransitionSystem, DTS, PTS};

/// Defines automata and how they are run on words.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;
pub use automaton::{Automaton, Rejection, Run, DFA, PDA};

/// Contains the partition refinement algorithm for minimizing DFAs. This is feature gated behind the `minimize` feature.
#[cfg(feature = "minimize")]
pub mod minimization;

/// The pushdown automaton that validates the syntax of textual automaton descriptions.
pub mod syntax;

/// Reading DFAs from their textual description.
pub mod parse;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;

use itertools::Itertools;

/// Helper trait which can be used to display states, symbols and the like. Mainly used
/// for error messages and logging.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state index that should be
    /// for example q0, q1, q2, ... Just use something that makes sense.
    fn show(&self) -> String;
    /// Show a collection of the thing, for a collection of states this should be {q0, q1, q2, ...}.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::prelude::*;

    /// States `A` to `F` over `0, 1` where exactly the words leading back to `A` are
    /// accepted. `B, E` and `D, F` are equivalent.
    pub fn scenario_a() -> DFA {
        DFABuilder::default()
            .with_alphabet(["0", "1"])
            .with_states(["A", "B", "C", "D", "E", "F"])
            .with_rows([
                ("A", ["A", "B"]),
                ("B", ["D", "C"]),
                ("C", ["A", "B"]),
                ("D", ["E", "F"]),
                ("E", ["D", "C"]),
                ("F", ["E", "F"]),
            ])
            .with_final_states(["A"])
            .into_dfa("A")
            .unwrap()
    }

    /// All words over `symbols` with at most `max_length` symbols, shortest first.
    pub fn words_up_to<S: AsRef<str>>(symbols: &[S], max_length: usize) -> Vec<String> {
        std::iter::once(String::new())
            .chain((1..=max_length).flat_map(|length| {
                std::iter::repeat(symbols)
                    .take(length)
                    .multi_cartesian_product()
                    .map(|word| word.into_iter().map(AsRef::<str>::as_ref).join(""))
            }))
            .collect()
    }

    #[test]
    fn enumerates_words() {
        let words = words_up_to(&["a", "b"], 2);
        assert_eq!(words, vec!["", "a", "b", "aa", "ab", "ba", "bb"]);
        assert_eq!(StateId::show_collection(&[StateId(0), StateId(2)]), "{q0, q2}");
    }
}
