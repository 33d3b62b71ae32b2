use thiserror::Error;

use crate::prelude::*;

pub(crate) mod partition_refinement;
pub use partition_refinement::{refine, Refinement};

mod group;
pub use group::{Group, GroupId, Signature};

/// Reasons for which a [`DFA`] cannot be minimized.
#[allow(missing_docs)]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MinimizationError {
    #[error("automaton is not total: state {state} has no transition on `{symbol}`")]
    NotTotal { state: String, symbol: String },
    #[error("group {group} mixes final and non-final states")]
    MixedFinality { group: String },
    #[error("refinement covers {expected} states but the automaton has {found}")]
    SizeMismatch { expected: usize, found: usize },
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

impl DFA {
    /// Returns the unique (up to renaming of states) minimal DFA that accepts the same words
    /// as `self`. This is done using Moore's partition refinement algorithm, the states of
    /// the result are named after the groups they stem from. `self` is left untouched.
    ///
    /// Every state has to have a transition for every symbol, otherwise a
    /// [`MinimizationError::NotTotal`] is returned. Unreachable states are kept in the
    /// quotient.
    ///
    /// # Example
    /// ```
    /// use automata_minimize::prelude::*;
    ///
    /// let dfa = DFABuilder::default()
    ///     .with_alphabet(["a"])
    ///     .with_states(["0", "1", "2", "3"])
    ///     .with_rows([("0", ["1"]), ("1", ["2"]), ("2", ["3"]), ("3", ["0"])])
    ///     .with_final_states(["0", "2"])
    ///     .into_dfa("0")
    ///     .unwrap();
    /// let minimal = dfa.minimize().unwrap();
    /// assert_eq!(minimal.size(), 2);
    /// assert!(minimal.accepts("aaaa"));
    /// assert!(!minimal.accepts("aaa"));
    /// ```
    pub fn minimize(&self) -> Result<DFA, MinimizationError> {
        refine(self)?.quotient(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        math::Partition,
        prelude::*,
        tests::{scenario_a, words_up_to},
    };

    fn assert_same_language(left: &DFA, right: &DFA, max_length: usize) {
        let symbols = left
            .alphabet()
            .universe()
            .map(|a| a.to_string())
            .collect::<Vec<_>>();
        for word in words_up_to(&symbols, max_length) {
            assert_eq!(
                left.accepts(&word),
                right.accepts(&word),
                "automata disagree on \"{word}\""
            );
        }
    }

    #[test_log::test]
    fn minimize_scenario_a() {
        let dfa = scenario_a();
        let refinement = refine(&dfa).unwrap();
        let q = |name: &str| dfa.state_by_name(name).unwrap();
        assert_eq!(
            refinement.partition(),
            Partition::new([
                vec![q("A")],
                vec![q("B"), q("E")],
                vec![q("C")],
                vec![q("D"), q("F")]
            ])
        );
        assert_eq!(refinement.rounds(), 2);
        assert_eq!(refinement.groups().len(), 4);

        let minimal = dfa.minimize().unwrap();
        assert_eq!(minimal.size(), 4);
        assert!(minimal.is_total());
        assert_eq!(minimal.final_states().len(), 1);
        assert!(minimal.is_final(minimal.initial()));
        assert_same_language(&dfa, &minimal, 8);
        // the input is left untouched
        assert_eq!(dfa.size(), 6);
    }

    #[test]
    fn minimizing_is_idempotent() {
        let minimal = scenario_a().minimize().unwrap();
        let again = minimal.minimize().unwrap();
        assert_eq!(again.size(), minimal.size());
        assert_eq!(refine(&minimal).unwrap().partition().size(), minimal.size());
        assert_same_language(&minimal, &again, 8);
    }

    #[test]
    fn partial_automata_are_rejected() {
        let partial = DFABuilder::default()
            .with_alphabet(["0", "1"])
            .with_states(["A", "B", "C", "D", "E", "F"])
            .with_rows([("A", ["A", "B"]), ("B", ["D", "C"])])
            .with_final_states(["A"])
            .into_dfa("A")
            .unwrap();
        assert_eq!(
            partial.minimize().unwrap_err(),
            MinimizationError::NotTotal {
                state: "C".to_string(),
                symbol: "0".to_string()
            }
        );
    }

    #[test_log::test]
    fn empty_groups_are_not_projected() {
        let builder = DFABuilder::default()
            .with_alphabet(["a", "b"])
            .with_states(["p", "q", "r"])
            .with_rows([("p", ["q", "r"]), ("q", ["r", "p"]), ("r", ["p", "p"])]);

        let empty = builder.clone().into_dfa("p").unwrap();
        let refinement = refine(&empty).unwrap();
        assert_eq!(refinement.rounds(), 0);
        assert!(refinement.groups()[1].is_empty());
        let minimal = empty.minimize().unwrap();
        assert_eq!(minimal.size(), 1);
        assert!(minimal.final_states().is_empty());
        assert!(!minimal.accepts(""));
        assert!(!minimal.accepts("abba"));

        let universal = builder
            .with_final_states(["p", "q", "r"])
            .into_dfa("p")
            .unwrap();
        let minimal = universal.minimize().unwrap();
        assert_eq!(minimal.size(), 1);
        assert!(minimal.accepts(""));
        assert!(minimal.accepts("abba"));
    }

    #[test]
    fn quotient_requires_the_refined_automaton() {
        let single = DFABuilder::default()
            .with_alphabet(["a"])
            .with_states(["p"])
            .with_rows([("p", ["p"])])
            .into_dfa("p")
            .unwrap();
        let refinement = refine(&single).unwrap();
        assert_eq!(
            refinement.quotient(&scenario_a()).unwrap_err(),
            MinimizationError::SizeMismatch {
                expected: 1,
                found: 6
            }
        );
        assert_eq!(refinement.quotient(&single).unwrap().size(), 1);
    }

    #[test]
    fn unreachable_states_are_kept() {
        let dfa = DFABuilder::default()
            .with_alphabet(["a"])
            .with_states(["p", "q", "dead"])
            .with_rows([("p", ["q"]), ("q", ["p"]), ("dead", ["dead"])])
            .with_final_states(["q"])
            .into_dfa("p")
            .unwrap();
        let minimal = dfa.minimize().unwrap();
        assert_eq!(minimal.size(), 3);
        assert_eq!(minimal.reachable_states().len(), 2);
        assert_same_language(&dfa, &minimal, 6);
    }

    #[cfg(feature = "random")]
    #[test]
    fn random_automata_minimize_soundly() {
        for seed in 0..20 {
            fastrand::seed(seed);
            let dfa = generate_random_dfa(2, 8);
            let refinement = refine(&dfa).unwrap();
            assert!(refinement.rounds() < dfa.size());

            let minimal = dfa.minimize().unwrap();
            assert!(minimal.size() <= dfa.size());
            assert_eq!(minimal.minimize().unwrap().size(), minimal.size());
            assert_same_language(&dfa, &minimal, 7);
        }
    }
}
