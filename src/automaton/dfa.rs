use tracing::trace;

use crate::prelude::*;

/// A deterministic finite automaton. Transitions may be partial, a missing transition only
/// becomes a problem when a word needs it.
pub type DFA = Automaton<Transition>;

impl DFA {
    /// Returns the destination of the transition leaving `state` on `symbol`, if any.
    pub fn transition(&self, state: StateId, symbol: &Symbol) -> Option<StateId> {
        self.ts().transition(state, symbol)
    }

    /// Returns true if every state has exactly one outgoing transition per alphabet symbol.
    pub fn is_total(&self) -> bool {
        self.states().all(|q| {
            self.alphabet()
                .universe()
                .all(|a| self.transition(q, a).is_some())
        })
    }

    /// Returns the state reached by reading `word` from the initial state, or `None` if a
    /// transition is missing along the way.
    pub fn reached_state(&self, word: &str) -> Option<StateId> {
        word.chars().try_fold(self.initial(), |q, chr| {
            self.edges_from(q)
                .iter()
                .find(|edge| edge.symbol().matches(chr))
                .map(Edge::target)
        })
    }
}

impl Run for DFA {
    fn run(&self, word: &str) -> Result<(), Rejection> {
        let mut current = self.initial();
        let mut remaining = word;

        while let Some(chr) = remaining.chars().next() {
            let Some(edge) = self
                .edges_from(current)
                .iter()
                .find(|edge| edge.symbol().matches(chr))
            else {
                return Err(Rejection::NoTransition {
                    state: self.name(current),
                    symbol: chr,
                    remaining: remaining.to_string(),
                });
            };
            trace!(
                "{} --{chr}--> {}",
                self.name(current),
                self.name(edge.target())
            );
            current = edge.target();
            remaining = &remaining[chr.len_utf8()..];
        }

        if self.is_final(current) {
            Ok(())
        } else {
            Err(Rejection::NotFinal {
                state: self.name(current),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, tests::scenario_a};

    #[test_log::test]
    fn runs_scenario_a() {
        let dfa = scenario_a();
        assert!(dfa.is_total());
        assert!(dfa.accepts(""));
        assert!(dfa.accepts("0"));
        assert!(dfa.accepts("110"));
        assert!(dfa.accepts("10010"));
        assert!(!dfa.accepts("1"));
        assert!(!dfa.accepts("0101"));

        assert_eq!(
            dfa.run("10"),
            Err(Rejection::NotFinal {
                state: "D".to_string()
            })
        );
        assert_eq!(
            dfa.run("012"),
            Err(Rejection::NoTransition {
                state: "B".to_string(),
                symbol: '2',
                remaining: "2".to_string()
            })
        );
        assert_eq!(dfa.reached_state("11"), dfa.state_by_name("C"));
        assert_eq!(dfa.reached_state("1x"), None);
    }

    #[test]
    fn partial_automata_reject_at_missing_transitions() {
        let dfa = DFABuilder::default()
            .with_alphabet(["a", "b"])
            .with_states(["p", "q"])
            .with_edges([("p", "a", "q")])
            .with_final_states(["q"])
            .into_dfa("p")
            .unwrap();
        assert!(!dfa.is_total());
        assert!(dfa.accepts("a"));
        assert!(matches!(
            dfa.run("ab"),
            Err(Rejection::NoTransition { symbol: 'b', .. })
        ));
        assert_eq!(dfa.transition(dfa.initial(), &Symbol::new("b")), None);
        assert_eq!(dfa.reachable_states().len(), 2);
    }
}
