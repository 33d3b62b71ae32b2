use itertools::Itertools;
use tracing::trace;

use crate::{math::Set, prelude::*};

/// A pushdown automaton. Transitions may consume [`Symbol::lambda`] and manipulate a stack
/// that is created fresh for every run.
pub type PDA = Automaton<PdaTransition>;

/// Knobs for executing a [`PDA`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximal number of consecutive moves that do not consume input.
    pub lambda_limit: usize,
}

impl RunConfig {
    /// Sets the maximal number of consecutive lambda moves.
    pub fn with_lambda_limit(self, lambda_limit: usize) -> Self {
        Self { lambda_limit }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { lambda_limit: 1024 }
    }
}

fn show_stack(stack: &[Symbol]) -> String {
    format!("[{}]", stack.iter().join(""))
}

impl PDA {
    /// Returns the stack alphabet.
    pub fn stack_alphabet(&self) -> &Alphabet {
        self.ts().stack_alphabet()
    }

    /// Runs the automaton on `word` with the given configuration. Transitions of the current
    /// state are tried in the order in which they were added, the first one whose symbol is
    /// lambda or the next input character and whose pop sequence lies on top of the stack
    /// is taken. The word is accepted once the input is exhausted, the stack is empty and
    /// the current state is final.
    pub fn run_with(&self, word: &str, config: &RunConfig) -> Result<(), Rejection> {
        let mut current = self.initial();
        let mut remaining = word;
        let mut stack: Vec<Symbol> = vec![];
        let mut lambda_moves = 0usize;
        let mut seen: Set<(StateId, Vec<Symbol>)> = Set::default();

        loop {
            if remaining.is_empty() && stack.is_empty() && self.is_final(current) {
                return Ok(());
            }
            let next = remaining.chars().next();

            let Some(edge) = self.edges_from(current).iter().find(|edge| {
                let symbol = edge.symbol();
                (symbol.is_lambda() || next.is_some_and(|chr| symbol.matches(chr)))
                    && edge.to_pop().satisfied_by(&stack)
            }) else {
                return Err(Rejection::NoApplicableTransition {
                    state: self.name(current),
                    remaining: remaining.to_string(),
                    stack: show_stack(&stack),
                });
            };

            if !edge.to_pop().is_lambda() {
                for expected in edge.to_pop().symbols().iter().rev() {
                    if stack.last() != Some(expected) {
                        return Err(Rejection::StackMismatch {
                            state: self.name(current),
                            expected: expected.to_string(),
                            stack: show_stack(&stack),
                        });
                    }
                    stack.pop();
                }
            }
            stack.extend(
                edge.to_push()
                    .symbols()
                    .iter()
                    .filter(|symbol| !symbol.is_lambda())
                    .cloned(),
            );

            trace!(
                "{} --{}--> {} with stack {}",
                self.name(current),
                edge.label(),
                self.name(edge.target()),
                show_stack(&stack)
            );
            current = edge.target();

            if edge.symbol().is_lambda() {
                lambda_moves += 1;
                if lambda_moves > config.lambda_limit || !seen.insert((current, stack.clone())) {
                    return Err(Rejection::LambdaLoop {
                        state: self.name(current),
                        limit: config.lambda_limit,
                    });
                }
            } else {
                let consumed = next.map_or(0, char::len_utf8);
                remaining = &remaining[consumed..];
                lambda_moves = 0;
                seen.clear();
            }
        }
    }
}

impl Run for PDA {
    fn run(&self, word: &str) -> Result<(), Rejection> {
        self.run_with(word, &RunConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// Accepts the words a^n b^n for n > 0.
    fn anbn() -> PDA {
        let mut ts = PTS::for_alphabets(
            Alphabet::new(["a", "b"]).unwrap(),
            Alphabet::new(["Z", "A"]).unwrap(),
        );
        let p = ts.add_state("p").unwrap();
        let q = ts.add_state("q").unwrap();
        let f = ts.add_state("f").unwrap();
        let (a, b) = (Symbol::new("a"), Symbol::new("b"));
        ts.add_pda_transition(p, a.clone(), Some("Z"), Some("ZA"), p)
            .unwrap();
        ts.add_pda_transition(p, a, Some("A"), Some("AA"), p)
            .unwrap();
        ts.add_pda_transition(p, b.clone(), Some("A"), None, q)
            .unwrap();
        ts.add_pda_transition(q, b, Some("A"), None, q).unwrap();
        ts.add_pda_transition(q, Symbol::lambda(), Some("Z"), None, f)
            .unwrap();
        PDA::new(ts, p, [f]).unwrap()
    }

    #[test]
    fn pushdown_runs_need_a_seeded_stack() {
        // nothing applies to an empty stack, the initial marker has to be pushed by a
        // lambda move first
        assert!(matches!(
            anbn().run("ab"),
            Err(Rejection::NoApplicableTransition { .. })
        ));
    }

    fn seeded_anbn() -> PDA {
        let mut ts = PTS::for_alphabets(
            Alphabet::new(["a", "b"]).unwrap(),
            Alphabet::new(["Z", "A"]).unwrap(),
        );
        let s = ts.add_state("s").unwrap();
        let p = ts.add_state("p").unwrap();
        let q = ts.add_state("q").unwrap();
        let f = ts.add_state("f").unwrap();
        let (a, b) = (Symbol::new("a"), Symbol::new("b"));
        ts.add_pda_transition(s, Symbol::lambda(), None, Some("Z"), p)
            .unwrap();
        ts.add_pda_transition(p, a.clone(), Some("Z"), Some("ZA"), p)
            .unwrap();
        ts.add_pda_transition(p, a, Some("A"), Some("AA"), p)
            .unwrap();
        ts.add_pda_transition(p, b.clone(), Some("A"), None, q)
            .unwrap();
        ts.add_pda_transition(q, b, Some("A"), None, q).unwrap();
        ts.add_pda_transition(q, Symbol::lambda(), Some("Z"), None, f)
            .unwrap();
        PDA::new(ts, s, [f]).unwrap()
    }

    #[test_log::test]
    fn counts_with_the_stack() {
        let pda = seeded_anbn();
        assert!(pda.accepts("ab"));
        assert!(pda.accepts("aaabbb"));
        assert!(!pda.accepts(""));
        assert_eq!(
            pda.run("aab"),
            Err(Rejection::NoApplicableTransition {
                state: "q".to_string(),
                remaining: "".to_string(),
                stack: "[ZA]".to_string()
            })
        );
        assert!(matches!(
            pda.run("abb"),
            Err(Rejection::NoApplicableTransition { .. })
        ));
        assert_eq!(pda.stack_alphabet().len(), 2);
    }

    #[test]
    fn lambda_loops_are_detected() {
        let mut ts = PTS::for_alphabets(
            Alphabet::new(["a"]).unwrap(),
            Alphabet::new(["X"]).unwrap(),
        );
        let p = ts.add_state("p").unwrap();
        let q = ts.add_state("q").unwrap();
        ts.add_pda_transition(p, Symbol::lambda(), None, None, q)
            .unwrap();
        ts.add_pda_transition(q, Symbol::lambda(), None, None, p)
            .unwrap();
        let cycle = PDA::new(ts, p, std::iter::empty()).unwrap();
        assert!(matches!(
            cycle.run("a"),
            Err(Rejection::LambdaLoop { .. })
        ));

        let mut ts = PTS::for_alphabets(
            Alphabet::new(["a"]).unwrap(),
            Alphabet::new(["X"]).unwrap(),
        );
        let p = ts.add_state("p").unwrap();
        ts.add_pda_transition(p, Symbol::lambda(), None, Some("X"), p)
            .unwrap();
        let growing = PDA::new(ts, p, std::iter::empty()).unwrap();
        assert_eq!(
            growing.run_with("", &RunConfig::default().with_lambda_limit(16)),
            Err(Rejection::LambdaLoop {
                state: "p".to_string(),
                limit: 16
            })
        );
    }
}
