use tracing::trace;

use crate::prelude::*;

/// Helper struct for the construction of [`DFA`]s from textual names. It collects the
/// alphabet, the state names, transitions and final states and assembles them upon calling
/// [`DFABuilder::into_dfa`], which reports every problem as a [`ConstructionError`].
///
/// Transitions can either be given as `(source, symbol, target)` triples or as rows that
/// list one destination per alphabet symbol, in alphabet order.
///
/// # Example
///
/// We want to create a DFA with two states `p` and `q` over the alphabet `a, b` that accepts
/// all words with an odd number of `b`s:
/// ```
/// use automata_minimize::prelude::*;
///
/// let dfa = DFABuilder::default()
///     .with_alphabet(["a", "b"])
///     .with_states(["p", "q"])
///     .with_rows([("p", ["p", "q"]), ("q", ["q", "p"])])
///     .with_final_states(["q"])
///     .into_dfa("p") // p is the initial state
///     .unwrap();
/// assert!(dfa.accepts("aba"));
/// assert!(!dfa.accepts("bb"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DFABuilder {
    alphabet: Vec<String>,
    states: Vec<String>,
    edges: Vec<(String, String, String)>,
    rows: Vec<(String, Vec<String>)>,
    final_states: Vec<String>,
}

impl DFABuilder {
    /// Sets the symbols of the alphabet, in order.
    pub fn with_alphabet<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.alphabet = symbols.into_iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Declares states by name. States are created in the order in which they are given.
    pub fn with_states<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.states
            .extend(names.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Adds transitions given as `(source, symbol, target)` triples.
    pub fn with_edges<I, S, A, T>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (S, A, T)>,
        S: AsRef<str>,
        A: AsRef<str>,
        T: AsRef<str>,
    {
        self.edges.extend(edges.into_iter().map(|(s, a, t)| {
            (
                s.as_ref().to_string(),
                a.as_ref().to_string(),
                t.as_ref().to_string(),
            )
        }));
        self
    }

    /// Adds transition rows. Each row names a source state and lists one destination per
    /// alphabet symbol, in alphabet order.
    pub fn with_rows<I, S, R, T>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = (S, R)>,
        S: AsRef<str>,
        R: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.rows.extend(rows.into_iter().map(|(source, targets)| {
            (
                source.as_ref().to_string(),
                targets
                    .into_iter()
                    .map(|t| t.as_ref().to_string())
                    .collect(),
            )
        }));
        self
    }

    /// Marks the given states as final.
    pub fn with_final_states<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.final_states
            .extend(names.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Assembles the collected parts into a [`DFA`] whose initial state is `initial`.
    /// A DFA reads its input one character at a time, so every alphabet symbol has to
    /// consist of a single character.
    pub fn into_dfa(self, initial: &str) -> Result<DFA, ConstructionError> {
        let alphabet = Alphabet::new(&self.alphabet)?;
        if let Some(symbol) = alphabet.universe().find(|a| a.as_str().chars().count() != 1) {
            return Err(ConstructionError::MultiCharacterSymbol(symbol.to_string()));
        }
        let mut ts = DTS::for_alphabet(alphabet);
        for name in &self.states {
            ts.add_state(name.as_str())?;
        }

        let lookup = |ts: &DTS, name: &str| {
            ts.find_by_name(name)
                .ok_or_else(|| ConstructionError::UnknownState(name.to_string()))
        };

        for (source, symbol, target) in &self.edges {
            let (p, q) = (lookup(&ts, source.as_str())?, lookup(&ts, target.as_str())?);
            let symbol = if Symbol::new(symbol).is_lambda() {
                Symbol::lambda()
            } else {
                ts.symbol(symbol)?
            };
            ts.add_transition(p, symbol, q)?;
        }

        for (source, targets) in &self.rows {
            let p = lookup(&ts, source.as_str())?;
            if targets.len() != ts.alphabet().len() {
                return Err(ConstructionError::RowLength {
                    state: source.clone(),
                    expected: ts.alphabet().len(),
                    found: targets.len(),
                });
            }
            let symbols: Vec<Symbol> = ts.alphabet().universe().cloned().collect();
            for (symbol, target) in symbols.into_iter().zip(targets) {
                let q = lookup(&ts, target.as_str())?;
                ts.add_transition(p, symbol, q)?;
            }
        }

        let initial = lookup(&ts, initial)?;
        let final_states = self
            .final_states
            .iter()
            .map(|name| lookup(&ts, name.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        trace!(
            "built DFA with {} states over {} symbols",
            ts.size(),
            ts.alphabet().len()
        );
        DFA::new(ts, initial, final_states)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn binary() -> DFABuilder {
        DFABuilder::default()
            .with_alphabet(["0", "1"])
            .with_states(["A", "B"])
    }

    #[test]
    fn edges_and_rows_agree() {
        let from_edges = binary()
            .with_edges([("A", "0", "A"), ("A", "1", "B"), ("B", "0", "B"), ("B", "1", "A")])
            .with_final_states(["B"])
            .into_dfa("A")
            .unwrap();
        let from_rows = binary()
            .with_rows([("A", ["A", "B"]), ("B", ["B", "A"])])
            .with_final_states(["B"])
            .into_dfa("A")
            .unwrap();

        for dfa in [&from_edges, &from_rows] {
            assert!(dfa.is_total());
            assert_eq!(dfa.size(), 2);
            assert_eq!(dfa.name(dfa.initial()), "A");
            assert!(dfa.accepts("0100"));
            assert!(!dfa.accepts("11"));
        }
    }

    #[test]
    fn construction_errors_are_reported() {
        assert_eq!(
            binary().with_states(["A"]).into_dfa("A").unwrap_err(),
            ConstructionError::DuplicateState("A".to_string())
        );
        assert_eq!(
            binary().into_dfa("C").unwrap_err(),
            ConstructionError::UnknownState("C".to_string())
        );
        assert_eq!(
            binary().with_final_states(["X"]).into_dfa("A").unwrap_err(),
            ConstructionError::UnknownState("X".to_string())
        );
        assert_eq!(
            binary()
                .with_edges([("A", "2", "B")])
                .into_dfa("A")
                .unwrap_err(),
            ConstructionError::UnknownSymbol("2".to_string())
        );
        assert_eq!(
            binary()
                .with_edges([("A", " ", "B")])
                .into_dfa("A")
                .unwrap_err(),
            ConstructionError::IllegalLambda {
                state: "A".to_string()
            }
        );
        assert_eq!(
            binary()
                .with_edges([("A", "0", "B"), ("A", "0", "A")])
                .into_dfa("A")
                .unwrap_err(),
            ConstructionError::DuplicateTransition {
                state: "A".to_string(),
                symbol: "0".to_string()
            }
        );
        assert_eq!(
            binary()
                .with_rows([("A", vec!["A"])])
                .into_dfa("A")
                .unwrap_err(),
            ConstructionError::RowLength {
                state: "A".to_string(),
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            DFABuilder::default()
                .with_alphabet(["0", "0"])
                .into_dfa("A")
                .unwrap_err(),
            ConstructionError::DuplicateSymbol("0".to_string())
        );
    }

    #[test]
    fn symbols_have_to_be_single_characters() {
        assert_eq!(
            DFABuilder::default()
                .with_alphabet(["a", "bc"])
                .with_states(["A"])
                .into_dfa("A")
                .unwrap_err(),
            ConstructionError::MultiCharacterSymbol("bc".to_string())
        );
        // whitespace is stripped before the length is checked
        let dfa = DFABuilder::default()
            .with_alphabet([" a ", "b"])
            .with_states(["A"])
            .with_rows([("A", ["A", "A"])])
            .with_final_states(["A"])
            .into_dfa("A")
            .unwrap();
        assert!(dfa.accepts("ab"));
    }
}
