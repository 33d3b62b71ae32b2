use std::{collections::VecDeque, ops::RangeInclusive};

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    math::{Map, Set},
    prelude::*,
};

/// Draws words that are accepted by a given [`DFA`]. A word is obtained by walking the
/// automaton backwards: starting in a randomly chosen final state, the generator repeatedly
/// follows a random reversed transition and prepends its symbol. When the walk comes
/// across a self-loop or a cycle through two states for the first time, the loop is
/// unrolled a random number of times (drawn from [`WordGenerator::with_repetitions`]),
/// which yields longer words. After at most `max_walk` steps the word is completed along a
/// shortest path back to the initial state.
///
/// Only states reachable from the initial state are visited, so every generated word is
/// accepted by the automaton it was drawn from.
///
/// # Example
/// ```
/// use automata_minimize::prelude::*;
///
/// let dfa = DFABuilder::default()
///     .with_alphabet(["a", "b"])
///     .with_states(["even", "odd"])
///     .with_rows([("even", ["even", "odd"]), ("odd", ["odd", "even"])])
///     .with_final_states(["odd"])
///     .into_dfa("even")
///     .unwrap();
/// let mut generator = WordGenerator::with_seed(7);
/// for _ in 0..10 {
///     let word = generator.generate(&dfa).unwrap();
///     assert!(dfa.accepts(&word));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct WordGenerator {
    max_walk: usize,
    repetitions: RangeInclusive<usize>,
    rng: fastrand::Rng,
}

impl Default for WordGenerator {
    fn default() -> Self {
        Self::from_rng(fastrand::Rng::new())
    }
}

impl WordGenerator {
    fn from_rng(rng: fastrand::Rng) -> Self {
        Self {
            max_walk: 64,
            repetitions: 2..=10,
            rng,
        }
    }

    /// Creates a generator whose choices are determined by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(fastrand::Rng::with_seed(seed))
    }

    /// Sets the maximal number of random steps before the word is completed.
    pub fn with_max_walk(mut self, max_walk: usize) -> Self {
        self.max_walk = max_walk;
        self
    }

    /// Sets how often a cycle is repeated when it is unrolled.
    pub fn with_repetitions(mut self, repetitions: RangeInclusive<usize>) -> Self {
        assert!(!repetitions.is_empty(), "the range of repetitions may not be empty");
        self.repetitions = repetitions;
        self
    }

    /// Generates a word that `dfa` accepts, `None` if no final state is reachable.
    pub fn generate(&mut self, dfa: &DFA) -> Option<String> {
        let reachable = dfa.reachable_states();
        let finals = dfa
            .final_states()
            .iter()
            .filter(|q| reachable.contains(q))
            .copied()
            .collect_vec();
        if finals.is_empty() {
            debug!("no reachable final state, cannot generate a word");
            return None;
        }

        // reversed transitions between reachable states, indexed by their new source
        let mut inverted: Vec<Vec<(Symbol, StateId)>> = vec![vec![]; dfa.size()];
        for &p in &reachable {
            for edge in dfa.edges_from(p) {
                inverted[edge.target().index()].push((edge.symbol().clone(), p));
            }
        }

        let target = dfa.initial();
        let mut current = finals[self.rng.usize(..finals.len())];
        // the pieces are collected back to front
        let mut pieces: Vec<String> = vec![];
        let mut self_looped = Set::default();
        let mut two_cycled = Set::default();

        for _ in 0..self.max_walk {
            let options = &inverted[current.index()];
            if options.is_empty() {
                break;
            }
            let (symbol, predecessor) = &options[self.rng.usize(..options.len())];
            let mut cycled = false;

            if *predecessor == current && self_looped.insert(current) {
                let repeat = self.rng.usize(self.repetitions.clone());
                trace!("unrolling self-loop on {symbol} in {} {repeat} times", dfa.name(current));
                pieces.push(symbol.as_str().repeat(repeat));
                cycled = true;
            }
            if *predecessor != current && !two_cycled.contains(&current) {
                let way_back = inverted[predecessor.index()]
                    .iter()
                    .find(|(_, q)| *q == current);
                if let Some((back, _)) = way_back {
                    two_cycled.insert(current);
                    let repeat = self.rng.usize(self.repetitions.clone());
                    trace!(
                        "unrolling cycle {}{symbol} through {} {repeat} times",
                        back,
                        dfa.name(*predecessor)
                    );
                    pieces.push(format!("{back}{symbol}").repeat(repeat));
                    cycled = true;
                }
            }

            if !cycled {
                trace!("{} <--{symbol}-- {}", dfa.name(current), dfa.name(*predecessor));
                pieces.push(symbol.to_string());
                current = *predecessor;
                if current == target {
                    break;
                }
            }
        }

        if current != target {
            pieces.extend(shortest_path_home(&inverted, current, target)?);
        }
        Some(pieces.into_iter().rev().join(""))
    }
}

/// Symbols along a shortest path in the reversed automaton from `origin` to `target`, in
/// the order in which they are prepended.
fn shortest_path_home(
    inverted: &[Vec<(Symbol, StateId)>],
    origin: StateId,
    target: StateId,
) -> Option<Vec<String>> {
    let mut parent: Map<StateId, (StateId, &Symbol)> = Map::default();
    let mut queue = VecDeque::from([origin]);
    while let Some(q) = queue.pop_front() {
        if q == target {
            let mut path = vec![];
            let mut state = q;
            while let Some((previous, symbol)) = parent.get(&state) {
                path.push(symbol.to_string());
                state = *previous;
            }
            path.reverse();
            return Some(path);
        }
        for (symbol, p) in &inverted[q.index()] {
            if *p != origin && !parent.contains_key(p) {
                parent.insert(*p, (q, symbol));
                queue.push_back(*p);
            }
        }
    }
    None
}

/// Generates a word accepted by `dfa` with a [`WordGenerator`] in its default configuration.
pub fn generate_word(dfa: &DFA) -> Option<String> {
    WordGenerator::default().generate(dfa)
}

/// Generates a random total [`DFA`] with `size` states named `q0, q1, ...` over the first
/// `symbols` lowercase letters. Every transition target is drawn uniformly, every state is
/// final with probability one half and `q0` is initial. Depending on the drawn transitions,
/// there may be unreachable states.
///
/// Panics if `size` is zero or if more than 26 symbols are requested.
pub fn generate_random_dfa(symbols: usize, size: usize) -> DFA {
    assert!(size > 0, "an automaton needs at least one state");
    assert!(symbols <= 26, "only 26 letters are available as symbols");

    let letters = ('a'..='z').take(symbols).map(String::from).collect_vec();
    let names = (0..size).map(|i| format!("q{i}")).collect_vec();
    let rows = names
        .iter()
        .map(|name| {
            let targets = (0..symbols)
                .map(|_| names[fastrand::usize(..size)].clone())
                .collect_vec();
            (name.clone(), targets)
        })
        .collect_vec();
    let final_states = names.iter().filter(|_| fastrand::bool()).cloned().collect_vec();

    DFABuilder::default()
        .with_alphabet(letters)
        .with_states(&names)
        .with_rows(rows)
        .with_final_states(final_states)
        .into_dfa(&names[0])
        .expect("randomly drawn automata are well formed")
}

/// Generate a random `String` over the universe of the `alphabet`
/// The number of symbols is drawn uniformly from the range `min_len..=max_len`.
pub fn generate_random_word(alphabet: &Alphabet, min_len: usize, max_len: usize) -> String {
    let charset = alphabet.universe().collect_vec();

    let length = fastrand::usize(min_len..=max_len);
    (0..length)
        .map(|_| charset[fastrand::usize(..charset.len())].as_str())
        .collect()
}

/// Generate a set of `number` random `String`s over the universe of the `alphabet`.
/// The length for each sampled word is drawn uniformly from the range `min_len..=max_len`,
/// so there have to be at least `number` distinct words of such lengths.
pub fn generate_random_words(
    alphabet: &Alphabet,
    min_len: usize,
    max_len: usize,
    number: usize,
) -> math::Set<String> {
    let mut word_set = math::Set::with_capacity_and_hasher(number, Default::default());

    while word_set.len() < number {
        let random_word = generate_random_word(alphabet, min_len, max_len);
        word_set.insert(random_word);
    }

    word_set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::scenario_a;

    #[test_log::test]
    fn generated_words_survive_minimization() {
        let dfa = scenario_a();
        let minimal = dfa.minimize().unwrap();
        let mut generator = WordGenerator::with_seed(42);
        for _ in 0..50 {
            let word = generator.generate(&dfa).unwrap();
            assert!(dfa.accepts(&word), "original rejects \"{word}\"");
            assert!(minimal.accepts(&word), "minimal rejects \"{word}\"");

            let word = generator.generate(&minimal).unwrap();
            assert!(dfa.accepts(&word), "original rejects \"{word}\"");
            assert!(minimal.accepts(&word), "minimal rejects \"{word}\"");
        }
    }

    #[test]
    fn generated_words_for_random_automata() {
        let mut generator = WordGenerator::with_seed(1).with_max_walk(16);
        for seed in 0..30 {
            fastrand::seed(seed);
            let dfa = generate_random_dfa(3, 6);
            assert!(dfa.is_total());
            let minimal = dfa.minimize().unwrap();

            let reachable = dfa.reachable_states();
            let has_word = dfa.final_states().iter().any(|q| reachable.contains(q));
            for _ in 0..10 {
                match generator.generate(&dfa) {
                    Some(word) => {
                        assert!(has_word);
                        assert!(dfa.accepts(&word));
                        assert!(minimal.accepts(&word));
                    }
                    None => assert!(!has_word),
                }
                if let Some(word) = generator.generate(&minimal) {
                    assert!(dfa.accepts(&word));
                }
            }
        }
    }

    #[test]
    fn unreachable_final_states_yield_nothing() {
        let dfa = DFABuilder::default()
            .with_alphabet(["a"])
            .with_states(["p", "q"])
            .with_rows([("p", ["p"]), ("q", ["p"])])
            .with_final_states(["q"])
            .into_dfa("p")
            .unwrap();
        assert_eq!(generate_word(&dfa), None);
    }

    #[test]
    fn random_words_use_the_alphabet() {
        let alphabet = Alphabet::new(["x", "y"]).unwrap();
        for word in generate_random_words(&alphabet, 1, 6, 20) {
            assert!((1..=6).contains(&word.len()));
            assert!(word.chars().all(|c| c == 'x' || c == 'y'));
        }
        assert_eq!(generate_random_word(&alphabet, 0, 0), "");
    }
}
