use std::str::FromStr;

use itertools::Itertools;
use thiserror::Error;
use tracing::debug;

use crate::prelude::*;

/// The section letters of a textual description, in the order in which the sections have
/// to appear: states, alphabet, transitions, initial state and final states.
pub const SECTIONS: [char; 5] = ['E', 'A', 'T', 'I', 'F'];

/// Problems encountered while reading a textual automaton description.
#[allow(missing_docs)]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid syntax: {0}")]
    Syntax(#[from] Rejection),
    #[error("expected {} sections but found {found}", SECTIONS.len())]
    SectionCount { found: usize },
    #[error("expected section `{expected}` but found `{found}`")]
    UnexpectedSection { expected: char, found: String },
    #[error("section `{section}` declares an invalid number of items `{count}`")]
    InvalidCount { section: char, count: String },
    #[error("section `{section}` declares {declared} items but lists {found}")]
    ParameterCount {
        section: char,
        declared: usize,
        found: usize,
    },
    #[error("section `{section}` contains an empty item")]
    EmptyItem { section: char },
    #[error("`{item}` is listed more than once in section `{section}`")]
    Repeated { section: char, item: String },
    #[error("state {state} lists {found} destinations but the alphabet has {expected} symbols")]
    TransitionArity {
        state: String,
        expected: usize,
        found: usize,
    },
    #[error("exactly one initial state has to be declared, found {found}")]
    MultipleInitial { found: usize },
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

/// One `Letter(count):items` section.
struct Section<'a> {
    letter: char,
    declared: usize,
    body: &'a str,
}

impl<'a> Section<'a> {
    fn parse(text: &'a str, expected: char) -> Result<Self, ParseError> {
        let unexpected = || ParseError::UnexpectedSection {
            expected,
            found: text.to_string(),
        };
        let (letter, rest) = text.split_once('(').ok_or_else(unexpected)?;
        if !letter.eq_ignore_ascii_case(&expected.to_string()) {
            return Err(ParseError::UnexpectedSection {
                expected,
                found: letter.to_string(),
            });
        }
        let (count, body) = rest.split_once("):").ok_or_else(unexpected)?;
        let declared = count.parse().map_err(|_| ParseError::InvalidCount {
            section: expected,
            count: count.to_string(),
        })?;
        Ok(Self {
            letter: expected,
            declared,
            body,
        })
    }

    /// Splits a comma separated body, an empty body holds no items.
    fn items(&self) -> Result<Vec<&'a str>, ParseError> {
        if self.body.is_empty() {
            return Ok(vec![]);
        }
        let items = self.body.split(',').collect_vec();
        if items.iter().any(|item| item.is_empty()) {
            return Err(ParseError::EmptyItem {
                section: self.letter,
            });
        }
        Ok(items)
    }

    /// Splits the body of a transition section into `(source, destinations)` groups.
    fn groups(&self) -> Result<Vec<(&'a str, Vec<&'a str>)>, ParseError> {
        self.body
            .split_terminator('}')
            .map(|group| -> Result<(&'a str, Vec<&'a str>), ParseError> {
                let group = group.strip_prefix(',').unwrap_or(group);
                let (source, destinations) =
                    group.split_once("->{").ok_or(ParseError::EmptyItem {
                        section: self.letter,
                    })?;
                if source.is_empty() {
                    return Err(ParseError::EmptyItem {
                        section: self.letter,
                    });
                }
                let destinations = match destinations {
                    "" => vec![],
                    list => list.split(',').collect(),
                };
                Ok((source, destinations))
            })
            .collect()
    }

    fn check_count(&self, found: usize) -> Result<(), ParseError> {
        if found != self.declared {
            return Err(ParseError::ParameterCount {
                section: self.letter,
                declared: self.declared,
                found,
            });
        }
        Ok(())
    }
}

/// Reads a [`DFA`] from its textual description
///
/// ```text
/// E(n):s1,...,sn; A(m):a1,...,am; T(k):s->{d1,...,dm},...; I(1):s; F(j):f1,...,fj;
/// ```
///
/// where `E` lists the states, `A` the alphabet symbols, `T` one group per source state with
/// one destination per alphabet symbol (in alphabet order), `I` the initial state and `F`
/// the final states. Whitespace is ignored everywhere. The separator structure is checked
/// by the [`crate::syntax`] automaton before anything else. Not every state needs a
/// transition group, so the result may be partial.
pub fn parse_dfa(input: &str) -> Result<DFA, ParseError> {
    let stripped = validate_syntax(input)?;
    let texts = stripped.split_terminator(';').collect_vec();
    if texts.len() != SECTIONS.len() {
        return Err(ParseError::SectionCount { found: texts.len() });
    }
    let sections = texts
        .into_iter()
        .zip(SECTIONS)
        .map(|(text, letter)| Section::parse(text, letter))
        .collect::<Result<Vec<_>, _>>()?;
    let [states, alphabet, transitions, initial, finals] = &sections[..] else {
        unreachable!("the number of sections was checked above");
    };

    let state_names = states.items()?;
    states.check_count(state_names.len())?;
    let symbols = alphabet.items()?;
    alphabet.check_count(symbols.len())?;
    debug!(
        "parsing automaton with {} states over {} symbols",
        state_names.len(),
        symbols.len()
    );

    let groups = transitions.groups()?;
    transitions.check_count(groups.len())?;
    if let Some((source, destinations)) = groups
        .iter()
        .find(|(_, destinations)| destinations.len() != symbols.len())
    {
        return Err(ParseError::TransitionArity {
            state: source.to_string(),
            expected: symbols.len(),
            found: destinations.len(),
        });
    }

    let initial_names = initial.items()?;
    initial.check_count(initial_names.len())?;
    let [initial_name] = initial_names[..] else {
        return Err(ParseError::MultipleInitial {
            found: initial_names.len(),
        });
    };

    let final_names = finals.items()?;
    finals.check_count(final_names.len())?;
    if let Some(item) = final_names.iter().duplicates().next() {
        return Err(ParseError::Repeated {
            section: finals.letter,
            item: item.to_string(),
        });
    }

    let dfa = DFABuilder::default()
        .with_alphabet(symbols)
        .with_states(state_names)
        .with_rows(groups)
        .with_final_states(final_names)
        .into_dfa(initial_name)?;
    debug!("parsed automaton, total: {}", dfa.is_total());
    Ok(dfa)
}

impl FromStr for DFA {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dfa(s)
    }
}
