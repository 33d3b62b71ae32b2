use std::{
    fmt::{Debug, Display},
    sync::Arc,
};

use crate::{math::Bijection, transition_system::ConstructionError, Show};

/// Textual form of the empty-input symbol.
pub const LAMBDA: &str = "\u{03BB}";

/// A symbol of an [`Alphabet`]. Symbols are interned pieces of text, equality and hashing
/// are structural on the normalized text, which is obtained by deleting all whitespace.
/// Blank text normalizes to the distinguished empty-input symbol (see [`Symbol::lambda`]),
/// which may only label transitions of pushdown automata.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Creates a symbol from the given text after normalizing it.
    pub fn new(text: &str) -> Self {
        let normalized: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if normalized.is_empty() || normalized == LAMBDA {
            Self::lambda()
        } else {
            Self(normalized.into())
        }
    }

    /// The symbol that denotes "no input consumed".
    pub fn lambda() -> Self {
        Self(Arc::from(LAMBDA))
    }

    /// Returns true if `self` is the empty-input symbol.
    pub fn is_lambda(&self) -> bool {
        &*self.0 == LAMBDA
    }

    /// Gives the normalized text of the symbol.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol consists of exactly the given character.
    pub fn matches(&self, chr: char) -> bool {
        let mut chars = self.0.chars();
        chars.next() == Some(chr) && chars.next().is_none()
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol::new(value)
    }
}

impl From<char> for Symbol {
    fn from(value: char) -> Self {
        Symbol::new(value.encode_utf8(&mut [0; 4]))
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Show for Symbol {
    fn show(&self) -> String {
        self.0.to_string()
    }
}

/// An immutable, ordered collection of [`Symbol`]s. Each symbol can be looked up by its
/// text and by its ordinal position, which is the position in which it was given upon
/// construction.
///
/// # Example
/// ```
/// use automata_minimize::prelude::*;
///
/// let alphabet = Alphabet::new(["0", " 1 "]).unwrap();
/// assert_eq!(alphabet.len(), 2);
/// assert_eq!(alphabet.get_by_index(1), alphabet.get_by_text("1"));
/// assert!(Alphabet::new(["a", "a "]).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Bijection<usize, Symbol>,
}

impl Alphabet {
    /// Builds an alphabet from the given texts, normalizing each one. Fails if two texts
    /// normalize to the same symbol.
    pub fn new<I, S>(texts: I) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut symbols = Bijection::new();
        for (index, text) in texts.into_iter().enumerate() {
            let symbol = Symbol::new(text.as_ref());
            if symbols.contains_right(&symbol) {
                return Err(ConstructionError::DuplicateSymbol(symbol.to_string()));
            }
            symbols.insert(index, symbol);
        }
        Ok(Self { symbols })
    }

    /// Looks up the symbol with the given text. The text is normalized first.
    pub fn get_by_text(&self, text: &str) -> Option<&Symbol> {
        self.symbols
            .get_by_right(&Symbol::new(text))
            .and_then(|index| self.symbols.get_by_left(index))
    }

    /// Returns the symbol at the given ordinal position.
    pub fn get_by_index(&self, index: usize) -> Option<&Symbol> {
        self.symbols.get_by_left(&index)
    }

    /// Returns the ordinal position of `symbol`, if it belongs to the alphabet.
    pub fn index_of(&self, symbol: &Symbol) -> Option<usize> {
        self.symbols.get_by_right(symbol).copied()
    }

    /// Returns true if the given symbol is present in the alphabet.
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains_right(symbol)
    }

    /// Iterates over all symbols in ordinal order.
    pub fn universe(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols.iter().map(|(_, symbol)| symbol)
    }

    /// Returns the number of symbols in the alphabet.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_normalized() {
        assert_eq!(Symbol::new(" a b "), Symbol::new("ab"));
        assert!(Symbol::new("  ").is_lambda());
        assert!(Symbol::new("").is_lambda());
        assert!(Symbol::new(LAMBDA).is_lambda());
        assert!(Symbol::from('(').matches('('));
        assert!(!Symbol::new("ab").matches('a'));
    }

    #[test]
    fn alphabet_lookups() {
        let alphabet = Alphabet::new(["0", "1", "x"]).unwrap();
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.get_by_index(2), Some(&Symbol::new("x")));
        assert_eq!(alphabet.get_by_index(3), None);
        assert_eq!(alphabet.get_by_text(" 1"), Some(&Symbol::new("1")));
        assert_eq!(alphabet.get_by_text("2"), None);
        assert_eq!(alphabet.index_of(&Symbol::new("x")), Some(2));
        assert_eq!(
            alphabet.universe().map(Symbol::as_str).collect::<Vec<_>>(),
            vec!["0", "1", "x"]
        );
    }

    #[test]
    fn duplicates_after_normalization_are_rejected() {
        assert_eq!(
            Alphabet::new(["a", " a"]),
            Err(ConstructionError::DuplicateSymbol("a".to_string()))
        );
        assert!(matches!(
            Alphabet::new(["", " "]),
            Err(ConstructionError::DuplicateSymbol(_))
        ));
    }
}
