use std::sync::OnceLock;

use tracing::trace;

use crate::prelude::*;

/// The characters that structure a textual automaton description.
pub const SEPARATORS: [char; 9] = ['(', ')', ':', ',', ';', '-', '>', '{', '}'];

/// Stack symbols of the syntax automaton. `Z` marks the body of a section, `Y` and `X`
/// the pending `:` and `)` of a section header, the digits count completed sections and
/// `K`, `L`, `M`, `O` track the progress through a transition group `->{...}`.
const STACK_SYMBOLS: [&str; 11] = ["Z", "Y", "X", "1", "2", "3", "4", "K", "L", "M", "O"];

type Row = (&'static str, Option<&'static str>, Option<&'static str>, &'static str);

/// Transitions of the syntax automaton, grouped by source state. Each row lists the
/// consumed separator, the stack symbols to pop and to push and the target state.
const TABLE: [(&str, &[Row]); 7] = [
    (
        "states",
        &[
            ("(", None, Some("ZYX"), "states"),
            (")", Some("X"), None, "states"),
            (":", Some("Y"), None, "states"),
            (",", Some("Z"), Some("Z"), "states"),
            (";", Some("Z"), Some("1"), "alphabet"),
        ],
    ),
    (
        "alphabet",
        &[
            ("(", Some("1"), Some("ZYX"), "alphabet"),
            (")", Some("X"), None, "alphabet"),
            (":", Some("Y"), None, "alphabet"),
            (",", Some("Z"), Some("Z"), "alphabet"),
            (";", Some("Z"), Some("2"), "transitions"),
        ],
    ),
    (
        "transitions",
        &[
            ("(", Some("2"), Some("ZYX"), "transitions"),
            (")", Some("X"), None, "transitions"),
            (":", Some("Y"), None, "transitions"),
            ("-", Some("Z"), Some("K"), "transitions"),
            (">", Some("K"), Some("L"), "transitions"),
            ("{", Some("L"), Some("M"), "transitions"),
            (",", Some("M"), Some("M"), "transitions"),
            ("}", Some("M"), Some("O"), "transitions"),
            (",", Some("O"), Some("Z"), "next transition"),
            (";", Some("O"), Some("3"), "initial"),
            (";", Some("Z"), Some("3"), "initial"),
        ],
    ),
    (
        "next transition",
        &[("-", Some("Z"), Some("K"), "transitions")],
    ),
    (
        "initial",
        &[
            ("(", Some("3"), Some("ZYX"), "initial"),
            (")", Some("X"), None, "initial"),
            (":", Some("Y"), None, "initial"),
            (",", Some("Z"), Some("Z"), "initial"),
            (";", Some("Z"), Some("4"), "final"),
        ],
    ),
    (
        "final",
        &[
            ("(", Some("4"), Some("ZYX"), "final"),
            (")", Some("X"), None, "final"),
            (":", Some("Y"), None, "final"),
            (",", Some("Z"), Some("Z"), "final"),
            (";", Some("Z"), None, "done"),
        ],
    ),
    ("done", &[]),
];

/// Builds the pushdown automaton that checks the arrangement of separators in a textual
/// automaton description `E(n):...;A(n):...;T(n):...;I(n):...;F(n):...;`. Section
/// transitions consist of groups `S->{d1,...,dk}` separated by commas. The automaton
/// reads only the separators, names and counts have to be filtered out beforehand.
pub fn syntax_automaton() -> Result<PDA, ConstructionError> {
    let mut ts = PTS::for_alphabets(
        Alphabet::new(SEPARATORS.map(String::from))?,
        Alphabet::new(STACK_SYMBOLS)?,
    );
    for (name, _) in TABLE {
        ts.add_state(name)?;
    }
    let state = |ts: &PTS, name: &str| {
        ts.find_by_name(name)
            .ok_or_else(|| ConstructionError::UnknownState(name.to_string()))
    };

    for (source, rows) in TABLE {
        let p = state(&ts, source)?;
        for &(symbol, to_pop, to_push, target) in rows {
            let q = state(&ts, target)?;
            ts.add_pda_transition(p, Symbol::new(symbol), to_pop, to_push, q)?;
        }
    }

    let initial = state(&ts, "states")?;
    let done = state(&ts, "done")?;
    PDA::new(ts, initial, [done])
}

static SYNTAX: OnceLock<PDA> = OnceLock::new();

/// Checks the separators of a textual automaton description. All whitespace is removed
/// first, then the separators are fed to the [`syntax_automaton`]. On success, the input
/// without whitespace is returned.
///
/// # Example
/// ```
/// use automata_minimize::prelude::*;
///
/// assert_eq!(
///     validate_syntax("E(1): q; A(1): a; T(1): q->{q}; I(1): q; F(0):;").unwrap(),
///     "E(1):q;A(1):a;T(1):q->{q};I(1):q;F(0):;"
/// );
/// assert!(validate_syntax("E(1:q;").is_err());
/// ```
pub fn validate_syntax(input: &str) -> Result<String, Rejection> {
    let pda = SYNTAX
        .get_or_init(|| syntax_automaton().expect("the syntax automaton is well formed"));
    let stripped: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let separators: String = stripped.chars().filter(|c| SEPARATORS.contains(c)).collect();
    trace!("validating separators \"{separators}\"");
    pda.run(&separators)?;
    Ok(stripped)
}
