use itertools::Itertools;

use crate::prelude::*;

/// Quotes `name` so that it can be used as a DOT identifier, whatever characters it holds.
fn quote_dot_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Types that can be rendered in the graphviz DOT format.
pub trait Dottable {
    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    ///
    /// The initial state is marked by an edge from an invisible node `_nil`, final states
    /// are drawn with a double border.
    fn dot_representation(&self, name: &str) -> String;
}

impl<E: Edge> Dottable for Automaton<E> {
    fn dot_representation(&self, name: &str) -> String {
        let header = [
            format!("digraph {} {{", quote_dot_ident(name)),
            "\t_nil [style=\"invis\"];".to_string(),
            format!(
                "\t_nil -> {} [label=\"\"];",
                quote_dot_ident(&self.name(self.initial()))
            ),
        ];

        let states = self
            .final_states()
            .iter()
            .map(|q| format!("\t{} [peripheries=2];", quote_dot_ident(&self.name(*q))));

        let transitions = self.states().flat_map(|q| {
            self.edges_from(q).iter().map(move |edge| {
                format!(
                    "\t{} -> {} [label={}];",
                    quote_dot_ident(&self.name(q)),
                    quote_dot_ident(&self.name(edge.target())),
                    quote_dot_ident(&edge.label())
                )
            })
        });

        header
            .into_iter()
            .chain(states)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }
}
