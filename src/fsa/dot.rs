//! Graphviz rendering.

use super::{Automaton, Label};
use std::fmt::Write;

impl Automaton {
    /// Render the automaton as a Graphviz `digraph` string.
    ///
    /// Final states are drawn as double circles, all others as circles.
    /// Isolated states (no incoming and no outgoing edges) are emitted
    /// explicitly so they survive rendering; ε-edges carry no label
    /// attribute. Pure string producer: writing the result to disk is
    /// the caller's concern.
    pub fn to_dot(&self) -> String {
        let mut dot = String::new();
        // writes to a String cannot fail
        let _ = writeln!(dot, "digraph {} {{", self.name);
        dot.push_str("\trankdir=LR;\n");

        let finals: Vec<&str> = self.finals().collect();
        if !finals.is_empty() {
            dot.push_str("\tnode [shape = doublecircle];");
            for state in finals {
                dot.push(' ');
                dot.push_str(state);
            }
            dot.push_str(";\n");
        }

        if !self.state_order.is_empty() {
            dot.push_str("\tnode [shape = circle];\n");
            for state in &self.state_order {
                if self.out_edges(state).is_empty() && !self.has_incoming_edges(state) {
                    let _ = writeln!(dot, "\t{state};");
                }
                for edge in self.out_edges(state) {
                    match edge.label {
                        Label::Symbol(symbol) => {
                            let _ = writeln!(
                                dot,
                                "\t{} -> {} [ label = {} ];",
                                state, edge.target, symbol
                            );
                        }
                        Label::Epsilon => {
                            let _ = writeln!(dot, "\t{} -> {};", state, edge.target);
                        }
                    }
                }
            }
        }

        dot.push('}');
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_final_states_as_double_circles() {
        let mut fsa = Automaton::new("demo", "q0", Vec::<String>::new()).unwrap();
        fsa.add_edge("q0", 'a', "q1").unwrap();
        fsa.add_final("q1").unwrap();

        let dot = fsa.to_dot();
        assert!(dot.starts_with("digraph demo {"));
        assert!(dot.contains("rankdir=LR"));
        assert!(dot.contains("doublecircle]; q1"));
        assert!(dot.contains("q0 -> q1 [ label = a ]"));
        assert!(dot.ends_with('}'));
    }

    #[test]
    fn epsilon_edges_have_no_label() {
        let mut fsa = Automaton::new("eps", "q0", Vec::<String>::new()).unwrap();
        fsa.add_edge("q0", Label::Epsilon, "q1").unwrap();

        let dot = fsa.to_dot();
        assert!(dot.contains("q0 -> q1;"));
        assert!(!dot.contains("label"));
    }

    #[test]
    fn isolated_states_are_emitted() {
        let mut fsa = Automaton::new("iso", "q0", ["alone"]).unwrap();
        fsa.add_edge("q0", 'a', "q1").unwrap();

        let dot = fsa.to_dot();
        assert!(dot.contains("\talone;"));
        assert!(!dot.contains("\tq1;\n"));
    }
}
