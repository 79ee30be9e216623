//! Thompson construction from the parsed AST to an ε-NFA.

use super::parser::Ast;
use crate::fsa::{Automaton, Label};
use rustc_hash::FxHashSet;

/// Compile an AST into a fresh ε-NFA.
///
/// Every fragment has a unique entry and a unique exit state, joined to
/// its neighbours by ε-edges; the whole automaton has the outermost
/// entry as its initial state and the outermost exit as its single
/// final state.
pub(crate) fn build(name: &str, ast: &Ast) -> Automaton {
    let mut builder = Builder {
        next: 0,
        states: Vec::new(),
        transitions: Vec::new(),
    };
    let (entry, exit) = builder.fragment(ast);

    let mut finals = FxHashSet::default();
    finals.insert(exit);

    Automaton::assemble(
        name.to_string(),
        builder.states,
        entry,
        finals,
        builder.transitions,
    )
}

struct Builder {
    next: usize,
    states: Vec<String>,
    transitions: Vec<(String, Label, String)>,
}

impl Builder {
    fn fresh(&mut self) -> String {
        let id = format!("s{}", self.next);
        self.next += 1;
        self.states.push(id.clone());
        id
    }

    fn link(&mut self, from: &str, label: Label, to: &str) {
        self.transitions.push((from.to_string(), label, to.to_string()));
    }

    /// Build one fragment and return its `(entry, exit)` pair.
    fn fragment(&mut self, ast: &Ast) -> (String, String) {
        match ast {
            Ast::Empty => {
                let entry = self.fresh();
                let exit = self.fresh();
                self.link(&entry, Label::Epsilon, &exit);
                (entry, exit)
            }
            Ast::Literal(symbol) => {
                let entry = self.fresh();
                let exit = self.fresh();
                self.link(&entry, Label::Symbol(*symbol), &exit);
                (entry, exit)
            }
            Ast::Concat(parts) if parts.is_empty() => self.fragment(&Ast::Empty),
            Ast::Concat(parts) => {
                let mut entry = None;
                let mut previous_exit: Option<String> = None;
                for part in parts {
                    let (part_entry, part_exit) = self.fragment(part);
                    if let Some(previous) = previous_exit {
                        self.link(&previous, Label::Epsilon, &part_entry);
                    }
                    entry.get_or_insert(part_entry);
                    previous_exit = Some(part_exit);
                }
                match (entry, previous_exit) {
                    (Some(entry), Some(exit)) => (entry, exit),
                    _ => self.fragment(&Ast::Empty),
                }
            }
            Ast::Alternate(branches) => {
                let entry = self.fresh();
                let exit = self.fresh();
                for branch in branches {
                    let (branch_entry, branch_exit) = self.fragment(branch);
                    self.link(&entry, Label::Epsilon, &branch_entry);
                    self.link(&branch_exit, Label::Epsilon, &exit);
                }
                (entry, exit)
            }
            Ast::Star(inner) => {
                let entry = self.fresh();
                let exit = self.fresh();
                let (inner_entry, inner_exit) = self.fragment(inner);
                self.link(&entry, Label::Epsilon, &inner_entry);
                self.link(&inner_exit, Label::Epsilon, &exit);
                self.link(&entry, Label::Epsilon, &exit);
                self.link(&inner_exit, Label::Epsilon, &inner_entry);
                (entry, exit)
            }
        }
    }
}
