//! Acceptance, emptiness, equivalence, intersection and union.

use super::{Automaton, Label};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeSet, VecDeque};

impl Automaton {
    /// Run `word` through the automaton.
    ///
    /// Works directly on NFAs with ε-edges: the frontier starts as the
    /// ε-closure of the initial state, advances by the symbol's
    /// transitions and re-closes under ε at every step. Returns early
    /// once the frontier is empty.
    pub fn accepts(&self, word: &str) -> bool {
        let mut current = BTreeSet::new();
        self.closure_into(&self.initial, &mut current);

        for symbol in word.chars() {
            let mut next = BTreeSet::new();
            for state in &current {
                for edge in self.out_edges(state) {
                    if edge.label == Label::Symbol(symbol) {
                        self.closure_into(&edge.target, &mut next);
                    }
                }
            }
            if next.is_empty() {
                return false;
            }
            current = next;
        }

        current.iter().any(|s| self.finals.contains(s.as_str()))
    }

    /// True when the accepted language is empty: no final state is
    /// reachable from the initial state.
    pub fn does_not_accept_anything(&self) -> bool {
        if self.finals.is_empty() {
            return true;
        }
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        seen.insert(self.initial.as_str());
        let mut work = vec![self.initial.as_str()];
        while let Some(state) = work.pop() {
            if self.finals.contains(state) {
                return false;
            }
            for edge in self.out_edges(state) {
                if seen.insert(edge.target.as_str()) {
                    work.push(edge.target.as_str());
                }
            }
        }
        true
    }

    /// True when both automata accept the same language.
    ///
    /// Tests emptiness of the symmetric difference
    /// `(self ∩ ¬other) ∪ (other ∩ ¬self)`. Complements are taken over
    /// each operand's own alphabet.
    pub fn equivalent(&self, other: &Automaton) -> bool {
        let mut not_self = self.clone();
        not_self.complement();
        let mut not_other = other.clone();
        not_other.complement();

        let left = self.intersect(&not_other);
        let right = other.intersect(&not_self);
        left.union(&right).does_not_accept_anything()
    }

    /// Product construction: a fresh complete DFA accepting
    /// `L(self) ∩ L(other)`.
    ///
    /// Both operands are determinized and totalized on clones; the
    /// receiver and argument are not modified. Product states are pairs
    /// reachable from the paired initials, renamed `q0, q1, …` in
    /// breadth-first discovery order, final iff both components are
    /// final. Symbols range over the union of the two alphabets; a
    /// symbol only one operand knows has no transitions on the other
    /// side and therefore contributes no product edges.
    pub fn intersect(&self, other: &Automaton) -> Automaton {
        let mut left = self.clone();
        left.make_deterministic();
        left.make_total();
        let mut right = other.clone();
        right.make_deterministic();
        right.make_total();

        let symbols: BTreeSet<char> = left.alphabet().chain(right.alphabet()).collect();

        let mut names: FxHashMap<(String, String), String> = FxHashMap::default();
        let mut order = vec!["q0".to_string()];
        let mut queue: VecDeque<((String, String), String)> = VecDeque::new();
        let start = (left.initial.clone(), right.initial.clone());
        names.insert(start.clone(), "q0".to_string());
        queue.push_back((start, "q0".to_string()));

        let mut transitions: Vec<(String, Label, String)> = Vec::new();
        let mut finals: FxHashSet<String> = FxHashSet::default();

        while let Some(((left_state, right_state), name)) = queue.pop_front() {
            if left.finals.contains(&left_state) && right.finals.contains(&right_state) {
                finals.insert(name.clone());
            }
            for &symbol in &symbols {
                let (Some(left_target), Some(right_target)) = (
                    left.symbol_target(&left_state, symbol),
                    right.symbol_target(&right_state, symbol),
                ) else {
                    continue;
                };
                let pair = (left_target.to_string(), right_target.to_string());
                let target_name = match names.get(&pair) {
                    Some(existing) => existing.clone(),
                    None => {
                        let fresh = format!("q{}", names.len());
                        names.insert(pair.clone(), fresh.clone());
                        order.push(fresh.clone());
                        queue.push_back((pair, fresh.clone()));
                        fresh
                    }
                };
                transitions.push((name.clone(), Label::Symbol(symbol), target_name));
            }
        }

        let mut product = Automaton::assemble(
            format!("{}_x_{}", self.name, other.name),
            order,
            "q0".to_string(),
            finals,
            transitions,
        );
        product.mark_deterministic();
        product
    }

    /// ε-joined union of two automata. See [`union_of`](Self::union_of).
    pub fn union(&self, other: &Automaton) -> Automaton {
        Automaton::union_of(format!("{}_or_{}", self.name, other.name), &[self, other])
    }

    /// Build a fresh NFA accepting the union of the operands'
    /// languages.
    ///
    /// A new initial state `q0` gets an ε-edge to each operand's
    /// initial state. Operand states are renamed with a per-operand
    /// prefix so identifiers never collide; finals are the renamed
    /// operand finals. The result is typically non-deterministic. With
    /// no operands the language is empty.
    pub fn union_of(name: impl Into<String>, parts: &[&Automaton]) -> Automaton {
        let initial = "q0".to_string();
        let mut order = vec![initial.clone()];
        let mut transitions: Vec<(String, Label, String)> = Vec::new();
        let mut finals: FxHashSet<String> = FxHashSet::default();

        for (i, part) in parts.iter().enumerate() {
            let rename = |s: &str| format!("u{i}_{s}");
            for state in &part.state_order {
                order.push(rename(state));
                for edge in part.out_edges(state) {
                    transitions.push((rename(state), edge.label, rename(&edge.target)));
                }
            }
            for final_state in &part.finals {
                finals.insert(rename(final_state));
            }
            transitions.push((initial.clone(), Label::Epsilon, rename(&part.initial)));
        }

        Automaton::assemble(name.into(), order, initial, finals, transitions)
    }
}
