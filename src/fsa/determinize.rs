//! Determinization, totalization and complement.

use super::{Automaton, Label};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeSet, VecDeque};

/// Name of the shared sink state added by [`Automaton::make_total`].
const SINK: &str = "_error";

impl Automaton {
    /// Replace the state graph with a DFA recognizing the same language
    /// (subset construction).
    ///
    /// New states are named `q0, q1, …` in discovery order: the queue
    /// is processed breadth-first and symbols are visited in sorted
    /// alphabet order. Subset states whose transition target is the
    /// empty set get no edge for that symbol, so the result may be
    /// partial (see [`make_total`](Self::make_total)). A new state is
    /// final iff its constituent set intersects the old final set. The
    /// alphabet is rebuilt from the new edge set.
    pub fn make_deterministic(&mut self) {
        if self.is_deterministic() {
            return;
        }

        let symbols: Vec<char> = self.alphabet.keys().copied().collect();

        let mut start = BTreeSet::new();
        self.closure_into(&self.initial, &mut start);

        let mut names: FxHashMap<BTreeSet<String>, String> = FxHashMap::default();
        let mut order = vec!["q0".to_string()];
        let mut queue: VecDeque<(BTreeSet<String>, String)> = VecDeque::new();
        names.insert(start.clone(), "q0".to_string());
        queue.push_back((start, "q0".to_string()));

        let mut transitions: Vec<(String, Label, String)> = Vec::new();
        let mut finals: FxHashSet<String> = FxHashSet::default();

        while let Some((subset, name)) = queue.pop_front() {
            if subset.iter().any(|s| self.finals.contains(s.as_str())) {
                finals.insert(name.clone());
            }

            for &symbol in &symbols {
                let mut target = BTreeSet::new();
                for state in &subset {
                    for edge in self.out_edges(state) {
                        if edge.label == Label::Symbol(symbol) {
                            self.closure_into(&edge.target, &mut target);
                        }
                    }
                }
                if target.is_empty() {
                    continue;
                }

                let target_name = match names.get(&target) {
                    Some(existing) => existing.clone(),
                    None => {
                        let fresh = format!("q{}", names.len());
                        names.insert(target.clone(), fresh.clone());
                        order.push(fresh.clone());
                        queue.push_back((target, fresh.clone()));
                        fresh
                    }
                };
                transitions.push((name.clone(), Label::Symbol(symbol), target_name));
            }
        }

        *self = Automaton::assemble(
            std::mem::take(&mut self.name),
            order,
            "q0".to_string(),
            finals,
            transitions,
        );
        self.mark_deterministic();
    }

    /// True when every state has an outgoing edge for every symbol of
    /// the active alphabet.
    pub fn is_total(&self) -> bool {
        let symbols: Vec<char> = self.alphabet.keys().copied().collect();
        self.state_order
            .iter()
            .all(|state| symbols.iter().all(|&c| self.symbol_target(state, c).is_some()))
    }

    /// Complete the transition function over the active alphabet.
    ///
    /// Every missing `(state, symbol)` pair gets an edge to a shared
    /// non-final `_error` sink with a self-loop on every symbol. The
    /// sink is created only when at least one transition is missing; an
    /// existing `_error` state is reused.
    pub fn make_total(&mut self) {
        let symbols: Vec<char> = self.alphabet.keys().copied().collect();

        let mut missing: Vec<(String, Vec<char>)> = Vec::new();
        for state in &self.state_order {
            let present: FxHashSet<char> = self
                .out_edges(state)
                .iter()
                .filter_map(|e| e.label.symbol())
                .collect();
            let absent: Vec<char> = symbols
                .iter()
                .copied()
                .filter(|c| !present.contains(c))
                .collect();
            if !absent.is_empty() {
                missing.push((state.clone(), absent));
            }
        }
        if missing.is_empty() {
            return;
        }

        if !self.has_state(SINK) {
            // cannot collide: just checked the name is free
            let _ = self.add_state(SINK);
            missing.push((SINK.to_string(), symbols));
        }

        for (state, absent) in missing {
            for symbol in absent {
                self.push_edge(&state, Label::Symbol(symbol), SINK);
            }
        }
    }

    /// Invert the accepted language.
    ///
    /// Determinizes and totalizes first, then flips the final-state
    /// set. Totality matters: a missing transition rejects implicitly,
    /// and flipping finals alone would not turn that rejection into an
    /// acceptance.
    pub fn complement(&mut self) {
        self.make_deterministic();
        self.make_total();
        let flipped: FxHashSet<String> = self
            .state_order
            .iter()
            .filter(|s| !self.finals.contains(s.as_str()))
            .cloned()
            .collect();
        self.finals = flipped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// NFA over {a, b}: accepts words ending in "ab".
    fn ends_in_ab() -> Automaton {
        let mut fsa = Automaton::new("ab$", "q0", Vec::<String>::new()).unwrap();
        fsa.add_edge("q0", 'a', "q0").unwrap();
        fsa.add_edge("q0", 'b', "q0").unwrap();
        fsa.add_edge("q0", 'a', "q1").unwrap();
        fsa.add_edge("q1", 'b', "q2").unwrap();
        fsa.add_final("q2").unwrap();
        fsa
    }

    #[test]
    fn subset_construction_preserves_language() {
        let mut fsa = ends_in_ab();
        assert!(!fsa.is_deterministic());
        fsa.make_deterministic();
        assert!(fsa.is_deterministic());

        for accepted in ["ab", "aab", "bab", "abab"] {
            assert!(fsa.accepts(accepted), "should accept {accepted}");
        }
        for rejected in ["", "a", "b", "ba", "abb"] {
            assert!(!fsa.accepts(rejected), "should reject {rejected}");
        }
    }

    #[test]
    fn determinization_names_states_in_discovery_order() {
        let mut fsa = ends_in_ab();
        fsa.make_deterministic();
        assert_eq!(fsa.initial(), "q0");
        assert!(fsa.states().iter().all(|s| s.starts_with('q')));
    }

    #[test]
    fn epsilon_edges_are_eliminated() {
        let mut fsa = Automaton::new("eps", "q0", Vec::<String>::new()).unwrap();
        fsa.add_edge("q0", Label::Epsilon, "q1").unwrap();
        fsa.add_edge("q1", 'a', "q2").unwrap();
        fsa.add_final("q2").unwrap();

        fsa.make_deterministic();
        assert!(fsa.is_deterministic());
        assert!(fsa.accepts("a"));
        assert!(!fsa.accepts(""));
        assert!(fsa
            .states()
            .iter()
            .all(|s| fsa.out_edges(s).iter().all(|e| !e.label.is_epsilon())));
    }

    #[test]
    fn make_total_adds_shared_sink() {
        let mut fsa = Automaton::new("t", "q0", Vec::<String>::new()).unwrap();
        fsa.add_edge("q0", 'a', "q1").unwrap();
        fsa.add_edge("q1", 'b', "q0").unwrap();
        assert!(!fsa.is_total());

        fsa.make_total();
        assert!(fsa.is_total());
        assert!(fsa.has_state("_error"));
        assert!(!fsa.is_final("_error"));
        for symbol in ['a', 'b'] {
            assert_eq!(fsa.symbol_target("_error", symbol), Some("_error"));
        }
    }

    #[test]
    fn make_total_without_gaps_adds_nothing() {
        let mut fsa = Automaton::new("loop", "q0", Vec::<String>::new()).unwrap();
        fsa.add_edge("q0", 'a', "q0").unwrap();
        fsa.make_total();
        assert!(!fsa.has_state("_error"));
        assert_eq!(fsa.states().len(), 1);
    }

    #[test]
    fn complement_flips_acceptance() {
        let mut fsa = ends_in_ab();
        fsa.complement();
        assert!(!fsa.accepts("ab"));
        assert!(!fsa.accepts("aab"));
        assert!(fsa.accepts(""));
        assert!(fsa.accepts("a"));
        assert!(fsa.accepts("ba"));
    }

    #[test]
    fn complement_is_involutive() {
        let original = ends_in_ab();
        let mut twice = original.clone();
        twice.complement();
        twice.complement();
        assert!(original.equivalent(&twice));
    }
}
