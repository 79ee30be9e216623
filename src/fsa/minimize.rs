//! Reachability pruning and partition-refinement minimization.

use super::{Automaton, Label};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

impl Automaton {
    /// States reachable from the initial state over any edge.
    fn reachable_states(&self) -> FxHashSet<String> {
        let mut seen = FxHashSet::default();
        seen.insert(self.initial.clone());
        let mut work = vec![self.initial.clone()];
        while let Some(state) = work.pop() {
            for edge in self.out_edges(&state) {
                if seen.insert(edge.target.clone()) {
                    work.push(edge.target.clone());
                }
            }
        }
        seen
    }

    /// Remove every state not reachable from the initial state,
    /// together with its edges.
    pub fn remove_unreachable_states(&mut self) {
        let reachable = self.reachable_states();
        let doomed: Vec<String> = self
            .state_order
            .iter()
            .filter(|s| !reachable.contains(s.as_str()))
            .cloned()
            .collect();
        for state in doomed {
            // cannot fail: the initial state is always reachable
            let _ = self.remove_state(&state);
        }
    }

    /// Remove every dead state: one from which no final state can be
    /// reached. The initial state is kept even when dead.
    pub fn remove_dead_states(&mut self) {
        let mut rev: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
        for (src, out) in &self.edges {
            for edge in out {
                rev.entry(edge.target.as_str()).or_default().push(src.as_str());
            }
        }

        let mut alive: FxHashSet<&str> = self.finals.iter().map(String::as_str).collect();
        let mut work: Vec<&str> = alive.iter().copied().collect();
        while let Some(state) = work.pop() {
            if let Some(sources) = rev.get(state) {
                for &src in sources {
                    if alive.insert(src) {
                        work.push(src);
                    }
                }
            }
        }

        let doomed: Vec<String> = self
            .state_order
            .iter()
            .filter(|s| !alive.contains(s.as_str()) && **s != self.initial)
            .cloned()
            .collect();
        for state in doomed {
            // cannot fail: the initial state was filtered out above
            let _ = self.remove_state(&state);
        }
    }

    /// Reduce to the minimal DFA for the language.
    ///
    /// Determinizes and totalizes first, prunes unreachable states,
    /// then refines the `{finals, non-finals}` partition until no block
    /// is split by any symbol (Moore refinement). Quotient states are
    /// named `q0, q1, …` in breadth-first discovery order starting from
    /// the block holding the initial state. Dead states survive as the
    /// sink block; use [`remove_dead_states`](Self::remove_dead_states)
    /// to drop them explicitly.
    pub fn minimize(&mut self) {
        self.make_deterministic();
        self.make_total();
        self.remove_unreachable_states();

        let symbols: Vec<char> = self.alphabet.keys().copied().collect();
        let states = self.state_order.clone();
        let index_of: FxHashMap<&str, usize> = states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();

        // Initial partition, block ids assigned in first-seen order.
        let mut blocks: Vec<usize> = Vec::with_capacity(states.len());
        {
            let mut by_class: FxHashMap<bool, usize> = FxHashMap::default();
            for state in &states {
                let class = self.finals.contains(state.as_str());
                let next = by_class.len();
                blocks.push(*by_class.entry(class).or_insert(next));
            }
        }
        let mut block_count = blocks.iter().collect::<FxHashSet<_>>().len();

        // Split any block containing two states whose targets fall into
        // different blocks for some symbol, until the fixed point.
        loop {
            let mut sig_ids: FxHashMap<(usize, Vec<usize>), usize> = FxHashMap::default();
            let mut refined: Vec<usize> = Vec::with_capacity(states.len());
            for (i, state) in states.iter().enumerate() {
                let signature: Vec<usize> = symbols
                    .iter()
                    .map(|&c| {
                        self.symbol_target(state, c)
                            .and_then(|target| index_of.get(target))
                            .map(|&j| blocks[j])
                            .unwrap_or(usize::MAX)
                    })
                    .collect();
                let next = sig_ids.len();
                refined.push(*sig_ids.entry((blocks[i], signature)).or_insert(next));
            }
            let refined_count = sig_ids.len();
            blocks = refined;
            if refined_count == block_count {
                break;
            }
            block_count = refined_count;
        }

        // First member (in insertion order) represents each block.
        let mut rep_of: FxHashMap<usize, usize> = FxHashMap::default();
        for (i, _) in states.iter().enumerate() {
            rep_of.entry(blocks[i]).or_insert(i);
        }

        let initial_block = index_of
            .get(self.initial.as_str())
            .map(|&i| blocks[i])
            .unwrap_or(0);

        let mut name_of: FxHashMap<usize, String> = FxHashMap::default();
        let mut order = vec!["q0".to_string()];
        let mut queue: VecDeque<(usize, String)> = VecDeque::new();
        name_of.insert(initial_block, "q0".to_string());
        queue.push_back((initial_block, "q0".to_string()));

        let mut transitions: Vec<(String, Label, String)> = Vec::new();
        let mut finals: FxHashSet<String> = FxHashSet::default();

        while let Some((block, name)) = queue.pop_front() {
            let Some(&rep) = rep_of.get(&block) else {
                continue;
            };
            if self.finals.contains(states[rep].as_str()) {
                finals.insert(name.clone());
            }
            for &symbol in &symbols {
                let Some(target_state) = self.symbol_target(&states[rep], symbol) else {
                    continue;
                };
                let Some(&target_index) = index_of.get(target_state) else {
                    continue;
                };
                let target_block = blocks[target_index];
                let target_name = match name_of.get(&target_block) {
                    Some(existing) => existing.clone(),
                    None => {
                        let fresh = format!("q{}", name_of.len());
                        name_of.insert(target_block, fresh.clone());
                        order.push(fresh.clone());
                        queue.push_back((target_block, fresh.clone()));
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
}

#[cfg(test)]
mod tests {
    use super::*;

    /// DFA over {a, b} accepting words with an even number of 'a',
    /// built with two redundant copies of the odd state.
    fn even_a_with_redundancy() -> Automaton {
        let mut fsa = Automaton::new("even-a", "e", Vec::<String>::new()).unwrap();
        fsa.add_edge("e", 'a', "o1").unwrap();
        fsa.add_edge("e", 'b', "e").unwrap();
        fsa.add_edge("o1", 'a', "e2").unwrap();
        fsa.add_edge("o1", 'b', "o2").unwrap();
        fsa.add_edge("o2", 'a', "e").unwrap();
        fsa.add_edge("o2", 'b', "o1").unwrap();
        fsa.add_edge("e2", 'a', "o2").unwrap();
        fsa.add_edge("e2", 'b', "e2").unwrap();
        fsa.add_final("e").unwrap();
        fsa.add_final("e2").unwrap();
        fsa
    }

    #[test]
    fn minimize_merges_equivalent_states() {
        let mut fsa = even_a_with_redundancy();
        fsa.minimize();
        assert_eq!(fsa.states().len(), 2);
        for accepted in ["", "aa", "baab", "abba"] {
            assert!(fsa.accepts(accepted), "should accept {accepted:?}");
        }
        for rejected in ["a", "ab", "aba", "aaa"] {
            assert!(!fsa.accepts(rejected), "should reject {rejected:?}");
        }
    }

    #[test]
    fn minimize_is_idempotent() {
        let mut once = even_a_with_redundancy();
        once.minimize();
        let mut twice = once.clone();
        twice.minimize();
        assert_eq!(once.states(), twice.states());
        assert!(once.equivalent(&twice));
    }

    #[test]
    fn unreachable_states_are_pruned() {
        let mut fsa = Automaton::new("u", "q0", ["island"]).unwrap();
        fsa.add_edge("q0", 'a', "q1").unwrap();
        fsa.add_edge("island", 'a', "q1").unwrap();
        fsa.add_final("q1").unwrap();

        fsa.remove_unreachable_states();
        assert!(!fsa.has_state("island"));
        assert!(fsa.has_state("q0"));
        assert!(fsa.has_state("q1"));
    }

    #[test]
    fn dead_states_are_pruned() {
        let mut fsa = Automaton::new("d", "q0", Vec::<String>::new()).unwrap();
        fsa.add_edge("q0", 'a', "q1").unwrap();
        fsa.add_edge("q0", 'b', "trap").unwrap();
        fsa.add_edge("trap", 'b', "trap").unwrap();
        fsa.add_final("q1").unwrap();

        fsa.remove_dead_states();
        assert!(!fsa.has_state("trap"));
        assert!(fsa.accepts("a"));
    }
}
