//! Language-level transforms: determinization, totalization, complement
//! and minimization.

use libfsa::prelude::*;

/// NFA over {a, b} accepting words containing "ab".
fn contains_ab() -> Automaton {
    let mut fsa = Automaton::new("contains-ab", "q0", Vec::<String>::new()).unwrap();
    fsa.add_edge("q0", 'a', "q0").unwrap();
    fsa.add_edge("q0", 'b', "q0").unwrap();
    fsa.add_edge("q0", 'a', "q1").unwrap();
    fsa.add_edge("q1", 'b', "q2").unwrap();
    fsa.add_edge("q2", 'a', "q2").unwrap();
    fsa.add_edge("q2", 'b', "q2").unwrap();
    fsa.add_final("q2").unwrap();
    fsa
}

fn words_up_to(symbols: &[char], max_len: usize) -> Vec<String> {
    let mut words = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for word in &frontier {
            for &c in symbols {
                let mut grown = word.clone();
                grown.push(c);
                next.push(grown);
            }
        }
        words.extend(next.iter().cloned());
        frontier = next;
    }
    words
}

#[test]
fn determinization_preserves_the_language() {
    let nfa = contains_ab();
    let mut dfa = nfa.clone();
    dfa.make_deterministic();
    assert!(dfa.is_deterministic());

    for word in words_up_to(&['a', 'b'], 5) {
        assert_eq!(
            nfa.accepts(&word),
            dfa.accepts(&word),
            "acceptance changed for {word:?}"
        );
    }
}

#[test]
fn totalization_fills_every_transition() {
    let mut fsa = contains_ab();
    fsa.make_deterministic();
    fsa.make_total();
    assert!(fsa.is_total());

    let symbols: Vec<char> = fsa.alphabet().collect();
    for state in fsa.states() {
        for &symbol in &symbols {
            let count = fsa
                .node_edges(state)
                .unwrap()
                .iter()
                .filter(|e| e.label == Label::Symbol(symbol))
                .count();
            assert_eq!(count, 1, "state {state} must have exactly one {symbol}-edge");
        }
    }
}

#[test]
fn complement_swaps_accepted_and_rejected() {
    let original = contains_ab();
    let mut complemented = original.clone();
    complemented.complement();

    for word in words_up_to(&['a', 'b'], 5) {
        assert_ne!(
            original.accepts(&word),
            complemented.accepts(&word),
            "complement must flip {word:?}"
        );
    }
}

#[test]
fn complement_twice_is_the_original_language() {
    let original = contains_ab();
    let mut round_trip = original.clone();
    round_trip.complement();
    round_trip.complement();
    assert!(original.equivalent(&round_trip));
}

#[test]
fn minimize_collapses_to_the_canonical_machine() {
    // a* needs a single accepting state with an a-loop
    let mut star = Automaton::from_regex("a-star", "a*").unwrap();
    star.minimize();
    assert_eq!(star.states().len(), 1);
    assert!(star.accepts(""));
    assert!(star.accepts("aaa"));

    // a+ needs exactly two states
    let mut plus = Automaton::from_regex("a-plus", "aa*").unwrap();
    plus.minimize();
    assert_eq!(plus.states().len(), 2);
    assert!(!plus.accepts(""));
    assert!(plus.accepts("a"));
    assert!(plus.accepts("aaaa"));
}

#[test]
fn minimize_preserves_the_language() {
    let original = contains_ab();
    let mut minimized = original.clone();
    minimized.minimize();

    for word in words_up_to(&['a', 'b'], 5) {
        assert_eq!(
            original.accepts(&word),
            minimized.accepts(&word),
            "minimization changed acceptance of {word:?}"
        );
    }
}

#[test]
fn minimize_twice_yields_the_same_machine() {
    let mut once = contains_ab();
    once.minimize();
    let mut twice = once.clone();
    twice.minimize();

    assert_eq!(once.states(), twice.states());
    assert_eq!(
        once.finals().collect::<Vec<_>>(),
        twice.finals().collect::<Vec<_>>()
    );
    for state in once.states() {
        assert_eq!(
            once.node_edges(state).unwrap(),
            twice.node_edges(state).unwrap()
        );
    }
}
