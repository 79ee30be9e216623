//! Finite state automata over characters.
//!
//! The central type is [`Automaton`]: a named graph of string-identified
//! states with labelled edges, a single initial state and a set of final
//! states. Edges carry either an input symbol or ε (see [`Label`]), and
//! the active alphabet is tracked as a reference-counted multiset so that
//! transforms always iterate exactly the symbols still in use.
//!
//! Submodules contribute the language-level transforms: subset-construction
//! determinization, totalization and complement ([`determinize`](self)),
//! partition-refinement minimization, intersection, union, acceptance and
//! equivalence testing, and Graphviz rendering.

mod determinize;
mod dot;
mod minimize;
mod ops;

use crate::error::{FsaError, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// An edge label: one input symbol, or ε.
///
/// ε marks a transition that may be taken without consuming input. It is
/// never part of the automaton's alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Label {
    /// Empty-string transition, taken without consuming input.
    Epsilon,
    /// Transition consuming exactly one input symbol.
    Symbol(char),
}

impl Label {
    /// The input symbol, or `None` for ε.
    pub fn symbol(self) -> Option<char> {
        match self {
            Label::Symbol(c) => Some(c),
            Label::Epsilon => None,
        }
    }

    /// True for the ε label.
    pub fn is_epsilon(self) -> bool {
        matches!(self, Label::Epsilon)
    }
}

impl From<char> for Label {
    fn from(symbol: char) -> Self {
        Label::Symbol(symbol)
    }
}

impl From<Option<char>> for Label {
    fn from(symbol: Option<char>) -> Self {
        match symbol {
            Some(c) => Label::Symbol(c),
            None => Label::Epsilon,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Epsilon => write!(f, "ε"),
            Label::Symbol(c) => write!(f, "{c}"),
        }
    }
}

/// An outgoing transition: a label and a destination state.
///
/// Equality is structural; within one state's outgoing list, two edges
/// with the same `(label, target)` never coexist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Edge {
    /// The consumed symbol, or ε.
    pub label: Label,
    /// Identifier of the destination state.
    pub target: String,
}

impl Edge {
    /// Create an edge from anything convertible to a [`Label`].
    pub fn new(label: impl Into<Label>, target: impl Into<String>) -> Self {
        Edge {
            label: label.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.label, self.target)
    }
}

/// Outgoing edges of one state, kept in insertion order.
///
/// Most states have a handful of transitions; the inline capacity keeps
/// them off the heap.
pub(crate) type EdgeList = SmallVec<[Edge; 4]>;

/// A finite state automaton over characters.
///
/// States are identified by strings and iterated in insertion order,
/// which keeps determinization naming and DOT output stable. The
/// automaton is mutated in place by the add/remove primitives and by the
/// transforms (`make_deterministic`, `make_total`, `complement`,
/// `minimize`); `intersect`, `union` and regex compilation build fresh
/// automata instead.
///
/// # Example
///
/// ```
/// use libfsa::prelude::*;
///
/// # fn main() -> libfsa::error::Result<()> {
/// let mut fsa = Automaton::new("demo", "q0", ["q1"])?;
/// fsa.add_edge("q0", 'a', "q1")?;
/// fsa.add_final("q1")?;
///
/// assert!(fsa.accepts("a"));
/// assert!(!fsa.accepts("aa"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Automaton {
    name: String,
    /// State identifiers in insertion order.
    state_order: Vec<String>,
    /// Per-state outgoing edges. Key set always equals `state_order`.
    edges: FxHashMap<String, EdgeList>,
    initial: String,
    finals: FxHashSet<String>,
    /// Active alphabet as a use-count multiset. A symbol is present iff
    /// at least one edge carries it; ε is never a member.
    alphabet: BTreeMap<char, u32>,
    deterministic: Cell<bool>,
    dirty: Cell<bool>,
}

impl Automaton {
    /// Create an automaton with the given states.
    ///
    /// The initial state is added automatically when it is not part of
    /// `states`.
    ///
    /// # Errors
    ///
    /// Returns [`FsaError::DuplicateElement`] when `states` lists the
    /// same identifier twice.
    pub fn new<I, S>(name: impl Into<String>, initial: impl Into<String>, states: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut automaton = Automaton {
            name: name.into(),
            state_order: Vec::new(),
            edges: FxHashMap::default(),
            initial: initial.into(),
            finals: FxHashSet::default(),
            alphabet: BTreeMap::new(),
            deterministic: Cell::new(true),
            dirty: Cell::new(false),
        };

        for state in states {
            automaton.add_state(state)?;
        }
        if !automaton.has_state(&automaton.initial) {
            let initial = automaton.initial.clone();
            automaton.add_state(initial)?;
        }

        Ok(automaton)
    }

    /// Assemble an automaton from pre-validated parts.
    ///
    /// Callers guarantee that `transitions` references only members of
    /// `states` and contains no duplicate edge per source. The alphabet
    /// is rebuilt from the transitions; the determinism cache starts
    /// dirty unless the caller marks it afterwards.
    pub(crate) fn assemble(
        name: String,
        states: Vec<String>,
        initial: String,
        finals: FxHashSet<String>,
        transitions: Vec<(String, Label, String)>,
    ) -> Automaton {
        let mut edges: FxHashMap<String, EdgeList> = states
            .iter()
            .map(|s| (s.clone(), EdgeList::new()))
            .collect();
        let mut alphabet = BTreeMap::new();

        for (src, label, dst) in transitions {
            if let Label::Symbol(c) = label {
                *alphabet.entry(c).or_insert(0) += 1;
            }
            if let Some(out) = edges.get_mut(&src) {
                out.push(Edge { label, target: dst });
            }
        }

        Automaton {
            name,
            state_order: states,
            edges,
            initial,
            finals,
            alphabet,
            deterministic: Cell::new(false),
            dirty: Cell::new(true),
        }
    }

    /// Record that the automaton is known to be a DFA, skipping the next
    /// lazy rescan.
    pub(crate) fn mark_deterministic(&mut self) {
        self.deterministic.set(true);
        self.dirty.set(false);
    }

    /// The automaton's name, used by the DOT emitter.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the automaton. The name has no semantic role.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// State identifiers in insertion order.
    pub fn states(&self) -> &[String] {
        &self.state_order
    }

    /// True when `id` names a state of this automaton.
    pub fn has_state(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    /// The initial state identifier.
    pub fn initial(&self) -> &str {
        &self.initial
    }

    /// Change the initial state.
    ///
    /// # Errors
    ///
    /// Returns [`FsaError::NoSuchNode`] when `id` is not a state.
    pub fn set_initial(&mut self, id: &str) -> Result<()> {
        if !self.has_state(id) {
            return Err(FsaError::NoSuchNode(id.to_string()));
        }
        self.initial = id.to_string();
        Ok(())
    }

    /// Final states, in state insertion order.
    pub fn finals(&self) -> impl Iterator<Item = &str> {
        self.state_order
            .iter()
            .filter(|s| self.finals.contains(s.as_str()))
            .map(String::as_str)
    }

    /// True when `id` is a final state.
    pub fn is_final(&self, id: &str) -> bool {
        self.finals.contains(id)
    }

    /// Mark an existing state as final.
    ///
    /// # Errors
    ///
    /// Returns [`FsaError::NoSuchNode`] when `id` is not a state.
    pub fn add_final(&mut self, id: &str) -> Result<()> {
        if !self.has_state(id) {
            return Err(FsaError::NoSuchNode(id.to_string()));
        }
        self.finals.insert(id.to_string());
        Ok(())
    }

    /// Replace the final-state set.
    ///
    /// # Errors
    ///
    /// Returns [`FsaError::NoSuchNode`] for the first identifier that is
    /// not a state; the automaton is left unchanged in that case.
    pub fn set_finals<I, S>(&mut self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut finals = FxHashSet::default();
        for id in ids {
            let id = id.into();
            if !self.has_state(&id) {
                return Err(FsaError::NoSuchNode(id));
            }
            finals.insert(id);
        }
        self.finals = finals;
        Ok(())
    }

    pub(crate) fn replace_finals(&mut self, finals: FxHashSet<String>) {
        self.finals = finals;
    }

    /// The active alphabet, in sorted order. ε is never included.
    pub fn alphabet(&self) -> impl Iterator<Item = char> + '_ {
        self.alphabet.keys().copied()
    }

    /// Outgoing edges of a state, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`FsaError::NoSuchNode`] when `id` is not a state.
    pub fn node_edges(&self, id: &str) -> Result<&[Edge]> {
        self.edges
            .get(id)
            .map(|out| out.as_slice())
            .ok_or_else(|| FsaError::NoSuchNode(id.to_string()))
    }

    /// True when any edge of the automaton targets `id`.
    pub fn has_incoming_edges(&self, id: &str) -> bool {
        self.edges
            .values()
            .any(|out| out.iter().any(|e| e.target == id))
    }

    /// Add a state with an empty outgoing set.
    ///
    /// # Errors
    ///
    /// Returns [`FsaError::DuplicateElement`] when the identifier is
    /// already taken.
    pub fn add_state(&mut self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        if self.edges.contains_key(&id) {
            return Err(FsaError::DuplicateElement(id));
        }
        self.state_order.push(id.clone());
        self.edges.insert(id, EdgeList::new());
        Ok(())
    }

    /// Add one edge.
    ///
    /// The destination state is created when missing. Passing
    /// [`Label::Epsilon`] adds an ε-transition; a `char` adds a symbol
    /// transition and extends the alphabet.
    ///
    /// # Errors
    ///
    /// - [`FsaError::NoSuchNode`] when `src` is not a state.
    /// - [`FsaError::DuplicateElement`] when the same `(label, dst)`
    ///   already leaves `src`.
    pub fn add_edge(&mut self, src: &str, label: impl Into<Label>, dst: &str) -> Result<()> {
        let label = label.into();
        if !self.has_state(src) {
            return Err(FsaError::NoSuchNode(src.to_string()));
        }
        if !self.has_state(dst) {
            self.add_state(dst)?;
        }
        let duplicate = self
            .edges
            .get(src)
            .is_some_and(|out| out.iter().any(|e| e.label == label && e.target == dst));
        if duplicate {
            return Err(FsaError::DuplicateElement(edge_desc(src, label, dst)));
        }
        self.push_edge(src, label, dst);
        Ok(())
    }

    /// Insert an edge that is known to be valid and not a duplicate.
    ///
    /// Keeps the alphabet counters and the determinism cache in sync:
    /// insertion updates the cached flag eagerly because the check is
    /// O(out-degree).
    pub(crate) fn push_edge(&mut self, src: &str, label: Label, dst: &str) {
        let was_deterministic = self.is_deterministic();
        if let Label::Symbol(c) = label {
            *self.alphabet.entry(c).or_insert(0) += 1;
        }
        if let Some(out) = self.edges.get_mut(src) {
            if was_deterministic
                && (label.is_epsilon() || out.iter().any(|e| e.label == label))
            {
                self.deterministic.set(false);
            }
            out.push(Edge {
                label,
                target: dst.to_string(),
            });
        }
    }

    /// Add a chain of edges spelling `input` from `src` to `dst`.
    ///
    /// Intermediate states are created with fresh names derived from
    /// `src` (`src_1`, `src_2`, …). An empty `input` adds a single
    /// ε-edge. Unlike [`add_edge`](Self::add_edge), both endpoints must
    /// already exist.
    ///
    /// # Errors
    ///
    /// - [`FsaError::NoSuchNode`] when either endpoint is missing.
    /// - [`FsaError::DuplicateElement`] when the first or last link of
    ///   the chain already exists.
    pub fn add_edges(&mut self, src: &str, input: &str, dst: &str) -> Result<()> {
        if !self.has_state(src) {
            return Err(FsaError::NoSuchNode(src.to_string()));
        }
        if !self.has_state(dst) {
            return Err(FsaError::NoSuchNode(dst.to_string()));
        }

        let symbols: Vec<char> = input.chars().collect();
        if symbols.is_empty() {
            return self.add_edge(src, Label::Epsilon, dst);
        }

        let mut current = src.to_string();
        for (i, &symbol) in symbols.iter().enumerate() {
            let next = if i == symbols.len() - 1 {
                dst.to_string()
            } else {
                let fresh = self.fresh_state_name(src, i + 1);
                self.add_state(fresh.clone())?;
                fresh
            };
            self.add_edge(&current, symbol, &next)?;
            current = next;
        }
        Ok(())
    }

    /// Produce a state name not yet in use, derived from `base` and a
    /// numeric suffix. Retries by appending the suffix again until the
    /// candidate is unique.
    pub(crate) fn fresh_state_name(&self, base: &str, suffix: usize) -> String {
        let mut candidate = format!("{base}_{suffix}");
        while self.has_state(&candidate) {
            candidate.push_str(&suffix.to_string());
        }
        candidate
    }

    /// Remove one edge.
    ///
    /// Decrements the alphabet counter of the symbol and drops the
    /// symbol entirely when its last use disappears. Removal only marks
    /// the determinism cache dirty; the recheck happens lazily on the
    /// next [`is_deterministic`](Self::is_deterministic) query.
    ///
    /// # Errors
    ///
    /// - [`FsaError::NoSuchNode`] when `src` is not a state.
    /// - [`FsaError::NoSuchEdge`] when the edge does not exist.
    pub fn remove_edge(&mut self, src: &str, label: impl Into<Label>, dst: &str) -> Result<()> {
        let label = label.into();
        let out = self
            .edges
            .get_mut(src)
            .ok_or_else(|| FsaError::NoSuchNode(src.to_string()))?;
        let index = out
            .iter()
            .position(|e| e.label == label && e.target == dst)
            .ok_or_else(|| FsaError::NoSuchEdge(edge_desc(src, label, dst)))?;
        out.remove(index);

        if let Label::Symbol(c) = label {
            if let Some(count) = self.alphabet.get_mut(&c) {
                *count -= 1;
                if *count == 0 {
                    self.alphabet.remove(&c);
                }
            }
        }

        // Removal may have restored determinism; don't pay for the scan
        // until someone asks.
        if !self.deterministic.get() {
            self.dirty.set(true);
        }
        Ok(())
    }

    /// Remove a state together with all incident edges.
    ///
    /// Each edge is removed through [`remove_edge`](Self::remove_edge)
    /// so the alphabet counters stay consistent.
    ///
    /// # Errors
    ///
    /// - [`FsaError::NoSuchNode`] when `id` is not a state.
    /// - [`FsaError::InvalidAutomaton`] when `id` is the initial state;
    ///   a new initial state must be chosen first.
    pub fn remove_state(&mut self, id: &str) -> Result<()> {
        if !self.has_state(id) {
            return Err(FsaError::NoSuchNode(id.to_string()));
        }
        if id == self.initial {
            return Err(FsaError::InvalidAutomaton(format!(
                "cannot remove the initial state `{id}`; choose a new initial state first"
            )));
        }

        let outgoing: Vec<(Label, String)> = self
            .edges
            .get(id)
            .map(|out| out.iter().map(|e| (e.label, e.target.clone())).collect())
            .unwrap_or_default();
        for (label, target) in outgoing {
            self.remove_edge(id, label, &target)?;
        }

        let incoming: Vec<(String, Label)> = self
            .edges
            .iter()
            .flat_map(|(src, out)| {
                out.iter()
                    .filter(|e| e.target == id)
                    .map(move |e| (src.clone(), e.label))
            })
            .collect();
        for (src, label) in incoming {
            self.remove_edge(&src, label, id)?;
        }

        self.edges.remove(id);
        self.state_order.retain(|s| s != id);
        self.finals.remove(id);
        Ok(())
    }

    /// The ε-closure of one state: every state reachable through
    /// ε-edges alone, including the state itself.
    ///
    /// # Errors
    ///
    /// Returns [`FsaError::NoSuchNode`] when `id` is not a state.
    pub fn epsilon_closure(&self, id: &str) -> Result<BTreeSet<String>> {
        if !self.has_state(id) {
            return Err(FsaError::NoSuchNode(id.to_string()));
        }
        let mut closure = BTreeSet::new();
        self.closure_into(id, &mut closure);
        Ok(closure)
    }

    /// The ε-closure of a set of states (union of the individual
    /// closures).
    ///
    /// # Errors
    ///
    /// Returns [`FsaError::NoSuchNode`] for the first missing state.
    pub fn epsilon_closure_set<I, S>(&self, ids: I) -> Result<BTreeSet<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut closure = BTreeSet::new();
        for id in ids {
            let id = id.as_ref();
            if !self.has_state(id) {
                return Err(FsaError::NoSuchNode(id.to_string()));
            }
            self.closure_into(id, &mut closure);
        }
        Ok(closure)
    }

    /// Worklist expansion of `seed`'s ε-closure into `closure`.
    /// States already present are not revisited, which also makes the
    /// closure idempotent.
    pub(crate) fn closure_into(&self, seed: &str, closure: &mut BTreeSet<String>) {
        if !closure.insert(seed.to_string()) {
            return;
        }
        let mut work = vec![seed.to_string()];
        while let Some(state) = work.pop() {
            if let Some(out) = self.edges.get(&state) {
                for edge in out {
                    if edge.label.is_epsilon() && closure.insert(edge.target.clone()) {
                        work.push(edge.target.clone());
                    }
                }
            }
        }
    }

    /// Whether the automaton is deterministic: no ε-edges and no two
    /// out-edges of one state sharing a label.
    ///
    /// The answer is cached. Edge insertion keeps the cache exact; edge
    /// removal only marks it dirty, and the full rescan happens here on
    /// the next query.
    pub fn is_deterministic(&self) -> bool {
        if self.dirty.get() {
            self.dirty.set(false);
            self.deterministic.set(self.scan_determinism());
        }
        self.deterministic.get()
    }

    fn scan_determinism(&self) -> bool {
        for out in self.edges.values() {
            let mut seen = FxHashSet::default();
            for edge in out {
                match edge.label {
                    Label::Epsilon => return false,
                    Label::Symbol(c) => {
                        if !seen.insert(c) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// The unique target of `state` on `symbol`, if any. Meaningful on
    /// deterministic automata; on an NFA it returns the first match.
    pub(crate) fn symbol_target(&self, state: &str, symbol: char) -> Option<&str> {
        self.edges.get(state)?.iter().find_map(|e| match e.label {
            Label::Symbol(c) if c == symbol => Some(e.target.as_str()),
            _ => None,
        })
    }

    /// Edges of a state, for sibling modules that already validated the
    /// state's existence.
    pub(crate) fn out_edges(&self, state: &str) -> &[Edge] {
        self.edges.get(state).map(|out| out.as_slice()).unwrap_or(&[])
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Initial State: {}", self.initial)?;
        let finals: Vec<&str> = self.finals().collect();
        writeln!(f, "Final States: [{}]", finals.join(", "))?;
        writeln!(f, "Edges:")?;
        for state in &self.state_order {
            for edge in self.out_edges(state) {
                writeln!(f, "  {} --{}--> {}", state, edge.label, edge.target)?;
            }
        }
        Ok(())
    }
}

/// `src + label -> dst` rendering used by edge-shaped errors.
fn edge_desc(src: &str, label: Label, dst: &str) -> String {
    format!("{src} + {label} -> {dst}")
}
