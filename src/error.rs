//! Error types for automaton construction and transformation.

use thiserror::Error;

/// Errors reported by graph mutations and the regex compiler.
///
/// Mutating operations validate their inputs and name the offending
/// element; transforms on well-formed automata do not fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FsaError {
    /// The named state is not part of the automaton.
    #[error("no state named `{0}` exists in the automaton")]
    NoSuchNode(String),

    /// The described edge is not part of the automaton.
    ///
    /// The payload is a `source + label -> destination` description of
    /// the edge that was looked up.
    #[error("no edge `{0}` exists in the automaton")]
    NoSuchEdge(String),

    /// A state or edge with the same identity already exists.
    #[error("`{0}` already exists in the automaton")]
    DuplicateElement(String),

    /// The regular expression could not be parsed.
    ///
    /// `offset` is the character position at which parsing failed.
    #[error("invalid regular expression at offset {offset}: {message}")]
    RegexSyntax {
        /// Character offset of the first unparsable position.
        offset: usize,
        /// Human-readable description of what went wrong.
        message: String,
    },

    /// The requested operation would leave the automaton in an invalid
    /// state (for example, removing the initial state).
    #[error("invalid automaton: {0}")]
    InvalidAutomaton(String),
}

/// A specialized `Result` type for automaton operations.
pub type Result<T> = std::result::Result<T, FsaError>;
