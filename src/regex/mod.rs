//! Regular-expression front-end.
//!
//! Restricted syntax: literal symbols, Kleene star `*`, alternation
//! `|`, implicit concatenation and grouping with `(`…`)`. A backslash
//! escapes the following character, which is how the metacharacters
//! `*|()\` are matched literally. Precedence, tightest first: `*`,
//! concatenation, `|`. The empty pattern matches the empty string.

mod parser;
mod thompson;

use crate::error::Result;
use crate::fsa::Automaton;

/// Compile a pattern into an ε-NFA by Thompson construction.
///
/// The returned automaton accepts exactly the pattern's language and
/// can be fed to every downstream transform (determinization,
/// intersection, minimization, …). Its states are named `s0, s1, …` in
/// construction order.
///
/// # Errors
///
/// [`FsaError::RegexSyntax`](crate::error::FsaError::RegexSyntax) with
/// the character offset at which parsing failed.
///
/// # Example
///
/// ```
/// let fsa = libfsa::regex::compile("keywords", "if|else")?;
/// assert!(fsa.accepts("if"));
/// assert!(fsa.accepts("else"));
/// assert!(!fsa.accepts("for"));
/// # Ok::<(), libfsa::error::FsaError>(())
/// ```
pub fn compile(name: &str, pattern: &str) -> Result<Automaton> {
    let ast = parser::parse(pattern)?;
    Ok(thompson::build(name, &ast))
}

impl Automaton {
    /// Compile `pattern` into a fresh automaton named `name`.
    ///
    /// Convenience forwarding to [`compile`].
    pub fn from_regex(name: &str, pattern: &str) -> Result<Automaton> {
        compile(name, pattern)
    }
}
