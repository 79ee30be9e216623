//! # libfsa
//!
//! Construction and transformation of finite state automata over
//! characters.
//!
//! The central type is [`fsa::Automaton`]: a mutable graph of named
//! states with symbol- or ε-labelled edges. On top of the graph
//! primitives the crate provides the classic language-level transforms
//! (subset-construction determinization, totalization, complement,
//! product intersection, ε-joined union, partition-refinement
//! minimization), acceptance and equivalence testing, a
//! Thompson-construction regex compiler, and a Graphviz renderer.
//!
//! ## Example
//!
//! ```
//! use libfsa::prelude::*;
//!
//! # fn main() -> libfsa::error::Result<()> {
//! let evens = Automaton::from_regex("evens", "(aa)*")?;
//! let any = Automaton::from_regex("any", "a*")?;
//!
//! let mut both = evens.intersect(&any);
//! both.minimize();
//!
//! assert!(both.accepts("aaaa"));
//! assert!(!both.accepts("aaa"));
//! println!("{}", both.to_dot());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fsa;
pub mod regex;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::error::{FsaError, Result};
    pub use crate::fsa::{Automaton, Edge, Label};
    pub use crate::regex::compile as compile_regex;
}
