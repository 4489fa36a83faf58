//! Infers a compact regular expression AST from a handful of example
//! strings (or pattern-tagged example automata) via Cyclic Best-First
//! Search: starting from the empty AST, a catalog of structural mutators
//! grows candidate trees one consumed symbol at a time, scored against an
//! objective trading off AST size against the density of the language it
//! induces.
//!
//! The public entry point is [`driver::run_search`]; [`ast::RegexpAst`] is
//! the structure it searches over.

pub mod ast;
pub mod cbfs;
pub mod dfa;
pub mod driver;
pub mod error;
pub mod example;
pub mod mutator;
pub mod objective;
pub mod pattern_automaton;
pub mod visitor;

pub use ast::RegexpAst;
pub use driver::{run_search, run_search_with_visitor, SearchConfig, SearchItem};
pub use error::{FastError, FastResult};
pub use example::Example;
pub use mutator::UpDotMode;
pub use objective::{Objective, ObjectiveKind};
pub use pattern_automaton::{build_pattern_automaton, PatternAutomaton, PatternTable};
