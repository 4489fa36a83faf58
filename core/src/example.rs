//! The two shapes of input this crate's search accepts: a plain string, or a
//! [`PatternAutomaton`] over named sub-patterns.

use crate::ast::RegexpAst;
use crate::pattern_automaton::PatternAutomaton;

#[derive(Debug, Clone)]
pub enum Example {
  /// A plain string, tokenized one AST symbol per character.
  Word(Vec<String>),
  /// A `PatternAutomaton` built over a string by scanning it with a named
  /// pattern table.
  Pattern(PatternAutomaton),
}

impl Example {
  pub fn word(s: &str) -> Self {
    Example::Word(s.chars().map(|c| c.to_string()).collect())
  }

  pub fn len(&self) -> usize {
    match self {
      Example::Word(symbols) => symbols.len(),
      Example::Pattern(pa) => pa.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// `{(label(e), target(e)) | e in out_edges(k)}` generalized over both
  /// input shapes: for a plain string this is a singleton.
  pub fn next_symbols(&self, k: usize) -> Vec<(String, usize)> {
    match self {
      Example::Word(symbols) => {
        if k < symbols.len() {
          vec![(symbols[k].clone(), k + 1)]
        } else {
          vec![]
        }
      }
      Example::Pattern(pa) => pa.out_edges(k).collect(),
    }
  }

  pub fn recognizes(&self, ast: &RegexpAst) -> bool {
    match self {
      Example::Word(symbols) => ast.recognizes_word(symbols),
      Example::Pattern(pa) => ast.recognizes_pa(pa),
    }
  }
}
