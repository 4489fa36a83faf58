//! A minimal in-crate `PatternAutomaton` builder and a name-to-DFA pattern
//! table, standing in for the external multi-pattern lexer named in the
//! design. Neither parses regex surface syntax: patterns are themselves
//! [`Dfa`]s built from hand-assembled ASTs (§10.1/§10.2 of the design).

use crate::ast::{Label, NodeId, RegexpAst};
use crate::dfa::{compile_dfa, Dfa};
use crate::error::{FastError, FastResult};
use std::collections::BTreeMap;

/// A DAG over the positions of a single example string, whose arcs are
/// labeled by named patterns matched over substrings, with `any` arcs
/// covering any gap a named pattern didn't cover.
#[derive(Debug, Clone)]
pub struct PatternAutomaton {
  word_len: usize,
  edges: Vec<Vec<(String, usize)>>,
}

impl PatternAutomaton {
  pub fn initial(&self) -> usize {
    0
  }

  pub fn is_final(&self, q: usize) -> bool {
    q == self.word_len
  }

  pub fn len(&self) -> usize {
    self.word_len
  }

  pub fn is_empty(&self) -> bool {
    self.word_len == 0
  }

  pub fn out_edges(&self, q: usize) -> impl Iterator<Item = (String, usize)> + '_ {
    self.edges.get(q).into_iter().flatten().cloned()
  }
}

/// A name-to-DFA map used to build `PatternAutomaton`s and to interpret leaf
/// labels when computing density.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
  patterns: BTreeMap<String, Dfa>,
}

impl PatternTable {
  pub fn new() -> Self {
    PatternTable::default()
  }

  pub fn insert(&mut self, name: impl Into<String>, dfa: Dfa) {
    self.patterns.insert(name.into(), dfa);
  }

  pub fn get(&self, name: &str) -> Option<&Dfa> {
    self.patterns.get(name)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &Dfa)> {
    self.patterns.iter()
  }

  fn alt_of_digits() -> RegexpAst {
    let mut ast = RegexpAst::new();
    let digits: Vec<NodeId> = "0123456789"
      .chars()
      .map(|c| ast.add_node(Label::Symbol(c.to_string())))
      .collect();
    let alt = ast.add_node(Label::Alt);
    ast.set_children(alt, digits);
    let plus = ast.add_node(Label::Plus);
    ast.set_child(plus, alt);
    ast.set_child(ast.root(), plus);
    ast
  }

  fn octet_fragment(ast: &mut RegexpAst) -> NodeId {
    let digits: Vec<NodeId> = "0123456789"
      .chars()
      .map(|c| ast.add_node(Label::Symbol(c.to_string())))
      .collect();
    let alt = ast.add_node(Label::Alt);
    ast.set_children(alt, digits);
    let plus = ast.add_node(Label::Plus);
    ast.set_child(plus, alt);
    plus
  }

  fn ipv4_ast() -> RegexpAst {
    let mut ast = RegexpAst::new();
    let mut parts = Vec::new();
    for i in 0..4 {
      parts.push(Self::octet_fragment(&mut ast));
      if i < 3 {
        parts.push(ast.add_node(Label::Symbol(".".to_string())));
      }
    }
    let concat = ast.add_node(Label::Concat);
    ast.set_children(concat, parts);
    ast.set_child(ast.root(), concat);
    ast
  }

  fn spaces_ast() -> RegexpAst {
    let mut ast = RegexpAst::new();
    let space = ast.add_node(Label::Symbol(" ".to_string()));
    let plus = ast.add_node(Label::Plus);
    ast.set_child(plus, space);
    ast.set_child(ast.root(), plus);
    ast
  }

  /// A small built-in set of named patterns (`int`, `ipv4`, `spaces`)
  /// sufficient to exercise the PA-driven search path end to end.
  pub fn with_builtin_patterns() -> Self {
    let mut table = PatternTable::new();
    table.insert("int", compile_dfa(&Self::alt_of_digits()));
    table.insert("ipv4", compile_dfa(&Self::ipv4_ast()));
    table.insert("spaces", compile_dfa(&Self::spaces_ast()));
    table
  }
}

const FALLBACK_LABEL: &str = "any";

/// Scans `word` with every pattern in `patterns`, keeping the longest match
/// at each start position, greedily walking left to right to cover the word
/// with a single path of pattern edges and `any` fallback edges for gaps.
pub fn build_pattern_automaton(word: &str, patterns: &PatternTable) -> FastResult<PatternAutomaton> {
  let chars: Vec<String> = word.chars().map(|c| c.to_string()).collect();
  let n = chars.len();
  if n == 0 {
    return Ok(PatternAutomaton {
      word_len: 0,
      edges: vec![Vec::new()],
    });
  }
  if patterns.patterns.is_empty() {
    return Err(FastError::MalformedPatternTable(
      "pattern table has no named patterns to scan with".into(),
    ));
  }
  if patterns.patterns.contains_key(FALLBACK_LABEL) {
    return Err(FastError::PatternAutomatonConstruction(format!(
      "pattern table defines a named pattern called {FALLBACK_LABEL:?}, which is reserved for fallback gap edges"
    )));
  }

  let mut best_end: Vec<Option<(usize, String)>> = vec![None; n];
  for start in 0..n {
    for (name, dfa) in patterns.iter() {
      let mut longest = None;
      for end in (start + 1..=n).rev() {
        if dfa.accepts(&chars[start..end]) {
          longest = Some(end);
          break;
        }
      }
      if let Some(end) = longest {
        let better = match &best_end[start] {
          Some((cur_end, _)) => end > *cur_end,
          None => true,
        };
        if better {
          best_end[start] = Some((end, name.clone()));
        }
      }
    }
  }

  if best_end.iter().all(Option::is_none) {
    let mut edges = vec![Vec::new(); n + 1];
    edges[0].push((FALLBACK_LABEL.to_string(), n));
    return Ok(PatternAutomaton { word_len: n, edges });
  }

  let mut edges: Vec<Vec<(String, usize)>> = vec![Vec::new(); n + 1];
  let mut pos = 0;
  while pos < n {
    match &best_end[pos] {
      Some((end, name)) => {
        edges[pos].push((name.clone(), *end));
        pos = *end;
      }
      None => {
        edges[pos].push((FALLBACK_LABEL.to_string(), pos + 1));
        pos += 1;
      }
    }
  }
  Ok(PatternAutomaton { word_len: n, edges })
}

impl RegexpAst {
  /// Product-construction analogue of [`RegexpAst::recognizes_word`] over a
  /// `PatternAutomaton`: a DFS over `(ast_node, pa_state)` pairs, accepting
  /// when `pa` is in a final state and the root is epsilon-reachable from the
  /// current AST node.
  pub fn recognizes_pa(&self, pa: &PatternAutomaton) -> bool {
    let mut visited = std::collections::HashSet::new();
    let mut stack = vec![(self.root(), pa.initial())];
    while let Some((node, q)) = stack.pop() {
      if !visited.insert((node, q)) {
        continue;
      }
      if pa.is_final(q) && self.reaches_root_pub(node) {
        return true;
      }
      for (label, q2) in pa.out_edges(q) {
        for w in self.walk_one_char(node, &label) {
          stack.push((w, q2));
        }
      }
    }
    false
  }

  /// Does some path through the product of `self` and `pa` end exactly at
  /// `(target_ast_leaf, target_pa_node)`?
  pub fn recognizes_pa_prefix(
    &self,
    pa: &PatternAutomaton,
    target_pa_node: usize,
    target_ast_leaf: NodeId,
  ) -> bool {
    let mut visited = std::collections::HashSet::new();
    let mut stack = vec![(self.root(), pa.initial())];
    while let Some((node, q)) = stack.pop() {
      if node == target_ast_leaf && q == target_pa_node {
        return true;
      }
      if !visited.insert((node, q)) {
        continue;
      }
      for (label, q2) in pa.out_edges(q) {
        for w in self.walk_one_char(node, &label) {
          stack.push((w, q2));
        }
      }
    }
    false
  }

  /// Mirrors [`RegexpAst::reaches_root`]'s exclusion of the `(root, root)`
  /// bootstrap seed as a trivial accept.
  fn reaches_root_pub(&self, leaf: NodeId) -> bool {
    self
      .epsilon_reachables_from_leaf(leaf)
      .iter()
      .any(|&(a, v)| v == self.root() && (a != self.root() || self.is_empty()))
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn rejects_a_pattern_table_that_shadows_the_any_fallback_label() {
    let mut table = PatternTable::new();
    table.insert(FALLBACK_LABEL, compile_dfa(&RegexpAst::new()));
    let err = build_pattern_automaton("x", &table).unwrap_err();
    assert!(matches!(err, FastError::PatternAutomatonConstruction(_)));
  }

  #[test]
  fn empty_word_has_a_single_final_vertex() {
    let table = PatternTable::with_builtin_patterns();
    let pa = build_pattern_automaton("", &table).unwrap();
    assert_eq!(pa.len(), 0);
    assert!(pa.is_final(pa.initial()));
  }

  #[test]
  fn scans_ipv4_like_words_with_int_and_fallback_edges() {
    let table = PatternTable::with_builtin_patterns();
    let pa = build_pattern_automaton("1.2.3.4", &table).unwrap();
    assert!(pa.len() > 0);
    // a path must exist from initial to final
    let mut visited_any_path = false;
    let mut stack = vec![pa.initial()];
    let mut seen = std::collections::HashSet::new();
    while let Some(q) = stack.pop() {
      if !seen.insert(q) {
        continue;
      }
      if pa.is_final(q) {
        visited_any_path = true;
      }
      for (_, t) in pa.out_edges(q) {
        stack.push(t);
      }
    }
    assert!(visited_any_path);
  }

  #[test]
  fn word_with_no_matches_gets_a_single_any_edge() {
    // "int" never matches a substring of "!!!", so the whole word should
    // collapse onto a single fallback edge rather than one per character.
    let table = PatternTable::with_builtin_patterns();
    let pa = build_pattern_automaton("!!!", &table).unwrap();
    let edges: Vec<_> = pa.out_edges(0).collect();
    assert_eq!(edges, vec![(FALLBACK_LABEL.to_string(), 3)]);
  }
}
