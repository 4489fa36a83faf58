//! A minimal in-crate DFA compiler, standing in for the external DFA-compiler
//! collaborator named in the design. Builds a `Dfa` directly from a
//! simplified [`RegexpAst`] via Thompson-style NFA construction followed by
//! subset construction — never by parsing regex surface syntax, which stays
//! out of scope.

use crate::ast::{Label, NodeId, RegexpAst};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

pub type StateId = usize;

/// A deterministic automaton over `String` labels (one-character symbols or
/// named-pattern tokens).
#[derive(Debug, Clone)]
pub struct Dfa {
  start: StateId,
  finals: HashSet<StateId>,
  transitions: Vec<BTreeMap<String, StateId>>,
}

impl Dfa {
  pub fn initial(&self) -> StateId {
    self.start
  }

  pub fn is_final(&self, s: StateId) -> bool {
    self.finals.contains(&s)
  }

  pub fn num_states(&self) -> usize {
    self.transitions.len()
  }

  pub fn out_edges(&self, s: StateId) -> impl Iterator<Item = (String, StateId)> + '_ {
    self.transitions[s].iter().map(|(l, &t)| (l.clone(), t))
  }

  pub fn delta(&self, s: StateId, a: &str) -> Option<StateId> {
    self.transitions[s].get(a).copied()
  }

  pub fn accepts(&self, word: &[String]) -> bool {
    let mut state = self.start;
    for symbol in word {
      match self.delta(state, symbol) {
        Some(next) => state = next,
        None => return false,
      }
    }
    self.is_final(state)
  }
}

/// An NFA with epsilon transitions, built fragment-by-fragment from a
/// `RegexpAst` per the usual Thompson construction.
struct Nfa {
  epsilon: Vec<Vec<usize>>,
  transitions: Vec<Vec<(String, usize)>>,
  start: usize,
  accept: usize,
}

impl Nfa {
  fn new_state(&mut self) -> usize {
    self.epsilon.push(Vec::new());
    self.transitions.push(Vec::new());
    self.epsilon.len() - 1
  }

  fn add_epsilon(&mut self, from: usize, to: usize) {
    self.epsilon[from].push(to);
  }

  fn add_transition(&mut self, from: usize, label: String, to: usize) {
    self.transitions[from].push((label, to));
  }
}

/// Returns the (start, accept) fragment for `node`.
fn build_fragment(ast: &RegexpAst, node: NodeId, nfa: &mut Nfa) -> (usize, usize) {
  match ast.label(node) {
    Label::Root => match ast.children(node).first() {
      Some(&c) => build_fragment(ast, c, nfa),
      None => {
        let s = nfa.new_state();
        (s, s)
      }
    },
    Label::Symbol(label) => {
      let a = nfa.new_state();
      let b = nfa.new_state();
      nfa.add_transition(a, label.clone(), b);
      (a, b)
    }
    Label::Concat => {
      let kids = ast.children(node).to_vec();
      let mut fragments = Vec::with_capacity(kids.len());
      for c in kids {
        fragments.push(build_fragment(ast, c, nfa));
      }
      let start = fragments[0].0;
      let mut accept = fragments[0].1;
      for &(s, a) in &fragments[1..] {
        nfa.add_epsilon(accept, s);
        accept = a;
      }
      (start, accept)
    }
    Label::Alt => {
      let start = nfa.new_state();
      let accept = nfa.new_state();
      for &c in ast.children(node).to_vec().iter() {
        let (cs, ca) = build_fragment(ast, c, nfa);
        nfa.add_epsilon(start, cs);
        nfa.add_epsilon(ca, accept);
      }
      (start, accept)
    }
    Label::Plus => {
      let child = ast.children(node)[0];
      let (cs, ca) = build_fragment(ast, child, nfa);
      nfa.add_epsilon(ca, cs);
      (cs, ca)
    }
    Label::Star => {
      let child = ast.children(node)[0];
      let (cs, ca) = build_fragment(ast, child, nfa);
      let start = nfa.new_state();
      let accept = nfa.new_state();
      nfa.add_epsilon(start, cs);
      nfa.add_epsilon(start, accept);
      nfa.add_epsilon(ca, cs);
      nfa.add_epsilon(ca, accept);
      (start, accept)
    }
    Label::Question => {
      let child = ast.children(node)[0];
      let (cs, ca) = build_fragment(ast, child, nfa);
      let start = nfa.new_state();
      let accept = nfa.new_state();
      nfa.add_epsilon(start, cs);
      nfa.add_epsilon(start, accept);
      nfa.add_epsilon(ca, accept);
      (start, accept)
    }
  }
}

fn epsilon_closure(nfa: &Nfa, states: &BTreeSet<usize>) -> BTreeSet<usize> {
  let mut closure = states.clone();
  let mut worklist: Vec<usize> = states.iter().copied().collect();
  while let Some(s) = worklist.pop() {
    for &t in &nfa.epsilon[s] {
      if closure.insert(t) {
        worklist.push(t);
      }
    }
  }
  closure
}

fn subset_construct(nfa: &Nfa) -> Dfa {
  let mut start_set = BTreeSet::new();
  start_set.insert(nfa.start);
  let start_closure = epsilon_closure(nfa, &start_set);

  let mut state_ids: HashMap<BTreeSet<usize>, StateId> = HashMap::new();
  let mut transitions: Vec<BTreeMap<String, StateId>> = Vec::new();
  let mut finals = HashSet::new();

  state_ids.insert(start_closure.clone(), 0);
  transitions.push(BTreeMap::new());
  if start_closure.contains(&nfa.accept) {
    finals.insert(0);
  }

  let mut worklist = vec![start_closure];
  while let Some(set) = worklist.pop() {
    let id = state_ids[&set];
    let mut labels: BTreeSet<String> = BTreeSet::new();
    for &s in &set {
      for (label, _) in &nfa.transitions[s] {
        labels.insert(label.clone());
      }
    }
    for label in labels {
      let mut target = BTreeSet::new();
      for &s in &set {
        for (l, t) in &nfa.transitions[s] {
          if l == &label {
            target.insert(*t);
          }
        }
      }
      let closure = epsilon_closure(nfa, &target);
      let next_id = match state_ids.get(&closure) {
        Some(&id) => id,
        None => {
          let new_id = transitions.len();
          transitions.push(BTreeMap::new());
          if closure.contains(&nfa.accept) {
            finals.insert(new_id);
          }
          state_ids.insert(closure.clone(), new_id);
          worklist.push(closure);
          new_id
        }
      };
      transitions[id].insert(label, next_id);
    }
  }

  Dfa {
    start: 0,
    finals,
    transitions,
  }
}

/// Compiles a simplified AST into a DFA via Thompson construction followed by
/// subset construction, bypassing any regex surface syntax.
pub fn compile_dfa(ast: &RegexpAst) -> Dfa {
  let mut nfa = Nfa {
    epsilon: Vec::new(),
    transitions: Vec::new(),
    start: 0,
    accept: 0,
  };
  let (start, accept) = build_fragment(ast, ast.root(), &mut nfa);
  nfa.start = start;
  nfa.accept = accept;
  subset_construct(&nfa)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ast::RegexpAst;

  fn leaf(ast: &mut RegexpAst, s: &str) -> NodeId {
    ast.add_node(Label::Symbol(s.to_string()))
  }

  fn word(s: &str) -> Vec<String> {
    s.chars().map(|c| c.to_string()).collect()
  }

  #[test]
  fn compiles_single_leaf_to_a_two_state_dfa() {
    let mut ast = RegexpAst::new();
    let a = leaf(&mut ast, "a");
    ast.set_child(ast.root(), a);
    let dfa = compile_dfa(&ast);
    assert!(dfa.accepts(&word("a")));
    assert!(!dfa.accepts(&word("b")));
    assert!(!dfa.accepts(&word("")));
  }

  #[test]
  fn compiles_plus_to_unbounded_repetition() {
    let mut ast = RegexpAst::new();
    let a = leaf(&mut ast, "a");
    let plus = ast.add_node(Label::Plus);
    ast.set_child(plus, a);
    ast.set_child(ast.root(), plus);
    let dfa = compile_dfa(&ast);
    assert!(dfa.accepts(&word("a")));
    assert!(dfa.accepts(&word("aaaaa")));
    assert!(!dfa.accepts(&word("")));
  }

  #[test]
  fn compiles_alternation() {
    let mut ast = RegexpAst::new();
    let a = leaf(&mut ast, "a");
    let b = leaf(&mut ast, "b");
    let alt = ast.add_node(Label::Alt);
    ast.set_children(alt, vec![a, b]);
    ast.set_child(ast.root(), alt);
    let dfa = compile_dfa(&ast);
    assert!(dfa.accepts(&word("a")));
    assert!(dfa.accepts(&word("b")));
    assert!(!dfa.accepts(&word("c")));
  }

  #[test]
  fn empty_ast_accepts_only_the_empty_word() {
    let ast = RegexpAst::new();
    let dfa = compile_dfa(&ast);
    assert!(dfa.accepts(&word("")));
    assert!(!dfa.accepts(&word("a")));
  }
}
