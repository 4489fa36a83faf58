use super::{MutateContext, Mutator};
use crate::ast::{ArcDir, Label, NodeId, RegexpAst};

/// Precondition: `(u,v)` is downward. Inserts `.` in place of `v` under `u`,
/// with left child `?(new σ-leaf)` and right child the original `v`.
pub struct DownDot;

impl Mutator for DownDot {
  fn name(&self) -> &'static str {
    "DownDot"
  }

  fn mutate(&self, ast: &RegexpAst, sigma: &str, u: NodeId, v: NodeId, _ctx: &MutateContext) -> Vec<(RegexpAst, NodeId)> {
    if ast.classify_arc(u, v) != ArcDir::Down {
      return vec![];
    }
    let mut new_ast = ast.copy();
    let idx = new_ast.get_arc_index(u, v);
    let new_leaf = new_ast.add_node(Label::Symbol(sigma.to_string()));
    let question = new_ast.add_node(Label::Question);
    new_ast.set_child(question, new_leaf);
    let dot = new_ast.add_node(Label::Concat);
    new_ast.set_children(dot, vec![question, v]);
    new_ast.set_ith_child(u, idx, dot);
    vec![(new_ast, new_leaf)]
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::example::Example;
  use std::collections::HashSet;

  #[test]
  fn inserts_an_optional_leaf_ahead_of_v() {
    let mut ast = RegexpAst::new();
    let a = ast.add_node(Label::Symbol("a".to_string()));
    ast.set_child(ast.root(), a);
    let ctx_example = Example::word("ba");
    let reach: HashSet<(NodeId, NodeId)> = HashSet::new();
    let ctx = MutateContext {
      prefix: &[],
      target_pa_state: None,
      previous_examples: &[],
      current_example: &ctx_example,
      epsilon_reachables: &reach,
      up_dot_mode: Default::default(),
    };
    let out = DownDot.mutate(&ast, "b", ast.root(), a, &ctx);
    assert_eq!(out.len(), 1);
    let (mutant, new_leaf) = &out[0];
    assert!(mutant.recognizes("a"));
    assert!(mutant.recognizes("ba"));
    assert!(!mutant.recognizes("b"));
    assert_eq!(mutant.label_str(*new_leaf), "b");
  }
}
