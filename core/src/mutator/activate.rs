use super::{MutateContext, Mutator};
use crate::ast::{NodeId, RegexpAst};

/// Precondition: `v` is a leaf labeled `σ`. Returns `(ast, v)` unchanged —
/// this mutator's only job is to select an existing leaf as the new active
/// leaf, letting the same node match a later occurrence of its symbol.
pub struct Activate;

impl Mutator for Activate {
  fn name(&self) -> &'static str {
    "Activate"
  }

  fn mutate(&self, ast: &RegexpAst, sigma: &str, _u: NodeId, v: NodeId, _ctx: &MutateContext) -> Vec<(RegexpAst, NodeId)> {
    if !ast.is_leaf(v) || ast.label_str(v) != sigma {
      return vec![];
    }
    vec![(ast.copy(), v)]
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ast::Label;
  use crate::example::Example;
  use std::collections::HashSet;

  #[test]
  fn selects_a_matching_leaf_without_mutating_structure() {
    let mut ast = RegexpAst::new();
    let a = ast.add_node(Label::Symbol("a".to_string()));
    ast.set_child(ast.root(), a);
    let ctx_example = Example::word("a");
    let reach: HashSet<(NodeId, NodeId)> = HashSet::new();
    let ctx = MutateContext {
      prefix: &[],
      target_pa_state: None,
      previous_examples: &[],
      current_example: &ctx_example,
      epsilon_reachables: &reach,
      up_dot_mode: Default::default(),
    };
    let out = Activate.mutate(&ast, "a", ast.root(), a, &ctx);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].1, a);
    assert_eq!(out[0].0.fingerprint(), ast.fingerprint());
    assert!(Activate.mutate(&ast, "b", ast.root(), a, &ctx).is_empty());
  }
}
