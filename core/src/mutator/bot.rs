use super::{MutateContext, Mutator};
use crate::ast::{Label, NodeId, RegexpAst};

/// Precondition: the AST is empty (only the root sentinel). Creates one leaf
/// labeled `σ` as the root's child.
pub struct Bot;

impl Mutator for Bot {
  fn name(&self) -> &'static str {
    "Bot"
  }

  fn mutate(&self, ast: &RegexpAst, sigma: &str, _u: NodeId, _v: NodeId, _ctx: &MutateContext) -> Vec<(RegexpAst, NodeId)> {
    if !ast.is_empty() {
      return vec![];
    }
    let mut new_ast = ast.copy();
    let leaf = new_ast.add_node(Label::Symbol(sigma.to_string()));
    new_ast.set_child(new_ast.root(), leaf);
    vec![(new_ast, leaf)]
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::example::Example;
  use std::collections::HashSet;

  #[test]
  fn fires_only_on_an_empty_ast() {
    let empty = RegexpAst::new();
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
    let root = empty.root();
    let out = Bot.mutate(&empty, "a", root, root, &ctx);
    assert_eq!(out.len(), 1);
    assert!(out[0].0.recognizes("a"));

    let mut nonempty = empty.copy();
    let leaf = nonempty.add_node(Label::Symbol("a".to_string()));
    nonempty.set_child(nonempty.root(), leaf);
    assert!(Bot.mutate(&nonempty, "b", root, root, &ctx).is_empty());
  }
}
