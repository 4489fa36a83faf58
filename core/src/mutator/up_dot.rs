use super::{MutateContext, Mutator, UpDotMode};
use crate::ast::{ArcDir, Label, NodeId, RegexpAst};
use crate::example::Example;

/// Precondition: `(u,v)` is upward. Inserts `.` at the arc position, with the
/// original `u`-subtree as first child and a new `σ`-leaf as second. Whether
/// the new leaf gets wrapped under `?` depends on `ctx.up_dot_mode` (see the
/// design notes on the two competing readings of the source material).
pub struct UpDot;

fn build_variant(ast: &RegexpAst, sigma: &str, u: NodeId, v: NodeId, idx: usize, wrap: bool) -> (RegexpAst, NodeId) {
  let mut new_ast = ast.copy();
  let new_leaf = new_ast.add_node(Label::Symbol(sigma.to_string()));
  let second_child = if wrap {
    let question = new_ast.add_node(Label::Question);
    new_ast.set_child(question, new_leaf);
    question
  } else {
    new_leaf
  };
  let dot = new_ast.add_node(Label::Concat);
  new_ast.set_children(dot, vec![u, second_child]);
  new_ast.set_ith_child(v, idx, dot);
  (new_ast, new_leaf)
}

fn recognizes_prefix_and_priors(ast: &RegexpAst, sigma: &str, new_leaf: NodeId, ctx: &MutateContext) -> bool {
  let prefix_ok = match (ctx.current_example, ctx.target_pa_state) {
    (Example::Pattern(pa), Some(target)) => ast.recognizes_pa_prefix(pa, target, new_leaf),
    _ => {
      let mut consumed = ctx.prefix.to_vec();
      consumed.push(sigma.to_string());
      ast.recognizes_prefix(&consumed, new_leaf)
    }
  };
  prefix_ok && ctx.previous_examples.iter().all(|e| e.recognizes(ast))
}

impl Mutator for UpDot {
  fn name(&self) -> &'static str {
    "UpDot"
  }

  fn mutate(&self, ast: &RegexpAst, sigma: &str, u: NodeId, v: NodeId, ctx: &MutateContext) -> Vec<(RegexpAst, NodeId)> {
    if ast.classify_arc(u, v) != ArcDir::Up {
      return vec![];
    }
    let idx = ast.get_arc_index(u, v);
    let (unwrapped, unwrapped_leaf) = build_variant(ast, sigma, u, v, idx, false);
    let should_wrap = match ctx.up_dot_mode {
      UpDotMode::AlwaysWrap => true,
      UpDotMode::SkipWrapWhenPrefixRecognized => {
        !recognizes_prefix_and_priors(&unwrapped, sigma, unwrapped_leaf, ctx)
      }
    };
    if should_wrap {
      vec![build_variant(ast, sigma, u, v, idx, true)]
    } else {
      vec![(unwrapped, unwrapped_leaf)]
    }
  }
}
