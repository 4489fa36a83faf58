use super::{incident_arcs, non_bouncing_catalog, proper_nonempty_subsets, MutateContext, Mutator};
use crate::ast::{ArcDir, Label, NodeId, RegexpAst};
use std::collections::HashSet;

/// Precondition: `(u,v)` downward. Symmetric to [`super::BouncePlus`] with
/// `?` in place of `+`: wraps `v`, and optionally some of its siblings under
/// `u`, in a new `?` node, then reapplies the non-bouncing catalog to every
/// arc the wrap introduces. Yields no mutants of its own, only the recursive
/// calls'.
pub struct BounceQuestion;

fn wrap_simple(ast: &RegexpAst, u: NodeId, v: NodeId) -> (RegexpAst, Vec<(NodeId, NodeId)>) {
  let mut new_ast = ast.copy();
  let idx = new_ast.get_arc_index(u, v);
  let q = new_ast.add_node(Label::Question);
  new_ast.set_child(q, v);
  new_ast.set_ith_child(u, idx, q);
  let arcs = incident_arcs(&new_ast, q);
  (new_ast, arcs)
}

/// `u` is `.`: wraps `u.children[idx_v..=end]` under `?(.(…))`, for `end`
/// ranging over every position strictly after `v`'s own index.
fn wrap_concat_slice(ast: &RegexpAst, u: NodeId, idx_v: usize, end: usize) -> (RegexpAst, Vec<(NodeId, NodeId)>) {
  let mut new_ast = ast.copy();
  let orig = new_ast.children(u).to_vec();
  let slice = orig[idx_v..=end].to_vec();
  let concat = new_ast.add_node(Label::Concat);
  new_ast.set_children(concat, slice);
  let q = new_ast.add_node(Label::Question);
  new_ast.set_child(q, concat);
  let mut new_children = orig[..idx_v].to_vec();
  new_children.push(q);
  new_children.extend_from_slice(&orig[end + 1..]);
  new_ast.set_children(u, new_children);
  let mut arcs = incident_arcs(&new_ast, q);
  arcs.extend(incident_arcs(&new_ast, concat));
  (new_ast, arcs)
}

/// `u` is `|`: moves `v` together with `subset` (drawn from `u`'s other
/// children) under a new `?(|(…))`, replacing `v`'s original slot.
fn wrap_alt_subset(ast: &RegexpAst, u: NodeId, v: NodeId, subset: &[NodeId]) -> (RegexpAst, Vec<(NodeId, NodeId)>) {
  let mut new_ast = ast.copy();
  let orig = new_ast.children(u).to_vec();
  let subset_set: HashSet<NodeId> = subset.iter().copied().collect();
  let mut alt_children = vec![v];
  alt_children.extend(subset.iter().copied());
  let alt = new_ast.add_node(Label::Alt);
  new_ast.set_children(alt, alt_children);
  let q = new_ast.add_node(Label::Question);
  new_ast.set_child(q, alt);
  let mut new_children = Vec::with_capacity(orig.len());
  for &c in &orig {
    if c == v {
      new_children.push(q);
    } else if subset_set.contains(&c) {
      continue;
    } else {
      new_children.push(c);
    }
  }
  new_ast.set_children(u, new_children);
  let mut arcs = incident_arcs(&new_ast, q);
  arcs.extend(incident_arcs(&new_ast, alt));
  (new_ast, arcs)
}

impl Mutator for BounceQuestion {
  fn name(&self) -> &'static str {
    "BounceQuestion"
  }

  fn mutate(&self, ast: &RegexpAst, sigma: &str, u: NodeId, v: NodeId, ctx: &MutateContext) -> Vec<(RegexpAst, NodeId)> {
    if ast.classify_arc(u, v) != ArcDir::Down {
      return vec![];
    }

    let mut hosts = vec![wrap_simple(ast, u, v)];

    if matches!(ast.label(u), Label::Concat) {
      let idx_v = ast.get_arc_index(u, v);
      let last = ast.children(u).len() - 1;
      for end in (idx_v + 1)..=last {
        hosts.push(wrap_concat_slice(ast, u, idx_v, end));
      }
    }

    if matches!(ast.label(u), Label::Alt) {
      let others: Vec<NodeId> = ast.children(u).iter().copied().filter(|&c| c != v).collect();
      for subset in proper_nonempty_subsets(&others) {
        hosts.push(wrap_alt_subset(ast, u, v, &subset));
      }
    }

    let mut out = Vec::new();
    for (new_ast, arcs) in hosts {
      for (a, b) in arcs {
        let local_reach = new_ast.epsilon_reachables(a, b);
        let local_ctx = MutateContext {
          epsilon_reachables: &local_reach,
          ..*ctx
        };
        for m in non_bouncing_catalog() {
          out.extend(m.mutate(&new_ast, sigma, a, b, &local_ctx));
        }
      }
    }
    out
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::example::Example;

  #[test]
  fn wraps_a_leaf_as_optional_and_recurses_into_the_new_arcs() {
    let mut ast = RegexpAst::new();
    let a = ast.add_node(Label::Symbol("a".to_string()));
    ast.set_child(ast.root(), a);
    let ctx_example = Example::word("ab");
    let reach: HashSet<(NodeId, NodeId)> = HashSet::new();
    let ctx = MutateContext {
      prefix: &["a".to_string()],
      target_pa_state: None,
      previous_examples: &[],
      current_example: &ctx_example,
      epsilon_reachables: &reach,
      up_dot_mode: Default::default(),
    };
    let out = BounceQuestion.mutate(&ast, "b", ast.root(), a, &ctx);
    assert!(!out.is_empty());
    assert!(out.iter().any(|(m, _)| m.recognizes("ab")));
  }

  #[test]
  fn does_not_apply_to_an_upward_arc() {
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
    assert!(BounceQuestion.mutate(&ast, "a", a, ast.root(), &ctx).is_empty());
  }
}
