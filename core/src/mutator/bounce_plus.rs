use super::{incident_arcs, non_bouncing_catalog, proper_nonempty_subsets, MutateContext, Mutator};
use crate::ast::{ArcDir, Label, NodeId, RegexpAst};
use std::collections::HashSet;

/// Precondition: `(u,v)` upward and `(v,u)` not already ε-reachable from
/// `(u,v)`. Wraps `u`, and optionally some of its siblings under `v`, in a
/// new `+` node, then reapplies the non-bouncing catalog to every arc the
/// wrap introduces. Yields no mutants of its own, only the recursive calls'.
pub struct BouncePlus;

fn wrap_simple(ast: &RegexpAst, u: NodeId, v: NodeId) -> (RegexpAst, Vec<(NodeId, NodeId)>) {
  let mut new_ast = ast.copy();
  let idx = new_ast.get_arc_index(u, v);
  let plus = new_ast.add_node(Label::Plus);
  new_ast.set_child(plus, u);
  new_ast.set_ith_child(v, idx, plus);
  let arcs = incident_arcs(&new_ast, plus);
  (new_ast, arcs)
}

/// `v` is `.`: wraps `v.children[j..=idx_u]` under `+(.(…))`, for `j` ranging
/// over every position strictly before `u`'s own index.
fn wrap_concat_slice(ast: &RegexpAst, v: NodeId, j: usize, idx_u: usize) -> (RegexpAst, Vec<(NodeId, NodeId)>) {
  let mut new_ast = ast.copy();
  let orig = new_ast.children(v).to_vec();
  let slice = orig[j..=idx_u].to_vec();
  let concat = new_ast.add_node(Label::Concat);
  new_ast.set_children(concat, slice);
  let plus = new_ast.add_node(Label::Plus);
  new_ast.set_child(plus, concat);
  let mut new_children = orig[..j].to_vec();
  new_children.push(plus);
  new_children.extend_from_slice(&orig[idx_u + 1..]);
  new_ast.set_children(v, new_children);
  let mut arcs = incident_arcs(&new_ast, plus);
  arcs.extend(incident_arcs(&new_ast, concat));
  (new_ast, arcs)
}

/// `v` is `|`: moves `u` together with `subset` (drawn from `v`'s other
/// children) under a new `+(|(…))`, replacing `u`'s original slot.
fn wrap_alt_subset(ast: &RegexpAst, v: NodeId, u: NodeId, subset: &[NodeId]) -> (RegexpAst, Vec<(NodeId, NodeId)>) {
  let mut new_ast = ast.copy();
  let orig = new_ast.children(v).to_vec();
  let subset_set: HashSet<NodeId> = subset.iter().copied().collect();
  let mut alt_children = vec![u];
  alt_children.extend(subset.iter().copied());
  let alt = new_ast.add_node(Label::Alt);
  new_ast.set_children(alt, alt_children);
  let plus = new_ast.add_node(Label::Plus);
  new_ast.set_child(plus, alt);
  let mut new_children = Vec::with_capacity(orig.len());
  for &c in &orig {
    if c == u {
      new_children.push(plus);
    } else if subset_set.contains(&c) {
      continue;
    } else {
      new_children.push(c);
    }
  }
  new_ast.set_children(v, new_children);
  let mut arcs = incident_arcs(&new_ast, plus);
  arcs.extend(incident_arcs(&new_ast, alt));
  (new_ast, arcs)
}

impl Mutator for BouncePlus {
  fn name(&self) -> &'static str {
    "BouncePlus"
  }

  fn mutate(&self, ast: &RegexpAst, sigma: &str, u: NodeId, v: NodeId, ctx: &MutateContext) -> Vec<(RegexpAst, NodeId)> {
    if ast.classify_arc(u, v) != ArcDir::Up {
      return vec![];
    }
    if ast.epsilon_reachables(u, v).contains(&(v, u)) {
      return vec![];
    }

    let mut hosts = vec![wrap_simple(ast, u, v)];

    if matches!(ast.label(v), Label::Concat) {
      let idx_u = ast.get_arc_index(u, v);
      for j in 0..idx_u {
        hosts.push(wrap_concat_slice(ast, v, j, idx_u));
      }
    }

    if matches!(ast.label(v), Label::Alt) {
      let others: Vec<NodeId> = ast.children(v).iter().copied().filter(|&c| c != u).collect();
      for subset in proper_nonempty_subsets(&others) {
        hosts.push(wrap_alt_subset(ast, v, u, &subset));
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
  fn wraps_a_leaf_in_a_loop_and_recurses_into_the_new_arcs() {
    let mut ast = RegexpAst::new();
    let a = ast.add_node(Label::Symbol("a".to_string()));
    ast.set_child(ast.root(), a);
    let ctx_example = Example::word("aab");
    let reach: HashSet<(NodeId, NodeId)> = HashSet::new();
    let ctx = MutateContext {
      prefix: &["a".to_string()],
      target_pa_state: None,
      previous_examples: &[],
      current_example: &ctx_example,
      epsilon_reachables: &reach,
      up_dot_mode: Default::default(),
    };
    let out = BouncePlus.mutate(&ast, "b", a, ast.root(), &ctx);
    assert!(!out.is_empty());
    assert!(out.iter().any(|(m, _)| m.recognizes("ab") && m.recognizes("aab")));
  }

  #[test]
  fn does_not_fire_when_a_loop_back_already_exists() {
    let mut ast = RegexpAst::new();
    let a = ast.add_node(Label::Symbol("a".to_string()));
    let plus = ast.add_node(Label::Plus);
    ast.set_child(plus, a);
    ast.set_child(ast.root(), plus);
    let ctx_example = Example::word("aa");
    let reach: HashSet<(NodeId, NodeId)> = HashSet::new();
    let ctx = MutateContext {
      prefix: &["a".to_string()],
      target_pa_state: None,
      previous_examples: &[],
      current_example: &ctx_example,
      epsilon_reachables: &reach,
      up_dot_mode: Default::default(),
    };
    assert!(BouncePlus.mutate(&ast, "a", a, plus, &ctx).is_empty());
  }
}
