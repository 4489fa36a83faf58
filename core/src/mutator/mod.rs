//! The mutator catalog: seven rules that each take a current AST, an
//! epsilon-reachable arc, and a next symbol, and produce zero or more
//! `(new_ast, new_active_leaf)` children.

use crate::ast::NodeId;
use crate::ast::RegexpAst;
use crate::example::Example;
use std::collections::HashSet;

mod activate;
mod bot;
mod bounce_plus;
mod bounce_question;
mod disjunction;
mod down_dot;
mod up_dot;

pub use activate::Activate;
pub use bot::Bot;
pub use bounce_plus::BouncePlus;
pub use bounce_question::BounceQuestion;
pub use disjunction::Disjunction;
pub use down_dot::DownDot;
pub use up_dot::UpDot;

/// Which reading of the `UpDotMutator` `?`-wrap behavior to use (see the
/// design notes): the aggressive reading skips the wrap when the unwrapped
/// result already recognizes the current prefix and every prior example; the
/// conservative reading always wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpDotMode {
  AlwaysWrap,
  SkipWrapWhenPrefixRecognized,
}

impl Default for UpDotMode {
  fn default() -> Self {
    UpDotMode::SkipWrapWhenPrefixRecognized
  }
}

/// Everything a mutator needs beyond the `(ast, σ, u, v)` quadruple: the
/// symbols of the current example consumed so far, the prior examples that
/// must still be recognized, the epsilon-reachables of the arc being
/// expanded, and the `UpDotMutator` mode in effect.
#[derive(Clone, Copy)]
pub struct MutateContext<'a> {
  pub prefix: &'a [String],
  pub target_pa_state: Option<usize>,
  pub previous_examples: &'a [Example],
  pub current_example: &'a Example,
  pub epsilon_reachables: &'a HashSet<(NodeId, NodeId)>,
  pub up_dot_mode: UpDotMode,
}

/// A single rule producing children of a search node.
pub trait Mutator {
  fn name(&self) -> &'static str;

  /// `(ast, σ, u, v, ctx) -> [(new_ast, new_leaf)]`. An unsatisfied
  /// precondition is signaled by an empty, non-panicking result.
  fn mutate(&self, ast: &RegexpAst, sigma: &str, u: NodeId, v: NodeId, ctx: &MutateContext) -> Vec<(RegexpAst, NodeId)>;
}

/// The five mutators that do not themselves recurse into the catalog; used
/// by `BouncePlus`/`BounceQuestion` to expand arcs they newly introduce.
pub fn non_bouncing_catalog() -> Vec<Box<dyn Mutator>> {
  vec![
    Box::new(Bot),
    Box::new(Activate),
    Box::new(Disjunction),
    Box::new(DownDot),
    Box::new(UpDot),
  ]
}

/// The full seven-mutator catalog, in the deterministic order the search
/// driver enumerates them.
pub fn full_catalog() -> Vec<Box<dyn Mutator>> {
  let mut catalog = non_bouncing_catalog();
  catalog.push(Box::new(BouncePlus));
  catalog.push(Box::new(BounceQuestion));
  catalog
}

/// Every directed arc incident to `node`: both directions of the arc to its
/// parent, and both directions of the arc to each of its children. Used by
/// the bouncing mutators to enumerate the arcs a freshly inserted node
/// introduces, so the non-bouncing catalog can be reapplied to them.
pub(crate) fn incident_arcs(ast: &RegexpAst, node: NodeId) -> Vec<(NodeId, NodeId)> {
  let mut arcs = Vec::new();
  if let Some(p) = ast.parent(node) {
    arcs.push((node, p));
    arcs.push((p, node));
  }
  for &c in ast.children(node) {
    arcs.push((c, node));
    arcs.push((node, c));
  }
  arcs
}

/// Every proper, non-empty subset of `items`, in deterministic bitmask order.
pub(crate) fn proper_nonempty_subsets(items: &[NodeId]) -> Vec<Vec<NodeId>> {
  let n = items.len();
  if n == 0 {
    return Vec::new();
  }
  let mut out = Vec::new();
  for mask in 1u32..(1u32 << n).saturating_sub(1) {
    let mut subset = Vec::new();
    for (i, &item) in items.iter().enumerate() {
      if mask & (1 << i) != 0 {
        subset.push(item);
      }
    }
    out.push(subset);
  }
  out
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn proper_nonempty_subsets_excludes_empty_and_full_set() {
    let items = vec![1, 2, 3];
    let subsets = proper_nonempty_subsets(&items);
    assert!(!subsets.iter().any(|s| s.is_empty()));
    assert!(!subsets.iter().any(|s| s.len() == items.len()));
    assert_eq!(subsets.len(), (1 << items.len()) - 2);
  }

  #[test]
  fn proper_nonempty_subsets_of_singleton_is_empty() {
    assert!(proper_nonempty_subsets(&[1]).is_empty());
  }
}
