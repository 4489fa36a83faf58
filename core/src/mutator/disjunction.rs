use super::{MutateContext, Mutator};
use crate::ast::{ArcDir, Label, NodeId, RegexpAst};

/// Precondition: `(u,v)` is downward. Inserts `|` in place of `v` under `u`,
/// with the original `v` and a new `σ`-leaf as siblings.
pub struct Disjunction;

impl Mutator for Disjunction {
  fn name(&self) -> &'static str {
    "Disjunction"
  }

  fn mutate(&self, ast: &RegexpAst, sigma: &str, u: NodeId, v: NodeId, _ctx: &MutateContext) -> Vec<(RegexpAst, NodeId)> {
    if ast.classify_arc(u, v) != ArcDir::Down {
      return vec![];
    }
    let mut new_ast = ast.copy();
    let idx = new_ast.get_arc_index(u, v);
    let new_leaf = new_ast.add_node(Label::Symbol(sigma.to_string()));
    let alt = new_ast.add_node(Label::Alt);
    new_ast.set_children(alt, vec![v, new_leaf]);
    new_ast.set_ith_child(u, idx, alt);
    vec![(new_ast, new_leaf)]
  }
}
