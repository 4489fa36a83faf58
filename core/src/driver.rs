//! The top-level search driver: CBFS over search items, walking each example
//! symbol by symbol and invoking the mutator catalog at every epsilon-
//! reachable arc from the active leaf.

use crate::ast::{NodeId, RegexpAst};
use crate::cbfs::Cbfs;
use crate::error::{FastError, FastResult};
use crate::example::Example;
use crate::mutator::{full_catalog, MutateContext, UpDotMode};
use crate::objective::{Objective, ObjectiveKind};
use crate::visitor::{NoopVisitor, Visitor};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::HashSet;

/// One entry in the CBFS queue. Ordered solely by `(objective, push_seq)`,
/// ascending, so the scheduler's min-heaps pop the best-looking item first
/// and break ties by push order for determinism.
#[derive(Clone)]
pub struct SearchItem {
  pub ast: RegexpAst,
  pub active_leaf: NodeId,
  pub example_index: usize,
  pub k: usize,
  pub objective: OrderedFloat<f64>,
  pub consumed_prefix: Vec<String>,
  pub push_seq: u64,
}

impl SearchItem {
  pub(crate) fn new(ast: RegexpAst, active_leaf: NodeId, example_index: usize, k: usize, objective: OrderedFloat<f64>) -> Self {
    SearchItem {
      ast,
      active_leaf,
      example_index,
      k,
      objective,
      consumed_prefix: Vec::new(),
      push_seq: 0,
    }
  }
}

impl PartialEq for SearchItem {
  fn eq(&self, other: &Self) -> bool {
    self.objective == other.objective && self.push_seq == other.push_seq
  }
}

impl Eq for SearchItem {}

impl PartialOrd for SearchItem {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for SearchItem {
  fn cmp(&self, other: &Self) -> Ordering {
    (self.objective, self.push_seq).cmp(&(other.objective, other.push_seq))
  }
}

/// Every tunable named across the objective, CBFS, and `UpDotMutator`
/// sections of the design: the objective family, the CBFS quota, the
/// `UpDotMutator` wrap mode, and the stop condition. `default()` reproduces
/// the defaults stated throughout: additive objective, quota 1, aggressive
/// `UpDotMode`, stop at the first result.
pub struct SearchConfig {
  pub objective_kind: ObjectiveKind,
  pub cbfs_quota: usize,
  pub up_dot_mode: UpDotMode,
  pub stop_condition: Box<dyn Fn(&[(OrderedFloat<f64>, RegexpAst)], f64) -> bool>,
}

impl Default for SearchConfig {
  fn default() -> Self {
    SearchConfig {
      objective_kind: ObjectiveKind::Additive,
      cbfs_quota: 1,
      up_dot_mode: UpDotMode::default(),
      stop_condition: Box::new(|results, _elapsed| !results.is_empty()),
    }
  }
}

/// Cumulative count of consumed example characters at `(example_index, k)`,
/// used both as the CBFS layer index and as half of the dedup key.
fn progression_of(examples: &[Example], example_index: usize, k: usize) -> usize {
  examples[..example_index].iter().map(Example::len).sum::<usize>() + k
}

/// The set of distinct symbol/pattern labels appearing anywhere across the
/// examples, used as `|Σ|` for density. Every position of a `PatternAutomaton`
/// exposes its own out-edges directly, so this needs no path traversal.
fn distinct_alphabet_size(examples: &[Example]) -> usize {
  let mut labels: HashSet<String> = HashSet::new();
  for e in examples {
    for k in 0..=e.len() {
      for (label, _) in e.next_symbols(k) {
        labels.insert(label);
      }
    }
  }
  labels.len()
}

/// Runs the search to completion (or until `stop_condition` fires) with no
/// observer attached.
pub fn run_search(examples: &[Example], config: SearchConfig) -> FastResult<Vec<(OrderedFloat<f64>, RegexpAst)>> {
  run_search_with_visitor(examples, config, &mut NoopVisitor)
}

/// Runs the search, reporting every hook of §4.6 to `visitor`.
pub fn run_search_with_visitor(
  examples: &[Example],
  config: SearchConfig,
  visitor: &mut dyn Visitor,
) -> FastResult<Vec<(OrderedFloat<f64>, RegexpAst)>> {
  if examples.is_empty() {
    return Err(FastError::NoExamples);
  }
  visitor.on_init(examples);

  let alphabet_size = distinct_alphabet_size(examples).max(1);
  let mut objective = Objective::for_examples_with_kind(examples, alphabet_size, config.objective_kind);
  let num_layers = examples.iter().map(Example::len).sum::<usize>() + 1;

  let mut scheduler: Cbfs<SearchItem> = Cbfs::new(num_layers, config.cbfs_quota);
  let mut seen: HashSet<(usize, String, NodeId)> = HashSet::new();
  let mut push_seq: u64 = 0;
  let mut results: Vec<(OrderedFloat<f64>, RegexpAst)> = Vec::new();
  let catalog = full_catalog();
  let start = std::time::Instant::now();

  let initial_ast = RegexpAst::new();
  let initial_value = objective.evaluate(&initial_ast);
  let root = initial_ast.root();
  scheduler.push(SearchItem::new(initial_ast, root, 0, 0, initial_value), 0);
  push_seq += 1;

  while !scheduler.is_empty() {
    if (config.stop_condition)(&results, start.elapsed().as_secs_f64()) {
      break;
    }
    let mut item = scheduler.pop().expect("checked non-empty above");
    visitor.on_pop(&item);

    if item.k == examples[item.example_index].len() {
      item.example_index += 1;
      item.k = 0;
      item.active_leaf = item.ast.root();
      item.consumed_prefix.clear();
      visitor.on_end_example();
      if !examples[..item.example_index].iter().all(|e| e.recognizes(&item.ast)) {
        continue;
      }
    }

    if item.example_index == examples.len() || examples.iter().all(|e| e.recognizes(&item.ast)) {
      let value = objective.evaluate(&item.ast);
      visitor.on_final_solution(value, &item.ast);
      results.push((value, item.ast));
      continue;
    }

    let reach = item.ast.epsilon_reachables_from_leaf(item.active_leaf);
    let mut reach_arcs: Vec<(NodeId, NodeId)> = reach.iter().copied().collect();
    reach_arcs.sort_unstable();

    let example = &examples[item.example_index];
    let previous_examples = &examples[..item.example_index];

    for &(u, v) in &reach_arcs {
      for (sigma, new_k) in example.next_symbols(item.k) {
        let target_pa_state = match example {
          Example::Pattern(_) => Some(new_k),
          Example::Word(_) => None,
        };
        let ctx = MutateContext {
          prefix: &item.consumed_prefix,
          target_pa_state,
          previous_examples,
          current_example: example,
          epsilon_reachables: &reach,
          up_dot_mode: config.up_dot_mode,
        };
        for mutator in &catalog {
          for (mut new_ast, new_leaf) in mutator.mutate(&item.ast, &sigma, u, v, &ctx) {
            new_ast.simplify();
            let progression = progression_of(examples, item.example_index, new_k);
            let fingerprint = new_ast.fingerprint();
            if !seen.insert((progression, fingerprint, new_leaf)) {
              continue;
            }
            let value = objective.evaluate(&new_ast);
            let mut consumed_prefix = item.consumed_prefix.clone();
            consumed_prefix.push(sigma.clone());
            let mut child = SearchItem::new(new_ast, new_leaf, item.example_index, new_k, value);
            child.consumed_prefix = consumed_prefix;
            child.push_seq = push_seq;
            push_seq += 1;
            visitor.on_push(mutator.name(), progression, &child);
            scheduler.push(child, progression);
          }
        }
      }
    }
  }

  Ok(results)
}
