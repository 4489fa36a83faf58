use thiserror::Error;

/// Recoverable errors surfaced across this crate's public API boundary.
///
/// Internal invariant violations (bugs in this crate, not caller misuse) are
/// `debug_assert!`/panic instead, per the error taxonomy this enum covers.
#[derive(Debug, Error)]
pub enum FastError {
  #[error("node id {0} does not belong to this AST's arena")]
  InvalidNodeId(usize),

  #[error("popped an empty CBFS scheduler")]
  EmptyScheduler,

  #[error("pattern table is malformed: {0}")]
  MalformedPatternTable(String),

  #[error("cannot build a PatternAutomaton: {0}")]
  PatternAutomatonConstruction(String),

  #[error("search was given no examples to infer from")]
  NoExamples,
}

pub type FastResult<T> = std::result::Result<T, FastError>;
