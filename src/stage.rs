//! # Stage Bookkeeping
//!
//! Every stage in the chain runs as its own tokio task. [`StageId`] names a
//! stage in logs and errors, and [`StageExit`] records why its task returned.
//!
//! ```rust
//! use primeweave::stage::StageId;
//!
//! assert_eq!(StageId::Source { start: 2 }.to_string(), "source(2)");
//! assert_eq!(StageId::Filter { prime: 7 }.to_string(), "filter(7)");
//! ```

use std::fmt;
use tokio::task::JoinHandle;

/// Identity of a stage in the sieve chain.
///
/// The source is identified by the value it started counting from, a filter by
/// the prime whose multiples it drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
  /// The sequence source.
  Source {
    /// First value emitted.
    start: u64,
  },
  /// A prime filter stage.
  Filter {
    /// The prime this stage filters on.
    prime: u64,
  },
}

impl fmt::Display for StageId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StageId::Source { start } => write!(f, "source({})", start),
      StageId::Filter { prime } => write!(f, "filter({})", prime),
    }
  }
}

/// Why a stage task returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageExit {
  /// The shutdown token was cancelled.
  Cancelled,
  /// The downstream reader went away.
  Disconnected,
  /// The upstream stream ended.
  InputClosed,
  /// The counter reached `u64::MAX`.
  Exhausted,
}

/// Handle to a spawned stage task.
pub type StageTask = JoinHandle<StageExit>;
