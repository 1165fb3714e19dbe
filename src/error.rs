//! # Error Handling
//!
//! A correctly driven sieve has no recoverable error conditions: the modulo in a
//! filter stage cannot fail and stages never close their streams on their own.
//! The types here cover the edges where something outside the core intervenes:
//!
//! - **StreamError**: a consumer could not accept a value, with rich context
//!   (timestamp, the offending item, component information).
//! - **PipelineError**: driver-level failures: the head stream closed after
//!   cancellation, a consumer failed or kept its stream, or a stage task
//!   panicked.
//! - **ConfigError**: a config file could not be read or parsed.
//! - **ComponentInfo** / **ErrorContext**: identification of the failing
//!   component for logs and error messages.

use crate::stage::StageId;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Error raised by a component while handling a stream.
///
/// # Example
///
/// ```rust
/// use primeweave::error::{ComponentInfo, ErrorContext, StreamError};
///
/// let error = StreamError::new(
///     Box::new(std::io::Error::from(std::io::ErrorKind::BrokenPipe)),
///     ErrorContext {
///         timestamp: chrono::Utc::now(),
///         item: Some(7u64),
///         component_name: "console".to_string(),
///         component_type: "ConsoleConsumer".to_string(),
///     },
///     ComponentInfo::new("console".to_string(), "ConsoleConsumer".to_string()),
/// );
/// assert_eq!(error.context.item, Some(7));
/// ```
#[derive(Debug)]
pub struct StreamError<T> {
  /// The original error that occurred.
  pub source: Box<dyn Error + Send + Sync>,
  /// Context about when and where the error occurred.
  pub context: ErrorContext<T>,
  /// Information about the component that encountered the error.
  pub component: ComponentInfo,
}

impl<T: fmt::Debug> StreamError<T> {
  /// Creates a new `StreamError` from a source error, its context and the component.
  pub fn new(
    source: Box<dyn Error + Send + Sync>,
    context: ErrorContext<T>,
    component: ComponentInfo,
  ) -> Self {
    Self {
      source,
      context,
      component,
    }
  }
}

impl<T: fmt::Debug> fmt::Display for StreamError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Error in {} ({}): {}",
      self.component.name, self.component.type_name, self.source
    )
  }
}

impl<T: fmt::Debug> Error for StreamError<T> {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(self.source.as_ref())
  }
}

/// Context information about when and where an error occurred.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext<T> {
  /// The timestamp when the error occurred.
  pub timestamp: chrono::DateTime<chrono::Utc>,
  /// The item being processed when the error occurred, if available.
  pub item: Option<T>,
  /// The name of the component that encountered the error.
  pub component_name: String,
  /// The type of the component that encountered the error.
  pub component_type: String,
}

/// Identifying information about a pipeline component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInfo {
  /// The name of the component.
  pub name: String,
  /// The type name of the component.
  pub type_name: String,
}

impl ComponentInfo {
  /// Creates a new `ComponentInfo` with the given name and type name.
  pub fn new(name: String, type_name: String) -> Self {
    Self { name, type_name }
  }
}

/// Errors surfaced by the [`PrimeSieve`](crate::sieve::PrimeSieve) driver.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
  /// The pipeline head stopped yielding values.
  ///
  /// Only happens once the sieve has been shut down, or when a stage task died.
  #[error("pipeline head closed after stage {stage}")]
  HeadClosed {
    /// The most recently installed stage at the time the head closed.
    stage: StageId,
  },
  /// A consumer refused a value.
  #[error(transparent)]
  Consumer(#[from] StreamError<u64>),
  /// A consumer returned from [`PrimeSieve::run`](crate::sieve::PrimeSieve::run)
  /// while still holding the stream it was given.
  #[error("consumer kept the prime stream after returning")]
  StreamRetained,
  /// A stage task panicked or was aborted.
  #[error("stage task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

/// Failure to load a [`SieveConfig`](crate::config::SieveConfig) from disk.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The file could not be read.
  #[error("failed to read config {}: {source}", .path.display())]
  Read {
    /// The file that was requested.
    path: PathBuf,
    /// The underlying I/O failure.
    #[source]
    source: std::io::Error,
  },
  /// The file is not a valid JSON config.
  #[error("invalid config {}: {source}", .path.display())]
  Parse {
    /// The file that was read.
    path: PathBuf,
    /// The underlying parse failure.
    #[source]
    source: serde_json::Error,
  },
}
