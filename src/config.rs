//! # Sieve Configuration
//!
//! [`SieveConfig`] carries the three knobs of a sieve run: how many primes to
//! take, where the counter starts, and what happens to the stages afterwards.
//! Every field has a default, so a partial JSON document is a valid config.
//!
//! ```rust
//! use primeweave::{SieveConfig, Teardown};
//!
//! let config = SieveConfig::from_json_str(r#"{ "count": 100, "teardown": "cancel" }"#).unwrap();
//! assert_eq!(config.count, 100);
//! assert_eq!(config.start, 2);
//! assert_eq!(config.teardown, Teardown::Cancel);
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of primes taken when nothing else is configured.
pub const DEFAULT_COUNT: usize = 5;

/// First value emitted by the counter, the smallest prime.
pub const DEFAULT_START: u64 = 2;

/// What happens to the stage tasks once the requested primes have been read.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Teardown {
  /// Leave every stage parked on its next send until the process exits.
  #[default]
  Leak,
  /// Cancel every stage and wait for all of them to return.
  Cancel,
}

/// Configuration for one sieve run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SieveConfig {
  /// How many primes to take.
  pub count: usize,
  /// First value emitted by the counter.
  ///
  /// Must be 2 for the output to be the sequence of primes. Not validated.
  pub start: u64,
  /// Stage handling after the run.
  pub teardown: Teardown,
}

impl Default for SieveConfig {
  fn default() -> Self {
    Self {
      count: DEFAULT_COUNT,
      start: DEFAULT_START,
      teardown: Teardown::default(),
    }
  }
}

impl SieveConfig {
  /// Sets the number of primes to take.
  #[must_use]
  pub fn with_count(mut self, count: usize) -> Self {
    self.count = count;
    self
  }

  /// Sets the counter's first value.
  #[must_use]
  pub fn with_start(mut self, start: u64) -> Self {
    self.start = start;
    self
  }

  /// Sets the teardown policy.
  #[must_use]
  pub fn with_teardown(mut self, teardown: Teardown) -> Self {
    self.teardown = teardown;
    self
  }

  /// Parses a config from JSON. Missing fields take their defaults.
  pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(json)
  }

  /// Reads and parses a JSON config file.
  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json_str(&contents).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }
}
