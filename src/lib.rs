//! # primeweave
//!
//! The Sieve of Eratosthenes as a concurrent, dynamically grown pipeline.
//!
//! A [`CounterProducer`](producers::CounterProducer) emits every integer from a
//! starting floor. Each time a value survives the whole chain it is prime, and the
//! [`PrimeSieve`](sieve::PrimeSieve) driver appends a
//! [`PrimeFilterTransformer`](transformers::PrimeFilterTransformer) for it at the
//! tail. Every stage runs as its own tokio task and hands values to the next stage
//! over a single-slot channel, so backpressure stalls the whole chain.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), primeweave::error::PipelineError> {
//! let primes = primeweave::sieve::first_primes(5).await?;
//! assert_eq!(primes, vec![2, 3, 5, 7, 11]);
//! # Ok(())
//! # }
//! ```
//!
//! Stages are never torn down implicitly. Once the driver stops pulling, every
//! stage parks on its next send for the rest of the process. Call
//! [`PrimeSieve::shutdown`](sieve::PrimeSieve::shutdown) to cancel and join them.

#![deny(missing_docs)]

/// Single-slot handoff channels connecting adjacent stages.
pub mod channel;
/// Sieve configuration.
pub mod config;
/// Consumer trait and configuration.
pub mod consumer;
/// Built-in consumers.
pub mod consumers;
/// Error types.
pub mod error;
/// Input trait for components that consume streams.
pub mod input;
/// Output trait for components that produce streams.
pub mod output;
/// Producer trait and configuration.
pub mod producer;
/// Built-in producers.
pub mod producers;
/// The prime sieve driver.
pub mod sieve;
/// Stage identity and exit bookkeeping.
pub mod stage;
/// Transformer trait and configuration.
pub mod transformer;
/// Built-in transformers.
pub mod transformers;

pub use config::{SieveConfig, Teardown};
pub use consumer::{Consumer, ConsumerConfig};
pub use error::{ConfigError, PipelineError};
pub use input::Input;
pub use output::Output;
pub use producer::{Producer, ProducerConfig};
pub use sieve::{PrimeSieve, first_primes, first_primes_with};
pub use transformer::{Transformer, TransformerConfig};

#[cfg(test)]
mod sieve_test;
