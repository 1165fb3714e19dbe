//! Built-in transformers.

/// The per-prime filter stage.
pub mod prime_filter;

pub use prime_filter::PrimeFilterTransformer;
