//! Built-in producers.

/// The counting sequence source.
pub mod counter;

pub use counter::CounterProducer;
