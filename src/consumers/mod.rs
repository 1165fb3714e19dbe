//! Built-in consumers.

/// Writes each item on its own line.
pub mod console;
/// Collects items into a vector.
pub mod vec;

pub use console::ConsoleConsumer;
pub use vec::VecConsumer;
