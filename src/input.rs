//! Input trait for components that consume input streams.
//!
//! The [`Input`] trait is implemented by transformers and consumers. A filter
//! stage takes ownership of its upstream's output stream as its input, which is
//! why the stream type is moved rather than borrowed.
//!
//! ```rust
//! use primeweave::input::Input;
//! use futures::Stream;
//! use std::pin::Pin;
//!
//! struct MySink;
//!
//! impl Input for MySink {
//!     type Input = u64;
//!     type InputStream = Pin<Box<dyn Stream<Item = u64> + Send>>;
//! }
//! ```

use futures::Stream;
// Import for rustdoc link
#[allow(unused_imports)]
use crate::output::Output;

/// Trait for components that can accept input streams.
///
/// Works together with [`Output`] so that a stage's input type must match the
/// upstream stage's output type.
pub trait Input
where
  Self::Input: Send + 'static,
{
  /// The type of items carried by the input stream.
  type Input;
  /// The input stream type that yields items of type `Self::Input`.
  type InputStream: Stream<Item = Self::Input> + Send + 'static;
}
