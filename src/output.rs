//! Output trait for components that produce output streams.
//!
//! The [`Output`] trait is implemented by producers and transformers. It names
//! the item type a component emits and the concrete stream type carrying those
//! items, so stages can be wired together with their types checked at compile
//! time.
//!
//! ```rust
//! use primeweave::output::Output;
//! use futures::Stream;
//! use std::pin::Pin;
//!
//! struct MySource;
//!
//! impl Output for MySource {
//!     type Output = u64;
//!     type OutputStream = Pin<Box<dyn Stream<Item = u64> + Send>>;
//! }
//! ```

// Import for rustdoc links
#[allow(unused_imports)]
use crate::input::Input;

use futures::Stream;

/// Trait for components that can produce output streams.
///
/// The output stream of one stage becomes the [`Input::InputStream`] of the next,
/// so the stream type must be `Send + 'static` to cross task boundaries.
pub trait Output
where
  Self::Output: Send + 'static,
{
  /// The type of items produced by this output stream.
  type Output;
  /// The output stream type that yields items of type `Self::Output`.
  type OutputStream: Stream<Item = Self::Output> + Send + 'static;
}
