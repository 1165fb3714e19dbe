//! # Handoff Channels
//!
//! Adjacent stages are connected by a single-producer, single-consumer tokio
//! channel with room for exactly one value. A stage cannot run more than one
//! value ahead of its reader, so a slow reader stalls the whole chain upstream
//! of it. Values leave a channel in the order they entered it.
//!
//! tokio's bounded channel cannot be created with zero capacity, so a single
//! slot is the closest available approximation of a rendezvous.

use futures::Stream;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

/// Number of values a handoff channel can hold.
pub const HANDOFF_CAPACITY: usize = 1;

/// A boxed stream of integers, the currency between sieve stages.
pub type ValueStream = Pin<Box<dyn Stream<Item = u64> + Send>>;

/// Creates a single-slot handoff channel.
pub fn handoff<T>() -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
  mpsc::channel(HANDOFF_CAPACITY)
}

/// Exposes the receiving half of a handoff channel as a boxed stream.
pub fn into_stream<T: Send + 'static>(
  rx: mpsc::Receiver<T>,
) -> Pin<Box<dyn Stream<Item = T> + Send>> {
  Box::pin(ReceiverStream::new(rx))
}

/// Outcome of handing one value to the downstream stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
  /// The reader took the value.
  Delivered,
  /// Shutdown was requested while waiting for the reader.
  Cancelled,
  /// The reader was dropped.
  Disconnected,
}

/// Sends `value` downstream, waiting for a free slot unless `shutdown` fires first.
pub async fn deliver<T>(
  tx: &mpsc::Sender<T>,
  value: T,
  shutdown: &CancellationToken,
) -> Delivery {
  tokio::select! {
    biased;
    _ = shutdown.cancelled() => Delivery::Cancelled,
    sent = tx.send(value) => match sent {
      Ok(()) => Delivery::Delivered,
      Err(_) => Delivery::Disconnected,
    },
  }
}
