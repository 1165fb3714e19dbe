use crate::consumer::{Consumer, ConsumerConfig};
use crate::error::StreamError;
use crate::input::Input;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::fmt::Debug;
use std::pin::Pin;

/// Collects every item it receives, in arrival order.
pub struct VecConsumer<T> {
  vec: Vec<T>,
  config: ConsumerConfig,
}

impl<T> VecConsumer<T> {
  /// Creates an empty collector.
  pub fn new() -> Self {
    Self::with_capacity(0)
  }

  /// Creates an empty collector with room for `capacity` items.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      vec: Vec::with_capacity(capacity),
      config: ConsumerConfig::default().with_name("vec".to_string()),
    }
  }

  /// Items collected so far.
  pub fn items(&self) -> &[T] {
    &self.vec
  }

  /// Consumes the collector, returning the items.
  pub fn into_vec(self) -> Vec<T> {
    self.vec
  }
}

impl<T> Default for VecConsumer<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Input for VecConsumer<T>
where
  T: Debug + Send + 'static,
{
  type Input = T;
  type InputStream = Pin<Box<dyn Stream<Item = T> + Send>>;
}

#[async_trait]
impl<T> Consumer for VecConsumer<T>
where
  T: Debug + Send + 'static,
{
  async fn consume(&mut self, mut stream: Self::InputStream) -> Result<(), StreamError<T>> {
    while let Some(item) = stream.next().await {
      self.vec.push(item);
    }
    Ok(())
  }

  fn set_config_impl(&mut self, config: ConsumerConfig) {
    self.config = config;
  }

  fn get_config_impl(&self) -> &ConsumerConfig {
    &self.config
  }

  fn get_config_mut_impl(&mut self) -> &mut ConsumerConfig {
    &mut self.config
  }
}
