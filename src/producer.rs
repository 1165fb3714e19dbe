//! # Producer Trait
//!
//! Producers sit at the start of a pipeline and generate the stream everything
//! downstream consumes. In the sieve the only producer is the
//! [`CounterProducer`](crate::producers::CounterProducer), which runs as its own
//! task for the life of the pipeline.

use crate::error::ComponentInfo;
use crate::output::Output;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Configuration for a producer component.
#[derive(Debug, Clone, Default)]
pub struct ProducerConfig {
  /// Optional name for identifying this producer in logs.
  pub name: Option<String>,
  /// Cancelled when the producer's task should stop.
  ///
  /// The default token is never cancelled, so the producer runs until the
  /// process exits.
  pub shutdown: CancellationToken,
}

impl ProducerConfig {
  /// Sets the name for this producer configuration.
  pub fn with_name(mut self, name: String) -> Self {
    self.name = Some(name);
    self
  }

  /// Sets the shutdown token for this producer configuration.
  pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
    self.shutdown = shutdown;
    self
  }

  /// Returns the current name, if set.
  pub fn name(&self) -> Option<String> {
    self.name.clone()
  }

  /// Returns the shutdown token.
  pub fn shutdown(&self) -> &CancellationToken {
    &self.shutdown
  }
}

/// Trait for components that produce data streams.
///
/// # Example
///
/// ```rust
/// use primeweave::{Output, Producer, ProducerConfig};
/// use futures::Stream;
/// use std::pin::Pin;
///
/// struct Evens {
///     config: ProducerConfig,
/// }
///
/// impl Output for Evens {
///     type Output = u64;
///     type OutputStream = Pin<Box<dyn Stream<Item = u64> + Send>>;
/// }
///
/// impl Producer for Evens {
///     fn produce(&mut self) -> Self::OutputStream {
///         Box::pin(futures::stream::iter((0u64..).step_by(2)))
///     }
///
///     fn set_config_impl(&mut self, config: ProducerConfig) {
///         self.config = config;
///     }
///
///     fn get_config_impl(&self) -> &ProducerConfig {
///         &self.config
///     }
///
///     fn get_config_mut_impl(&mut self) -> &mut ProducerConfig {
///         &mut self.config
///     }
/// }
/// ```
#[async_trait]
pub trait Producer: Output {
  /// Produces a stream of items.
  fn produce(&mut self) -> Self::OutputStream;

  /// Sets the configuration for this producer.
  fn set_config(&mut self, config: ProducerConfig) {
    self.set_config_impl(config);
  }

  /// Returns a reference to the producer's configuration.
  fn config(&self) -> &ProducerConfig {
    self.get_config_impl()
  }

  /// Returns a mutable reference to the producer's configuration.
  fn config_mut(&mut self) -> &mut ProducerConfig {
    self.get_config_mut_impl()
  }

  /// Sets the name for this producer.
  #[must_use]
  fn with_name(mut self, name: String) -> Self
  where
    Self: Sized,
  {
    self.config_mut().name = Some(name);
    self
  }

  /// Sets the token that stops this producer.
  #[must_use]
  fn with_shutdown(mut self, shutdown: CancellationToken) -> Self
  where
    Self: Sized,
  {
    self.config_mut().shutdown = shutdown;
    self
  }

  /// Returns information about the component for logs and errors.
  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self
        .config()
        .name()
        .unwrap_or_else(|| "producer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }

  /// Stores the configuration.
  fn set_config_impl(&mut self, config: ProducerConfig);

  /// Returns the stored configuration.
  fn get_config_impl(&self) -> &ProducerConfig;

  /// Returns the stored configuration mutably.
  fn get_config_mut_impl(&mut self) -> &mut ProducerConfig;
}
