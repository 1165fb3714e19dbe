//! # Consumer Trait
//!
//! Consumers sit at the end of a pipeline and drain it. The sieve driver feeds a
//! consumer exactly the requested number of primes and then closes the stream.

use crate::Input;
use crate::error::{ComponentInfo, ErrorContext, StreamError};
use async_trait::async_trait;

/// Configuration for a consumer component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerConfig {
  /// Name for identifying this consumer in logs and errors.
  pub name: String,
}

impl ConsumerConfig {
  /// Sets the name for this consumer configuration.
  #[must_use]
  pub fn with_name(mut self, name: String) -> Self {
    self.name = name;
    self
  }

  /// Returns the current name.
  pub fn name(&self) -> &str {
    &self.name
  }
}

/// Trait for components that consume data streams.
#[async_trait]
pub trait Consumer: Input + Send {
  /// Drains `stream`, returning the first error the consumer could not absorb.
  async fn consume(&mut self, stream: Self::InputStream) -> Result<(), StreamError<Self::Input>>;

  /// Sets the configuration for this consumer.
  fn set_config(&mut self, config: ConsumerConfig) {
    self.set_config_impl(config);
  }

  /// Returns a reference to the consumer's configuration.
  fn config(&self) -> &ConsumerConfig {
    self.get_config_impl()
  }

  /// Returns a mutable reference to the consumer's configuration.
  fn config_mut(&mut self) -> &mut ConsumerConfig {
    self.get_config_mut_impl()
  }

  /// Sets the name for this consumer.
  #[must_use]
  fn with_name(mut self, name: String) -> Self
  where
    Self: Sized,
  {
    self.config_mut().name = name;
    self
  }

  /// Returns information about the component for logs and errors.
  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self.config().name.clone(),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }

  /// Builds an error context for `item`.
  fn create_error_context(&self, item: Option<Self::Input>) -> ErrorContext<Self::Input> {
    let info = self.component_info();
    ErrorContext {
      timestamp: chrono::Utc::now(),
      item,
      component_name: info.name,
      component_type: info.type_name,
    }
  }

  /// Stores the configuration.
  fn set_config_impl(&mut self, config: ConsumerConfig);

  /// Returns the stored configuration.
  fn get_config_impl(&self) -> &ConsumerConfig;

  /// Returns the stored configuration mutably.
  fn get_config_mut_impl(&mut self) -> &mut ConsumerConfig;
}
