//! # Transformer Trait
//!
//! Transformers take ownership of an upstream stream and return a new stream for
//! the next component. The sieve's
//! [`PrimeFilterTransformer`](crate::transformers::PrimeFilterTransformer) is a
//! transformer that moves its work onto a dedicated task, so `transform` only
//! wires the stage in and returns immediately.

use crate::error::ComponentInfo;
use crate::{input::Input, output::Output};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Configuration for transformers.
#[derive(Debug, Clone, Default)]
pub struct TransformerConfig {
  /// Optional name for identifying this transformer in logs.
  pub name: Option<String>,
  /// Cancelled when the transformer's task should stop.
  pub shutdown: CancellationToken,
}

impl TransformerConfig {
  /// Sets the name for this transformer configuration.
  pub fn with_name(mut self, name: String) -> Self {
    self.name = Some(name);
    self
  }

  /// Sets the shutdown token for this transformer configuration.
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

/// Trait for components that transform data streams.
#[async_trait]
pub trait Transformer: Input + Output + Send {
  /// Transforms a stream of input items into a stream of output items.
  ///
  /// The input stream is moved into the transformer; the returned stream is the
  /// only way to observe its output.
  async fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream;

  /// Sets the configuration for this transformer.
  fn set_config(&mut self, config: TransformerConfig) {
    self.set_config_impl(config);
  }

  /// Returns a reference to the transformer's configuration.
  fn config(&self) -> &TransformerConfig {
    self.get_config_impl()
  }

  /// Returns a mutable reference to the transformer's configuration.
  fn config_mut(&mut self) -> &mut TransformerConfig {
    self.get_config_mut_impl()
  }

  /// Sets the name for this transformer.
  #[must_use]
  fn with_name(mut self, name: String) -> Self
  where
    Self: Sized,
  {
    self.config_mut().name = Some(name);
    self
  }

  /// Sets the token that stops this transformer.
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
        .unwrap_or_else(|| "transformer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }

  /// Stores the configuration.
  fn set_config_impl(&mut self, config: TransformerConfig);

  /// Returns the stored configuration.
  fn get_config_impl(&self) -> &TransformerConfig;

  /// Returns the stored configuration mutably.
  fn get_config_mut_impl(&mut self) -> &mut TransformerConfig;
}
