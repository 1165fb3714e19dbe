use crate::consumer::{Consumer, ConsumerConfig};
use crate::error::StreamError;
use crate::input::Input;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::fmt::{Debug, Display};
use std::marker::PhantomData;
use std::pin::Pin;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};

/// Writes every item on its own line.
///
/// Defaults to stdout; tests and embedders can supply any [`AsyncWrite`].
pub struct ConsoleConsumer<T, W = Stdout> {
  writer: W,
  config: ConsumerConfig,
  _phantom: PhantomData<T>,
}

impl<T> ConsoleConsumer<T, Stdout> {
  /// Creates a consumer writing to the process's stdout.
  pub fn stdout() -> Self {
    Self::with_writer(tokio::io::stdout())
  }
}

impl<T, W> ConsoleConsumer<T, W> {
  /// Creates a consumer writing to `writer`.
  pub fn with_writer(writer: W) -> Self {
    Self {
      writer,
      config: ConsumerConfig::default().with_name("console".to_string()),
      _phantom: PhantomData,
    }
  }

  /// Returns the underlying writer.
  pub fn into_writer(self) -> W {
    self.writer
  }
}

impl<T, W> Input for ConsoleConsumer<T, W>
where
  T: Display + Debug + Send + 'static,
{
  type Input = T;
  type InputStream = Pin<Box<dyn Stream<Item = T> + Send>>;
}

#[async_trait]
impl<T, W> Consumer for ConsoleConsumer<T, W>
where
  T: Display + Debug + Send + 'static,
  W: AsyncWrite + Unpin + Send,
{
  async fn consume(&mut self, mut stream: Self::InputStream) -> Result<(), StreamError<T>> {
    while let Some(item) = stream.next().await {
      let line = format!("{}\n", item);
      if let Err(e) = self.writer.write_all(line.as_bytes()).await {
        return Err(StreamError::new(
          Box::new(e),
          self.create_error_context(Some(item)),
          self.component_info(),
        ));
      }
    }
    self.writer.flush().await.map_err(|e| {
      StreamError::new(
        Box::new(e),
        self.create_error_context(None),
        self.component_info(),
      )
    })
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
