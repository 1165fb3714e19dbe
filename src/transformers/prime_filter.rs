use crate::channel::{self, Delivery, ValueStream};
use crate::input::Input;
use crate::output::Output;
use crate::stage::{StageExit, StageId, StageTask};
use crate::transformer::{Transformer, TransformerConfig};
use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// A sieve stage that drops every multiple of one prime.
///
/// [`Transformer::transform`] spawns a task that owns the input stream and a
/// freshly created output channel. The task reads one value at a time, forwards
/// it if it is not divisible by the prime, and otherwise discards it and reads
/// again.
///
/// The prime must be non-zero. The sieve only ever builds filters for values
/// that survived every earlier filter, which are primes of at least 2.
pub struct PrimeFilterTransformer {
  prime: u64,
  config: TransformerConfig,
  task: Option<StageTask>,
}

impl PrimeFilterTransformer {
  /// Creates a filter for `prime`.
  pub fn new(prime: u64) -> Self {
    Self {
      prime,
      config: TransformerConfig::default(),
      task: None,
    }
  }

  /// The prime whose multiples this stage drops.
  pub fn prime(&self) -> u64 {
    self.prime
  }

  /// Identity of the stage this transformer runs as.
  pub fn stage_id(&self) -> StageId {
    StageId::Filter { prime: self.prime }
  }

  /// Takes the handle of the spawned filter task, if [`Transformer::transform`] ran.
  pub fn take_task(&mut self) -> Option<StageTask> {
    self.task.take()
  }
}

impl Input for PrimeFilterTransformer {
  type Input = u64;
  type InputStream = ValueStream;
}

impl Output for PrimeFilterTransformer {
  type Output = u64;
  type OutputStream = ValueStream;
}

#[async_trait]
impl Transformer for PrimeFilterTransformer {
  async fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream {
    let (tx, rx) = channel::handoff();
    let stage = self.stage_id();
    let prime = self.prime;
    let shutdown = self.config.shutdown().clone();

    self.task = Some(tokio::spawn(async move {
      debug!(%stage, "stage started");
      let exit = sift(prime, input, tx, shutdown).await;
      debug!(%stage, ?exit, "stage stopped");
      exit
    }));

    channel::into_stream(rx)
  }

  fn set_config_impl(&mut self, config: TransformerConfig) {
    self.config = config;
  }

  fn get_config_impl(&self) -> &TransformerConfig {
    &self.config
  }

  fn get_config_mut_impl(&mut self) -> &mut TransformerConfig {
    &mut self.config
  }
}

async fn sift(
  prime: u64,
  mut input: ValueStream,
  tx: mpsc::Sender<u64>,
  shutdown: CancellationToken,
) -> StageExit {
  loop {
    let value = tokio::select! {
      biased;
      _ = shutdown.cancelled() => return StageExit::Cancelled,
      next = input.next() => match next {
        Some(value) => value,
        None => return StageExit::InputClosed,
      },
    };

    if value % prime == 0 {
      continue;
    }

    match channel::deliver(&tx, value, &shutdown).await {
      Delivery::Delivered => trace!(prime, value, "filter forwarded"),
      Delivery::Cancelled => return StageExit::Cancelled,
      Delivery::Disconnected => return StageExit::Disconnected,
    }
  }
}
