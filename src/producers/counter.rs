use crate::channel::{self, Delivery, ValueStream};
use crate::output::Output;
use crate::producer::{Producer, ProducerConfig};
use crate::stage::{StageExit, StageId, StageTask};
use futures::stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// The sequence source of the sieve.
///
/// Emits `start, start + 1, start + 2, ...` from a dedicated task. Each value is
/// handed over only once the reader has taken the previous one. The task never
/// ends on its own; it stops when its shutdown token is cancelled, when the
/// reader is dropped, or after emitting `u64::MAX`.
///
/// The sequence cannot be restarted: a second call to [`Producer::produce`]
/// returns an empty stream.
pub struct CounterProducer {
  start: u64,
  config: ProducerConfig,
  task: Option<StageTask>,
  produced: bool,
}

impl CounterProducer {
  /// Creates a counter that starts at `start`.
  ///
  /// The sieve relies on `start` being 2. Seeds of 0 or 1 are accepted but make
  /// the first filter stage divide by 0 or drop every value.
  pub fn new(start: u64) -> Self {
    Self {
      start,
      config: ProducerConfig::default(),
      task: None,
      produced: false,
    }
  }

  /// The first value this counter emits.
  pub fn start(&self) -> u64 {
    self.start
  }

  /// Identity of the stage this producer runs as.
  pub fn stage_id(&self) -> StageId {
    StageId::Source { start: self.start }
  }

  /// Takes the handle of the spawned counter task, if [`Producer::produce`] ran.
  pub fn take_task(&mut self) -> Option<StageTask> {
    self.task.take()
  }
}

impl Output for CounterProducer {
  type Output = u64;
  type OutputStream = ValueStream;
}

impl Producer for CounterProducer {
  fn produce(&mut self) -> Self::OutputStream {
    if self.produced {
      warn!(stage = %self.stage_id(), "counter already started, not restarting");
      return Box::pin(stream::empty());
    }
    self.produced = true;

    let (tx, rx) = channel::handoff();
    let stage = self.stage_id();
    let start = self.start;
    let shutdown = self.config.shutdown().clone();

    self.task = Some(tokio::spawn(async move {
      debug!(%stage, "stage started");
      let exit = count_from(start, tx, shutdown).await;
      debug!(%stage, ?exit, "stage stopped");
      exit
    }));

    channel::into_stream(rx)
  }

  fn set_config_impl(&mut self, config: ProducerConfig) {
    self.config = config;
  }

  fn get_config_impl(&self) -> &ProducerConfig {
    &self.config
  }

  fn get_config_mut_impl(&mut self) -> &mut ProducerConfig {
    &mut self.config
  }
}

async fn count_from(start: u64, tx: mpsc::Sender<u64>, shutdown: CancellationToken) -> StageExit {
  let mut next = start;
  loop {
    match channel::deliver(&tx, next, &shutdown).await {
      Delivery::Delivered => trace!(value = next, "counter emitted"),
      Delivery::Cancelled => return StageExit::Cancelled,
      Delivery::Disconnected => return StageExit::Disconnected,
    }
    next = match next.checked_add(1) {
      Some(value) => value,
      None => return StageExit::Exhausted,
    };
  }
}
