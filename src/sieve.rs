//! # Prime Sieve Driver
//!
//! [`PrimeSieve`] assembles and grows the stage chain. It starts with a single
//! [`CounterProducer`] and, for every value that reaches the head of the chain,
//! appends a [`PrimeFilterTransformer`] for that value. A value at the head has
//! survived the filter of every prime found before it, so it is itself prime.
//!
//! ```text
//! source(2) -> filter(2) -> filter(3) -> filter(5) -> ... -> head
//! ```
//!
//! ## Stage lifetime
//!
//! Stages are never torn down implicitly, and dropping a `PrimeSieve` does not
//! stop them. Once the driver stops reading, the stage at the head parks on its
//! next send and every stage upstream of it parks behind it. All of them stay
//! alive until the runtime shuts down, which [`PrimeSieve::live_stages`] makes
//! observable. [`PrimeSieve::shutdown`] is the explicit way out: it cancels
//! every stage and joins their tasks.

use crate::channel::ValueStream;
use crate::config::{DEFAULT_START, SieveConfig, Teardown};
use crate::consumer::Consumer;
use crate::error::PipelineError;
use crate::producer::Producer;
use crate::producers::CounterProducer;
use crate::stage::{StageId, StageTask};
use crate::transformer::Transformer;
use crate::transformers::PrimeFilterTransformer;
use futures::{StreamExt, stream};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A running sieve: one counter stage plus one filter stage per prime found.
///
/// Must be created inside a tokio runtime, since every stage is spawned as a task.
pub struct PrimeSieve {
  head: ValueStream,
  tail: StageId,
  stages: Vec<(StageId, StageTask)>,
  primes_found: usize,
  shutdown: CancellationToken,
}

impl PrimeSieve {
  /// Builds a sieve whose counter starts at `config.start`.
  pub fn new(config: &SieveConfig) -> Self {
    Self::from_start(config.start)
  }

  /// Builds a sieve whose counter starts at `start`.
  ///
  /// The output is the sequence of primes only when `start` is 2. Other seeds are
  /// accepted as-is: 1 makes the first filter drop everything, 0 makes it divide
  /// by zero and kill its task.
  pub fn from_start(start: u64) -> Self {
    let shutdown = CancellationToken::new();
    let mut source = CounterProducer::new(start).with_shutdown(shutdown.child_token());
    let head = source.produce();

    let mut sieve = Self {
      head,
      tail: source.stage_id(),
      stages: Vec::new(),
      primes_found: 0,
      shutdown,
    };
    sieve.register(source.stage_id(), source.take_task());
    debug!(start, "sieve created");
    sieve
  }

  /// Reads the next prime off the head and extends the chain with its filter.
  pub async fn next_prime(&mut self) -> Result<u64, PipelineError> {
    let Some(prime) = self.head.next().await else {
      return Err(PipelineError::HeadClosed { stage: self.tail });
    };

    let input = std::mem::replace(&mut self.head, Box::pin(stream::empty()));
    let mut filter = PrimeFilterTransformer::new(prime).with_shutdown(self.shutdown.child_token());
    self.head = filter.transform(input).await;
    self.tail = filter.stage_id();
    self.register(filter.stage_id(), filter.take_task());
    self.primes_found += 1;

    debug!(prime, stages = self.stages.len(), "installed filter stage");
    Ok(prime)
  }

  /// Reads the next `n` primes. Performs no reads when `n` is 0.
  pub async fn take(&mut self, n: usize) -> Result<Vec<u64>, PipelineError> {
    let mut primes = Vec::with_capacity(n);
    for _ in 0..n {
      primes.push(self.next_prime().await?);
    }
    Ok(primes)
  }

  /// Feeds the next `n` primes to `consumer`, one at a time.
  ///
  /// The consumer sees a stream that ends after the `n`-th prime. The head is
  /// only read when the consumer polls that stream, so a consumer that fails has
  /// been handed every prime the sieve counted, including the one it rejected.
  ///
  /// While the consumer runs, the sieve lives inside the stream and comes back
  /// when the stream is dropped. A consumer that keeps the stream after
  /// returning gets [`PipelineError::StreamRetained`] and leaves this sieve
  /// detached from its stages.
  pub async fn run<C>(&mut self, n: usize, consumer: &mut C) -> Result<(), PipelineError>
  where
    C: Consumer<Input = u64, InputStream = ValueStream>,
  {
    let detached = Self::detached(self.tail);
    let (lease, mut returned) = Lease::new(std::mem::replace(self, detached), n);
    let primes: ValueStream = Box::pin(stream::unfold(lease, Lease::advance));

    let consumed = consumer.consume(primes).await;
    let Ok(outcome) = returned.try_recv() else {
      return Err(PipelineError::StreamRetained);
    };
    *self = outcome.sieve;
    consumed?;
    match outcome.error {
      Some(error) => Err(error),
      None => Ok(()),
    }
  }

  /// Number of primes read so far.
  pub fn primes_found(&self) -> usize {
    self.primes_found
  }

  /// Number of stages spawned and not yet joined by [`PrimeSieve::shutdown`].
  ///
  /// Before shutdown this is always `primes_found() + 1`.
  pub fn stage_count(&self) -> usize {
    self.stages.len()
  }

  /// Number of stage tasks that have not returned.
  pub fn live_stages(&self) -> usize {
    self
      .stages
      .iter()
      .filter(|(_, task)| !task.is_finished())
      .count()
  }

  /// Identities of the spawned stages, source first.
  pub fn stages(&self) -> impl Iterator<Item = StageId> + '_ {
    self.stages.iter().map(|(id, _)| *id)
  }

  /// The most recently installed stage.
  pub fn tail(&self) -> StageId {
    self.tail
  }

  /// The token every stage's shutdown token descends from.
  pub fn cancellation_token(&self) -> CancellationToken {
    self.shutdown.clone()
  }

  /// Cancels every stage and waits for all of them to return.
  ///
  /// Returns the number of stages joined. Afterwards the head is closed and
  /// [`PrimeSieve::next_prime`] fails with [`PipelineError::HeadClosed`].
  pub async fn shutdown(&mut self) -> Result<usize, PipelineError> {
    self.shutdown.cancel();
    self.head = Box::pin(stream::empty());

    let mut joined = 0;
    for (stage, task) in self.stages.drain(..) {
      let exit = task.await?;
      debug!(%stage, ?exit, "stage joined");
      joined += 1;
    }
    info!(joined, primes = self.primes_found, "sieve shut down");
    Ok(joined)
  }

  fn detached(tail: StageId) -> Self {
    Self {
      head: Box::pin(stream::empty()),
      tail,
      stages: Vec::new(),
      primes_found: 0,
      shutdown: CancellationToken::new(),
    }
  }

  fn register(&mut self, stage: StageId, task: Option<StageTask>) {
    if let Some(task) = task {
      self.stages.push((stage, task));
    }
  }
}

/// A sieve on loan to the stream handed out by [`PrimeSieve::run`].
///
/// Dropping the lease, whether the stream ended or the consumer let go of it,
/// sends the sieve and any driver error back to `run`.
struct Lease {
  sieve: Option<PrimeSieve>,
  remaining: usize,
  error: Option<PipelineError>,
  home: Option<oneshot::Sender<Returned>>,
}

struct Returned {
  sieve: PrimeSieve,
  error: Option<PipelineError>,
}

impl Lease {
  fn new(sieve: PrimeSieve, remaining: usize) -> (Self, oneshot::Receiver<Returned>) {
    let (home, returned) = oneshot::channel();
    let lease = Self {
      sieve: Some(sieve),
      remaining,
      error: None,
      home: Some(home),
    };
    (lease, returned)
  }

  async fn advance(mut self) -> Option<(u64, Self)> {
    if self.remaining == 0 {
      return None;
    }
    let sieve = self.sieve.as_mut()?;
    match sieve.next_prime().await {
      Ok(prime) => {
        self.remaining -= 1;
        Some((prime, self))
      }
      Err(error) => {
        self.error = Some(error);
        None
      }
    }
  }
}

impl Drop for Lease {
  fn drop(&mut self) {
    if let (Some(sieve), Some(home)) = (self.sieve.take(), self.home.take()) {
      let _ = home.send(Returned {
        sieve,
        error: self.error.take(),
      });
    }
  }
}

/// Returns the first `n` primes.
///
/// The sieve used to compute them is dropped without teardown; its stages stay
/// parked until the runtime shuts down.
pub async fn first_primes(n: usize) -> Result<Vec<u64>, PipelineError> {
  let mut sieve = PrimeSieve::from_start(DEFAULT_START);
  sieve.take(n).await
}

/// Takes `config.count` values from a sieve seeded at `config.start`, then
/// applies `config.teardown`.
pub async fn first_primes_with(config: &SieveConfig) -> Result<Vec<u64>, PipelineError> {
  let mut sieve = PrimeSieve::new(config);
  let primes = sieve.take(config.count).await?;
  if config.teardown == Teardown::Cancel {
    sieve.shutdown().await?;
  }
  Ok(primes)
}
