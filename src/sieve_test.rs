use crate::channel::ValueStream;
use crate::config::{SieveConfig, Teardown};
use crate::consumer::{Consumer, ConsumerConfig};
use crate::consumers::{ConsoleConsumer, VecConsumer};
use crate::error::{PipelineError, StreamError};
use crate::input::Input;
use crate::sieve::{PrimeSieve, first_primes, first_primes_with};
use crate::stage::StageId;
use async_trait::async_trait;
use futures::StreamExt;
use proptest::prelude::*;

fn is_prime(n: u64) -> bool {
  n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

fn reference_primes(n: usize) -> Vec<u64> {
  (2u64..).filter(|&v| is_prime(v)).take(n).collect()
}

/// Accepts items until the `reject_at`-th one, which it refuses.
struct RejectingConsumer {
  reject_at: usize,
  accepted: Vec<u64>,
  config: ConsumerConfig,
}

impl RejectingConsumer {
  fn new(reject_at: usize) -> Self {
    Self {
      reject_at,
      accepted: Vec::new(),
      config: ConsumerConfig::default().with_name("rejecting".to_string()),
    }
  }
}

impl Input for RejectingConsumer {
  type Input = u64;
  type InputStream = ValueStream;
}

#[async_trait]
impl Consumer for RejectingConsumer {
  async fn consume(&mut self, mut stream: ValueStream) -> Result<(), StreamError<u64>> {
    while let Some(item) = stream.next().await {
      if self.accepted.len() + 1 == self.reject_at {
        return Err(StreamError::new(
          Box::new(std::io::Error::other("rejected")),
          self.create_error_context(Some(item)),
          self.component_info(),
        ));
      }
      self.accepted.push(item);
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

/// Hands its stream to a background task and returns without draining it.
struct DetachingConsumer {
  config: ConsumerConfig,
}

impl Input for DetachingConsumer {
  type Input = u64;
  type InputStream = ValueStream;
}

#[async_trait]
impl Consumer for DetachingConsumer {
  async fn consume(&mut self, stream: ValueStream) -> Result<(), StreamError<u64>> {
    tokio::spawn(async move {
      let _held = stream;
      std::future::pending::<()>().await;
    });
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

#[tokio::test]
async fn test_first_five_primes() {
  assert_eq!(first_primes(5).await.unwrap(), vec![2, 3, 5, 7, 11]);
}

#[tokio::test]
async fn test_zero_primes_reads_nothing() {
  let mut sieve = PrimeSieve::from_start(2);
  assert!(sieve.take(0).await.unwrap().is_empty());
  assert_eq!(sieve.primes_found(), 0);
  assert_eq!(sieve.stage_count(), 1);
}

#[tokio::test]
async fn test_one_prime() {
  assert_eq!(first_primes(1).await.unwrap(), vec![2]);
}

#[tokio::test]
async fn test_hundredth_prime_is_541() {
  let primes = first_primes(100).await.unwrap();
  assert_eq!(primes.len(), 100);
  assert_eq!(primes[99], 541);
}

#[tokio::test]
async fn test_sieve_is_complete_and_ordered() {
  let primes = first_primes(60).await.unwrap();

  for (k, &p) in primes.iter().enumerate() {
    assert!(is_prime(p), "{} is not prime", p);
    assert!(primes[..k].iter().all(|earlier| p % earlier != 0));
  }
  for pair in primes.windows(2) {
    assert!(pair[0] < pair[1]);
    assert!(((pair[0] + 1)..pair[1]).all(|v| !is_prime(v)));
  }
}

#[tokio::test]
async fn test_runs_are_deterministic() {
  let first = first_primes(40).await.unwrap();
  let second = first_primes(40).await.unwrap();
  assert_eq!(first, second);
}

#[tokio::test]
async fn test_next_prime_matches_take() {
  let mut sieve = PrimeSieve::from_start(2);
  let mut stepped = Vec::new();
  for _ in 0..10 {
    stepped.push(sieve.next_prime().await.unwrap());
  }
  assert_eq!(stepped, reference_primes(10));
}

#[tokio::test]
async fn test_stage_count_tracks_primes_found() {
  let mut sieve = PrimeSieve::from_start(2);
  assert_eq!(sieve.stage_count(), 1);

  sieve.take(10).await.unwrap();
  assert_eq!(sieve.primes_found(), 10);
  assert_eq!(sieve.stage_count(), 11);
  assert_eq!(sieve.tail(), StageId::Filter { prime: 29 });

  let stages: Vec<StageId> = sieve.stages().collect();
  assert_eq!(stages[0], StageId::Source { start: 2 });
  assert_eq!(stages[1], StageId::Filter { prime: 2 });
}

#[tokio::test]
async fn test_stages_stay_parked_after_driver_stops() {
  let mut sieve = PrimeSieve::from_start(2);
  sieve.take(8).await.unwrap();

  for _ in 0..10 {
    tokio::task::yield_now().await;
  }
  assert_eq!(sieve.live_stages(), 9);
}

#[tokio::test]
async fn test_shutdown_joins_every_stage() {
  let mut sieve = PrimeSieve::from_start(2);
  sieve.take(6).await.unwrap();

  assert_eq!(sieve.shutdown().await.unwrap(), 7);
  assert_eq!(sieve.stage_count(), 0);
  assert_eq!(sieve.live_stages(), 0);

  match sieve.next_prime().await {
    Err(PipelineError::HeadClosed { stage }) => {
      assert_eq!(stage, StageId::Filter { prime: 13 })
    }
    other => panic!("expected HeadClosed, got {:?}", other),
  }
}

#[tokio::test]
async fn test_cancellation_token_stops_stages() {
  let mut sieve = PrimeSieve::from_start(2);
  sieve.take(4).await.unwrap();

  sieve.cancellation_token().cancel();

  // The head may still hold one value handed over before the cancel.
  let mut outcome = sieve.next_prime().await;
  if outcome.is_ok() {
    outcome = sieve.next_prime().await;
  }
  assert!(matches!(outcome, Err(PipelineError::HeadClosed { .. })));
}

#[tokio::test]
async fn test_run_feeds_vec_consumer() {
  let mut sieve = PrimeSieve::from_start(2);
  let mut consumer = VecConsumer::new();
  sieve.run(5, &mut consumer).await.unwrap();

  assert_eq!(consumer.into_vec(), vec![2, 3, 5, 7, 11]);
  assert_eq!(sieve.stage_count(), 6);
}

#[tokio::test]
async fn test_run_zero_closes_consumer_stream() {
  let mut sieve = PrimeSieve::from_start(2);
  let mut consumer = VecConsumer::new();
  sieve.run(0, &mut consumer).await.unwrap();

  assert!(consumer.items().is_empty());
  assert_eq!(sieve.primes_found(), 0);
}

#[tokio::test]
async fn test_run_prints_one_prime_per_line() {
  let mut sieve = PrimeSieve::from_start(2);
  let mut consumer = ConsoleConsumer::<u64, Vec<u8>>::with_writer(Vec::new());
  sieve.run(6, &mut consumer).await.unwrap();

  let printed = String::from_utf8(consumer.into_writer()).unwrap();
  assert_eq!(printed, "2\n3\n5\n7\n11\n13\n");
}

#[tokio::test]
async fn test_run_continues_from_previous_reads() {
  let mut sieve = PrimeSieve::from_start(2);
  sieve.take(3).await.unwrap();

  let mut consumer = VecConsumer::<u64>::new().with_name("rest".to_string());
  sieve.run(3, &mut consumer).await.unwrap();
  assert_eq!(consumer.into_vec(), vec![7, 11, 13]);
}

#[tokio::test]
async fn test_run_loses_no_primes_when_consumer_fails() {
  let mut sieve = PrimeSieve::from_start(2);
  let mut consumer = RejectingConsumer::new(3);

  match sieve.run(10, &mut consumer).await {
    Err(PipelineError::Consumer(e)) => assert_eq!(e.context.item, Some(5)),
    other => panic!("expected a consumer error, got {:?}", other),
  }
  assert_eq!(consumer.accepted, vec![2, 3]);
  assert_eq!(sieve.primes_found(), 3);
  assert_eq!(sieve.stage_count(), 4);
  assert_eq!(sieve.tail(), StageId::Filter { prime: 5 });
  assert_eq!(sieve.next_prime().await.unwrap(), 7);
}

#[tokio::test]
async fn test_run_after_consumer_failure_resumes() {
  let mut sieve = PrimeSieve::from_start(2);
  assert!(sieve.run(10, &mut RejectingConsumer::new(1)).await.is_err());

  let mut consumer = VecConsumer::<u64>::new();
  sieve.run(3, &mut consumer).await.unwrap();
  assert_eq!(consumer.into_vec(), vec![3, 5, 7]);
  assert_eq!(sieve.primes_found(), 4);
}

#[tokio::test]
async fn test_run_after_shutdown_reports_head_closed() {
  let mut sieve = PrimeSieve::from_start(2);
  sieve.take(2).await.unwrap();
  sieve.shutdown().await.unwrap();

  let mut consumer = VecConsumer::<u64>::new();
  assert!(matches!(
    sieve.run(3, &mut consumer).await,
    Err(PipelineError::HeadClosed { stage: StageId::Filter { prime: 3 } })
  ));
  assert!(consumer.items().is_empty());
}

#[tokio::test]
async fn test_run_rejects_consumer_that_keeps_the_stream() {
  let mut sieve = PrimeSieve::from_start(2);
  let mut consumer = DetachingConsumer {
    config: ConsumerConfig::default(),
  };
  assert!(matches!(
    sieve.run(3, &mut consumer).await,
    Err(PipelineError::StreamRetained)
  ));
}

#[tokio::test]
async fn test_first_primes_with_cancel_teardown() {
  let config = SieveConfig::default()
    .with_count(10)
    .with_teardown(Teardown::Cancel);
  assert_eq!(first_primes_with(&config).await.unwrap(), reference_primes(10));
}

#[tokio::test]
async fn test_non_prime_seed_is_not_validated() {
  // 4 survives filter(3), so a seed of 3 reports a composite.
  let mut sieve = PrimeSieve::from_start(3);
  assert_eq!(sieve.take(3).await.unwrap(), vec![3, 4, 5]);
}

#[tokio::test]
async fn test_zero_seed_closes_the_head() {
  let mut sieve = PrimeSieve::from_start(0);
  assert_eq!(sieve.next_prime().await.unwrap(), 0);
  assert!(matches!(
    sieve.next_prime().await,
    Err(PipelineError::HeadClosed { stage: StageId::Filter { prime: 0 } })
  ));
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(16))]

  #[test]
  fn test_sieve_matches_trial_division(n in 0usize..80) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let primes = runtime.block_on(first_primes(n)).unwrap();
    prop_assert_eq!(primes, reference_primes(n));
  }
}
