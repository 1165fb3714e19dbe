//! Prints the first N primes, one per line, computed by a chain of concurrent
//! filter stages.

use anyhow::Result;
use clap::Parser;
use primeweave::consumers::ConsoleConsumer;
use primeweave::{PrimeSieve, SieveConfig, Teardown};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Parser)]
#[command(version, about = "Generate primes with a pipeline of filter stages")]
struct Cli {
  /// Amount of prime numbers to generate
  #[arg(short = 'n', long = "count")]
  count: Option<usize>,

  /// First value fed into the sieve
  #[arg(long)]
  start: Option<u64>,

  /// What to do with the stage tasks once the primes are printed
  #[arg(long, value_enum)]
  teardown: Option<Teardown>,

  /// JSON config file; flags given on the command line override it
  #[arg(long)]
  config: Option<PathBuf>,
}

impl Cli {
  fn into_config(self) -> Result<SieveConfig> {
    let mut config = match &self.config {
      Some(path) => SieveConfig::from_json_file(path)?,
      None => SieveConfig::default(),
    };
    if let Some(count) = self.count {
      config.count = count;
    }
    if let Some(start) = self.start {
      config.start = start;
    }
    if let Some(teardown) = self.teardown {
      config.teardown = teardown;
    }
    Ok(config)
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let config = Cli::parse().into_config()?;
  info!(
    count = config.count,
    start = config.start,
    teardown = ?config.teardown,
    "starting sieve"
  );

  let mut sieve = PrimeSieve::new(&config);
  let mut console = ConsoleConsumer::stdout();
  sieve.run(config.count, &mut console).await?;

  match config.teardown {
    Teardown::Cancel => {
      let joined = sieve.shutdown().await?;
      info!(joined, "stages cancelled");
    }
    Teardown::Leak => {
      info!(parked = sieve.live_stages(), "leaving stages parked");
    }
  }
  Ok(())
}
