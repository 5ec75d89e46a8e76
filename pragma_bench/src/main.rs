use clap::Parser;
use pragma_bench::{BenchConfig, BenchmarkRunner};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
  // Stdout carries the result table, logs go to stderr.
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pragma_bench=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let config = BenchConfig::parse();

  tracing::info!("Sqlite v{}", rusqlite::version());
  tracing::info!("DB files in {:?}", config.dir);

  let runner = BenchmarkRunner::new(config)?;
  runner.run(&mut std::io::stdout().lock())?;

  Ok(())
}
