use clap::Parser;
use std::path::PathBuf;

pub const MIN_ROW_COUNT: u64 = 100;

/// Benchmark of sqlite3 bulk inserts with different pragmas.
#[derive(Parser, Debug, Clone)]
#[command(name = "pragma_bench", version, about, long_about = None)]
pub struct BenchConfig {
  /// Growth of 'batchSizeBase' in each test set run
  #[arg(
    short = 'i',
    long = "batchSizeIncrement",
    default_value_t = 5_000,
    value_parser = clap::value_parser!(u64).range(1..)
  )]
  pub batch_size_increment: u64,

  /// Minimal number of inserts in a transaction, incremented by
  /// 'batchSizeIncrement' in each test set run
  #[arg(
    short = 'b',
    long = "batchSizeBase",
    default_value_t = 5_000,
    value_parser = clap::value_parser!(u64).range(1..)
  )]
  pub batch_size_base: u64,

  /// Number of tables to use for inserts
  #[arg(
    short = 't',
    long = "tableCount",
    default_value_t = 10,
    value_parser = clap::value_parser!(u64).range(1..)
  )]
  pub table_count: u64,

  /// Value to insert (along with sequential integer primary key)
  #[arg(short = 's', long = "string", default_value = "string")]
  pub value: String,

  /// Total number of rows to insert in each test
  #[arg(
    short = 'r',
    long = "rowCount",
    default_value_t = 5_000_000,
    value_parser = clap::value_parser!(u64).range(MIN_ROW_COUNT..)
  )]
  pub row_count: u64,

  /// Number of test set runs
  #[arg(
    short = 'n',
    long = "number",
    default_value_t = 40,
    value_parser = clap::value_parser!(u64).range(1..)
  )]
  pub runs: u64,

  /// Directory receiving the database files
  #[arg(short = 'd', long = "dir", default_value = ".")]
  pub dir: PathBuf,
}

impl BenchConfig {
  pub fn validate(&self) -> anyhow::Result<()> {
    if self.batch_size_increment == 0 {
      anyhow::bail!("batchSizeIncrement must be at least 1");
    }
    if self.batch_size_base == 0 {
      anyhow::bail!("batchSizeBase must be at least 1");
    }
    if self.table_count == 0 {
      anyhow::bail!("tableCount must be at least 1");
    }
    if self.row_count < MIN_ROW_COUNT {
      anyhow::bail!("rowCount must be at least {MIN_ROW_COUNT}");
    }
    if self.runs == 0 {
      anyhow::bail!("number must be at least 1");
    }
    if self.checked_batch_size(self.runs - 1).is_none() {
      anyhow::bail!(
        "batchSizeBase + batchSizeIncrement * (number - 1) overflows: {} + {} * {}",
        self.batch_size_base,
        self.batch_size_increment,
        self.runs - 1
      );
    }
    Ok(())
  }

  fn checked_batch_size(&self, run_index: u64) -> Option<u64> {
    self
      .batch_size_increment
      .checked_mul(run_index)?
      .checked_add(self.batch_size_base)
  }

  /// Only valid for run indexes below `runs` of a validated config.
  pub fn batch_size(&self, run_index: u64) -> u64 {
    self.batch_size_base + self.batch_size_increment * run_index
  }

  pub fn commits(&self, batch_size: u64) -> u64 {
    std::cmp::max(1, self.row_count / batch_size)
  }

  pub fn rows_per_table(&self, batch_size: u64) -> u64 {
    batch_size / self.table_count
  }
}
