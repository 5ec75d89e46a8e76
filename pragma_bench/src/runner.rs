use crate::config::BenchConfig;
use crate::test_set::TestSet;
use constants::*;
use std::io::Write;
use tracing::{debug, info};

pub struct BenchmarkRunner {
  config: BenchConfig,
}

impl BenchmarkRunner {
  pub fn new(config: BenchConfig) -> anyhow::Result<Self> {
    config.validate()?;
    Ok(Self { config })
  }

  pub fn run<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
    std::fs::create_dir_all(&self.config.dir)?;

    writeln!(out, "{}", header())?;
    out.flush()?;

    for run_index in 0..self.config.runs {
      let line = self.run_once(run_index)?;
      writeln!(out, "{line}")?;
      out.flush()?;
    }
    Ok(())
  }

  /// Executes all pragma sets for one run index and returns the formatted
  /// output line.
  pub fn run_once(&self, run_index: u64) -> anyhow::Result<String> {
    let batch_size = self.config.batch_size(run_index);
    let commits = self.config.commits(batch_size);
    info!("Run {run_index}: batch size {batch_size}, {commits} commits");

    let mut fields = vec![batch_size.to_string()];
    for pragmas in PragmaSet::ALL {
      let report = TestSet {
        pragmas,
        run_index,
        table_count: self.config.table_count,
        commits,
        batch_size,
        value: &self.config.value,
      }
      .run(&self.config.dir)?;
      debug!(
        "[{set}] {path:?}: {rows} rows in {elapsed:?}",
        set = report.pragmas,
        path = report.path,
        rows = report.rows,
        elapsed = report.elapsed,
      );

      fields.push(report.rows_per_second().to_string());
    }
    Ok(fields.join(DELIMITER))
  }
}
