use anyhow::Context;
use constants::*;
use rusqlite::{Connection, Statement};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TestSet<'a> {
  pub pragmas: PragmaSet,
  pub run_index: u64,
  pub table_count: u64,
  pub commits: u64,
  pub batch_size: u64,
  pub value: &'a str,
}

#[derive(Debug, Clone)]
pub struct TestSetReport {
  pub pragmas: PragmaSet,
  pub path: PathBuf,
  pub rows: i64,
  pub elapsed: Duration,
}

impl TestSetReport {
  pub fn rows_per_second(&self) -> f64 {
    if self.rows == 0 {
      return 0.0;
    }
    let elapsed = self.elapsed.max(Duration::from_nanos(1));
    self.rows as f64 / elapsed.as_secs_f64()
  }
}

impl TestSet<'_> {
  pub fn db_path(&self, dir: &Path) -> PathBuf {
    dir.join(self.pragmas.file_name(self.run_index))
  }

  pub fn run(&self, dir: &Path) -> anyhow::Result<TestSetReport> {
    let path = self.db_path(dir);
    remove_existing(&path)?;

    let conn = self.open(&path)?;
    let (rows, elapsed) = {
      let mut stmts = prepare_inserts(&conn, self.table_count)?;

      let mut rev = 0;
      let start = Instant::now();
      for _ in 0..self.commits {
        rev = insert_in_transaction(
          &conn,
          &mut stmts,
          self.batch_size / self.table_count,
          self.value,
          rev,
        )
        .with_context(|| format!("inserting into {path:?}"))?;
      }
      (rev, start.elapsed())
    };

    conn
      .close()
      .map_err(|(_, err)| err)
      .with_context(|| format!("closing {path:?}"))?;

    Ok(TestSetReport {
      pragmas: self.pragmas,
      path,
      rows,
      elapsed,
    })
  }

  fn open(&self, path: &Path) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("opening {path:?}"))?;

    for i in 0..self.table_count {
      conn
        .execute_batch(&create_table_query(i))
        .with_context(|| format!("creating {} in {path:?}", table_name(i)))?;
    }

    self
      .pragmas
      .apply(&conn)
      .with_context(|| format!("applying [{}] to {path:?}", self.pragmas))?;

    Ok(conn)
  }
}

fn remove_existing(path: &Path) -> anyhow::Result<()> {
  let mut paths = vec![path.to_path_buf()];
  for suffix in JOURNAL_SUFFIXES {
    let mut sibling = path.as_os_str().to_owned();
    sibling.push(suffix);
    paths.push(PathBuf::from(sibling));
  }

  for p in paths {
    match std::fs::remove_file(&p) {
      Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
        return Err(err).with_context(|| format!("removing stale {p:?}"));
      }
      _ => {}
    }
  }
  Ok(())
}

fn prepare_inserts(conn: &Connection, table_count: u64) -> anyhow::Result<Vec<Statement<'_>>> {
  (0..table_count)
    .map(|i| {
      conn
        .prepare(&insert_query(i))
        .with_context(|| format!("preparing insert into {}", table_name(i)))
    })
    .collect()
}

/// Returns the next free key.
pub fn insert_in_transaction(
  conn: &Connection,
  stmts: &mut [Statement<'_>],
  rows_per_table: u64,
  value: &str,
  mut rev: i64,
) -> rusqlite::Result<i64> {
  let tx = conn.unchecked_transaction()?;
  for stmt in stmts.iter_mut() {
    for _ in 0..rows_per_table {
      stmt.execute((rev, value))?;
      rev += 1;
    }
  }
  tx.commit()?;
  Ok(rev)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stale_files_are_removed() {
    let tmp_dir = tempfile::TempDir::new().unwrap();
    let path = tmp_dir.path().join("default_0.sqlite");
    let wal = tmp_dir.path().join("default_0.sqlite-wal");
    std::fs::write(&path, b"junk").unwrap();
    std::fs::write(&wal, b"junk").unwrap();

    remove_existing(&path).unwrap();
    assert!(!path.exists());
    assert!(!wal.exists());

    // Nothing left to remove is fine too.
    remove_existing(&path).unwrap();
  }

  #[test]
  fn throughput_of_empty_run_is_zero() {
    let report = TestSetReport {
      pragmas: PragmaSet::Default,
      path: PathBuf::from("default_0.sqlite"),
      rows: 0,
      elapsed: Duration::ZERO,
    };
    assert_eq!(report.rows_per_second(), 0.0);
  }

  #[test]
  fn throughput_stays_finite_for_zero_elapsed() {
    let report = TestSetReport {
      pragmas: PragmaSet::Default,
      path: PathBuf::from("default_0.sqlite"),
      rows: 10,
      elapsed: Duration::ZERO,
    };
    let rps = report.rows_per_second();
    assert!(rps.is_finite());
    assert!(rps > 0.0);
  }

  #[test]
  fn throughput() {
    let report = TestSetReport {
      pragmas: PragmaSet::SyncOff,
      path: PathBuf::from("sync-off_0.sqlite"),
      rows: 1000,
      elapsed: Duration::from_millis(500),
    };
    assert_eq!(report.rows_per_second(), 2000.0);
  }

  #[test]
  fn transaction_continues_rev_across_tables() {
    let conn = Connection::open_in_memory().unwrap();
    for i in 0..2 {
      conn.execute_batch(&create_table_query(i)).unwrap();
    }

    let mut stmts = prepare_inserts(&conn, 2).unwrap();
    let rev = insert_in_transaction(&conn, &mut stmts, 3, "x", 0).unwrap();
    let rev = insert_in_transaction(&conn, &mut stmts, 3, "x", rev).unwrap();
    drop(stmts);
    assert_eq!(rev, 12);

    let revs = |i: u64| -> Vec<i64> {
      let mut stmt = conn.prepare(&revs_query(i)).unwrap();
      let revs: Vec<i64> = stmt
        .query_map((), |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
      revs
    };
    assert_eq!(revs(0), vec![0, 1, 2, 6, 7, 8]);
    assert_eq!(revs(1), vec![3, 4, 5, 9, 10, 11]);
  }

  #[test]
  fn failed_insert_propagates() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&create_table_query(0)).unwrap();

    let mut stmts = prepare_inserts(&conn, 1).unwrap();
    insert_in_transaction(&conn, &mut stmts, 2, "x", 0).unwrap();
    // Key 1 is already taken.
    assert!(insert_in_transaction(&conn, &mut stmts, 2, "x", 1).is_err());
    drop(stmts);

    let count: i64 = conn
      .query_row(&count_query(0), (), |row| row.get(0))
      .unwrap();
    assert_eq!(count, 2);
  }
}
