use std::fmt;

pub const DB_EXTENSION: &str = "sqlite";

pub const DELIMITER: &str = ";";

pub const BATCH_SIZE_COLUMN: &str = "batchSize";

/// Journal files SQLite may leave next to a database, by suffix.
pub const JOURNAL_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

pub fn table_name(index: u64) -> String {
  format!("tbl{index}")
}

pub fn create_table_query(index: u64) -> String {
  format!(
    "CREATE TABLE {table} (rev INTEGER PRIMARY KEY, value BLOB);",
    table = table_name(index)
  )
}

pub fn insert_query(index: u64) -> String {
  format!(
    "INSERT INTO {table} (rev, value) VALUES ($1, $2)",
    table = table_name(index)
  )
}

pub fn count_query(index: u64) -> String {
  format!("SELECT COUNT(*) FROM {table}", table = table_name(index))
}

pub fn revs_query(index: u64) -> String {
  format!("SELECT rev FROM {table} ORDER BY rev", table = table_name(index))
}

pub const TABLE_COUNT_QUERY: &str =
  "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name LIKE 'tbl%'";

/// A single `PRAGMA name = value` assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pragma {
  pub name: &'static str,
  pub value: &'static str,
}

impl fmt::Display for Pragma {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} = {}", self.name, self.value)
  }
}

const SYNC_OFF: Pragma = Pragma {
  name: "synchronous",
  value: "OFF",
};
const JOURNAL_WAL: Pragma = Pragma {
  name: "journal_mode",
  value: "WAL",
};
const JOURNAL_OFF: Pragma = Pragma {
  name: "journal_mode",
  value: "OFF",
};
const LOCKING_EXCLUSIVE: Pragma = Pragma {
  name: "locking_mode",
  value: "EXCLUSIVE",
};

/// The fixed storage configurations every run is measured under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PragmaSet {
  Default,
  SyncOff,
  JournalWal,
  JournalOff,
  LockingExclusive,
  Combined,
}

impl PragmaSet {
  /// Column order of the output table.
  pub const ALL: [PragmaSet; 6] = [
    PragmaSet::Default,
    PragmaSet::SyncOff,
    PragmaSet::JournalWal,
    PragmaSet::JournalOff,
    PragmaSet::LockingExclusive,
    PragmaSet::Combined,
  ];

  pub fn name(self) -> &'static str {
    match self {
      PragmaSet::Default => "default",
      PragmaSet::SyncOff => "sync-off",
      PragmaSet::JournalWal => "jm-wal",
      PragmaSet::JournalOff => "jm-off",
      PragmaSet::LockingExclusive => "lm-excl",
      PragmaSet::Combined => "sync-off&jm-off&lm-excl",
    }
  }

  /// Assignments in the order they are applied. SQLite is order sensitive
  /// for journal and locking mode, so the combined set keeps
  /// synchronous, journal_mode, locking_mode.
  pub fn pragmas(self) -> &'static [Pragma] {
    match self {
      PragmaSet::Default => &[],
      PragmaSet::SyncOff => &[SYNC_OFF],
      PragmaSet::JournalWal => &[JOURNAL_WAL],
      PragmaSet::JournalOff => &[JOURNAL_OFF],
      PragmaSet::LockingExclusive => &[LOCKING_EXCLUSIVE],
      PragmaSet::Combined => &[SYNC_OFF, JOURNAL_OFF, LOCKING_EXCLUSIVE],
    }
  }

  pub fn file_name(self, run_index: u64) -> String {
    format!("{name}_{run_index}.{DB_EXTENSION}", name = self.name())
  }

  pub fn apply(self, conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    for pragma in self.pragmas() {
      conn.pragma_update(None, pragma.name, pragma.value)?;
    }
    Ok(())
  }
}

impl fmt::Display for PragmaSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

pub fn header() -> String {
  std::iter::once(BATCH_SIZE_COLUMN)
    .chain(PragmaSet::ALL.iter().map(|set| set.name()))
    .collect::<Vec<_>>()
    .join(DELIMITER)
}
