//! Bulk insert throughput of SQLite under varying transaction batch sizes
//! and durability/locking pragmas.

pub mod config;
pub mod runner;
pub mod test_set;

pub use config::BenchConfig;
pub use runner::BenchmarkRunner;
pub use test_set::{TestSet, TestSetReport};
