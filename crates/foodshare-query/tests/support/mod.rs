// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::path::PathBuf;

use foodshare_core::StoreConfig;
use foodshare_ingest::{ensure_schema, seed_directory, LoadMode};
use foodshare_query::QueryRunner;
use tempfile::TempDir;

pub fn seed_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../foodshare-ingest/tests/fixtures/seed")
}

/// Fresh store holding the shared seed fixtures.
pub fn seeded() -> (TempDir, QueryRunner) {
    let dir = tempfile::tempdir().expect("tmp");
    let cfg = StoreConfig::new(dir.path().join("food.db"));
    seed_directory(&cfg, &seed_dir(), LoadMode::Append).expect("seed");
    (dir, QueryRunner::new(cfg))
}

/// Store with the four tables and no rows.
pub fn empty() -> (TempDir, QueryRunner) {
    let dir = tempfile::tempdir().expect("tmp");
    let cfg = StoreConfig::new(dir.path().join("food.db"));
    ensure_schema(&cfg).expect("schema");
    (dir, QueryRunner::new(cfg))
}
