// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use foodshare_core::StoreConfig;
use foodshare_ingest::{load_table, seed_directory, IngestErrorCode, LoadMode, LoadOptions};
use foodshare_model::TableName;
use rusqlite::Connection;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(path)
}

fn count(cfg: &StoreConfig, table: &str) -> i64 {
    let conn = Connection::open(&cfg.db_path).expect("open");
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .expect("count")
}

#[test]
fn unknown_header_is_schema_mismatch_and_inserts_nothing() {
    let dir = tempdir().expect("tmp");
    let cfg = StoreConfig::new(dir.path().join("food.db"));
    load_table(
        &cfg,
        &LoadOptions::append(fixture("tests/fixtures/seed/claims_data.csv"), TableName::Claims),
    )
    .expect("unrelated load");

    let err = load_table(
        &cfg,
        &LoadOptions::append(
            fixture("tests/fixtures/bad/providers_unknown_column.csv"),
            TableName::Providers,
        ),
    )
    .expect_err("mismatch must fail");
    assert_eq!(err.code, IngestErrorCode::SchemaMismatch);
    assert!(err.message.contains("Kind"), "unexpected error: {}", err.message);
    assert_eq!(count(&cfg, "claims"), 6);
}

#[test]
fn unreadable_source_is_io_error() {
    let dir = tempdir().expect("tmp");
    let cfg = StoreConfig::new(dir.path().join("food.db"));
    let err = load_table(
        &cfg,
        &LoadOptions::append(dir.path().join("missing.csv"), TableName::Providers),
    )
    .expect_err("missing source");
    assert_eq!(err.code, IngestErrorCode::Io);
}

#[test]
fn ragged_row_rolls_back_the_whole_load() {
    let dir = tempdir().expect("tmp");
    let cfg = StoreConfig::new(dir.path().join("food.db"));
    let err = load_table(
        &cfg,
        &LoadOptions::append(fixture("tests/fixtures/bad/claims_ragged.csv"), TableName::Claims),
    )
    .expect_err("ragged row");
    assert_eq!(err.code, IngestErrorCode::SchemaMismatch);
    assert_eq!(count(&cfg, "claims"), 0);
}

#[test]
fn reloading_keyed_rows_is_a_constraint_violation() {
    let dir = tempdir().expect("tmp");
    let cfg = StoreConfig::new(dir.path().join("food.db"));
    let opts = LoadOptions::append(
        fixture("tests/fixtures/seed/providers_data.csv"),
        TableName::Providers,
    );
    load_table(&cfg, &opts).expect("first");
    let err = load_table(&cfg, &opts).expect_err("duplicate keys");
    assert_eq!(err.code, IngestErrorCode::ConstraintViolation);
    assert_eq!(count(&cfg, "providers"), 5);
}

#[test]
fn seed_stops_at_first_failure_and_names_the_table() {
    let dir = tempdir().expect("tmp");
    let seed = dir.path().join("seed");
    std::fs::create_dir_all(&seed).expect("mkdir");
    for name in ["providers_data.csv", "receivers_data.csv"] {
        std::fs::copy(fixture(&format!("tests/fixtures/seed/{name}")), seed.join(name))
            .expect("copy");
    }
    let cfg = StoreConfig::new(dir.path().join("food.db"));
    let err = seed_directory(&cfg, &seed, LoadMode::Append).expect_err("listings missing");
    assert_eq!(err.code, IngestErrorCode::Io);
    assert!(err.message.contains("food_listings"), "{}", err.message);
    assert_eq!(count(&cfg, "providers"), 5);
    assert_eq!(count(&cfg, "receivers"), 4);
    assert_eq!(count(&cfg, "claims"), 0);
}
