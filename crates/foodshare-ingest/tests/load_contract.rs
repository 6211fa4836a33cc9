// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use foodshare_core::{sha256_hex, StoreConfig};
use foodshare_ingest::{
    ensure_schema, hash_file, load_table, load_table_with_events, schema_report, seed_directory, LoadMode,
    LoadOptions, LoadStage,
};
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
fn ensure_schema_is_idempotent_and_keeps_rows() {
    let dir = tempdir().expect("tmp");
    let cfg = StoreConfig::new(dir.path().join("food.db"));
    ensure_schema(&cfg).expect("first");
    load_table(
        &cfg,
        &LoadOptions::append(fixture("tests/fixtures/seed/providers_data.csv"), TableName::Providers),
    )
    .expect("load");
    ensure_schema(&cfg).expect("second");
    assert_eq!(count(&cfg, "providers"), 5);

    let report = schema_report(&cfg).expect("report");
    assert_eq!(report.len(), 4);
    assert!(report.iter().all(|t| t.exists));
    assert_eq!(report[0].row_count, Some(5));
    assert_eq!(report[3].row_count, Some(0));
}

#[test]
fn seed_directory_loads_all_tables_in_dependency_order() {
    let dir = tempdir().expect("tmp");
    let cfg = StoreConfig::new(dir.path().join("food.db"));
    let reports =
        seed_directory(&cfg, &fixture("tests/fixtures/seed"), LoadMode::Append).expect("seed");
    let order: Vec<TableName> = reports.iter().map(|r| r.table).collect();
    assert_eq!(
        order,
        vec![
            TableName::Providers,
            TableName::Receivers,
            TableName::FoodListings,
            TableName::Claims
        ]
    );
    assert_eq!(count(&cfg, "providers"), 5);
    assert_eq!(count(&cfg, "receivers"), 4);
    assert_eq!(count(&cfg, "food_listings"), 6);
    assert_eq!(count(&cfg, "claims"), 6);
}

#[test]
fn values_are_coerced_by_column_affinity_and_blanks_become_null() {
    let dir = tempdir().expect("tmp");
    let cfg = StoreConfig::new(dir.path().join("food.db"));
    seed_directory(&cfg, &fixture("tests/fixtures/seed"), LoadMode::Append).expect("seed");
    let conn = Connection::open(&cfg.db_path).expect("open");

    let quantity_type: String = conn
        .query_row(
            "SELECT typeof(Quantity) FROM food_listings WHERE Food_ID = 1",
            [],
            |r| r.get(0),
        )
        .expect("typeof");
    assert_eq!(quantity_type, "integer");

    let contact: Option<String> = conn
        .query_row(
            "SELECT Contact FROM receivers WHERE Receiver_ID = 4",
            [],
            |r| r.get(0),
        )
        .expect("contact");
    assert_eq!(contact, None);

    let address: String = conn
        .query_row(
            "SELECT Address FROM providers WHERE Provider_ID = 3",
            [],
            |r| r.get(0),
        )
        .expect("address");
    assert_eq!(address, "561 Martinez Point, Suite 507");
}

#[test]
fn append_is_not_idempotent_for_keyless_sources() {
    let dir = tempdir().expect("tmp");
    let cfg = StoreConfig::new(dir.path().join("food.db"));
    let opts = LoadOptions::append(
        fixture("tests/fixtures/bad/receivers_no_keys.csv"),
        TableName::Receivers,
    );
    load_table(&cfg, &opts).expect("first");
    load_table(&cfg, &opts).expect("second");
    assert_eq!(count(&cfg, "receivers"), 4);
}

#[test]
fn replace_mode_leaves_exactly_one_copy() {
    let dir = tempdir().expect("tmp");
    let cfg = StoreConfig::new(dir.path().join("food.db"));
    let opts = LoadOptions {
        source: fixture("tests/fixtures/seed/claims_data.csv"),
        table: TableName::Claims,
        mode: LoadMode::Replace,
    };
    let first = load_table(&cfg, &opts).expect("first");
    let second = load_table(&cfg, &opts).expect("second");
    assert_eq!(first.rows_replaced, 0);
    assert_eq!(second.rows_replaced, 6);
    assert_eq!(second.rows_appended, 6);
    assert_eq!(count(&cfg, "claims"), 6);
}

#[test]
fn load_report_carries_source_digest_and_stage_events() {
    let dir = tempdir().expect("tmp");
    let cfg = StoreConfig::new(dir.path().join("food.db"));
    let source = fixture("tests/fixtures/seed/food_listings_data.csv");
    let (report, events) =
        load_table_with_events(&cfg, &LoadOptions::append(source.clone(), TableName::FoodListings))
            .expect("load");
    assert_eq!(
        report.source_sha256,
        sha256_hex(&std::fs::read(&source).expect("bytes"))
    );
    assert_eq!(report.source_sha256, hash_file(&source).expect("digest"));
    assert_eq!(report.columns.len(), TableName::FoodListings.columns().len());
    assert_eq!(events.first().map(|e| &e.stage), Some(&LoadStage::Prepare));
    assert_eq!(events.last().map(|e| e.name.as_str()), Some("load.complete"));
    assert_eq!(
        events.last().and_then(|e| e.fields.get("rows_appended")),
        Some(&"6".to_string())
    );
}
