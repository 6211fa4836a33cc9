// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use foodshare_core::{sha256_hex, StoreConfig};
use foodshare_model::{TableName, ALL_TABLES};
use rusqlite::{params_from_iter, TransactionBehavior};

use crate::logging::{LoadEvent, LoadLog, LoadStage};
use crate::schema::{create_tables, ensure_schema, open_store};
use crate::{IngestError, IngestErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Rows are added to whatever the table already holds; re-running a load
    /// duplicates key-less rows.
    #[default]
    Append,
    /// The table is emptied first, inside the same transaction.
    Replace,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub source: PathBuf,
    pub table: TableName,
    pub mode: LoadMode,
}

impl LoadOptions {
    #[must_use]
    pub fn append(source: impl Into<PathBuf>, table: TableName) -> Self {
        Self {
            source: source.into(),
            table,
            mode: LoadMode::Append,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LoadReport {
    pub table: TableName,
    pub source: PathBuf,
    pub mode: LoadMode,
    pub columns: Vec<String>,
    pub rows_appended: u64,
    pub rows_replaced: u64,
    pub source_sha256: String,
}

pub fn load_table(config: &StoreConfig, opts: &LoadOptions) -> Result<LoadReport, IngestError> {
    load_table_with_events(config, opts).map(|(report, _)| report)
}

pub fn load_table_with_events(
    config: &StoreConfig,
    opts: &LoadOptions,
) -> Result<(LoadReport, Vec<LoadEvent>), IngestError> {
    let mut log = LoadLog::default();
    log.emit(
        LoadStage::Prepare,
        "load.start",
        fields(&[
            ("table", opts.table.as_str().to_string()),
            ("source", opts.source.display().to_string()),
        ]),
    );

    let bytes = fs::read(&opts.source).map_err(|e| {
        IngestError::io(format!("cannot read {}: {e}", opts.source.display()))
    })?;
    let source_sha256 = sha256_hex(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(&opts.source, &e))?
        .iter()
        .map(ToString::to_string)
        .collect();
    validate_headers(opts.table, &headers)?;
    log.emit(
        LoadStage::Decode,
        "load.decode.headers",
        fields(&[("columns", headers.join(","))]),
    );

    let mut conn = open_store(config)?;
    create_tables(&conn)?;
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| IngestError::sqlite("begin load transaction", &e))?;

    let rows_replaced = match opts.mode {
        LoadMode::Append => 0,
        LoadMode::Replace => tx
            .execute(&format!("DELETE FROM {}", opts.table.as_str()), [])
            .map_err(|e| IngestError::sqlite("clear table before replace", &e))?
            as u64,
    };

    log.emit(LoadStage::Persist, "load.persist.begin", BTreeMap::new());
    let mut rows_appended = 0_u64;
    {
        let mut stmt = tx
            .prepare(&insert_sql(opts.table, &headers))
            .map_err(|e| IngestError::sqlite("prepare insert", &e))?;
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(&opts.source, &e))?;
            // Empty fields are missing values, stored as NULL.
            let values: Vec<Option<&str>> = record
                .iter()
                .map(|v| if v.is_empty() { None } else { Some(v) })
                .collect();
            stmt.execute(params_from_iter(values.iter())).map_err(|e| {
                IngestError::sqlite(
                    &format!(
                        "insert into {} (data row {})",
                        opts.table.as_str(),
                        rows_appended + 1
                    ),
                    &e,
                )
            })?;
            rows_appended += 1;
        }
    }
    tx.commit()
        .map_err(|e| IngestError::sqlite("commit load transaction", &e))?;

    log.emit(
        LoadStage::Finalize,
        "load.complete",
        fields(&[
            ("rows_appended", rows_appended.to_string()),
            ("rows_replaced", rows_replaced.to_string()),
        ]),
    );
    tracing::info!(
        table = opts.table.as_str(),
        source = %opts.source.display(),
        rows_appended,
        rows_replaced,
        "table loaded"
    );

    let report = LoadReport {
        table: opts.table,
        source: opts.source.clone(),
        mode: opts.mode,
        columns: headers,
        rows_appended,
        rows_replaced,
        source_sha256,
    };
    Ok((report, log.into_events()))
}

/// Provisions the schema and loads `<table>_data.csv` for every table in
/// dependency order. Stops at the first failing file; tables loaded before it
/// stay loaded.
pub fn seed_directory(
    config: &StoreConfig,
    dir: &Path,
    mode: LoadMode,
) -> Result<Vec<LoadReport>, IngestError> {
    ensure_schema(config)?;
    let mut reports = Vec::with_capacity(ALL_TABLES.len());
    for table in ALL_TABLES {
        let opts = LoadOptions {
            source: dir.join(table.seed_file_name()),
            table,
            mode,
        };
        let report = load_table(config, &opts).map_err(|e| {
            IngestError::new(e.code, format!("seeding {table} failed: {}", e.message))
        })?;
        reports.push(report);
    }
    Ok(reports)
}

fn validate_headers(table: TableName, headers: &[String]) -> Result<(), IngestError> {
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(IngestError::schema(format!(
            "source for {table} has no header row"
        )));
    }
    let unknown: Vec<&str> = headers
        .iter()
        .filter(|h| !table.has_column(h))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(IngestError::schema(format!(
            "columns [{}] do not exist in {table}; expected a subset of [{}]",
            unknown.join(", "),
            table.columns().join(", ")
        )));
    }
    let mut seen = BTreeSet::new();
    for h in headers {
        if !seen.insert(h.as_str()) {
            return Err(IngestError::schema(format!(
                "column {h} appears more than once in source for {table}"
            )));
        }
    }
    Ok(())
}

fn insert_sql(table: TableName, headers: &[String]) -> String {
    let columns: Vec<String> = headers.iter().map(|h| format!("\"{h}\"")).collect();
    let placeholders: Vec<String> = (1..=headers.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.as_str(),
        columns.join(", "),
        placeholders.join(", ")
    )
}

fn csv_error(source: &Path, err: &csv::Error) -> IngestError {
    let line = err
        .position()
        .map_or_else(String::new, |p| format!(" at line {}", p.line()));
    match err.kind() {
        csv::ErrorKind::Io(_) => IngestError::io(format!("{}{line}: {err}", source.display())),
        csv::ErrorKind::UnequalLengths { .. } => IngestError::new(
            IngestErrorCode::SchemaMismatch,
            format!("{}{line}: row width differs from header: {err}", source.display()),
        ),
        _ => IngestError::io(format!("{}{line}: malformed csv: {err}", source.display())),
    }
}

fn fields(pairs: &[(&str, String)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}
