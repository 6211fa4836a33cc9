// SPDX-License-Identifier: Apache-2.0

use foodshare_core::StoreConfig;
use foodshare_model::{CellValue, LabeledTable};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OpenFlags, TransactionBehavior};

use crate::QueryError;

/// Executes statements against the configured store, one connection per call.
///
/// The runner never creates the database file: a missing store surfaces as
/// `StorageUnavailable` instead of an empty database.
#[derive(Debug, Clone)]
pub struct QueryRunner {
    config: StoreConfig,
}

impl QueryRunner {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn connect(&self) -> Result<Connection, QueryError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.config.db_path, flags).map_err(|e| {
            QueryError::sqlite(&format!("cannot open {}", self.config.db_path.display()), &e)
        })?;
        conn.busy_timeout(self.config.busy_timeout)
            .map_err(|e| QueryError::sqlite("busy_timeout", &e))?;
        let fk = if self.config.foreign_keys { "ON" } else { "OFF" };
        conn.execute_batch(&format!("PRAGMA foreign_keys={fk};"))
            .map_err(|e| QueryError::sqlite("foreign_keys pragma", &e))?;
        Ok(conn)
    }

    /// Runs a query and materializes every row under the statement's column labels.
    pub fn read(&self, sql: &str, params: &[Value]) -> Result<LabeledTable, QueryError> {
        tracing::debug!(sql, params = params.len(), "read");
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| QueryError::sqlite("prepare read", &e))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();
        let mut table = LabeledTable::new(columns);
        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(|e| QueryError::sqlite("execute read", &e))?;
        while let Some(row) = rows
            .next()
            .map_err(|e| QueryError::sqlite("step read", &e))?
        {
            let mut cells = Vec::with_capacity(width);
            for idx in 0..width {
                let value = row
                    .get_ref(idx)
                    .map_err(|e| QueryError::sqlite("decode column", &e))?;
                cells.push(decode_cell(value));
            }
            table.push_row(cells);
        }
        Ok(table)
    }

    /// Runs one mutating statement in an immediate transaction and returns the
    /// number of affected rows.
    pub fn write(&self, sql: &str, params: &[Value]) -> Result<usize, QueryError> {
        tracing::debug!(sql, params = params.len(), "write");
        let mut conn = self.connect()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| QueryError::sqlite("begin write", &e))?;
        let affected = tx
            .execute(sql, params_from_iter(params.iter()))
            .map_err(|e| QueryError::sqlite("execute write", &e))?;
        tx.commit()
            .map_err(|e| QueryError::sqlite("commit write", &e))?;
        Ok(affected)
    }

    /// `EXPLAIN QUERY PLAN` detail lines for a statement, in plan order.
    pub fn explain(&self, sql: &str, params: &[Value]) -> Result<Vec<String>, QueryError> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(&format!("EXPLAIN QUERY PLAN {sql}"))
            .map_err(|e| QueryError::sqlite("prepare explain", &e))?;
        let lines = stmt
            .query_map(params_from_iter(params.iter()), |row| row.get::<_, String>(3))
            .map_err(|e| QueryError::sqlite("execute explain", &e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| QueryError::sqlite("decode explain", &e))?;
        Ok(lines)
    }
}

fn decode_cell(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(v) => CellValue::Integer(v),
        ValueRef::Real(v) => CellValue::Real(v),
        ValueRef::Text(bytes) => CellValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        // No column is declared BLOB; stray blobs surface as lowercase hex.
        ValueRef::Blob(bytes) => {
            CellValue::Text(bytes.iter().map(|b| format!("{b:02x}")).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueryErrorCode;
    use tempfile::tempdir;

    fn scratch_store() -> (tempfile::TempDir, QueryRunner) {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("scratch.db");
        let conn = Connection::open(&path).expect("create");
        conn.execute_batch("CREATE TABLE t (k INTEGER PRIMARY KEY, v TEXT, r REAL);")
            .expect("ddl");
        (dir, QueryRunner::new(StoreConfig::new(path)))
    }

    #[test]
    fn missing_store_is_unavailable_and_not_created() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("absent.db");
        let runner = QueryRunner::new(StoreConfig::new(&path));
        let err = runner.read("SELECT 1", &[]).expect_err("no file");
        assert_eq!(err.code, QueryErrorCode::StorageUnavailable);
        assert!(!path.exists());
    }

    #[test]
    fn read_labels_come_from_the_statement() {
        let (_dir, runner) = scratch_store();
        runner
            .write(
                "INSERT INTO t (k, v, r) VALUES (?1, ?2, ?3)",
                &[Value::Integer(1), Value::Text("a".into()), Value::Real(1.5)],
            )
            .expect("insert");
        runner
            .write("INSERT INTO t (k) VALUES (?1)", &[Value::Integer(2)])
            .expect("insert null");
        let table = runner
            .read("SELECT k AS Key, v AS Label, r FROM t ORDER BY k", &[])
            .expect("read");
        assert_eq!(table.columns(), ["Key", "Label", "r"]);
        assert_eq!(table.value(0, "Label"), Some(&CellValue::Text("a".into())));
        assert_eq!(table.value(0, "r"), Some(&CellValue::Real(1.5)));
        assert_eq!(table.value(1, "Label"), Some(&CellValue::Null));
    }

    #[test]
    fn blobs_read_back_as_hex_text() {
        let (_dir, runner) = scratch_store();
        runner
            .write(
                "INSERT INTO t (k, v) VALUES (?1, ?2)",
                &[Value::Integer(3), Value::Blob(vec![0x00, 0xff, 0x1a])],
            )
            .expect("insert blob");
        let table = runner.read("SELECT v FROM t", &[]).expect("read");
        assert_eq!(table.value(0, "v"), Some(&CellValue::Text("00ff1a".into())));
    }

    #[test]
    fn bound_values_are_never_interpolated() {
        let (_dir, runner) = scratch_store();
        let hostile = "x'); DROP TABLE t; --";
        runner
            .write(
                "INSERT INTO t (k, v) VALUES (?1, ?2)",
                &[Value::Integer(7), Value::Text(hostile.into())],
            )
            .expect("insert");
        let table = runner
            .read("SELECT v FROM t WHERE v = ?1", &[Value::Text(hostile.into())])
            .expect("read");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn write_reports_affected_rows_and_constraint_failures() {
        let (_dir, runner) = scratch_store();
        let insert = "INSERT INTO t (k) VALUES (?1)";
        assert_eq!(runner.write(insert, &[Value::Integer(1)]).expect("first"), 1);
        let err = runner
            .write(insert, &[Value::Integer(1)])
            .expect_err("duplicate key");
        assert_eq!(err.code, QueryErrorCode::ConstraintViolation);
        assert_eq!(
            runner
                .write("DELETE FROM t WHERE k = ?1", &[Value::Integer(9)])
                .expect("noop delete"),
            0
        );
    }

    #[test]
    fn explain_returns_plan_lines() {
        let (_dir, runner) = scratch_store();
        let plan = runner
            .explain("SELECT v FROM t WHERE k = ?1", &[Value::Integer(1)])
            .expect("plan");
        assert!(!plan.is_empty());
        assert!(plan.iter().any(|line| line.to_ascii_uppercase().contains("SEARCH")));
    }
}
