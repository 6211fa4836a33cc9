// SPDX-License-Identifier: Apache-2.0

use foodshare_core::StoreConfig;
use foodshare_model::{TableName, ALL_TABLES};
use rusqlite::{Connection, OpenFlags};

use crate::IngestError;

pub const SCHEMA_VERSION: i64 = 1;

const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS providers (
      Provider_ID INTEGER PRIMARY KEY,
      Name TEXT,
      Type TEXT,
      Address TEXT,
      City TEXT,
      Contact TEXT
    );
    CREATE TABLE IF NOT EXISTS receivers (
      Receiver_ID INTEGER PRIMARY KEY,
      Name TEXT,
      Type TEXT,
      City TEXT,
      Contact TEXT
    );
    CREATE TABLE IF NOT EXISTS food_listings (
      Food_ID INTEGER PRIMARY KEY,
      Food_Name TEXT,
      Quantity INTEGER,
      Expiry_Date DATE,
      Provider_ID INTEGER,
      Provider_Type TEXT,
      Location TEXT,
      Food_Type TEXT,
      Meal_Type TEXT,
      FOREIGN KEY (Provider_ID) REFERENCES providers(Provider_ID)
    );
    CREATE TABLE IF NOT EXISTS claims (
      Claim_ID INTEGER PRIMARY KEY,
      Food_ID INTEGER,
      Receiver_ID INTEGER,
      Status TEXT,
      Timestamp DATETIME,
      FOREIGN KEY (Food_ID) REFERENCES food_listings(Food_ID),
      FOREIGN KEY (Receiver_ID) REFERENCES receivers(Receiver_ID)
    );
";

/// Opens the store for provisioning, creating the file when it is absent.
pub fn open_store(config: &StoreConfig) -> Result<Connection, IngestError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(&config.db_path, flags).map_err(|e| {
        IngestError::sqlite(&format!("cannot open {}", config.db_path.display()), &e)
    })?;
    conn.busy_timeout(config.busy_timeout)
        .map_err(|e| IngestError::sqlite("busy_timeout", &e))?;
    let fk = if config.foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys={fk};"))
        .map_err(|e| IngestError::sqlite("foreign_keys pragma", &e))?;
    Ok(conn)
}

pub(crate) fn create_tables(conn: &Connection) -> Result<(), IngestError> {
    conn.execute_batch(CREATE_TABLES)
        .map_err(|e| IngestError::sqlite("create tables", &e))?;
    let version: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| IngestError::sqlite("read user_version", &e))?;
    if version == 0 {
        conn.execute_batch(&format!("PRAGMA user_version={SCHEMA_VERSION};"))
            .map_err(|e| IngestError::sqlite("write user_version", &e))?;
    }
    Ok(())
}

/// Creates the four tables when absent. Existing tables and rows are never
/// dropped or altered, so calling this repeatedly is safe.
pub fn ensure_schema(config: &StoreConfig) -> Result<(), IngestError> {
    let conn = open_store(config)?;
    create_tables(&conn)?;
    tracing::info!(db = %config.db_path.display(), "schema ensured");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TableStatus {
    pub table: TableName,
    pub exists: bool,
    pub row_count: Option<i64>,
}

/// Presence and size of each table, in dependency order. Does not create anything.
pub fn schema_report(config: &StoreConfig) -> Result<Vec<TableStatus>, IngestError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(&config.db_path, flags).map_err(|e| {
        IngestError::sqlite(&format!("cannot open {}", config.db_path.display()), &e)
    })?;
    let mut out = Vec::with_capacity(ALL_TABLES.len());
    for table in ALL_TABLES {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                [table.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| IngestError::sqlite("inspect sqlite_master", &e))?;
        let row_count = if exists {
            let count: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table.as_str()), [], |row| {
                    row.get(0)
                })
                .map_err(|e| IngestError::sqlite("count rows", &e))?;
            Some(count)
        } else {
            None
        };
        out.push(TableStatus {
            table,
            exists,
            row_count,
        });
    }
    Ok(out)
}
