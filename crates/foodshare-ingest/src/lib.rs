// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod error;
mod hashing;
mod load;
mod logging;
mod schema;

pub use error::{IngestError, IngestErrorCode};
pub use hashing::hash_file;
pub use load::{load_table, load_table_with_events, seed_directory, LoadMode, LoadOptions, LoadReport};
pub use logging::{LoadEvent, LoadLog, LoadStage};
pub use schema::{ensure_schema, open_store, schema_report, TableStatus, SCHEMA_VERSION};

pub const CRATE_NAME: &str = "foodshare-ingest";
