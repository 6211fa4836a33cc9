// SPDX-License-Identifier: Apache-2.0

use rusqlite::ErrorCode as SqliteCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestErrorCode {
    StorageUnavailable,
    SchemaMismatch,
    ConstraintViolation,
    Io,
    Sql,
}

impl IngestErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StorageUnavailable => "storage_unavailable",
            Self::SchemaMismatch => "schema_mismatch",
            Self::ConstraintViolation => "constraint_violation",
            Self::Io => "io",
            Self::Sql => "sql",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestError {
    pub code: IngestErrorCode,
    pub message: String,
}

impl IngestError {
    #[must_use]
    pub fn new(code: IngestErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::new(IngestErrorCode::SchemaMismatch, message)
    }

    pub(crate) fn io(message: impl Into<String>) -> Self {
        Self::new(IngestErrorCode::Io, message)
    }

    /// Classifies a SQLite failure by its primary result code.
    pub(crate) fn sqlite(context: &str, err: &rusqlite::Error) -> Self {
        let code = match err.sqlite_error_code() {
            Some(SqliteCode::ConstraintViolation) => IngestErrorCode::ConstraintViolation,
            Some(
                SqliteCode::CannotOpen
                | SqliteCode::PermissionDenied
                | SqliteCode::ReadOnly
                | SqliteCode::DiskFull
                | SqliteCode::NotADatabase
                | SqliteCode::DatabaseCorrupt
                | SqliteCode::SystemIoFailure,
            ) => IngestErrorCode::StorageUnavailable,
            _ => IngestErrorCode::Sql,
        };
        Self::new(code, format!("{context}: {err}"))
    }
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for IngestError {}
