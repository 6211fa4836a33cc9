// SPDX-License-Identifier: Apache-2.0

use foodshare_model::ParseError;
use rusqlite::ErrorCode as SqliteCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QueryErrorCode {
    StorageUnavailable,
    ConstraintViolation,
    NotFound,
    Validation,
    Sql,
}

impl QueryErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StorageUnavailable => "storage_unavailable",
            Self::ConstraintViolation => "constraint_violation",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Sql => "sql",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub code: QueryErrorCode,
    pub message: String,
}

impl QueryError {
    #[must_use]
    pub fn new(code: QueryErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::new(QueryErrorCode::Validation, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(QueryErrorCode::NotFound, message)
    }

    pub(crate) fn sqlite(context: &str, err: &rusqlite::Error) -> Self {
        let code = match err.sqlite_error_code() {
            Some(SqliteCode::ConstraintViolation) => QueryErrorCode::ConstraintViolation,
            Some(
                SqliteCode::CannotOpen
                | SqliteCode::PermissionDenied
                | SqliteCode::ReadOnly
                | SqliteCode::DiskFull
                | SqliteCode::NotADatabase
                | SqliteCode::DatabaseCorrupt
                | SqliteCode::SystemIoFailure,
            ) => QueryErrorCode::StorageUnavailable,
            _ => QueryErrorCode::Sql,
        };
        Self::new(code, format!("{context}: {err}"))
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for QueryError {}

impl From<ParseError> for QueryError {
    fn from(value: ParseError) -> Self {
        Self::validation(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    fn failure(code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(code), None)
    }

    #[test]
    fn storage_failures_are_not_internal_errors() {
        for code in [
            ffi::SQLITE_CANTOPEN,
            ffi::SQLITE_PERM,
            ffi::SQLITE_READONLY,
            ffi::SQLITE_FULL,
            ffi::SQLITE_NOTADB,
            ffi::SQLITE_CORRUPT,
            ffi::SQLITE_IOERR,
        ] {
            let err = QueryError::sqlite("write", &failure(code));
            assert_eq!(err.code, QueryErrorCode::StorageUnavailable, "{code}");
        }
        assert_eq!(
            QueryError::sqlite("write", &failure(ffi::SQLITE_CONSTRAINT)).code,
            QueryErrorCode::ConstraintViolation
        );
        assert_eq!(
            QueryError::sqlite("read", &failure(ffi::SQLITE_ERROR)).code,
            QueryErrorCode::Sql
        );
    }
}
