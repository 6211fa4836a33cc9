// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::time::Duration;

use crate::{ENV_FOODSHARE_BUSY_TIMEOUT_MS, ENV_FOODSHARE_DB, ENV_FOODSHARE_FOREIGN_KEYS};

pub const DEFAULT_DB_NAME: &str = "food_waste.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Location and connection settings for the single-file store.
///
/// Every runner and loader receives one of these at construction; nothing in
/// the workspace reads a process-wide storage location.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub busy_timeout: Duration,
    /// Applies `PRAGMA foreign_keys=ON` to every connection. Off by default:
    /// the declared keys document relationships, deletes never cascade.
    pub foreign_keys: bool,
}

impl StoreConfig {
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            foreign_keys: false,
        }
    }

    #[must_use]
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    #[must_use]
    pub fn with_foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source; `from_env` passes
    /// the process environment.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = resolve_db_path(None, &lookup);
        let busy_ms = env_u64(&lookup, ENV_FOODSHARE_BUSY_TIMEOUT_MS, DEFAULT_BUSY_TIMEOUT_MS);
        let foreign_keys = env_bool(&lookup, ENV_FOODSHARE_FOREIGN_KEYS, false);
        Self::new(db_path)
            .with_busy_timeout(Duration::from_millis(busy_ms))
            .with_foreign_keys(foreign_keys)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_NAME)
    }
}

#[must_use]
pub fn resolve_db_path(
    explicit: Option<PathBuf>,
    lookup: &impl Fn(&str) -> Option<String>,
) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    if let Some(raw) = lookup(ENV_FOODSHARE_DB) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    PathBuf::from(DEFAULT_DB_NAME)
}

pub fn env_bool(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    lookup(name)
        .and_then(|v| match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

pub fn env_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> u64 {
    lookup(name)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
