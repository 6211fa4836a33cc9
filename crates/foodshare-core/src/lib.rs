// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

pub mod canonical;
mod domain;
mod errors;

pub use canonical::sha256_hex;
pub use domain::config::{
    env_bool, env_u64, resolve_db_path, StoreConfig, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DB_NAME,
};
pub use errors::{ExitCode, MachineError};

pub const CRATE_NAME: &str = "foodshare-core";

pub const ENV_FOODSHARE_DB: &str = "FOODSHARE_DB";
pub const ENV_FOODSHARE_BUSY_TIMEOUT_MS: &str = "FOODSHARE_BUSY_TIMEOUT_MS";
pub const ENV_FOODSHARE_FOREIGN_KEYS: &str = "FOODSHARE_FOREIGN_KEYS";
pub const ENV_FOODSHARE_LOG_JSON: &str = "FOODSHARE_LOG_JSON";
