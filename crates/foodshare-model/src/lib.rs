// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Shared vocabulary for the food donation schema.
//!
//! Column and table names here are the storage contract: they match existing
//! data files byte for byte, including case.

mod classify;
mod labeled;
mod provider;
mod status;
mod table;

pub use classify::{ClassifyError, LookupClassifier, LookupEntry, MealTypeClassifier};
pub use labeled::{CellValue, LabeledTable};
pub use provider::{ParseError, Provider, ProviderId};
pub use status::ClaimStatus;
pub use table::{TableName, ALL_TABLES};

pub const CRATE_NAME: &str = "foodshare-model";
