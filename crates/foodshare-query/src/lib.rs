// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Read and write access to the food donation store.
//!
//! [`QueryRunner`] owns the connection discipline; the catalog and provider
//! modules only build SQL and bind caller values through it.

mod catalog;
mod providers;
mod query_error;
mod runner;

pub use catalog::{
    avg_quantity_per_receiver, claim_status_percentages, claims_per_food_item,
    claims_per_meal_type, explain_report, food_types, provider_contacts_by_city,
    providers_and_receivers_by_city, run_report, top_completed_provider, top_listing_location,
    top_provider_type, top_receivers, total_donated_per_provider, total_food_available,
    ReportKind,
};
pub use providers::{
    create_provider, delete_provider, get_provider, list_providers, update_provider,
    Confirmation, ProviderAction,
};
pub use query_error::{QueryError, QueryErrorCode};
pub use rusqlite::types::Value;
pub use runner::QueryRunner;

pub const CRATE_NAME: &str = "foodshare-query";
