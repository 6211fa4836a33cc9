// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

use foodshare_model::{CellValue, ClaimStatus, LabeledTable};
use rusqlite::types::Value;

use crate::{QueryError, QueryRunner};

/// The fixed set of analytical reports over the donation store.
///
/// Every ordering ends with a tie-break on the grouped label so that equal
/// counts always come back in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    ProvidersReceiversByCity,
    TopProviderType,
    ProviderContactsByCity,
    TopReceivers,
    TotalFoodAvailable,
    TopListingLocation,
    FoodTypes,
    ClaimsPerFoodItem,
    TopCompletedProvider,
    ClaimStatusPercentages,
    AvgQuantityPerReceiver,
    ClaimsPerMealType,
    TotalDonatedPerProvider,
}

impl ReportKind {
    pub const ALL: [Self; 13] = [
        Self::ProvidersReceiversByCity,
        Self::TopProviderType,
        Self::ProviderContactsByCity,
        Self::TopReceivers,
        Self::TotalFoodAvailable,
        Self::TopListingLocation,
        Self::FoodTypes,
        Self::ClaimsPerFoodItem,
        Self::TopCompletedProvider,
        Self::ClaimStatusPercentages,
        Self::AvgQuantityPerReceiver,
        Self::ClaimsPerMealType,
        Self::TotalDonatedPerProvider,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::ProvidersReceiversByCity => "providers-receivers-by-city",
            Self::TopProviderType => "top-provider-type",
            Self::ProviderContactsByCity => "provider-contacts-by-city",
            Self::TopReceivers => "top-receivers",
            Self::TotalFoodAvailable => "total-food-available",
            Self::TopListingLocation => "top-listing-location",
            Self::FoodTypes => "food-types",
            Self::ClaimsPerFoodItem => "claims-per-food-item",
            Self::TopCompletedProvider => "top-completed-provider",
            Self::ClaimStatusPercentages => "claim-status-percentages",
            Self::AvgQuantityPerReceiver => "avg-quantity-per-receiver",
            Self::ClaimsPerMealType => "claims-per-meal-type",
            Self::TotalDonatedPerProvider => "total-donated-per-provider",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ProvidersReceiversByCity => "Providers and receivers per city",
            Self::TopProviderType => "Provider type with the most listings",
            Self::ProviderContactsByCity => "Provider contacts in a city",
            Self::TopReceivers => "Receivers ranked by claims",
            Self::TotalFoodAvailable => "Total quantity of food listed",
            Self::TopListingLocation => "Location with the most listings",
            Self::FoodTypes => "Listings per food type",
            Self::ClaimsPerFoodItem => "Claims per food item",
            Self::TopCompletedProvider => "Provider with the most completed claims",
            Self::ClaimStatusPercentages => "Share of claims per status",
            Self::AvgQuantityPerReceiver => "Average claimed quantity per receiver",
            Self::ClaimsPerMealType => "Claims per meal type",
            Self::TotalDonatedPerProvider => "Total quantity donated per provider",
        }
    }

    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let wanted = input.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == wanted)
            .ok_or_else(|| QueryError::validation(format!("unknown report `{input}`")))
    }

    /// Only the contacts report is parameterized.
    #[must_use]
    pub const fn takes_city(self) -> bool {
        matches!(self, Self::ProviderContactsByCity)
    }

    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::ProvidersReceiversByCity => SQL_PROVIDERS_RECEIVERS_BY_CITY,
            Self::TopProviderType => SQL_TOP_PROVIDER_TYPE,
            Self::ProviderContactsByCity => SQL_PROVIDER_CONTACTS_BY_CITY,
            Self::TopReceivers => SQL_TOP_RECEIVERS,
            Self::TotalFoodAvailable => SQL_TOTAL_FOOD_AVAILABLE,
            Self::TopListingLocation => SQL_TOP_LISTING_LOCATION,
            Self::FoodTypes => SQL_FOOD_TYPES,
            Self::ClaimsPerFoodItem => SQL_CLAIMS_PER_FOOD_ITEM,
            Self::TopCompletedProvider => SQL_TOP_COMPLETED_PROVIDER,
            Self::ClaimStatusPercentages => SQL_CLAIM_STATUS_PERCENTAGES,
            Self::AvgQuantityPerReceiver => SQL_AVG_QUANTITY_PER_RECEIVER,
            Self::ClaimsPerMealType => SQL_CLAIMS_PER_MEAL_TYPE,
            Self::TotalDonatedPerProvider => SQL_TOTAL_DONATED_PER_PROVIDER,
        }
    }
}

impl Display for ReportKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

const SQL_PROVIDERS_RECEIVERS_BY_CITY: &str = "
    SELECT City AS City,
           SUM(CASE WHEN kind = 'provider' THEN 1 ELSE 0 END) AS provider_count,
           SUM(CASE WHEN kind = 'receiver' THEN 1 ELSE 0 END) AS receiver_count
    FROM (
        SELECT City, 'provider' AS kind FROM providers
        UNION ALL
        SELECT City, 'receiver' AS kind FROM receivers
    ) AS combined
    GROUP BY City
    ORDER BY City ASC";

const SQL_TOP_PROVIDER_TYPE: &str = "
    SELECT f.Provider_Type AS Provider_Type, COUNT(*) AS total_listings
    FROM providers p
    JOIN food_listings f ON p.Provider_ID = f.Provider_ID
    GROUP BY f.Provider_Type
    ORDER BY total_listings DESC, f.Provider_Type ASC
    LIMIT 1";

const SQL_PROVIDER_CONTACTS_BY_CITY: &str = "
    SELECT p.Name AS Provider_Name, p.Contact AS Contact, p.City AS City
    FROM providers p
    WHERE LOWER(TRIM(p.City)) = LOWER(TRIM(?1))
    ORDER BY p.Provider_ID ASC";

const SQL_TOP_RECEIVERS: &str = "
    SELECT r.Name AS Name, COUNT(c.Claim_ID) AS total_claims
    FROM claims c
    JOIN receivers r ON c.Receiver_ID = r.Receiver_ID
    GROUP BY r.Receiver_ID, r.Name
    ORDER BY total_claims DESC, r.Name ASC";

const SQL_TOTAL_FOOD_AVAILABLE: &str = "
    SELECT SUM(Quantity) AS Total_Available_Quantity
    FROM food_listings";

const SQL_TOP_LISTING_LOCATION: &str = "
    SELECT Location AS Location, COUNT(*) AS Number_of_Listings
    FROM food_listings
    GROUP BY Location
    ORDER BY Number_of_Listings DESC, Location ASC
    LIMIT 1";

const SQL_FOOD_TYPES: &str = "
    SELECT Food_Type AS Food_Type, COUNT(*) AS Count
    FROM food_listings
    GROUP BY Food_Type
    ORDER BY Count DESC, Food_Type ASC";

const SQL_CLAIMS_PER_FOOD_ITEM: &str = "
    SELECT f.Food_Name AS Food_Name, COUNT(c.Claim_ID) AS Total_Claims
    FROM claims c
    JOIN food_listings f ON c.Food_ID = f.Food_ID
    GROUP BY f.Food_Name
    ORDER BY Total_Claims DESC, f.Food_Name ASC";

const SQL_TOP_COMPLETED_PROVIDER: &str = "
    SELECT p.Name AS Provider_Name, COUNT(c.Claim_ID) AS Successful_Claims
    FROM claims c
    JOIN food_listings f ON c.Food_ID = f.Food_ID
    JOIN providers p ON f.Provider_ID = p.Provider_ID
    WHERE c.Status = 'Completed'
    GROUP BY p.Provider_ID, p.Name
    ORDER BY Successful_Claims DESC, p.Name ASC
    LIMIT 1";

const SQL_CLAIM_STATUS_PERCENTAGES: &str = "
    SELECT Status AS Status,
           ROUND(COUNT(*) * 100.0 / (SELECT COUNT(*) FROM claims), 2) AS Percentage
    FROM claims
    GROUP BY Status
    ORDER BY Status ASC";

const SQL_AVG_QUANTITY_PER_RECEIVER: &str = "
    SELECT r.Name AS Receiver_Name, ROUND(AVG(f.Quantity), 2) AS Avg_Quantity_Claimed
    FROM claims c
    JOIN food_listings f ON c.Food_ID = f.Food_ID
    JOIN receivers r ON c.Receiver_ID = r.Receiver_ID
    GROUP BY r.Receiver_ID, r.Name
    ORDER BY r.Name ASC, r.Receiver_ID ASC";

const SQL_CLAIMS_PER_MEAL_TYPE: &str = "
    SELECT f.Meal_Type AS Meal_Type, COUNT(c.Claim_ID) AS Total_Claims
    FROM claims c
    JOIN food_listings f ON c.Food_ID = f.Food_ID
    GROUP BY f.Meal_Type
    ORDER BY Total_Claims DESC, f.Meal_Type ASC";

const SQL_TOTAL_DONATED_PER_PROVIDER: &str = "
    SELECT p.Name AS Provider_Name, SUM(f.Quantity) AS Total_Donated
    FROM food_listings f
    JOIN providers p ON f.Provider_ID = p.Provider_ID
    GROUP BY p.Provider_ID, p.Name
    ORDER BY Total_Donated DESC, p.Name ASC";

fn bind(kind: ReportKind, city: Option<&str>) -> Result<Vec<Value>, QueryError> {
    match (kind.takes_city(), city) {
        // SQL TRIM only strips spaces; tabs and newlines go here.
        (true, Some(city)) => Ok(vec![Value::Text(city.trim().to_string())]),
        (true, None) => Err(QueryError::validation(format!(
            "report {kind} requires a city"
        ))),
        (false, Some(_)) => Err(QueryError::validation(format!(
            "report {kind} does not take a city"
        ))),
        (false, None) => Ok(Vec::new()),
    }
}

/// Runs one report. `city` must be given exactly when the report takes one.
pub fn run_report(
    runner: &QueryRunner,
    kind: ReportKind,
    city: Option<&str>,
) -> Result<LabeledTable, QueryError> {
    let params = bind(kind, city)?;
    let table = runner.read(kind.sql(), &params)?;
    if kind == ReportKind::ClaimStatusPercentages {
        check_statuses(&table)?;
    }
    tracing::info!(report = kind.id(), rows = table.len(), "report complete");
    Ok(table)
}

pub fn explain_report(
    runner: &QueryRunner,
    kind: ReportKind,
    city: Option<&str>,
) -> Result<Vec<String>, QueryError> {
    let params = bind(kind, city)?;
    runner.explain(kind.sql(), &params)
}

fn check_statuses(table: &LabeledTable) -> Result<(), QueryError> {
    for value in table.column_values("Status") {
        let known = match value {
            CellValue::Text(text) => ClaimStatus::parse(text).is_some(),
            _ => false,
        };
        if !known {
            return Err(QueryError::validation(format!(
                "claims hold status `{}`; expected one of Pending, Completed, Cancelled",
                value.to_text()
            )));
        }
    }
    Ok(())
}

pub fn providers_and_receivers_by_city(runner: &QueryRunner) -> Result<LabeledTable, QueryError> {
    run_report(runner, ReportKind::ProvidersReceiversByCity, None)
}

pub fn top_provider_type(runner: &QueryRunner) -> Result<LabeledTable, QueryError> {
    run_report(runner, ReportKind::TopProviderType, None)
}

/// Matching ignores case and surrounding whitespace on both sides.
pub fn provider_contacts_by_city(
    runner: &QueryRunner,
    city: &str,
) -> Result<LabeledTable, QueryError> {
    run_report(runner, ReportKind::ProviderContactsByCity, Some(city))
}

pub fn top_receivers(runner: &QueryRunner) -> Result<LabeledTable, QueryError> {
    run_report(runner, ReportKind::TopReceivers, None)
}

/// Single row; the total is NULL, not zero, when nothing is listed.
pub fn total_food_available(runner: &QueryRunner) -> Result<LabeledTable, QueryError> {
    run_report(runner, ReportKind::TotalFoodAvailable, None)
}

pub fn top_listing_location(runner: &QueryRunner) -> Result<LabeledTable, QueryError> {
    run_report(runner, ReportKind::TopListingLocation, None)
}

pub fn food_types(runner: &QueryRunner) -> Result<LabeledTable, QueryError> {
    run_report(runner, ReportKind::FoodTypes, None)
}

pub fn claims_per_food_item(runner: &QueryRunner) -> Result<LabeledTable, QueryError> {
    run_report(runner, ReportKind::ClaimsPerFoodItem, None)
}

pub fn top_completed_provider(runner: &QueryRunner) -> Result<LabeledTable, QueryError> {
    run_report(runner, ReportKind::TopCompletedProvider, None)
}

pub fn claim_status_percentages(runner: &QueryRunner) -> Result<LabeledTable, QueryError> {
    run_report(runner, ReportKind::ClaimStatusPercentages, None)
}

pub fn avg_quantity_per_receiver(runner: &QueryRunner) -> Result<LabeledTable, QueryError> {
    run_report(runner, ReportKind::AvgQuantityPerReceiver, None)
}

pub fn claims_per_meal_type(runner: &QueryRunner) -> Result<LabeledTable, QueryError> {
    run_report(runner, ReportKind::ClaimsPerMealType, None)
}

pub fn total_donated_per_provider(runner: &QueryRunner) -> Result<LabeledTable, QueryError> {
    run_report(runner, ReportKind::TotalDonatedPerProvider, None)
}
