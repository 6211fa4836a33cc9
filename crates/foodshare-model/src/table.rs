// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Providers,
    Receivers,
    FoodListings,
    Claims,
}

/// Dependency order: referenced tables come before the tables pointing at them.
pub const ALL_TABLES: [TableName; 4] = [
    TableName::Providers,
    TableName::Receivers,
    TableName::FoodListings,
    TableName::Claims,
];

impl TableName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Providers => "providers",
            Self::Receivers => "receivers",
            Self::FoodListings => "food_listings",
            Self::Claims => "claims",
        }
    }

    #[must_use]
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Providers => &["Provider_ID", "Name", "Type", "Address", "City", "Contact"],
            Self::Receivers => &["Receiver_ID", "Name", "Type", "City", "Contact"],
            Self::FoodListings => &[
                "Food_ID",
                "Food_Name",
                "Quantity",
                "Expiry_Date",
                "Provider_ID",
                "Provider_Type",
                "Location",
                "Food_Type",
                "Meal_Type",
            ],
            Self::Claims => &["Claim_ID", "Food_ID", "Receiver_ID", "Status", "Timestamp"],
        }
    }

    /// File name used when seeding a whole directory.
    #[must_use]
    pub fn seed_file_name(self) -> String {
        format!("{}_data.csv", self.as_str())
    }

    #[must_use]
    pub fn has_column(self, name: &str) -> bool {
        self.columns().iter().any(|c| *c == name)
    }
}

impl Display for TableName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lookup_is_case_sensitive() {
        assert!(TableName::Claims.has_column("Status"));
        assert!(!TableName::Claims.has_column("status"));
        assert_eq!(
            TableName::FoodListings.seed_file_name(),
            "food_listings_data.csv"
        );
    }
}
