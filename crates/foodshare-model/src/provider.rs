// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::labeled::{CellValue, LabeledTable};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    InvalidFormat(&'static str, String),
    MissingColumn(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::InvalidFormat(name, value) => write!(f, "invalid {name} `{value}`"),
            Self::MissingColumn(name) => write!(f, "row has no `{name}` column"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Caller-assigned provider identity; never generated by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(i64);

impl ProviderId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Parses a decimal id as typed by a caller; surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty("Provider_ID"));
        }
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ParseError::InvalidFormat("Provider_ID", input.to_string()))
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    #[serde(rename = "Provider_ID")]
    pub id: ProviderId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub provider_type: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Contact")]
    pub contact: String,
}

impl Provider {
    #[must_use]
    pub fn new(
        id: ProviderId,
        name: impl Into<String>,
        provider_type: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            provider_type: provider_type.into(),
            address: address.into(),
            city: city.into(),
            contact: contact.into(),
        }
    }

    /// Reads one row of a providers listing. NULL text cells read as empty strings.
    pub fn from_row(table: &LabeledTable, row: usize) -> Result<Self, ParseError> {
        let text = |column: &'static str| -> Result<String, ParseError> {
            match table.value(row, column) {
                Some(CellValue::Null) => Ok(String::new()),
                Some(value) => Ok(value.to_text()),
                None => Err(ParseError::MissingColumn(column)),
            }
        };
        let id = match table.value(row, "Provider_ID") {
            Some(CellValue::Integer(v)) => ProviderId::new(*v),
            Some(other) => ProviderId::parse(&other.to_text())?,
            None => return Err(ParseError::MissingColumn("Provider_ID")),
        };
        Ok(Self {
            id,
            name: text("Name")?,
            provider_type: text("Type")?,
            address: text("Address")?,
            city: text("City")?,
            contact: text("Contact")?,
        })
    }
}
