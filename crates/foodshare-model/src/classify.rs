// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClassifyError {
    MissingInput(&'static str),
    EmptyTable,
    InvalidTable(String),
}

impl Display for ClassifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInput(name) => write!(f, "{name} is required for meal type prediction"),
            Self::EmptyTable => f.write_str("meal type lookup table has no entries"),
            Self::InvalidTable(msg) => write!(f, "invalid meal type lookup table: {msg}"),
        }
    }
}

impl std::error::Error for ClassifyError {}

/// Opaque meal-type predictor consumed by callers.
pub trait MealTypeClassifier {
    fn classify(
        &self,
        provider_type: &str,
        food_name: &str,
        location: &str,
    ) -> Result<String, ClassifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupEntry {
    pub provider_type: String,
    pub food_name: String,
    pub location: String,
    pub meal_type: String,
}

type TripleKey = (String, String, String);
type PairKey = (String, String);

/// Static lookup table exported from a trained model. No learning happens at
/// runtime; answers come from the most specific key present.
#[derive(Debug, Clone)]
pub struct LookupClassifier {
    by_triple: BTreeMap<TripleKey, String>,
    by_pair: BTreeMap<PairKey, String>,
    by_food: BTreeMap<String, String>,
    fallback: String,
}

impl LookupClassifier {
    pub fn from_entries(entries: &[LookupEntry]) -> Result<Self, ClassifyError> {
        if entries.is_empty() {
            return Err(ClassifyError::EmptyTable);
        }
        let mut triple_votes: BTreeMap<TripleKey, BTreeMap<String, usize>> = BTreeMap::new();
        let mut pair_votes: BTreeMap<PairKey, BTreeMap<String, usize>> = BTreeMap::new();
        let mut food_votes: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        let mut overall: BTreeMap<String, usize> = BTreeMap::new();

        for entry in entries {
            let label = entry.meal_type.trim().to_string();
            if label.is_empty() {
                return Err(ClassifyError::InvalidTable(format!(
                    "entry for food `{}` has an empty meal_type",
                    entry.food_name
                )));
            }
            let pt = normalize_key(&entry.provider_type);
            let food = normalize_key(&entry.food_name);
            let loc = normalize_key(&entry.location);
            *triple_votes
                .entry((pt.clone(), food.clone(), loc))
                .or_default()
                .entry(label.clone())
                .or_default() += 1;
            *pair_votes
                .entry((pt, food.clone()))
                .or_default()
                .entry(label.clone())
                .or_default() += 1;
            *food_votes
                .entry(food)
                .or_default()
                .entry(label.clone())
                .or_default() += 1;
            *overall.entry(label).or_default() += 1;
        }

        Ok(Self {
            by_triple: resolve_votes(triple_votes),
            by_pair: resolve_votes(pair_votes),
            by_food: resolve_votes(food_votes),
            fallback: majority_label(&overall).unwrap_or_default(),
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, ClassifyError> {
        let entries: Vec<LookupEntry> =
            serde_json::from_str(raw).map_err(|e| ClassifyError::InvalidTable(e.to_string()))?;
        Self::from_entries(&entries)
    }
}

impl MealTypeClassifier for LookupClassifier {
    fn classify(
        &self,
        provider_type: &str,
        food_name: &str,
        location: &str,
    ) -> Result<String, ClassifyError> {
        let pt = required(provider_type, "provider_type")?;
        let food = required(food_name, "food_name")?;
        let loc = required(location, "location")?;

        if let Some(label) = self.by_triple.get(&(pt.clone(), food.clone(), loc)) {
            return Ok(label.clone());
        }
        if let Some(label) = self.by_pair.get(&(pt, food.clone())) {
            return Ok(label.clone());
        }
        if let Some(label) = self.by_food.get(&food) {
            return Ok(label.clone());
        }
        Ok(self.fallback.clone())
    }
}

fn required(value: &str, name: &'static str) -> Result<String, ClassifyError> {
    let key = normalize_key(value);
    if key.is_empty() {
        return Err(ClassifyError::MissingInput(name));
    }
    Ok(key)
}

fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

fn resolve_votes<K: Ord>(votes: BTreeMap<K, BTreeMap<String, usize>>) -> BTreeMap<K, String> {
    votes
        .into_iter()
        .filter_map(|(key, counts)| majority_label(&counts).map(|label| (key, label)))
        .collect()
}

// Highest count wins; equal counts go to the lexicographically smallest label.
fn majority_label(counts: &BTreeMap<String, usize>) -> Option<String> {
    counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(label, _)| label.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pt: &str, food: &str, loc: &str, meal: &str) -> LookupEntry {
        LookupEntry {
            provider_type: pt.to_string(),
            food_name: food.to_string(),
            location: loc.to_string(),
            meal_type: meal.to_string(),
        }
    }

    fn classifier() -> LookupClassifier {
        LookupClassifier::from_entries(&[
            entry("Restaurant", "Rice", "Downtown", "Dinner"),
            entry("Restaurant", "Rice", "East Sheena", "Lunch"),
            entry("Grocery", "Rice", "Uptown", "Lunch"),
            entry("Cafe", "Bread", "Downtown", "Breakfast"),
            entry("Cafe", "Bread", "Uptown", "Breakfast"),
            entry("Supermarket", "Fruits", "Downtown", "Snacks"),
        ])
        .expect("classifier")
    }

    #[test]
    fn exact_triple_is_preferred_and_case_insensitive() {
        let c = classifier();
        assert_eq!(
            c.classify(" restaurant ", "RICE", "downtown").expect("label"),
            "Dinner"
        );
    }

    #[test]
    fn falls_back_through_pair_food_and_majority() {
        let c = classifier();
        // pair (restaurant, rice) has Dinner:1 Lunch:1, tie goes to "Dinner"
        assert_eq!(c.classify("Restaurant", "Rice", "Nowhere").expect("pair"), "Dinner");
        assert_eq!(c.classify("Cafe", "Rice", "Nowhere").expect("food"), "Lunch");
        assert_eq!(c.classify("Cafe", "Soup", "Nowhere").expect("majority"), "Breakfast");
    }

    #[test]
    fn blank_inputs_are_rejected() {
        let c = classifier();
        assert_eq!(
            c.classify("Cafe", "  ", "Downtown"),
            Err(ClassifyError::MissingInput("food_name"))
        );
    }

    #[test]
    fn empty_or_malformed_tables_are_rejected() {
        assert_eq!(
            LookupClassifier::from_entries(&[]).expect_err("empty"),
            ClassifyError::EmptyTable
        );
        assert!(matches!(
            LookupClassifier::from_json(r#"[{"provider_type":"Cafe"}]"#),
            Err(ClassifyError::InvalidTable(_))
        ));
    }
}
