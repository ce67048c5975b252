// ABOUTME: Catalog models for tags and ingredients
// ABOUTME: Ingredients are unique per (name, measurement unit); tags per name and slug
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use serde::{Deserialize, Serialize};

use crate::constants::limits::{MAX_NAME_LENGTH, MAX_UNIT_LENGTH};

/// Recipe tag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Primary key
    pub id: i64,
    /// Unique display name
    pub name: String,
    /// Unique URL slug
    pub slug: String,
}

/// Tag definition as loaded from a catalog file
#[derive(Debug, Clone, Deserialize)]
pub struct NewTag {
    /// Display name
    pub name: String,
    /// URL slug
    pub slug: String,
}

impl NewTag {
    /// Whether the slug only uses `[-a-zA-Z0-9_]`
    #[must_use]
    pub fn has_valid_slug(&self) -> bool {
        !self.slug.is_empty()
            && self
                .slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

/// Ingredient with its measurement unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    /// Primary key
    pub id: i64,
    /// Display name
    pub name: String,
    /// Unit the amount is measured in
    pub measurement_unit: String,
}

/// Ingredient definition as loaded from a catalog file
#[derive(Debug, Clone, Deserialize)]
pub struct NewIngredient {
    /// Display name
    pub name: String,
    /// Unit the amount is measured in
    pub measurement_unit: String,
}

impl NewIngredient {
    /// Whether the name and unit are non-blank and within their length limits
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let within = |value: &str, max: usize| {
            let value = value.trim();
            !value.is_empty() && value.chars().count() <= max
        };
        within(&self.name, MAX_NAME_LENGTH) && within(&self.measurement_unit, MAX_UNIT_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(name: &str, unit: &str) -> NewIngredient {
        NewIngredient {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        }
    }

    #[test]
    fn test_ingredient_unit_length_is_limited() {
        assert!(ingredient("Мука", "г").is_well_formed());
        assert!(ingredient("Соль", "щепотка").is_well_formed());
        assert!(!ingredient("Соль", "очень большая щепотка").is_well_formed());
        assert!(!ingredient("  ", "г").is_well_formed());
        assert!(!ingredient("Вода", "").is_well_formed());
    }
}
