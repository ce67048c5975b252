// ABOUTME: Aggregates a user's shopping cart into per-ingredient totals
// ABOUTME: Buckets by (name, unit) in first-encounter order and renders the plain-text list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;
use tracing::warn;

use crate::constants::shopping_list::HEADER;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::ShoppingLine;

/// Summed amount of one ingredient in one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListItem {
    /// Ingredient name
    pub name: String,
    /// Unit the amount is expressed in
    pub measurement_unit: String,
    /// Total across every recipe in the cart
    pub amount: i64,
}

/// Aggregated shopping list
///
/// Items keep the order in which each (name, unit) pair was first seen.
/// A name that shows up under several units keeps one item per unit and is
/// listed in [`ShoppingList::unit_conflicts`].
#[derive(Debug, Clone, Default)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
    index: HashMap<(String, String), usize>,
    first_unit: HashMap<String, String>,
    unit_conflicts: Vec<String>,
}

impl ShoppingList {
    /// Create an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate lines in the order given
    ///
    /// # Errors
    ///
    /// Returns an internal error if a total does not fit in an `i64`
    pub fn from_lines<I>(lines: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = ShoppingLine>,
    {
        let mut list = Self::new();
        for line in lines {
            list.add(line)?;
        }
        Ok(list)
    }

    /// Fold one line into the totals
    ///
    /// # Errors
    ///
    /// Returns an internal error if the new total does not fit in an `i64`;
    /// the list is left unchanged
    pub fn add(&mut self, line: ShoppingLine) -> AppResult<()> {
        let ShoppingLine {
            name,
            measurement_unit,
            amount,
        } = line;

        let key = (name, measurement_unit);
        if let Some(&position) = self.index.get(&key) {
            let item = &mut self.items[position];
            item.amount = item.amount.checked_add(amount).ok_or_else(|| {
                AppError::internal(format!(
                    "Total amount of {} ({}) overflows",
                    item.name, item.measurement_unit
                ))
            })?;
            return Ok(());
        }

        let (name, measurement_unit) = key;
        match self.first_unit.get(&name) {
            Some(unit) if *unit != measurement_unit => {
                if !self.unit_conflicts.contains(&name) {
                    warn!(
                        ingredient = %name,
                        first_unit = %unit,
                        other_unit = %measurement_unit,
                        "Ingredient appears under several units; keeping separate totals"
                    );
                    self.unit_conflicts.push(name.clone());
                }
            }
            Some(_) => {}
            None => {
                self.first_unit
                    .insert(name.clone(), measurement_unit.clone());
            }
        }

        self.index
            .insert((name.clone(), measurement_unit.clone()), self.items.len());
        self.items.push(ShoppingListItem {
            name,
            measurement_unit,
            amount,
        });
        Ok(())
    }

    /// Totals in first-encounter order
    #[must_use]
    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    /// Names seen under more than one unit, in detection order
    #[must_use]
    pub fn unit_conflicts(&self) -> &[String] {
        &self.unit_conflicts
    }

    /// Whether nothing was aggregated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render the header line followed by `- {name} ({unit}) - {amount}` per item
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = String::with_capacity(HEADER.len() + 1 + self.items.len() * 32);
        text.push_str(HEADER);
        text.push('\n');
        for item in &self.items {
            // Writing to a String cannot fail
            let _ = writeln!(
                text,
                "- {} ({}) - {}",
                item.name, item.measurement_unit, item.amount
            );
        }
        text
    }
}

/// Build the shopping list for a user's cart
///
/// # Errors
///
/// Returns an error if the cart cannot be read
pub async fn build_for_user(database: &Database, user_id: i64) -> AppResult<ShoppingList> {
    let lines = database.collections().shopping_cart_lines(user_id).await?;
    ShoppingList::from_lines(lines)
}
