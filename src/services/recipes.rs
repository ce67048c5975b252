// ABOUTME: Recipe write business logic extracted from route handlers
// ABOUTME: Validates payloads, runs create/update in one transaction, and assembles recipe details
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{debug, info};

use super::short_links::{validate_explicit_link, ShortLinkAllocator, TokenSource, UuidTokens};
use crate::constants::limits::{
    MAX_INGREDIENT_AMOUNT, MAX_NAME_LENGTH, MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT,
};
use crate::database::{Database, RecipeDraft, RecipeWriter};
use crate::errors::{AppError, AppResult, FieldErrors};
use crate::models::{IngredientAmount, Recipe, RecipeCollection, RecipeDetail, UserProfile};

const REQUIRED: &str = "This field is required";

/// Recipe create/update request body
///
/// Every field is optional at the wire level so that missing fields are
/// reported alongside other validation messages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipePayload {
    /// Recipe name
    pub name: Option<String>,
    /// Description
    pub text: Option<String>,
    /// Opaque image reference
    pub image: Option<String>,
    /// Cooking time in minutes
    pub cooking_time: Option<i64>,
    /// Explicit short link (creation only)
    pub link: Option<String>,
    /// Tag ids
    pub tags: Option<Vec<i64>>,
    /// Ingredient ids with amounts
    pub ingredients: Option<Vec<IngredientAmount>>,
}

impl RecipePayload {
    /// Merge onto `base` (update) or require every field (create)
    fn into_draft(self, base: Option<RecipeDraft>, errors: &mut FieldErrors) -> RecipeDraft {
        let creating = base.is_none();
        let base = base.unwrap_or_else(|| RecipeDraft {
            name: String::new(),
            text: String::new(),
            image: String::new(),
            cooking_time: 0,
            link: None,
            tags: Vec::new(),
            ingredients: Vec::new(),
        });

        if creating {
            for (field, missing) in [
                ("name", self.name.is_none()),
                ("text", self.text.is_none()),
                ("image", self.image.is_none()),
                ("cooking_time", self.cooking_time.is_none()),
                ("tags", self.tags.is_none()),
            ] {
                if missing {
                    errors.add(field, REQUIRED);
                }
            }
        }
        if self.ingredients.is_none() {
            errors.add("ingredients", REQUIRED);
        }

        RecipeDraft {
            name: self.name.map_or(base.name, |n| n.trim().to_owned()),
            text: self.text.unwrap_or(base.text),
            image: self.image.unwrap_or(base.image),
            cooking_time: self.cooking_time.unwrap_or(base.cooking_time),
            link: if creating { self.link } else { base.link },
            tags: self.tags.unwrap_or(base.tags),
            ingredients: self.ingredients.unwrap_or(base.ingredients),
        }
    }
}

/// Checks that need no database access
fn check_draft_shape(draft: &RecipeDraft, errors: &mut FieldErrors) {
    if draft.name.is_empty() {
        if !errors.has("name") {
            errors.add("name", "Must not be blank");
        }
    } else if draft.name.chars().count() > MAX_NAME_LENGTH {
        errors.add("name", format!("Must be at most {MAX_NAME_LENGTH} characters"));
    }

    if draft.text.trim().is_empty() && !errors.has("text") {
        errors.add("text", "Must not be blank");
    }
    if draft.image.trim().is_empty() && !errors.has("image") {
        errors.add("image", "Must not be blank");
    }
    if draft.cooking_time < MIN_COOKING_TIME && !errors.has("cooking_time") {
        errors.add(
            "cooking_time",
            format!("Must be at least {MIN_COOKING_TIME} minute"),
        );
    }

    if draft.ingredients.is_empty() {
        if !errors.has("ingredients") {
            errors.add("ingredients", "The ingredient list must not be empty");
        }
    } else {
        let mut seen = HashSet::new();
        for line in &draft.ingredients {
            if !seen.insert(line.id) {
                errors.add("ingredients", format!("Ingredient {} is listed twice", line.id));
            }
            if !(MIN_INGREDIENT_AMOUNT..=MAX_INGREDIENT_AMOUNT).contains(&line.amount) {
                errors.add(
                    "ingredients",
                    format!(
                        "Amount of ingredient {} must be between {MIN_INGREDIENT_AMOUNT} and {MAX_INGREDIENT_AMOUNT}",
                        line.id
                    ),
                );
            }
        }
    }

    if draft.tags.is_empty() {
        if !errors.has("tags") {
            errors.add("tags", "At least one tag is required");
        }
    } else {
        let mut seen = HashSet::new();
        for tag in &draft.tags {
            if !seen.insert(*tag) {
                errors.add("tags", format!("Tag {tag} is listed twice"));
            }
        }
    }

    if let Some(link) = &draft.link {
        validate_explicit_link(link, errors);
    }
}

/// Validated recipe writes
pub struct RecipeService<'a, S = UuidTokens> {
    database: &'a Database,
    allocator: ShortLinkAllocator<S>,
}

impl<'a> RecipeService<'a, UuidTokens> {
    /// Service using random UUID-derived link tokens
    #[must_use]
    pub fn new(database: &'a Database) -> Self {
        Self::with_allocator(database, ShortLinkAllocator::default())
    }
}

impl<'a, S: TokenSource> RecipeService<'a, S> {
    /// Service using a custom link allocator
    pub const fn with_allocator(database: &'a Database, allocator: ShortLinkAllocator<S>) -> Self {
        Self {
            database,
            allocator,
        }
    }

    /// Create a recipe owned by `author_id` and return its id
    ///
    /// Runs in one transaction: recipe row, tags, ingredient amounts, then
    /// link allocation when no explicit link was given.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` with per-field messages,
    /// `RESOURCE_ALREADY_EXISTS` for a taken name or explicit link, or an
    /// internal error when link allocation is exhausted
    pub async fn create(&mut self, author_id: i64, payload: RecipePayload) -> AppResult<i64> {
        let mut errors = FieldErrors::new();
        let draft = payload.into_draft(None, &mut errors);
        self.validate(&draft, errors).await?;

        let mut tx = self.database.pool().begin().await?;
        let recipe_id = RecipeWriter::new(&mut tx).insert(author_id, &draft).await?;
        let link = self.allocator.ensure_link(&mut tx, recipe_id).await?;
        tx.commit().await?;

        info!(recipe.id = recipe_id, author.id = author_id, %link, "Recipe created");
        Ok(recipe_id)
    }

    /// Apply a partial update from the recipe's author
    ///
    /// Absent fields keep their stored values except `ingredients`, which
    /// must always be supplied. The short link never changes.
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND`, `PERMISSION_DENIED` for non-authors,
    /// `INVALID_INPUT`, or `RESOURCE_ALREADY_EXISTS` for a taken name
    pub async fn update(
        &mut self,
        editor_id: i64,
        recipe_id: i64,
        payload: RecipePayload,
    ) -> AppResult<()> {
        let recipe = self.require_authored(editor_id, recipe_id).await?;
        if payload.link.as_ref().is_some_and(|l| Some(l) != recipe.link.as_ref()) {
            debug!(recipe.id = recipe_id, "Ignoring link change on update");
        }

        let base = self.stored_draft(&recipe).await?;
        let mut errors = FieldErrors::new();
        let draft = payload.into_draft(Some(base), &mut errors);
        self.validate(&draft, errors).await?;

        let mut tx = self.database.pool().begin().await?;
        RecipeWriter::new(&mut tx).update(recipe_id, &draft).await?;
        self.allocator.ensure_link(&mut tx, recipe_id).await?;
        tx.commit().await?;

        info!(recipe.id = recipe_id, "Recipe updated");
        Ok(())
    }

    /// Delete a recipe on behalf of its author
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` or `PERMISSION_DENIED`
    pub async fn delete(&self, editor_id: i64, recipe_id: i64) -> AppResult<()> {
        self.require_authored(editor_id, recipe_id).await?;
        self.database.recipes().delete(recipe_id).await?;
        info!(recipe.id = recipe_id, "Recipe deleted");
        Ok(())
    }

    async fn require_authored(&self, editor_id: i64, recipe_id: i64) -> AppResult<Recipe> {
        let recipe = self.database.recipes().require(recipe_id).await?;
        if recipe.author_id != editor_id {
            return Err(AppError::permission_denied(
                "Only the author may modify this recipe",
            ));
        }
        Ok(recipe)
    }

    async fn stored_draft(&self, recipe: &Recipe) -> AppResult<RecipeDraft> {
        let recipes = self.database.recipes();
        let tags = recipes.tags_for(recipe.id).await?;
        let ingredients = recipes.ingredients_for(recipe.id).await?;
        Ok(RecipeDraft {
            name: recipe.name.clone(),
            text: recipe.text.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
            link: recipe.link.clone(),
            tags: tags.into_iter().map(|t| t.id).collect(),
            ingredients: ingredients
                .into_iter()
                .map(|line| IngredientAmount {
                    id: line.id,
                    amount: line.amount,
                })
                .collect(),
        })
    }

    /// Shape checks plus existence of every referenced ingredient and tag
    async fn validate(&self, draft: &RecipeDraft, mut errors: FieldErrors) -> AppResult<()> {
        check_draft_shape(draft, &mut errors);

        let catalog = self.database.catalog();
        let ingredient_ids: Vec<i64> = draft.ingredients.iter().map(|l| l.id).collect();
        let known = catalog.existing_ingredient_ids(&ingredient_ids).await?;
        for id in ingredient_ids.iter().filter(|id| !known.contains(*id)) {
            errors.add("ingredients", format!("Ingredient {id} does not exist"));
        }

        let known = catalog.existing_tag_ids(&draft.tags).await?;
        for id in draft.tags.iter().filter(|id| !known.contains(*id)) {
            errors.add("tags", format!("Tag {id} does not exist"));
        }

        errors.into_result()
    }
}

/// Assemble the full recipe view for an optional viewer
///
/// # Errors
///
/// Returns `RESOURCE_NOT_FOUND` if the recipe or its author is missing, or
/// a database error
pub async fn load_detail(
    database: &Database,
    recipe: Recipe,
    viewer: Option<i64>,
) -> AppResult<RecipeDetail> {
    let recipes = database.recipes();
    let author = database
        .users()
        .get(recipe.author_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", recipe.author_id)))?;

    let (is_subscribed, is_favorited, is_in_shopping_cart) = match viewer {
        Some(viewer) => {
            let collections = database.collections();
            (
                database.follows().is_following(viewer, author.id).await?,
                collections
                    .contains(RecipeCollection::Favorites, viewer, recipe.id)
                    .await?,
                collections
                    .contains(RecipeCollection::ShoppingCart, viewer, recipe.id)
                    .await?,
            )
        }
        None => (false, false, false),
    };

    Ok(RecipeDetail {
        id: recipe.id,
        tags: recipes.tags_for(recipe.id).await?,
        author: UserProfile::from_user(&author, is_subscribed),
        ingredients: recipes.ingredients_for(recipe.id).await?,
        is_favorited,
        is_in_shopping_cart,
        name: recipe.name,
        image: recipe.image,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        link: recipe.link,
    })
}
