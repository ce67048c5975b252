// ABOUTME: Integration tests for shopping list aggregation over a real cart
// ABOUTME: Covers summing per (name, unit), first-encounter order, and unit conflicts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{create_test_database, create_test_recipe, create_test_user, seed_catalog};
use recipe_share_server::models::{NewIngredient, RecipeCollection};
use recipe_share_server::services::shopping_list::build_for_user;

#[tokio::test]
async fn test_empty_cart_renders_header_only() {
    let database = create_test_database().await.unwrap();
    let user = create_test_user(&database, "shopper").await.unwrap();

    let list = build_for_user(&database, user.id).await.unwrap();

    assert!(list.is_empty());
    assert_eq!(list.render(), "Список покупок:\n");
}

#[tokio::test]
async fn test_cart_amounts_are_summed_in_first_encounter_order() {
    let database = create_test_database().await.unwrap();
    let catalog = seed_catalog(&database).await.unwrap();
    let author = create_test_user(&database, "author").await.unwrap();
    let shopper = create_test_user(&database, "shopper").await.unwrap();

    let pancakes = create_test_recipe(
        &database,
        author.id,
        "Блины",
        &[(catalog.flour.id, 200), (catalog.sugar.id, 100)],
        &[catalog.breakfast.id],
    )
    .await
    .unwrap();
    let omelette = create_test_recipe(
        &database,
        author.id,
        "Омлет",
        &[(catalog.flour.id, 50), (catalog.egg.id, 2)],
        &[catalog.breakfast.id],
    )
    .await
    .unwrap();

    let collections = database.collections();
    collections
        .add(RecipeCollection::ShoppingCart, shopper.id, pancakes)
        .await
        .unwrap();
    collections
        .add(RecipeCollection::ShoppingCart, shopper.id, omelette)
        .await
        .unwrap();

    let list = build_for_user(&database, shopper.id).await.unwrap();
    assert_eq!(
        list.render(),
        "Список покупок:\n- Мука (г) - 250\n- Сахар (г) - 100\n- Яйцо (шт.) - 2\n"
    );
    assert!(list.unit_conflicts().is_empty());

    // The author's own (empty) cart is unaffected
    let own = build_for_user(&database, author.id).await.unwrap();
    assert!(own.is_empty());
}

#[tokio::test]
async fn test_cart_order_follows_insertion_not_name() {
    let database = create_test_database().await.unwrap();
    let catalog = seed_catalog(&database).await.unwrap();
    let author = create_test_user(&database, "author").await.unwrap();

    let first = create_test_recipe(
        &database,
        author.id,
        "Яичница",
        &[(catalog.egg.id, 3)],
        &[catalog.breakfast.id],
    )
    .await
    .unwrap();
    let second = create_test_recipe(
        &database,
        author.id,
        "Кекс",
        &[(catalog.sugar.id, 80), (catalog.egg.id, 1)],
        &[catalog.lunch.id],
    )
    .await
    .unwrap();

    for recipe in [first, second] {
        database
            .collections()
            .add(RecipeCollection::ShoppingCart, author.id, recipe)
            .await
            .unwrap();
    }

    let list = build_for_user(&database, author.id).await.unwrap();
    let names: Vec<_> = list.items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Яйцо", "Сахар"]);
    assert_eq!(list.items()[0].amount, 4);
}

#[tokio::test]
async fn test_same_name_in_two_units_stays_separate() {
    let database = create_test_database().await.unwrap();
    let catalog = seed_catalog(&database).await.unwrap();
    let author = create_test_user(&database, "author").await.unwrap();

    let (milk_glass, _) = database
        .catalog()
        .get_or_create_ingredient(&NewIngredient {
            name: "Молоко".to_owned(),
            measurement_unit: "стакан".to_owned(),
        })
        .await
        .unwrap();

    let latte = create_test_recipe(
        &database,
        author.id,
        "Латте",
        &[(catalog.milk.id, 200)],
        &[catalog.breakfast.id],
    )
    .await
    .unwrap();
    let porridge = create_test_recipe(
        &database,
        author.id,
        "Каша",
        &[(milk_glass.id, 2)],
        &[catalog.breakfast.id],
    )
    .await
    .unwrap();

    for recipe in [latte, porridge] {
        database
            .collections()
            .add(RecipeCollection::ShoppingCart, author.id, recipe)
            .await
            .unwrap();
    }

    let list = build_for_user(&database, author.id).await.unwrap();
    assert_eq!(
        list.render(),
        "Список покупок:\n- Молоко (мл) - 200\n- Молоко (стакан) - 2\n"
    );
    assert_eq!(list.unit_conflicts(), ["Молоко".to_owned()]);
}
