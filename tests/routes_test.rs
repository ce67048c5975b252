// ABOUTME: HTTP integration tests driving the full router with tower oneshot requests
// ABOUTME: Covers auth, recipes, collections, subscriptions, short links, and downloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use common::{create_test_recipe, create_test_resources, create_test_user, seed_catalog, TestCatalog};
use helpers::axum_test::AxumTestRequest;
use recipe_share_server::resources::ServerResources;
use recipe_share_server::server::build_app;
use serde_json::{json, Value};

struct TestApp {
    resources: Arc<ServerResources>,
    app: Router,
    catalog: TestCatalog,
}

impl TestApp {
    async fn new() -> Self {
        let resources = create_test_resources().await.unwrap();
        let catalog = seed_catalog(&resources.database).await.unwrap();
        let app = build_app(&resources);
        Self {
            resources,
            app,
            catalog,
        }
    }

    fn app(&self) -> Router {
        self.app.clone()
    }

    async fn user(&self, username: &str) -> i64 {
        create_test_user(&self.resources.database, username)
            .await
            .unwrap()
            .id
    }

    async fn recipe(&self, author: i64, name: &str) -> i64 {
        create_test_recipe(
            &self.resources.database,
            author,
            name,
            &[(self.catalog.flour.id, 200), (self.catalog.sugar.id, 50)],
            &[self.catalog.breakfast.id],
        )
        .await
        .unwrap()
    }

    fn recipe_body(&self, name: &str) -> Value {
        json!({
            "name": name,
            "text": "Смешать и выпекать",
            "image": "recipes/images/cake.png",
            "cooking_time": 40,
            "tags": [self.catalog.breakfast.id, self.catalog.lunch.id],
            "ingredients": [
                {"id": self.catalog.flour.id, "amount": 300},
                {"id": self.catalog.egg.id, "amount": 3}
            ]
        })
    }
}

#[tokio::test]
async fn test_health_and_request_id() {
    let test = TestApp::new().await;

    let response = AxumTestRequest::get("/health").send(test.app()).await;
    let request_id = response.header("x-request-id").unwrap().to_owned();
    assert!(request_id.starts_with("req_"));
    let body: Value = response.assert_status(StatusCode::OK).json();
    assert_eq!(body["status"], "healthy");

    let response = AxumTestRequest::get("/health")
        .header("x-request-id", "client-supplied")
        .send(test.app())
        .await;
    assert_eq!(response.header("x-request-id"), Some("client-supplied"));

    let body: Value = AxumTestRequest::get("/ready")
        .send(test.app())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_registration() {
    let test = TestApp::new().await;

    let body: Value = AxumTestRequest::post("/api/users")
        .json(&json!({
            "email": "anna@example.com",
            "username": "anna",
            "first_name": "Анна",
            "last_name": "Иванова",
            "password": "s3cret-pass"
        }))
        .send(test.app())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(body["username"], "anna");
    assert_eq!(body["is_subscribed"], false);
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let stored = test
        .resources
        .database
        .users()
        .get_by_username("anna")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.password_hash.starts_with("$2"));

    let fields = AxumTestRequest::post("/api/users")
        .json(&json!({
            "email": "not-an-email",
            "username": "me",
            "password": "x"
        }))
        .send(test.app())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .field_errors();
    assert_eq!(fields, ["email", "first_name", "last_name", "username"]);

    let body: Value = AxumTestRequest::post("/api/users")
        .json(&json!({
            "email": "anna@example.com",
            "username": "anna2",
            "first_name": "A",
            "last_name": "B",
            "password": "x"
        }))
        .send(test.app())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert!(body["error"]["details"]["fields"].get("email").is_some());
}

#[tokio::test]
async fn test_authentication_header() {
    let test = TestApp::new().await;
    let anna = test.user("anna").await;

    AxumTestRequest::get("/api/users/me")
        .send(test.app())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    AxumTestRequest::get("/api/users/me")
        .as_user(9999)
        .send(test.app())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    AxumTestRequest::get("/api/users/me")
        .header("x-authenticated-user", "anna")
        .send(test.app())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let body: Value = AxumTestRequest::get("/api/users/me")
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["id"], anna);
}

#[tokio::test]
async fn test_recipe_create_detail_update_delete() {
    let test = TestApp::new().await;
    let anna = test.user("anna").await;
    let boris = test.user("boris").await;

    AxumTestRequest::post("/api/recipes")
        .json(&test.recipe_body("Пирог"))
        .send(test.app())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let created: Value = AxumTestRequest::post("/api/recipes")
        .as_user(anna)
        .json(&test.recipe_body("Пирог"))
        .send(test.app())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["author"]["username"], "anna");
    assert_eq!(created["link"].as_str().unwrap().len(), 3);
    assert_eq!(created["ingredients"][0]["name"], "Мука");
    assert_eq!(created["ingredients"][0]["amount"], 300);
    assert_eq!(created["tags"].as_array().unwrap().len(), 2);
    assert_eq!(created["is_favorited"], false);

    let code = AxumTestRequest::post("/api/recipes")
        .as_user(anna)
        .json(&test.recipe_body("Пирог"))
        .send(test.app())
        .await
        .assert_status(StatusCode::CONFLICT)
        .error_code();
    assert_eq!(code, "RESOURCE_ALREADY_EXISTS");

    let body: Value = AxumTestRequest::get(&format!("/api/recipes/{id}"))
        .send(test.app())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["name"], "Пирог");
    assert_eq!(body["author"]["is_subscribed"], false);

    AxumTestRequest::patch(&format!("/api/recipes/{id}"))
        .as_user(boris)
        .json(&json!({"cooking_time": 5, "ingredients": [{"id": test.catalog.egg.id, "amount": 1}]}))
        .send(test.app())
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let updated: Value = AxumTestRequest::patch(&format!("/api/recipes/{id}"))
        .as_user(anna)
        .json(&json!({"cooking_time": 25, "ingredients": [{"id": test.catalog.egg.id, "amount": 4}]}))
        .send(test.app())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(updated["cooking_time"], 25);
    assert_eq!(updated["name"], "Пирог");
    assert_eq!(updated["link"], created["link"]);
    assert_eq!(updated["ingredients"].as_array().unwrap().len(), 1);

    AxumTestRequest::patch(&format!("/api/recipes/{id}"))
        .as_user(anna)
        .json(&json!({"cooking_time": 25}))
        .send(test.app())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    AxumTestRequest::delete(&format!("/api/recipes/{id}"))
        .as_user(boris)
        .send(test.app())
        .await
        .assert_status(StatusCode::FORBIDDEN);
    AxumTestRequest::delete(&format!("/api/recipes/{id}"))
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    AxumTestRequest::get(&format!("/api/recipes/{id}"))
        .send(test.app())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recipe_validation_errors() {
    let test = TestApp::new().await;
    let anna = test.user("anna").await;

    let body: Value = AxumTestRequest::post("/api/recipes")
        .as_user(anna)
        .json(&json!({
            "name": "Пустой",
            "text": "-",
            "image": "x.png",
            "cooking_time": 0,
            "tags": [9999],
            "ingredients": [
                {"id": test.catalog.flour.id, "amount": 1},
                {"id": test.catalog.flour.id, "amount": 2}
            ]
        }))
        .send(test.app())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    let fields = &body["error"]["details"]["fields"];
    assert!(fields.get("cooking_time").is_some());
    assert!(fields.get("tags").is_some());
    assert!(fields.get("ingredients").is_some());

    AxumTestRequest::post("/api/recipes")
        .as_user(anna)
        .header("content-type", "application/json")
        .send(test.app())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_favorites_and_cart() {
    let test = TestApp::new().await;
    let anna = test.user("anna").await;
    let recipe = test.recipe(anna, "Блины").await;

    for path in ["favorite", "shopping_cart"] {
        let uri = format!("/api/recipes/{recipe}/{path}");
        let body: Value = AxumTestRequest::post(&uri)
            .as_user(anna)
            .send(test.app())
            .await
            .assert_status(StatusCode::CREATED)
            .json();
        assert_eq!(body["id"], recipe);
        assert_eq!(body["name"], "Блины");
        assert!(body.get("cooking_time").is_some());

        AxumTestRequest::post(&uri)
            .as_user(anna)
            .send(test.app())
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    let detail: Value = AxumTestRequest::get(&format!("/api/recipes/{recipe}"))
        .as_user(anna)
        .send(test.app())
        .await
        .json();
    assert_eq!(detail["is_favorited"], true);
    assert_eq!(detail["is_in_shopping_cart"], true);

    let list: Value = AxumTestRequest::get("/api/recipes?is_favorited=1")
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(list["count"], 1);

    for path in ["favorite", "shopping_cart"] {
        let uri = format!("/api/recipes/{recipe}/{path}");
        AxumTestRequest::delete(&uri)
            .as_user(anna)
            .send(test.app())
            .await
            .assert_status(StatusCode::NO_CONTENT);
        AxumTestRequest::delete(&uri)
            .as_user(anna)
            .send(test.app())
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    AxumTestRequest::post("/api/recipes/9999/favorite")
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_ids_use_the_error_envelope() {
    let test = TestApp::new().await;
    let anna = test.user("anna").await;

    for uri in ["/api/recipes/abc", "/api/users/abc", "/api/tags/abc", "/api/ingredients/1.5"] {
        let code = AxumTestRequest::get(uri)
            .send(test.app())
            .await
            .assert_status(StatusCode::NOT_FOUND)
            .error_code();
        assert_eq!(code, "RESOURCE_NOT_FOUND", "{uri}");
    }

    let code = AxumTestRequest::delete("/api/recipes/abc/favorite")
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .error_code();
    assert_eq!(code, "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_ingredient_amounts_are_bounded() {
    let test = TestApp::new().await;
    let anna = test.user("anna").await;

    let mut body = test.recipe_body("Гора муки");
    body["ingredients"] = json!([{"id": test.catalog.flour.id, "amount": i64::MAX}]);
    let fields = AxumTestRequest::post("/api/recipes")
        .as_user(anna)
        .json(&body)
        .send(test.app())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .field_errors();
    assert_eq!(fields, ["ingredients"]);

    for name in ["Хлеб", "Батон"] {
        let mut body = test.recipe_body(name);
        body["ingredients"] = json!([{"id": test.catalog.flour.id, "amount": 32_000}]);
        let created: Value = AxumTestRequest::post("/api/recipes")
            .as_user(anna)
            .json(&body)
            .send(test.app())
            .await
            .assert_status(StatusCode::CREATED)
            .json();
        AxumTestRequest::post(&format!("/api/recipes/{}/shopping_cart", created["id"]))
            .as_user(anna)
            .send(test.app())
            .await
            .assert_status(StatusCode::CREATED);
    }

    let list = AxumTestRequest::get("/api/recipes/download_shopping_cart")
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::OK)
        .text();
    assert_eq!(list, "Список покупок:\n- Мука (г) - 64000\n");
}

#[tokio::test]
async fn test_huge_offsets_yield_empty_pages() {
    let test = TestApp::new().await;
    let anna = test.user("anna").await;
    test.recipe(anna, "Блины").await;

    for uri in [
        "/api/recipes?offset=9223372036854775807",
        "/api/users?offset=9223372036854775807&limit=100",
    ] {
        let body: Value = AxumTestRequest::get(uri)
            .send(test.app())
            .await
            .assert_status(StatusCode::OK)
            .json();
        assert_eq!(body["results"], json!([]));
        assert!(body["next"].is_null());
        assert!(body["previous"].is_string());
    }

    let body: Value = AxumTestRequest::get("/api/users/subscriptions?offset=9223372036854775807")
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert!(body["next"].is_null());
}

#[tokio::test]
async fn test_download_shopping_cart() {
    let test = TestApp::new().await;
    let anna = test.user("anna").await;
    let pancakes = test.recipe(anna, "Блины").await;
    let fritters = test.recipe(anna, "Оладьи").await;

    AxumTestRequest::get("/api/recipes/download_shopping_cart")
        .send(test.app())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let empty = AxumTestRequest::get("/api/recipes/download_shopping_cart")
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(empty.text(), "Список покупок:\n");

    for recipe in [pancakes, fritters] {
        AxumTestRequest::post(&format!("/api/recipes/{recipe}/shopping_cart"))
            .as_user(anna)
            .send(test.app())
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart")
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"list.txt\"")
    );
    assert!(response
        .header("content-type")
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(
        response.text(),
        "Список покупок:\n- Мука (г) - 400\n- Сахар (г) - 100\n"
    );
}

#[tokio::test]
async fn test_short_link_round_trip() {
    let test = TestApp::new().await;
    let anna = test.user("anna").await;
    let recipe = test.recipe(anna, "Блины").await;

    let body: Value = AxumTestRequest::get(&format!("/api/recipes/{recipe}/get-link"))
        .send(test.app())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let url = body["short-link"].as_str().unwrap().to_owned();
    let link = url
        .strip_prefix("http://localhost:8080/s/")
        .expect("absolute short link URL");
    assert_eq!(link.len(), 3);

    let response = AxumTestRequest::get(&format!("/s/{link}")).send(test.app()).await;
    assert_eq!(response.status_code(), StatusCode::FOUND);
    let expected = format!("/api/recipes/{recipe}");
    assert_eq!(response.header("location"), Some(expected.as_str()));

    AxumTestRequest::get("/s/zzz")
        .send(test.app())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    AxumTestRequest::get("/api/recipes/9999/get-link")
        .send(test.app())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recipe_list_filters_and_pagination() {
    let test = TestApp::new().await;
    let anna = test.user("anna").await;
    let boris = test.user("boris").await;
    for n in 0..3 {
        test.recipe(anna, &format!("Завтрак {n}")).await;
    }
    create_test_recipe(
        &test.resources.database,
        boris,
        "Суп",
        &[(test.catalog.milk.id, 300)],
        &[test.catalog.lunch.id],
    )
    .await
    .unwrap();

    let page: Value = AxumTestRequest::get("/api/recipes?tags=breakfast&limit=2")
        .send(test.app())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);
    assert_eq!(page["results"][0]["name"], "Завтрак 2");
    assert_eq!(
        page["next"],
        "http://localhost:8080/api/recipes?tags=breakfast&limit=2&offset=2"
    );
    assert!(page["previous"].is_null());

    let page: Value = AxumTestRequest::get(&format!("/api/recipes?author={boris}"))
        .send(test.app())
        .await
        .json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["name"], "Суп");

    let page: Value = AxumTestRequest::get("/api/recipes?tags=breakfast&tags=lunch")
        .send(test.app())
        .await
        .json();
    assert_eq!(page["count"], 4);

    AxumTestRequest::get("/api/recipes?author=anna")
        .send(test.app())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_subscriptions() {
    let test = TestApp::new().await;
    let anna = test.user("anna").await;
    let boris = test.user("boris").await;
    test.recipe(boris, "Борщ").await;
    test.recipe(boris, "Щи").await;

    let body: Value = AxumTestRequest::post(&format!("/api/users/{boris}/subscribe?recipes_limit=1"))
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(body["username"], "boris");
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 2);
    assert_eq!(body["recipes"].as_array().unwrap().len(), 1);

    AxumTestRequest::post(&format!("/api/users/{boris}/subscribe"))
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::CONFLICT);
    AxumTestRequest::post(&format!("/api/users/{anna}/subscribe"))
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let profile: Value = AxumTestRequest::get(&format!("/api/users/{boris}"))
        .as_user(anna)
        .send(test.app())
        .await
        .json();
    assert_eq!(profile["is_subscribed"], true);

    let page: Value = AxumTestRequest::get("/api/users/subscriptions")
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["recipes"].as_array().unwrap().len(), 2);

    AxumTestRequest::delete(&format!("/api/users/{boris}/subscribe"))
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    AxumTestRequest::delete(&format!("/api/users/{boris}/subscribe"))
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog_routes() {
    let test = TestApp::new().await;

    let tags: Value = AxumTestRequest::get("/api/tags")
        .send(test.app())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(tags.as_array().unwrap().len(), 2);

    let tag: Value = AxumTestRequest::get(&format!("/api/tags/{}", test.catalog.lunch.id))
        .send(test.app())
        .await
        .json();
    assert_eq!(tag["slug"], "lunch");

    let found: Value = AxumTestRequest::get("/api/ingredients?name=%D0%BC%D1%83")
        .send(test.app())
        .await
        .json();
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["measurement_unit"], "г");

    AxumTestRequest::get("/api/ingredients/9999")
        .send(test.app())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_avatar() {
    let test = TestApp::new().await;
    let anna = test.user("anna").await;

    AxumTestRequest::put("/api/users/me/avatar")
        .as_user(anna)
        .json(&json!({"avatar": "users/anna.png"}))
        .send(test.app())
        .await
        .assert_status(StatusCode::OK);
    let me: Value = AxumTestRequest::get("/api/users/me")
        .as_user(anna)
        .send(test.app())
        .await
        .json();
    assert_eq!(me["avatar"], "users/anna.png");

    AxumTestRequest::delete("/api/users/me/avatar")
        .as_user(anna)
        .send(test.app())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    let me: Value = AxumTestRequest::get("/api/users/me")
        .as_user(anna)
        .send(test.app())
        .await
        .json();
    assert!(me["avatar"].is_null());
}
