//! REST integration test macro for storage backends.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that validate
//! a `PropertyStore` through full REST round-trips:
//! JSON → HTTP request → handler → PropertyService → store → HTTP response → JSON.

/// Generate a REST integration test suite for a storage backend.
///
/// `$store_factory` must produce an `Arc<dyn PropertyStore>` over an empty collection.
///
/// # Generated Tests
///
/// ## CRUD
/// - `test_rest_create` / `test_rest_create_distinct_ids`
/// - `test_rest_get` / `test_rest_get_legacy_string_id`
/// - `test_rest_update_merges` / `test_rest_update_unchanged`
/// - `test_rest_delete_twice`
///
/// ## Listing and search
/// - `test_rest_list_defaults` / `test_rest_list_by_type_pages`
/// - `test_rest_search_by_id_ignores_filters`
/// - `test_rest_search_max_price` / `test_rest_search_bathrooms`
///
/// ## Normalization
/// - `test_rest_normalizes_stored_values`
///
/// ## Error handling
/// - `test_rest_error_not_found` / `test_rest_error_invalid_page`
/// - `test_rest_error_missing_name` / `test_rest_error_malformed_input_is_json`
#[macro_export]
macro_rules! rest_integration_tests {
    ($store_factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use listings::core::store::PropertyStore;
            use serde_json::{Value, json};
            use std::sync::Arc;

            async fn make_server() -> (TestServer, Arc<dyn PropertyStore>) {
                let store: Arc<dyn PropertyStore> = $store_factory;
                let router = storage_harness::integration::build_test_router(store.clone());
                (TestServer::new(router), store)
            }

            async fn make_seeded_server() -> (TestServer, Vec<String>) {
                let (server, store) = make_server().await;
                let ids = seed_fixtures(&store).await;
                (server, ids)
            }

            // ==============================================================
            // Root
            // ==============================================================

            #[tokio::test]
            async fn test_rest_root() {
                let (server, _) = make_server().await;
                let response = server.get("/").await;
                response.assert_status_ok();
                response.assert_json(&json!({ "message": "Listings API is running" }));
            }

            // ==============================================================
            // CRUD: Create
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create() {
                let (server, _) = make_server().await;

                let response = server
                    .post("/properties")
                    .json(&json!({
                        "name": "Cozy Loft",
                        "property_type": "Loft",
                        "bedrooms": 1,
                        "bathrooms": 1.5,
                        "price": "$150.00",
                        "picture_url": "https://img/loft.jpg",
                        "review_scores_rating": 93
                    }))
                    .await;

                response.assert_status(StatusCode::CREATED);

                let body: Value = response.json();
                assert_eq!(body["name"], "Cozy Loft");
                assert_eq!(body["bedrooms"], 1);
                assert_eq!(body["bathrooms"], 1.5);
                assert_eq!(body["price"], "$150.00");
                assert_eq!(body["picture_url"], "https://img/loft.jpg");
                assert_eq!(body["review_scores_rating"], 93.0);
                assert_eq!(body["summary"], Value::Null);

                let id = body["id"].as_str().unwrap();
                assert_eq!(id.len(), 24);
            }

            #[tokio::test]
            async fn test_rest_create_ignores_client_id() {
                let (server, _) = make_server().await;

                let response = server
                    .post("/properties")
                    .json(&json!({ "id": "client-chosen", "name": "Loft" }))
                    .await;

                response.assert_status(StatusCode::CREATED);
                let body: Value = response.json();
                assert_ne!(body["id"], "client-chosen");
            }

            #[tokio::test]
            async fn test_rest_create_distinct_ids() {
                let (server, _) = make_server().await;

                let first: Value = server
                    .post("/properties")
                    .json(&json!({ "name": "Twin" }))
                    .await
                    .json();
                let second: Value = server
                    .post("/properties")
                    .json(&json!({ "name": "Twin" }))
                    .await
                    .json();

                assert_ne!(first["id"], second["id"]);

                let listing: Value = server.get("/properties").await.json();
                assert_eq!(listing["pagination"]["total_count"], 2);
            }

            // ==============================================================
            // CRUD: Get
            // ==============================================================

            #[tokio::test]
            async fn test_rest_get() {
                let (server, ids) = make_seeded_server().await;

                let response = server.get(&format!("/properties/{}", ids[0])).await;
                response.assert_status_ok();

                let body: Value = response.json();
                assert_eq!(body["id"], ids[0].as_str());
                assert_eq!(body["name"], RIBEIRA);
                assert_eq!(body["property_type"], "House");
                assert_eq!(body["address"]["country_code"], "PT");
                assert_eq!(body["address"]["location"]["type"], "Point");
                assert_eq!(body["amenities"], json!(["Wifi", "Kitchen"]));
            }

            #[tokio::test]
            async fn test_rest_get_legacy_string_id() {
                let (server, store) = make_server().await;
                store
                    .insert_one(mongodb::bson::doc! { "_id": "10006546", "name": RIBEIRA })
                    .await
                    .unwrap();

                let response = server.get("/properties/10006546").await;
                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["id"], "10006546");
            }

            // ==============================================================
            // CRUD: Update
            // ==============================================================

            #[tokio::test]
            async fn test_rest_update_merges() {
                let (server, ids) = make_seeded_server().await;

                let response = server
                    .put(&format!("/properties/{}", ids[1]))
                    .json(&json!({ "price": "$350.00", "picture_url": "https://img/new.jpg" }))
                    .await;
                response.assert_status_ok();

                let body: Value = response.json();
                assert_eq!(body["price"], "$350.00");
                assert_eq!(body["picture_url"], "https://img/new.jpg");
                assert_eq!(body["name"], HORTO);
                assert_eq!(body["bedrooms"], 1);

                let fetched: Value = server.get(&format!("/properties/{}", ids[1])).await.json();
                assert_eq!(fetched, body);
            }

            #[tokio::test]
            async fn test_rest_update_unchanged() {
                let (server, ids) = make_seeded_server().await;

                let response = server
                    .put(&format!("/properties/{}", ids[0]))
                    .json(&json!({ "bedrooms": 3 }))
                    .await;
                response.assert_status(StatusCode::NOT_FOUND);

                let body: Value = response.json();
                assert_eq!(body["code"], "PROPERTY_UNCHANGED");
            }

            #[tokio::test]
            async fn test_rest_update_missing_and_empty() {
                let (server, ids) = make_seeded_server().await;

                let missing = server
                    .put("/properties/000000000000000000000000")
                    .json(&json!({ "bedrooms": 3 }))
                    .await;
                missing.assert_status(StatusCode::NOT_FOUND);
                let body: Value = missing.json();
                assert_eq!(body["code"], "PROPERTY_NOT_FOUND");

                let empty = server
                    .put(&format!("/properties/{}", ids[0]))
                    .json(&json!({}))
                    .await;
                empty.assert_status(StatusCode::BAD_REQUEST);
            }

            // ==============================================================
            // CRUD: Delete
            // ==============================================================

            #[tokio::test]
            async fn test_rest_delete_twice() {
                let (server, ids) = make_seeded_server().await;
                let path = format!("/properties/{}", ids[2]);

                let response = server.delete(&path).await;
                response.assert_status_ok();
                response.assert_json(&json!({ "message": "Property deleted" }));

                server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
                server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // Listing and search
            // ==============================================================

            #[tokio::test]
            async fn test_rest_list_defaults() {
                let (server, _) = make_seeded_server().await;

                let body: Value = server.get("/properties").await.json();
                assert_eq!(
                    body["pagination"],
                    json!({
                        "page": 1,
                        "page_size": 10,
                        "total_count": 6,
                        "total_pages": 1,
                        "has_next": false,
                        "has_previous": false
                    })
                );
                assert_eq!(
                    storage_harness::integration::property_names(&body),
                    vec![RIBEIRA, HORTO, WAIKIKI, BUSHWICK, SYDNEY, LAGOA]
                );
            }

            #[tokio::test]
            async fn test_rest_list_by_type_pages() {
                let (server, _) = make_seeded_server().await;

                let first: Value = server
                    .get("/properties")
                    .add_query_param("property_type", "Apartment")
                    .add_query_param("page_size", 3)
                    .await
                    .json();
                assert_eq!(first["pagination"]["total_count"], 4);
                assert_eq!(first["pagination"]["total_pages"], 2);
                assert_eq!(first["pagination"]["has_next"], true);
                assert_eq!(
                    storage_harness::integration::property_names(&first),
                    vec![HORTO, BUSHWICK, SYDNEY]
                );

                let second: Value = server
                    .get("/properties")
                    .add_query_param("property_type", "Apartment")
                    .add_query_param("page_size", 3)
                    .add_query_param("page", 2)
                    .await
                    .json();
                assert_eq!(second["pagination"]["has_next"], false);
                assert_eq!(second["pagination"]["has_previous"], true);
                assert_eq!(storage_harness::integration::property_names(&second), vec![LAGOA]);
            }

            #[tokio::test]
            async fn test_rest_list_ignores_id() {
                let (server, ids) = make_seeded_server().await;

                let body: Value = server
                    .get("/properties")
                    .add_query_param("id", &ids[0])
                    .await
                    .json();
                assert_eq!(body["pagination"]["total_count"], 6);
            }

            #[tokio::test]
            async fn test_rest_search_min_bedrooms() {
                let (server, _) = make_seeded_server().await;

                let body: Value = server
                    .get("/search")
                    .add_query_param("min_bedrooms", 2)
                    .await
                    .json();
                assert_eq!(
                    storage_harness::integration::property_names(&body),
                    vec![RIBEIRA, LAGOA]
                );
            }

            #[tokio::test]
            async fn test_rest_search_by_id_ignores_filters() {
                let (server, ids) = make_seeded_server().await;

                let body: Value = server
                    .get("/search")
                    .add_query_param("id", &ids[3])
                    .add_query_param("min_bedrooms", 99)
                    .add_query_param("page", 3)
                    .add_query_param("page_size", 50)
                    .await
                    .json();

                assert_eq!(storage_harness::integration::property_names(&body), vec![BUSHWICK]);
                assert_eq!(body["pagination"]["page"], 1);
                assert_eq!(body["pagination"]["page_size"], 1);
                assert_eq!(body["pagination"]["total_count"], 1);
            }

            #[tokio::test]
            async fn test_rest_search_unknown_id_is_empty() {
                let (server, _) = make_seeded_server().await;

                let body: Value = server
                    .get("/search")
                    .add_query_param("id", "not-an-object-id")
                    .await
                    .json();
                assert_eq!(body["pagination"]["total_count"], 0);
                assert_eq!(body["pagination"]["total_pages"], 0);
                assert_eq!(body["properties"], json!([]));
            }

            #[tokio::test]
            async fn test_rest_search_max_price() {
                let (server, _) = make_seeded_server().await;

                // Prices are stored as currency strings and compared lexically.
                let body: Value = server
                    .get("/search")
                    .add_query_param("max_price", 120)
                    .await
                    .json();
                assert_eq!(storage_harness::integration::property_names(&body), vec![WAIKIKI]);
            }

            #[tokio::test]
            async fn test_rest_search_bathrooms() {
                let (server, _) = make_seeded_server().await;

                let none: Value = server
                    .get("/search")
                    .add_query_param("bathrooms", 0)
                    .await
                    .json();
                assert_eq!(storage_harness::integration::property_names(&none), vec![SYDNEY]);

                let one: Value = server
                    .get("/search")
                    .add_query_param("bathrooms", 1)
                    .await
                    .json();
                assert_eq!(
                    storage_harness::integration::property_names(&one),
                    vec![RIBEIRA, HORTO, WAIKIKI]
                );
            }

            #[tokio::test]
            async fn test_rest_search_empty_name_is_ignored() {
                let (server, _) = make_seeded_server().await;

                let body: Value = server
                    .get("/search")
                    .add_query_param("name", "")
                    .await
                    .json();
                assert_eq!(body["pagination"]["total_count"], 6);
            }

            // ==============================================================
            // Normalization
            // ==============================================================

            #[tokio::test]
            async fn test_rest_normalizes_stored_values() {
                let (server, ids) = make_seeded_server().await;

                let bushwick: Value = server.get(&format!("/properties/{}", ids[3])).await.json();
                assert_eq!(bushwick["price"], "40.00");
                assert_eq!(bushwick["bathrooms"], 1.5);
                assert_eq!(
                    bushwick["picture_url"],
                    format!("https://a0.muscache.com/{}.jpg", BUSHWICK.len())
                );
                assert_eq!(bushwick["review_scores_rating"], Value::Null);

                let lagoa: Value = server.get(&format!("/properties/{}", ids[5])).await.json();
                assert_eq!(lagoa["bathrooms"], 2.0);
                assert_eq!(lagoa["review_scores_rating"], 89.0);
            }

            #[tokio::test]
            async fn test_rest_list_tolerates_numeric_shapes() {
                let (server, store) = make_server().await;
                for document in [
                    mongodb::bson::doc! { "name": "Good", "price": "$80.00" },
                    mongodb::bson::doc! { "name": "Double price", "price": 120.0 },
                    mongodb::bson::doc! { "name": "Double bedrooms", "bedrooms": 2.0 },
                ] {
                    store.insert_one(document).await.unwrap();
                }

                let response = server.get("/properties").await;
                response.assert_status_ok();

                let body: Value = response.json();
                assert_eq!(
                    storage_harness::integration::property_names(&body),
                    vec!["Good", "Double price", "Double bedrooms"]
                );
                assert_eq!(body["properties"][1]["price"], "120.0");
                assert_eq!(body["properties"][2]["bedrooms"], 2);
            }

            // ==============================================================
            // Error handling
            // ==============================================================

            #[tokio::test]
            async fn test_rest_error_not_found() {
                let (server, _) = make_seeded_server().await;

                let response = server.get("/properties/000000000000000000000000").await;
                response.assert_status(StatusCode::NOT_FOUND);

                let body: Value = response.json();
                assert_eq!(body["code"], "PROPERTY_NOT_FOUND");
                assert!(body["message"].as_str().is_some());

                server
                    .get("/properties/definitely-not-an-id")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_error_invalid_page() {
                let (server, _) = make_seeded_server().await;

                let zero_page = server.get("/properties").add_query_param("page", 0).await;
                zero_page.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = zero_page.json();
                assert_eq!(body["code"], "VALIDATION_ERROR");

                server
                    .get("/search")
                    .add_query_param("page_size", 0)
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);

                server
                    .get("/search")
                    .add_query_param("page_size", 1000)
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_rest_error_missing_name() {
                let (server, _) = make_server().await;

                let missing = server
                    .post("/properties")
                    .json(&json!({ "bedrooms": 2 }))
                    .await;
                missing.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
                let body: Value = missing.json();
                assert_eq!(body["code"], "VALIDATION_ERROR");
                assert!(body["message"].as_str().unwrap().contains("name"));

                server
                    .post("/properties")
                    .json(&json!({ "name": "" }))
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_rest_error_malformed_input_is_json() {
                let (server, ids) = make_seeded_server().await;

                for (key, value) in [("page", "-1"), ("min_bedrooms", ""), ("max_price", "cheap")] {
                    let response = server.get("/search").add_query_param(key, value).await;
                    response.assert_status(StatusCode::BAD_REQUEST);
                    let body: Value = response.json();
                    assert_eq!(body["code"], "VALIDATION_ERROR", "query {key}={value}");
                }

                let syntax = server
                    .post("/properties")
                    .bytes(axum::body::Bytes::from_static(b"{\"name\": "))
                    .content_type("application/json")
                    .await;
                syntax.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = syntax.json();
                assert_eq!(body["code"], "VALIDATION_ERROR");

                let wrong_type = server
                    .put(&format!("/properties/{}", ids[0]))
                    .json(&json!({ "bedrooms": "many" }))
                    .await;
                wrong_type.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
                let body: Value = wrong_type.json();
                assert_eq!(body["code"], "VALIDATION_ERROR");
            }
        }
    };
}
