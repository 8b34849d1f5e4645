use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::DateTime;
use inventory::{handler::AppRouter, run_migrations, state::AppState};
use serde_json::{Value, json};
use shared::config::ConnectionManager;
use std::{collections::HashMap, sync::Arc};
use tempfile::tempdir;
use tower::ServiceExt;

async fn call(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}

struct TestApp {
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_database("sqlite::memory:", 1).await
    }

    async fn with_database(url: &str, max_conn: u32) -> Self {
        let pool = ConnectionManager::new_pool(url, 1, max_conn).await.unwrap();
        run_migrations(&pool).await.unwrap();

        Self {
            router: AppRouter::build(Arc::new(AppState::new(pool))),
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        call(self.router.clone(), method, uri, body).await
    }

    async fn create_product(&self, name: &str, price: f64, stock_quantity: i32) -> i64 {
        let (status, body) = self
            .send(
                "POST",
                "/products",
                Some(json!({
                    "name": name,
                    "description": format!("{name} description"),
                    "price": price,
                    "stock_quantity": stock_quantity,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_i64().unwrap()
    }

    async fn stock_of(&self, id: i64) -> i64 {
        let (status, body) = self.send("GET", &format!("/products/{id}"), None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["stock_quantity"].as_i64().unwrap()
    }

    async fn place_order(&self, lines: &[(i64, i32)]) -> (StatusCode, Value) {
        let items: Vec<Value> = lines
            .iter()
            .map(|(product_id, quantity)| json!({ "product_id": product_id, "quantity": quantity }))
            .collect();
        self.send("POST", "/orders", Some(json!({ "items": items })))
            .await
    }
}

#[tokio::test]
async fn creating_a_product_echoes_fields_with_fresh_id() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            "POST",
            "/products",
            Some(json!({
                "name": "Test Product",
                "description": "A test product",
                "price": 10.5,
                "stock_quantity": 100,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Test Product");
    assert_eq!(body["description"], "A test product");
    assert_eq!(body["price"], 10.5);
    assert_eq!(body["stock_quantity"], 100);

    let first = body["id"].as_i64().unwrap();
    let second = app.create_product("Another", 1.0, 1).await;
    assert_ne!(first, second);
}

#[tokio::test]
async fn product_lifecycle_and_not_found_messages() {
    let app = TestApp::new().await;
    let a = app.create_product("A", 1.0, 1).await;
    let b = app.create_product("B", 2.0, 2).await;

    let (status, body) = app.send("GET", "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [a, b]);

    let (status, body) = app
        .send(
            "PUT",
            &format!("/products/{a}"),
            Some(json!({
                "name": "A2",
                "description": "replaced",
                "price": 3.25,
                "stock_quantity": 9,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": a, "name": "A2", "description": "replaced", "price": 3.25, "stock_quantity": 9 })
    );

    let (status, body) = app.send("DELETE", &format!("/products/{a}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let (status, body) = app.send("GET", &format!("/products/{a}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "error", "message": "Product not found" }));

    let (status, body) = app.send("DELETE", &format!("/products/{a}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (status, body) = app
        .send(
            "PUT",
            "/products/9999",
            Some(json!({ "name": "x", "description": "y", "price": 1.0, "stock_quantity": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn order_deducts_stock_and_returns_items() {
    let app = TestApp::new().await;
    let product = app.create_product("Test Product", 10.5, 100).await;

    let (status, body) = app.place_order(&[(product, 10)]).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["items"], json!([{ "product_id": product, "quantity": 10 }]));
    assert!(DateTime::parse_from_rfc3339(body["created_at"].as_str().unwrap()).is_ok());

    assert_eq!(app.stock_of(product).await, 90);
}

#[tokio::test]
async fn insufficient_stock_is_rejected_without_deduction() {
    let app = TestApp::new().await;
    let product = app.create_product("Limited Product", 5.0, 5).await;

    let (status, body) = app.place_order(&[(product, 10)]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "status": "error",
            "message": "Not enough stock for product 'Limited Product'. Requested: 10, Available: 5",
        })
    );
    assert_eq!(app.stock_of(product).await, 5);
}

#[tokio::test]
async fn failing_line_leaves_every_product_untouched() {
    let app = TestApp::new().await;
    let plenty = app.create_product("Plenty", 1.0, 100).await;
    let scarce = app.create_product("Scarce", 1.0, 5).await;

    let (status, body) = app.place_order(&[(plenty, 10), (scarce, 10)]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Not enough stock for product 'Scarce'. Requested: 10, Available: 5"
    );
    assert_eq!(app.stock_of(plenty).await, 100);
    assert_eq!(app.stock_of(scarce).await, 5);

    let (_, orders) = app.send("GET", "/orders", None).await;
    assert_eq!(orders, json!([]));
}

#[tokio::test]
async fn unknown_product_in_order_is_a_bad_request() {
    let app = TestApp::new().await;
    let product = app.create_product("Real", 1.0, 10).await;

    let (status, body) = app.place_order(&[(product, 1), (4242, 1)]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product with id 4242 not found");
    assert_eq!(app.stock_of(product).await, 10);
}

#[tokio::test]
async fn non_positive_quantities_fail_validation() {
    let app = TestApp::new().await;
    let product = app.create_product("P", 1.0, 10).await;

    let (status, body) = app.place_order(&[(product, 0)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().starts_with("Validation failed"));
    assert!(body["message"].as_str().unwrap().contains("items[0].quantity"));

    assert_eq!(app.stock_of(product).await, 10);
}

#[tokio::test]
async fn empty_order_is_accepted_without_items() {
    let app = TestApp::new().await;

    let (status, body) = app.send("POST", "/orders", Some(json!({ "items": [] }))).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["items"], json!([]));

    let id = body["id"].as_i64().unwrap();
    let (status, body) = app.send("GET", &format!("/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn status_update_persists_and_unknown_orders_are_404() {
    let app = TestApp::new().await;
    let product = app.create_product("P", 1.0, 10).await;
    let (_, order) = app.place_order(&[(product, 2)]).await;
    let id = order["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            "PATCH",
            &format!("/orders/{id}/status"),
            Some(json!({ "status": "shipped" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "shipped");
    assert_eq!(body["items"], order["items"]);

    let (status, body) = app.send("GET", &format!("/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "shipped");
    assert_eq!(body["created_at"], order["created_at"]);

    let (status, body) = app
        .send(
            "PATCH",
            &format!("/orders/{id}/status"),
            Some(json!({ "status": "pending" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");

    let (status, body) = app.send("GET", "/orders/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "error", "message": "Order not found" }));

    let (status, body) = app
        .send("PATCH", "/orders/999/status", Some(json!({ "status": "delivered" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found");

    let (status, _) = app
        .send(
            "PATCH",
            &format!("/orders/{id}/status"),
            Some(json!({ "status": "cancelled" })),
        )
        .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn orders_list_in_creation_order_with_items() {
    let app = TestApp::new().await;
    let a = app.create_product("A", 1.0, 10).await;
    let b = app.create_product("B", 1.0, 10).await;

    app.place_order(&[(a, 1), (b, 2)]).await;
    app.place_order(&[(b, 3)]).await;

    let (status, body) = app.send("GET", "/orders", None).await;
    assert_eq!(status, StatusCode::OK);

    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(
        orders[0]["items"],
        json!([{ "product_id": a, "quantity": 1 }, { "product_id": b, "quantity": 2 }])
    );
    assert_eq!(orders[1]["items"], json!([{ "product_id": b, "quantity": 3 }]));
    assert_eq!(app.stock_of(b).await, 5);
}

#[tokio::test]
async fn concurrent_orders_never_oversell() {
    let app = TestApp::new().await;
    let product = app.create_product("Hot Item", 1.0, 10).await;

    let line = [(product, 6)];
    let (first, second) = tokio::join!(app.place_order(&line), app.place_order(&line));

    let statuses = [first.0, second.0];
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::BAD_REQUEST)
            .count(),
        1
    );
    assert_eq!(app.stock_of(product).await, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_orders_on_a_file_database_never_oversell() {
    let dir = tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("inventory.db").display());
    let app = TestApp::with_database(&url, 8).await;
    let product = app.create_product("Hot Item", 1.0, 10).await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let router = app.router.clone();
        let body = json!({ "items": [{ "product_id": product, "quantity": 1 }] });
        handles.push(tokio::spawn(async move {
            call(router, "POST", "/orders", Some(body)).await
        }));
    }

    let mut statuses: HashMap<StatusCode, usize> = HashMap::new();
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        if status == StatusCode::BAD_REQUEST {
            assert_eq!(
                body["message"],
                "Not enough stock for product 'Hot Item'. Requested: 1, Available: 0"
            );
        }
        *statuses.entry(status).or_default() += 1;
    }

    assert_eq!(statuses.get(&StatusCode::OK), Some(&10));
    assert_eq!(statuses.get(&StatusCode::BAD_REQUEST), Some(&10));
    assert_eq!(app.stock_of(product).await, 0);

    let (_, orders) = app.send("GET", "/orders", None).await;
    assert_eq!(orders.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn operational_endpoints_are_served() {
    let app = TestApp::new().await;
    app.send("GET", "/products", None).await;

    let (status, body) = app.send("GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap();
    assert!(text.contains("product_query_service_request_counter"));
    assert!(text.contains("order_command_service_request_duration"));

    let (status, body) = app.send("GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/products/{id}").is_some());
    assert!(body["paths"].get("/orders/{id}/status").is_some());
}
