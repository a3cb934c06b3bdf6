use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

use stockdesk_api::app::services::AppServices;
use stockdesk_infra::{InMemoryStore, InventoryStore, SessionConfig, SnapshotCache, StoreError, StoreRow};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(services: AppServices) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = stockdesk_api::app::build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn in_memory() -> (Self, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let srv = Self::spawn(AppServices::in_memory(store.clone())).await;
        (srv, store)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct UnreachableStore;

#[async_trait]
impl InventoryStore for UnreachableStore {
    async fn read_all(&self) -> Result<Vec<StoreRow>, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn append(&self, _values: Vec<String>) -> Result<(), StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    fn backend_name(&self) -> &'static str {
        "unreachable"
    }
}

async fn add(client: &reqwest::Client, base_url: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{}/inventory", base_url))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn list(client: &reqwest::Client, base_url: &str, search: Option<&str>) -> Value {
    let mut req = client.get(format!("{}/inventory", base_url));
    if let Some(search) = search {
        req = req.query(&[("search", search)]);
    }
    let res = req.send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let (srv, _) = TestServer::in_memory().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn add_products_and_list_them() {
    let (srv, _) = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let res = add(&client, &srv.base_url, json!({"name": "אורז", "price": 12.5, "category": "מזון"})).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["sku"], "20001");
    assert_eq!(created["price"], "12.50");
    assert_eq!(created["price_display"], "₪12.50");
    assert_eq!(created["added_by"], "User");

    let res = add(&client, &srv.base_url, json!({"name": "שמן", "price": 1234.5, "category": "מזון"})).await;
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["sku"], "20002");
    assert_eq!(created["price_display"], "₪1,234.50");

    let res = add(&client, &srv.base_url, json!({"name": "Tape", "price": 3, "category": "כללי"})).await;
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["sku"], "10001");

    let body = list(&client, &srv.base_url, None).await;
    assert_eq!(body["count"], 3);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.last().unwrap()["sku"], "10001");
}

#[tokio::test]
async fn search_filters_any_field() {
    let (srv, _) = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    add(&client, &srv.base_url, json!({"name": "מחשב נייד", "price": 2500, "category": "אלקטרוניקה"})).await;
    add(&client, &srv.base_url, json!({"name": "Paper", "price": 20, "category": "משרד"})).await;

    let body = list(&client, &srv.base_url, Some("מחשב")).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["sku"], "50001");

    let body = list(&client, &srv.base_url, Some("paper")).await;
    assert_eq!(body["count"], 1);

    let body = list(&client, &srv.base_url, Some("xyz")).await;
    assert_eq!(body["count"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn empty_name_is_rejected_without_writing() {
    let (srv, store) = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let res = add(&client, &srv.base_url, json!({"name": "   ", "price": 5, "category": "מזון"})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "name required");
    assert!(store.is_empty());

    let res = add(&client, &srv.base_url, json!({"name": "Soap", "price": 5})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "category required");
    assert!(store.is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let (srv, store) = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let res = add(&client, &srv.base_url, json!({"name": "Soap", "price": "cheap"})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert!(store.is_empty());
}

#[tokio::test]
async fn override_category_shows_up_in_choices() {
    let (srv, _) = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let res = add(
        &client,
        &srv.base_url,
        json!({"name": "Drill", "price": 300, "category": "כללי", "category_override": "כלי עבודה"}),
    )
    .await;
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["category"], "כלי עבודה");
    assert_eq!(created["sku"], "99001");

    let res = client
        .get(format!("{}/inventory/categories", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let categories: Vec<&str> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(categories.first(), Some(&"כללי"));
    assert_eq!(categories.last(), Some(&"כלי עבודה"));
}

#[tokio::test]
async fn store_check_reports_row_count() {
    let (srv, _) = TestServer::in_memory().await;
    let client = reqwest::Client::new();
    add(&client, &srv.base_url, json!({"name": "Tape", "price": 3, "category": "כללי"})).await;

    let res = client
        .get(format!("{}/system/store-check", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["rows"], 1);
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn unreachable_store_is_reported_not_fatal() {
    let services = AppServices::new(
        Arc::new(UnreachableStore),
        SnapshotCache::default(),
        SessionConfig::default(),
        "₪",
    );
    let srv = TestServer::spawn(services).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/inventory", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "store_unavailable");
    assert!(body["items"].as_array().unwrap().is_empty());

    let res = add(&client, &srv.base_url, json!({"name": "Tape", "price": 3, "category": "כללי"})).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    // bad input is reported as such even while the store is down
    let res = add(&client, &srv.base_url, json!({"name": "", "price": 3, "category": "כללי"})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "name required");

    let res = client
        .get(format!("{}/system/store-check", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    // the server keeps serving
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
