use reqwest::StatusCode;
use serde_json::{json, Value};

use wms_api::app::{build_app, services::AppServices};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod with in-memory stores, bound to an ephemeral port.
        let app = build_app(AppServices::in_memory());
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

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_hub(client: &reqwest::Client, srv: &TestServer) -> String {
    let res = client
        .post(srv.url("/api/v1/hub"))
        .json(&json!({
            "tenant_id": uuid::Uuid::now_v7(),
            "name": "North DC",
            "code": "NDC",
            "address": "1 Dock Road",
            "city": "Leeds",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn create_sku(client: &reqwest::Client, srv: &TestServer) -> String {
    let res = client
        .post(srv.url("/api/v1/sku"))
        .json(&json!({
            "seller_id": uuid::Uuid::now_v7(),
            "name": "Widget",
            "code": "W-1",
            "uom": "each",
            "weight": 0.5,
            "dimensions": { "l": 10, "w": 5, "h": 2 },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn seed_record(
    client: &reqwest::Client,
    srv: &TestServer,
    available: i64,
    allocated: i64,
    damaged: i64,
) -> (String, String) {
    let sku_id = create_sku(client, srv).await;
    let hub_id = create_hub(client, srv).await;
    let res = client
        .post(srv.url("/api/v1/inventory/records"))
        .json(&json!({
            "sku_id": sku_id,
            "hub_id": hub_id,
            "available_qty": available,
            "allocated_qty": allocated,
            "damaged_qty": damaged,
            "zone": "A",
            "rack": "R1",
            "bin": "B7",
            "max_threshold": 100,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    (sku_id, hub_id)
}

async fn counters(
    client: &reqwest::Client,
    srv: &TestServer,
    sku_id: &str,
    hub_id: &str,
) -> (i64, i64, i64) {
    let res = client
        .get(srv.url("/api/v1/inventory"))
        .query(&[("sku_id", sku_id), ("hub_id", hub_id)])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    (
        body["available_qty"].as_i64().unwrap(),
        body["allocated_qty"].as_i64().unwrap(),
        body["damaged_qty"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn hubs_can_be_created_listed_and_fetched() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let id = create_hub(&client, &srv).await;

    let res = client.get(srv.url("/api/v1/hub")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let hubs: Value = res.json().await.unwrap();
    assert_eq!(hubs.as_array().unwrap().len(), 1);

    let res = client
        .get(srv.url(&format!("/api/v1/hub/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let hub: Value = res.json().await.unwrap();
    assert_eq!(hub["code"], "NDC");
    assert_eq!(hub["city"], "Leeds");
}

#[tokio::test]
async fn unknown_or_malformed_hub_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url(&format!("/api/v1/hub/{}", uuid::Uuid::now_v7())))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(srv.url("/api/v1/hub/not-a-uuid")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn overlong_hub_name_is_rejected_and_not_stored() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/v1/hub"))
        .json(&json!({
            "tenant_id": uuid::Uuid::now_v7(),
            "name": "N".repeat(101),
            "code": "NDC",
            "address": "1 Dock Road",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let hubs: Value = client
        .get(srv.url("/api/v1/hub"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(hubs.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn blank_sku_name_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/v1/sku"))
        .json(&json!({
            "seller_id": uuid::Uuid::now_v7(),
            "name": "   ",
            "code": "W-1",
            "uom": "each",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn adjustment_decrements_counters() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (sku_id, hub_id) = seed_record(&client, &srv, 10, 5, 0).await;

    let res = client
        .post(srv.url("/api/v1/inventory"))
        .json(&json!({
            "sku_id": sku_id,
            "hub_id": hub_id,
            "available_qty": 4,
            "allocated_qty": 5,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(counters(&client, &srv, &sku_id, &hub_id).await, (6, 0, 0));
}

#[tokio::test]
async fn insufficient_quantity_is_conflict_and_changes_nothing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (sku_id, hub_id) = seed_record(&client, &srv, 10, 5, 0).await;

    let res = client
        .post(srv.url("/api/v1/inventory"))
        .json(&json!({
            "sku_id": sku_id,
            "hub_id": hub_id,
            "available_qty": 4,
            "allocated_qty": 6,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_quantity");

    assert_eq!(counters(&client, &srv, &sku_id, &hub_id).await, (10, 5, 0));
}

#[tokio::test]
async fn negative_quantity_is_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (sku_id, hub_id) = seed_record(&client, &srv, 10, 5, 0).await;

    let res = client
        .post(srv.url("/api/v1/inventory"))
        .json(&json!({
            "sku_id": sku_id,
            "hub_id": hub_id,
            "damaged_qty": -1,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(counters(&client, &srv, &sku_id, &hub_id).await, (10, 5, 0));
}

#[tokio::test]
async fn missing_hub_id_is_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/v1/inventory"))
        .json(&json!({ "sku_id": uuid::Uuid::now_v7(), "available_qty": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_inventory_record_is_conflict() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (sku_id, hub_id) = seed_record(&client, &srv, 1, 0, 0).await;

    let res = client
        .post(srv.url("/api/v1/inventory/records"))
        .json(&json!({ "sku_id": sku_id, "hub_id": hub_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn inventory_lookup_requires_both_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/api/v1/inventory"))
        .query(&[("sku_id", uuid::Uuid::now_v7().to_string())])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(srv.url("/api/v1/inventory"))
        .query(&[
            ("sku_id", uuid::Uuid::now_v7().to_string()),
            ("hub_id", uuid::Uuid::now_v7().to_string()),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_requests_never_oversell() {
    const N: i64 = 16;
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let (sku_id, hub_id) = seed_record(&client, &srv, N - 1, 0, 0).await;

    let handles: Vec<_> = (0..N)
        .map(|_| {
            let client = client.clone();
            let url = srv.url("/api/v1/inventory");
            let body = json!({ "sku_id": sku_id, "hub_id": hub_id, "available_qty": 1 });
            tokio::spawn(async move { client.post(url).json(&body).send().await.unwrap().status() })
        })
        .collect();

    let mut ok = 0;
    let mut conflict = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => conflict += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!((ok, conflict), (N - 1, 1));
    assert_eq!(counters(&client, &srv, &sku_id, &hub_id).await, (0, 0, 0));
}
