//! End-to-end tests: a `wiremock` Admin API feeding a `#[sqlx::test]`
//! database through [`IngestPipeline`], read back through the aggregator.

use rust_decimal::Decimal;
use serde_json::json;
use shopdash_core::{ShopCredentials, ShopifySettings};
use shopdash_pipeline::{aggregate_dashboard_metrics, IngestError, IngestPipeline, MetricsError};
use shopdash_shopify::{Resource, ShopifyClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WIDE_ORDER_ID: i64 = 9_123_456_789_012_345_678;

fn pipeline(pool: sqlx::PgPool) -> IngestPipeline {
    let settings = ShopifySettings {
        api_version: "2024-01".to_owned(),
        request_timeout_secs: 5,
        user_agent: "shopdash-test/0.1".to_owned(),
        page_limit: 250,
        max_pages: 10,
        inter_request_delay_ms: 0,
        max_retries: 0,
        retry_backoff_base_secs: 0,
    };
    let client = ShopifyClient::new(&settings).expect("failed to build test client");
    IngestPipeline::new(client, pool)
}

async fn mount_json(server: &MockServer, resource: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/admin/api/2024-01/{resource}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Three products, customers A ($100) and B ($50), a $70 order from A and a
/// $30 guest order.
async fn mount_fixture(server: &MockServer) {
    mount_json(
        server,
        "products",
        json!({ "products": [
            { "id": 632_910_392, "title": "Mug", "vendor": "Acme" },
            { "id": 632_910_393, "title": "Tee", "vendor": "Acme" },
            { "id": 632_910_394, "title": "Cap", "vendor": null }
        ]}),
    )
    .await;
    mount_json(
        server,
        "customers",
        json!({ "customers": [
            { "id": 207_119_551, "first_name": "Ada", "last_name": "Lovelace",
              "email": "ada@example.com", "total_spent": "100.00" },
            { "id": 207_119_552, "first_name": "Bob", "last_name": "Builder",
              "email": "bob@example.com", "total_spent": "50.00" }
        ]}),
    )
    .await;
    mount_json(
        server,
        "orders",
        json!({ "orders": [
            { "id": WIDE_ORDER_ID, "total_price": "70.00", "currency": "USD",
              "created_at": "2024-03-01T10:15:00-05:00",
              "customer": { "id": 207_119_551 } },
            { "id": 450_789_470, "total_price": "30.00", "currency": "USD",
              "created_at": "2024-03-02T08:00:00Z", "customer": null }
        ]}),
    )
    .await;
}

#[sqlx::test(migrations = "../../migrations")]
async fn ingests_fixture_and_aggregates_metrics(pool: sqlx::PgPool) {
    let server = MockServer::start().await;
    mount_fixture(&server).await;
    let credentials = ShopCredentials::new(server.uri(), "shpat_test_token");

    let summary = pipeline(pool.clone())
        .run(&credentials)
        .await
        .expect("ingestion should succeed");
    assert_eq!(
        summary.message(),
        "Ingested 3 products, 2 customers, and 2 orders."
    );
    assert_eq!(summary.skipped, 0);

    let metrics = aggregate_dashboard_metrics(&pool, &server.uri())
        .await
        .expect("metrics");
    assert_eq!(metrics.total_customers, 2);
    assert_eq!(metrics.total_orders, 2);
    assert_eq!(metrics.total_revenue, Decimal::new(100, 0));
    let top: Vec<i64> = metrics.top_customers.iter().map(|c| c.id.get()).collect();
    assert_eq!(top, vec![207_119_551, 207_119_552]);

    let linked = shopdash_db::get_order(&pool, WIDE_ORDER_ID)
        .await
        .expect("get order")
        .expect("wide order stored");
    assert_eq!(linked.customer_id, Some(207_119_551));
    let guest = shopdash_db::get_order(&pool, 450_789_470)
        .await
        .expect("get order")
        .expect("guest order stored");
    assert_eq!(guest.customer_id, None);
}

#[sqlx::test(migrations = "../../migrations")]
async fn second_run_updates_without_duplicating(pool: sqlx::PgPool) {
    let server = MockServer::start().await;
    mount_fixture(&server).await;
    let credentials = ShopCredentials::new(server.uri(), "shpat_test_token");
    let pipeline = pipeline(pool.clone());

    let first = pipeline.run(&credentials).await.expect("first run");
    let second = pipeline.run(&credentials).await.expect("second run");

    assert_eq!(first.store_id, second.store_id);
    assert_eq!(
        shopdash_db::count_products(&pool, first.store_id)
            .await
            .expect("count"),
        3
    );
    assert_eq!(
        shopdash_db::count_customers(&pool, first.store_id)
            .await
            .expect("count"),
        2
    );
    assert_eq!(
        shopdash_db::count_orders(&pool, first.store_id)
            .await
            .expect("count"),
        2
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn wide_order_id_survives_to_serialised_metrics(pool: sqlx::PgPool) {
    let server = MockServer::start().await;
    mount_json(&server, "products", json!({ "products": [] })).await;
    mount_json(
        &server,
        "customers",
        json!({ "customers": [
            { "id": 9_007_199_254_740_993_i64, "total_spent": "12.34" }
        ]}),
    )
    .await;
    mount_json(
        &server,
        "orders",
        json!({ "orders": [
            { "id": WIDE_ORDER_ID, "total_price": "12.34",
              "customer": { "id": 9_007_199_254_740_993_i64 } }
        ]}),
    )
    .await;
    let credentials = ShopCredentials::new(server.uri(), "shpat_test_token");

    pipeline(pool.clone())
        .run(&credentials)
        .await
        .expect("ingestion should succeed");

    let order = shopdash_db::get_order(&pool, WIDE_ORDER_ID)
        .await
        .expect("get order")
        .expect("order stored");
    assert_eq!(order.id, WIDE_ORDER_ID);

    let metrics = aggregate_dashboard_metrics(&pool, &server.uri())
        .await
        .expect("metrics");
    let body = serde_json::to_value(&metrics).expect("serialise");
    assert_eq!(body["topCustomers"][0]["id"], json!("9007199254740993"));
    assert_eq!(body["totalRevenue"], json!(12.34));
}

#[sqlx::test(migrations = "../../migrations")]
async fn failed_fetch_aborts_later_phases_and_keeps_earlier_writes(pool: sqlx::PgPool) {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "products",
        json!({ "products": [{ "id": 1, "title": "Mug" }] }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-01/customers.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-01/orders.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": [] })))
        .expect(0)
        .mount(&server)
        .await;
    let credentials = ShopCredentials::new(server.uri(), "shpat_test_token");

    let err = pipeline(pool.clone())
        .run(&credentials)
        .await
        .expect_err("customers fetch should fail");

    assert!(matches!(
        err,
        IngestError::Fetch {
            resource: Resource::Customers,
            ..
        }
    ));
    assert_eq!(err.kind(), "external_api");

    let store = shopdash_db::get_store_by_shop(&pool, &server.uri())
        .await
        .expect("lookup")
        .expect("store persisted before the failure");
    assert_eq!(
        shopdash_db::count_products(&pool, store.id)
            .await
            .expect("count"),
        1
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn metrics_for_unknown_shop_are_rejected(pool: sqlx::PgPool) {
    let err = aggregate_dashboard_metrics(&pool, "never-ingested.myshopify.com")
        .await
        .expect_err("unknown shop");
    assert!(matches!(err, MetricsError::UnknownStore { .. }));
}
