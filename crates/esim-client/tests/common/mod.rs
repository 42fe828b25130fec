//! Shared fixtures for the wiremock-backed integration tests.

#![allow(dead_code)]

use esim_client::{ClientConfig, MemoryStorage, PollSettings, RetryPolicy, Storefront};
use esim_core::{MemoryNavigator, Plan, Route};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub struct Harness {
    pub server: MockServer,
    pub storefront: Storefront,
    pub navigator: Arc<MemoryNavigator>,
    pub storage: Arc<MemoryStorage>,
}

/// Short real durations so a whole flow runs in well under a second
pub fn fast_config(server_uri: &str) -> ClientConfig {
    let mut config = ClientConfig::default()
        .with_api_base_url(format!("{}/api", server_uri))
        .with_retry(RetryPolicy::new(2, Duration::from_millis(50)))
        .with_poll(PollSettings {
            interval: Duration::from_millis(50),
            max_duration: Duration::from_secs(2),
        })
        .with_success_redirect_delay(Duration::from_millis(20));
    config.timeout = Duration::from_secs(2);
    config
}

pub async fn harness() -> Harness {
    harness_at(Route::Home).await
}

pub async fn harness_at(route: Route) -> Harness {
    let server = MockServer::start().await;
    let config = fast_config(&server.uri());
    build(server, config, route, Arc::new(MemoryStorage::new()))
}

pub fn build(
    server: MockServer,
    config: ClientConfig,
    route: Route,
    storage: Arc<MemoryStorage>,
) -> Harness {
    let navigator = Arc::new(MemoryNavigator::starting_at(route));
    let storefront = Storefront::new(config, storage.clone(), navigator.clone())
        .expect("storefront should build");

    Harness {
        server,
        storefront,
        navigator,
        storage,
    }
}

pub fn plans_json() -> Value {
    json!([
        {
            "_id": "65f0c0ffee0001",
            "id": "esim_1gb_7days",
            "name": "Tourist 7 Days",
            "description": "Perfect for short visits to Myanmar",
            "data_allowance": "1GB",
            "validity": "7 Days",
            "coverage": ["Myanmar"],
            "price": 15000,
            "currency": "MMK"
        },
        {
            "id": "esim_5gb_30days",
            "name": "Explorer 30 Days",
            "data_allowance": "5GB",
            "validity": "30 Days",
            "price": 55000,
            "currency": "MMK"
        }
    ])
}

pub fn tourist_plan() -> Plan {
    serde_json::from_value(plans_json()[0].clone()).expect("fixture plan")
}

pub fn status_json(transaction_id: &str, status: &str) -> Value {
    json!({
        "transaction_id": transaction_id,
        "status": status,
        "amount": 15000,
        "currency": "MMK",
        "payment_method": "MMQR",
        "created_at": "2024-05-01T09:30:00.123456",
        "updated_at": "2024-05-01T09:31:00.000000"
    })
}

/// Port nothing listens on: bind an ephemeral port, then release it
pub fn unbound_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/api", port)
}
