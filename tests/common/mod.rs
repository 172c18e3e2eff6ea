//! Common test utilities and fixtures

#![allow(dead_code)]

use option_risk_helper::{ApiServer, AppState, InMemoryStore, TradeDirection, TradeInput};
use serde_json::{json, Value};
use std::sync::Arc;

/// Long trade from the reference example: delta 0.5, theta -0.05 over 30 minutes
pub fn sample_trade() -> TradeInput {
    TradeInput {
        delta: 0.5,
        theta: -0.05,
        trade_time_minutes: 30.0,
        risk_budget: 100.0,
        reward_budget: 200.0,
        entry_price: 10.0,
        direction: TradeDirection::Long,
    }
}

/// The sample trade as an HTTP request body
pub fn sample_trade_body() -> Value {
    json!({
        "delta": 0.5,
        "theta": -0.05,
        "trade_time": 30,
        "risk": 100,
        "reward": 200,
        "entry": 10.0,
        "trade_type": "buy"
    })
}

/// A running API server bound to an ephemeral port
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("request failed")
    }
}

/// Start the API with an in-memory store on 127.0.0.1:0
pub async fn spawn_server() -> TestServer {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::bootstrap(store.clone()).await;
    let router = ApiServer::new(state.clone()).router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("no local address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server error");
    });

    TestServer {
        base_url: format!("http://{}", addr),
        state,
        store,
        client: reqwest::Client::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_trade_matches_body() {
        let trade = sample_trade();
        let body = sample_trade_body();
        assert_eq!(body["delta"], trade.delta);
        assert_eq!(body["trade_type"], trade.direction.to_string());
    }
}
