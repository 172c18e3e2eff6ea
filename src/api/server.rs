use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::config::types::RiskStoreConfig;
use crate::pricing::TradeEvaluator;
use crate::risk::{PositionSizer, RiskConfig, RiskPolicy};
use crate::store::{self, ConfigWriter, InMemoryStore, JsonFileStore, SharedConfigStore};

/// Shared state available to every handler
#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<RiskPolicy>,
    pub evaluator: TradeEvaluator,
    pub sizer: PositionSizer,
    pub store: SharedConfigStore,
    pub writer: ConfigWriter,
}

impl AppState {
    /// Wire the engines around one shared policy and start its writer
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(policy: Arc<RiskPolicy>, store: SharedConfigStore) -> Self {
        Self {
            evaluator: TradeEvaluator::with_policy(policy.clone()),
            sizer: PositionSizer::new(policy.clone()),
            writer: ConfigWriter::spawn(store.clone(), policy.current_config()),
            policy,
            store,
        }
    }

    /// Load the saved risk configuration (or defaults) and build the state
    pub async fn bootstrap(store: SharedConfigStore) -> Self {
        let config = store::load_or_default(store.as_ref()).await;
        Self::new(Arc::new(RiskPolicy::new(config)), store)
    }

    /// Queue a configuration snapshot for saving without waiting for it
    pub fn persist(&self, config: &RiskConfig) {
        self.writer.submit(config.clone());
    }
}

/// Pick the store described by the settings
pub fn store_from_settings(settings: &RiskStoreConfig) -> SharedConfigStore {
    if settings.persist {
        Arc::new(JsonFileStore::new(&settings.config_file))
    } else {
        Arc::new(InMemoryStore::new())
    }
}

/// HTTP front end for the pricing and risk engines
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/health", get(handlers::health))
            .route("/calculate", post(handlers::calculate))
            .route("/calculate-batch", post(handlers::calculate_batch))
            .route("/config", get(handlers::get_config).post(handlers::update_config))
            .route("/config/reset", post(handlers::reset_config))
            .route("/validate-risk", post(handlers::validate_risk))
            .route("/position-size", post(handlers::position_size))
            .fallback(handlers::not_found)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Option risk API listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        self.state.writer.flush().await;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal, cleaning up...");
    }
}
