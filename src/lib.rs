//! Option Risk Helper Library
//!
//! Exit-price and risk calculations for option trades: theta decay over a
//! holding period, delta-scaled take-profit and stop-loss levels, a
//! capital-based risk policy and position sizing.

pub mod api;
pub mod common;
pub mod config;
pub mod pricing;
pub mod risk;
pub mod store;

// Re-export commonly used types
pub use common::errors::{EngineError, Result};
pub use common::types::{TradeDirection, TradeInput};
pub use config::types::AppConfig;

// Engines
pub use pricing::{
    evaluate_batch, BatchOutcome, BatchReport, TradeCalculator, TradeEvaluation, TradeEvaluator,
    TradeLevels,
};
pub use risk::{PositionSizeSuggestion, PositionSizer, RiskConfig, RiskPolicy, RiskValidation, Severity};

// Persistence and transport
pub use api::{ApiServer, AppState};
pub use store::{ConfigStore, ConfigWriter, InMemoryStore, JsonFileStore, SharedConfigStore};
