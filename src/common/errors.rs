//! Error types for the application

use thiserror::Error;

/// Result type alias using our EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for pricing, risk and persistence operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed or missing caller input (numbers, direction token)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Risk configuration rejected or found corrupted
    #[error("Invalid risk configuration: {0}")]
    InvalidConfig(String),

    /// Entry and stop-loss are equal, so no contract sizing is possible
    #[error(
        "Invalid price levels - entry ({entry_price}) and stop loss ({stop_loss_price}) must be different"
    )]
    DegenerateInput {
        entry_price: f64,
        stop_loss_price: f64,
    },

    /// Service-side failure that carries no more specific cause
    #[error("Internal error: {0}")]
    Internal(String),

    /// Filesystem errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Application configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl EngineError {
    /// Whether the error was caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_) | EngineError::DegenerateInput { .. }
        )
    }
}
