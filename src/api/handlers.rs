use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::error::{ApiError, ApiResult};
use super::server::AppState;
use super::types::{
    parse_batch, parse_config_update, parse_position_size, parse_risk_amount, parse_trade,
    BatchResponse, CalculateResponse, ConfigResponse, HealthResponse, PositionSizeResponse,
    SuggestionView, ValidationResponse,
};
use crate::common::errors::EngineError;
use crate::pricing::evaluate_batch;

/// Routes listed by the fallback handler
pub const AVAILABLE_ENDPOINTS: [&str; 8] = [
    "GET /health - Health check",
    "POST /calculate - Calculate single option trade",
    "POST /calculate-batch - Calculate multiple option trades",
    "GET /config - Get risk configuration",
    "POST /config - Update risk configuration",
    "POST /config/reset - Reset risk configuration to defaults",
    "POST /validate-risk - Validate a risk amount",
    "POST /position-size - Suggest a position size",
];

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "Option Risk Helper API",
    })
}

/// Evaluates a single trade.
///
/// # Errors
/// 400 on missing or malformed fields, 500 if the stored risk configuration is corrupted.
#[instrument(skip_all)]
pub async fn calculate(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<CalculateResponse>> {
    let input = parse_trade(&body)?;
    let evaluation = state
        .evaluator
        .evaluate(&input)
        .map_err(|e| ApiError::from_evaluation("Internal calculation error", e))?;

    Ok(Json(CalculateResponse::new(&input, &evaluation)))
}

/// Evaluates every trade of a batch; failing trades are reported per index.
#[instrument(skip_all)]
pub async fn calculate_batch(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<BatchResponse>> {
    let trades = parse_batch(&body)?;

    let items = trades
        .iter()
        .map(|trade| parse_trade(trade).map_err(ApiError::into_engine_error));
    let report = evaluate_batch(&state.evaluator, items);

    Ok(Json(BatchResponse::from(&report)))
}

pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        success: true,
        message: None,
        config: state.policy.current_config(),
    })
}

/// Updates capital and/or risk percentage, then persists in the background.
///
/// # Errors
/// 400 if a supplied value is out of range; the configuration is left unchanged.
#[instrument(skip_all)]
pub async fn update_config(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ConfigResponse>> {
    let (capital, percent) = parse_config_update(&body)?;
    let config = state.policy.update_config(capital, percent)?;
    state.persist(&config);

    Ok(Json(ConfigResponse {
        success: true,
        message: Some("Configuration updated successfully"),
        config,
    }))
}

#[instrument(skip_all)]
pub async fn reset_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let config = state.policy.reset_to_defaults();
    state.persist(&config);

    Json(ConfigResponse {
        success: true,
        message: Some("Configuration reset to defaults"),
        config,
    })
}

/// Validates a risk amount against the current configuration.
///
/// # Errors
/// 400 on a missing or non-numeric amount, 500 if the stored configuration is corrupted.
#[instrument(skip_all)]
pub async fn validate_risk(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ValidationResponse>> {
    let risk_amount = parse_risk_amount(&body)?;
    let validation = state
        .policy
        .validate_risk(risk_amount)
        .map_err(|e| ApiError::from_evaluation("Risk validation failed", e))?;

    info!(risk_amount, severity = %validation.severity, "Risk validated");
    Ok(Json(ValidationResponse {
        success: true,
        validation,
    }))
}

/// Suggests a contract count for a risk budget and two prices.
///
/// Equal entry and stop-loss is reported inside a successful response.
#[instrument(skip_all)]
pub async fn position_size(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<PositionSizeResponse>> {
    let (risk_amount, entry_price, stop_loss_price) = parse_position_size(&body)?;

    let suggestion = match state.sizer.suggest(risk_amount, entry_price, stop_loss_price) {
        Ok(suggestion) => SuggestionView::Sized(suggestion),
        Err(e @ EngineError::DegenerateInput { .. }) => SuggestionView::Degenerate {
            error: e.to_string(),
            suggested_contracts: 0,
        },
        Err(e) => return Err(ApiError::from_evaluation("Position sizing failed", e)),
    };

    Ok(Json(PositionSizeResponse {
        success: true,
        suggestion,
    }))
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "available_endpoints": AVAILABLE_ENDPOINTS,
        })),
    )
}
