//! Request parsing and response bodies for the HTTP API

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use super::error::{ApiError, ApiResult};
use crate::common::types::{TradeDirection, TradeInput};
use crate::pricing::{BatchReport, TradeEvaluation};
use crate::risk::{PositionSizeSuggestion, RiskConfig, RiskValidation};

/// Decimal places reported for the decay figure
pub const DECAY_DECIMALS: u32 = 6;
/// Decimal places reported for exit prices
pub const EXIT_PRICE_DECIMALS: u32 = 4;

/// Fields every trade payload must carry
pub const TRADE_FIELDS: [&str; 7] = [
    "delta",
    "theta",
    "trade_time",
    "risk",
    "reward",
    "entry",
    "trade_type",
];

/// Round half-to-even on the exact binary value; non-finite values pass through
pub fn round_to(value: f64, decimals: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(decimals))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

fn as_object(value: &Value) -> ApiResult<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object"))
}

fn missing_fields(body: &Map<String, Value>, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|field| body.get(**field).map_or(true, Value::is_null))
        .map(|field| field.to_string())
        .collect()
}

/// Read a numeric field; numeric strings are accepted, `NaN` and infinities are not
fn number(body: &Map<String, Value>, field: &str) -> ApiResult<Option<f64>> {
    let parsed = match body.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| ApiError::BadRequest {
            error: "Invalid input values".to_string(),
            message: Some(format!("Field '{}' must be a number", field)),
        })
}

fn required_number(body: &Map<String, Value>, field: &str) -> ApiResult<f64> {
    number(body, field)?.ok_or_else(|| ApiError::MissingFields(vec![field.to_string()]))
}

/// Parse one trade payload into a validated input
pub fn parse_trade(value: &Value) -> ApiResult<TradeInput> {
    let body = as_object(value)?;

    let missing = missing_fields(body, &TRADE_FIELDS);
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing));
    }

    let direction: TradeDirection = match body.get("trade_type") {
        Some(Value::String(token)) => token.parse()?,
        _ => return Err(ApiError::bad_request("Invalid trade_type. Must be 'buy' or 'sell'")),
    };

    Ok(TradeInput {
        delta: required_number(body, "delta")?,
        theta: required_number(body, "theta")?,
        trade_time_minutes: required_number(body, "trade_time")?,
        risk_budget: required_number(body, "risk")?,
        reward_budget: required_number(body, "reward")?,
        entry_price: required_number(body, "entry")?,
        direction,
    })
}

/// Extract the `trades` array of a batch request
pub fn parse_batch(value: &Value) -> ApiResult<&Vec<Value>> {
    value
        .get("trades")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::bad_request("Expected 'trades' array in request body"))
}

/// Optional capital and percentage for a configuration update
pub fn parse_config_update(value: &Value) -> ApiResult<(Option<f64>, Option<f64>)> {
    let body = as_object(value)?;
    let capital = number(body, "total_capital")?;
    let percent = match number(body, "risk_per_trade_percentage")? {
        Some(percent) => Some(percent),
        None => number(body, "risk_per_trade_percent")?,
    };
    Ok((capital, percent))
}

/// Risk amount of a validation request
pub fn parse_risk_amount(value: &Value) -> ApiResult<f64> {
    let body = as_object(value)?;
    if body.get("risk_amount").map_or(true, Value::is_null) {
        return Err(ApiError::bad_request("Missing required field: risk_amount"));
    }
    required_number(body, "risk_amount")
}

/// Budget, entry and stop-loss of a position sizing request
pub fn parse_position_size(value: &Value) -> ApiResult<(f64, f64, f64)> {
    let body = as_object(value)?;

    let missing = missing_fields(body, &["risk_amount", "entry_price", "stop_loss_price"]);
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing));
    }

    Ok((
        required_number(body, "risk_amount")?,
        required_number(body, "entry_price")?,
        required_number(body, "stop_loss_price")?,
    ))
}

/// Echo of the trade inputs, using the request field names
#[derive(Debug, Clone, Serialize)]
pub struct TradeInputsView {
    pub delta: f64,
    pub theta: f64,
    pub trade_time: f64,
    pub risk: f64,
    pub reward: f64,
    pub entry: f64,
    pub trade_type: TradeDirection,
}

impl From<&TradeInput> for TradeInputsView {
    fn from(input: &TradeInput) -> Self {
        Self {
            delta: input.delta,
            theta: input.theta,
            trade_time: input.trade_time_minutes,
            risk: input.risk_budget,
            reward: input.reward_budget,
            entry: input.entry_price,
            trade_type: input.direction,
        }
    }
}

/// Evaluation figures rounded for presentation
#[derive(Debug, Clone, Serialize)]
pub struct TradeResultsView {
    pub trade_decay: f64,
    pub exit_take_profit: f64,
    pub exit_stop_loss: f64,
    pub risk_amount: f64,
    pub reward_amount: f64,
}

impl From<&TradeEvaluation> for TradeResultsView {
    fn from(evaluation: &TradeEvaluation) -> Self {
        Self {
            trade_decay: round_to(evaluation.decay, DECAY_DECIMALS),
            exit_take_profit: round_to(evaluation.exit_take_profit, EXIT_PRICE_DECIMALS),
            exit_stop_loss: round_to(evaluation.exit_stop_loss, EXIT_PRICE_DECIMALS),
            risk_amount: evaluation.risk_amount,
            reward_amount: evaluation.reward_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalculateResponse {
    pub success: bool,
    pub inputs: TradeInputsView,
    pub results: TradeResultsView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_validation: Option<RiskValidation>,
}

impl CalculateResponse {
    pub fn new(input: &TradeInput, evaluation: &TradeEvaluation) -> Self {
        Self {
            success: true,
            inputs: input.into(),
            results: evaluation.into(),
            risk_validation: evaluation.validation.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResultView {
    pub trade_index: usize,
    pub inputs: TradeInputsView,
    pub results: TradeResultsView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_validation: Option<RiskValidation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchErrorView {
    pub trade_index: usize,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub processed_trades: usize,
    pub errors: usize,
    pub results: Vec<BatchResultView>,
    pub errors_detail: Option<Vec<BatchErrorView>>,
}

impl From<&BatchReport> for BatchResponse {
    fn from(report: &BatchReport) -> Self {
        let results = report
            .evaluated()
            .map(|(trade_index, input, evaluation)| BatchResultView {
                trade_index,
                inputs: input.into(),
                results: evaluation.into(),
                risk_validation: evaluation.validation.clone(),
            })
            .collect();

        let errors: Vec<BatchErrorView> = report
            .failures()
            .map(|(trade_index, error)| BatchErrorView {
                trade_index,
                error: error.to_string(),
            })
            .collect();

        Self {
            success: true,
            processed_trades: report.processed,
            errors: report.failed,
            results,
            errors_detail: if errors.is_empty() { None } else { Some(errors) },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub config: RiskConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResponse {
    pub success: bool,
    pub validation: RiskValidation,
}

/// Position sizing outcome; equal entry and stop-loss is reported, not failed
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SuggestionView {
    Sized(PositionSizeSuggestion),
    Degenerate {
        error: String,
        suggested_contracts: u64,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionSizeResponse {
    pub success: bool,
    pub suggestion: SuggestionView,
}
