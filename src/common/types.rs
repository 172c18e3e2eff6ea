//! Trade types shared by the pricing and risk engines

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::EngineError;

/// Minutes in a trading day, used to turn daily theta into a per-minute rate
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Direction of an option trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeDirection {
    /// Buying the option
    #[serde(rename = "buy", alias = "long")]
    Long,
    /// Selling (writing) the option
    #[serde(rename = "sell", alias = "short")]
    Short,
}

impl std::fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeDirection::Long => write!(f, "buy"),
            TradeDirection::Short => write!(f, "sell"),
        }
    }
}

impl FromStr for TradeDirection {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" | "long" => Ok(TradeDirection::Long),
            "sell" | "short" => Ok(TradeDirection::Short),
            _ => Err(EngineError::Validation(
                "Invalid trade_type. Must be 'buy' or 'sell'".to_string(),
            )),
        }
    }
}

/// Input parameters for a single option trade
///
/// No invariant is enforced beyond the fields being numbers: theta is usually
/// negative and delta may be negative for puts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeInput {
    /// Option delta
    pub delta: f64,
    /// Option theta (daily decay)
    pub theta: f64,
    /// Expected holding time in minutes
    pub trade_time_minutes: f64,
    /// Amount the caller is willing to lose
    pub risk_budget: f64,
    /// Amount the caller targets to gain
    pub reward_budget: f64,
    /// Entry price per option
    pub entry_price: f64,
    /// Long (buy) or short (sell)
    pub direction: TradeDirection,
}
