use serde::{Deserialize, Serialize};

use crate::common::types::{TradeDirection, TradeInput, MINUTES_PER_DAY};

/// Decay and exit levels for a trade, before any risk validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeLevels {
    pub decay: f64,
    pub exit_take_profit: f64,
    pub exit_stop_loss: f64,
    pub risk_amount: f64,
    pub reward_amount: f64,
}

/// Exit level calculations
///
/// All functions are pure. NaN or infinite inputs are not guarded and
/// propagate into the results.
pub struct TradeCalculator;

impl TradeCalculator {
    /// Price erosion over the holding period
    ///
    /// Theta is a daily figure, so it is scaled to a per-minute rate first.
    pub fn decay(theta: f64, trade_time_minutes: f64) -> f64 {
        (theta / MINUTES_PER_DAY) * trade_time_minutes
    }

    /// Risk and reward amounts carried into the evaluation
    ///
    /// Both directions pass the budgets through unchanged. A short position's
    /// economics could warrant a different sign convention; that is a known
    /// limitation, kept as-is.
    pub fn risk_reward(direction: TradeDirection, risk: f64, reward: f64) -> (f64, f64) {
        match direction {
            TradeDirection::Long => (risk, reward),
            TradeDirection::Short => (risk, reward),
        }
    }

    /// Target exit price
    ///
    /// Long: `entry + delta * reward - decay`
    /// Short: `entry - delta * reward - decay`
    pub fn exit_take_profit(
        direction: TradeDirection,
        entry: f64,
        delta: f64,
        reward: f64,
        decay: f64,
    ) -> f64 {
        match direction {
            TradeDirection::Long => entry + delta * reward - decay,
            TradeDirection::Short => entry - delta * reward - decay,
        }
    }

    /// Protective exit price
    ///
    /// Long: `entry - delta * risk - decay`
    /// Short: `entry + delta * risk - decay`
    pub fn exit_stop_loss(
        direction: TradeDirection,
        entry: f64,
        delta: f64,
        risk: f64,
        decay: f64,
    ) -> f64 {
        match direction {
            TradeDirection::Long => entry - delta * risk - decay,
            TradeDirection::Short => entry + delta * risk - decay,
        }
    }

    /// Compute all levels for a trade
    pub fn calculate(input: &TradeInput) -> TradeLevels {
        let decay = Self::decay(input.theta, input.trade_time_minutes);
        let (risk_amount, reward_amount) =
            Self::risk_reward(input.direction, input.risk_budget, input.reward_budget);

        TradeLevels {
            decay,
            exit_take_profit: Self::exit_take_profit(
                input.direction,
                input.entry_price,
                input.delta,
                input.reward_budget,
                decay,
            ),
            exit_stop_loss: Self::exit_stop_loss(
                input.direction,
                input.entry_price,
                input.delta,
                input.risk_budget,
                decay,
            ),
            risk_amount,
            reward_amount,
        }
    }
}
