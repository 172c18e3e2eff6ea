use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::common::errors::Result;
use crate::common::types::TradeInput;
use crate::pricing::calculator::TradeCalculator;
use crate::risk::{RiskPolicy, RiskValidation};

/// Complete evaluation of one trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvaluation {
    pub decay: f64,
    pub exit_take_profit: f64,
    pub exit_stop_loss: f64,
    pub risk_amount: f64,
    pub reward_amount: f64,
    /// Present when the evaluator has a risk policy attached
    pub validation: Option<RiskValidation>,
}

/// Combines exit level calculation with risk validation
#[derive(Debug, Clone, Default)]
pub struct TradeEvaluator {
    policy: Option<Arc<RiskPolicy>>,
}

impl TradeEvaluator {
    pub fn new(policy: Option<Arc<RiskPolicy>>) -> Self {
        Self { policy }
    }

    /// Evaluator that validates every trade against `policy`
    pub fn with_policy(policy: Arc<RiskPolicy>) -> Self {
        Self::new(Some(policy))
    }

    /// Evaluate a single trade
    ///
    /// Fails only when the attached policy refuses to validate: corrupted capital
    /// or a non-finite risk amount.
    pub fn evaluate(&self, input: &TradeInput) -> Result<TradeEvaluation> {
        let levels = TradeCalculator::calculate(input);

        let validation = match &self.policy {
            Some(policy) => Some(policy.validate_risk(levels.risk_amount)?),
            None => None,
        };

        debug!(
            direction = %input.direction,
            decay = levels.decay,
            exit_take_profit = levels.exit_take_profit,
            exit_stop_loss = levels.exit_stop_loss,
            "Evaluated trade"
        );

        Ok(TradeEvaluation {
            decay: levels.decay,
            exit_take_profit: levels.exit_take_profit,
            exit_stop_loss: levels.exit_stop_loss,
            risk_amount: levels.risk_amount,
            reward_amount: levels.reward_amount,
            validation,
        })
    }
}
