use std::sync::Arc;
use tracing::debug;

use crate::common::errors::{EngineError, Result};
use crate::risk::policy::RiskPolicy;
use crate::risk::types::PositionSizeSuggestion;

/// Suggests how many contracts fit a risk budget
///
/// Sizing itself is pure; the resulting actual risk is validated against the
/// shared [`RiskPolicy`].
#[derive(Debug, Clone)]
pub struct PositionSizer {
    policy: Arc<RiskPolicy>,
}

impl PositionSizer {
    pub fn new(policy: Arc<RiskPolicy>) -> Self {
        Self { policy }
    }

    /// Size a position for `risk_budget` between `entry_price` and `stop_loss_price`
    ///
    /// Returns [`EngineError::DegenerateInput`] when both prices are equal and
    /// [`EngineError::Validation`] when any input is NaN or infinite.
    pub fn suggest(
        &self,
        risk_budget: f64,
        entry_price: f64,
        stop_loss_price: f64,
    ) -> Result<PositionSizeSuggestion> {
        for (field, value) in [
            ("risk_amount", risk_budget),
            ("entry_price", entry_price),
            ("stop_loss_price", stop_loss_price),
        ] {
            if !value.is_finite() {
                return Err(EngineError::Validation(format!(
                    "{} must be a finite number, got {}",
                    field, value
                )));
            }
        }

        let risk_per_contract = (entry_price - stop_loss_price).abs();

        if risk_per_contract == 0.0 {
            return Err(EngineError::DegenerateInput {
                entry_price,
                stop_loss_price,
            });
        }

        let suggested_contracts = contracts_for(risk_budget, risk_per_contract);
        let actual_risk = suggested_contracts as f64 * risk_per_contract;

        let validation = self.policy.validate_risk(actual_risk)?;
        let config = self.policy.current_config();

        debug!(
            risk_budget,
            risk_per_contract,
            suggested_contracts,
            actual_risk,
            severity = %validation.severity,
            "Computed position size"
        );

        Ok(PositionSizeSuggestion {
            suggested_contracts,
            risk_per_contract,
            actual_risk,
            entry_price,
            stop_loss_price,
            total_capital: config.total_capital,
            max_allowed_risk: config.max_risk_per_trade,
            validation,
        })
    }
}

/// Whole contracts affordable within the budget, never negative
fn contracts_for(risk_budget: f64, risk_per_contract: f64) -> u64 {
    let raw = (risk_budget / risk_per_contract).trunc();
    if raw.is_finite() && raw > 0.0 {
        // saturating float-to-int cast
        raw as u64
    } else {
        0
    }
}
