use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::common::errors::{EngineError, Result};
use crate::risk::types::{
    validate_capital, validate_risk_percent, RiskConfig, RiskValidation, Severity,
    WARNING_BAND_RATIO,
};

/// Owner of the live risk configuration
///
/// Every read and write of the configuration goes through the internal lock.
/// Critical sections hold only arithmetic and a clone, never I/O; persisting a
/// mutated configuration is the caller's job once the returned snapshot is in
/// hand (see [`crate::store::ConfigWriter`]).
#[derive(Debug, Default)]
pub struct RiskPolicy {
    config: RwLock<RiskConfig>,
}

impl RiskPolicy {
    /// Create a policy around an existing configuration
    ///
    /// The derived ceiling is recomputed; capital and percentage are taken as-is so
    /// a corrupted stored configuration surfaces as an error on validation instead
    /// of being silently replaced.
    pub fn new(mut config: RiskConfig) -> Self {
        config.normalize();
        Self {
            config: RwLock::new(config),
        }
    }

    /// Snapshot of the current configuration
    pub fn current_config(&self) -> RiskConfig {
        self.config.read().clone()
    }

    /// Overwrite the supplied fields and recompute derived values
    ///
    /// Nothing is written if either supplied value is out of range.
    #[instrument(skip(self))]
    pub fn update_config(
        &self,
        total_capital: Option<f64>,
        risk_per_trade_percent: Option<f64>,
    ) -> Result<RiskConfig> {
        if let Some(capital) = total_capital {
            validate_capital(capital)?;
        }
        if let Some(percent) = risk_per_trade_percent {
            validate_risk_percent(percent)?;
        }

        let snapshot = {
            let mut config = self.config.write();
            if let Some(capital) = total_capital {
                config.total_capital = capital;
            }
            if let Some(percent) = risk_per_trade_percent {
                config.risk_per_trade_percent = percent;
            }
            config.normalize();
            config.clone()
        };

        info!(
            total_capital = snapshot.total_capital,
            risk_per_trade_percent = snapshot.risk_per_trade_percent,
            max_risk_per_trade = snapshot.max_risk_per_trade,
            "Risk configuration updated"
        );
        Ok(snapshot)
    }

    /// Replace the configuration with the defaults
    pub fn reset_to_defaults(&self) -> RiskConfig {
        let snapshot = {
            let mut config = self.config.write();
            let previous_updated_at = config.updated_at;
            *config = RiskConfig::default();
            config.updated_at = config.updated_at.max(previous_updated_at);
            config.clone()
        };
        info!(
            total_capital = snapshot.total_capital,
            risk_per_trade_percent = snapshot.risk_per_trade_percent,
            "Risk configuration reset to defaults"
        );
        snapshot
    }

    /// Check a risk amount against the current configuration
    ///
    /// Tiers, first match wins:
    /// 1. above the ceiling: `Error`, invalid
    /// 2. above 80% of the configured percentage: `Warning`
    /// 3. otherwise: `Info`
    ///
    /// A NaN or infinite amount is a [`EngineError::Validation`] error.
    pub fn validate_risk(&self, risk_amount: f64) -> Result<RiskValidation> {
        if !risk_amount.is_finite() {
            return Err(EngineError::Validation(format!(
                "Risk amount must be a finite number, got {}",
                risk_amount
            )));
        }

        let (total_capital, max_allowed_risk, configured_max_percent) = {
            let config = self.config.read();
            (
                config.total_capital,
                config.max_risk_per_trade,
                config.risk_per_trade_percent,
            )
        };

        if total_capital <= 0.0 || !total_capital.is_finite() {
            warn!(total_capital, "Refusing to validate against corrupted capital");
            return Err(EngineError::InvalidConfig(format!(
                "Total capital must be positive, found {}",
                total_capital
            )));
        }

        let risk_percent_of_capital = risk_amount / total_capital * 100.0;
        let is_over_limit = risk_amount > max_allowed_risk;

        let (severity, message) = if is_over_limit {
            (
                Severity::Error,
                format!(
                    "Risk limit exceeded: risk amount ${:.2} exceeds maximum allowed ${:.2} ({:.2}% > {:.2}% of capital)",
                    risk_amount, max_allowed_risk, risk_percent_of_capital, configured_max_percent
                ),
            )
        } else if risk_percent_of_capital > configured_max_percent * WARNING_BAND_RATIO {
            (
                Severity::Warning,
                format!(
                    "High risk warning: risk amount ${:.2} is approaching the limit of ${:.2} ({:.2}% of {:.2}% max)",
                    risk_amount, max_allowed_risk, risk_percent_of_capital, configured_max_percent
                ),
            )
        } else {
            (
                Severity::Info,
                format!(
                    "Risk within limits: ${:.2} ({:.2}% of capital)",
                    risk_amount, risk_percent_of_capital
                ),
            )
        };

        debug!(risk_amount, %severity, "Validated risk amount");

        Ok(RiskValidation {
            is_valid: !is_over_limit,
            risk_amount,
            max_allowed_risk,
            risk_percent_of_capital,
            configured_max_percent,
            is_over_limit,
            severity,
            message,
        })
    }
}
