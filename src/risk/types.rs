use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::errors::{EngineError, Result};

/// Capital used when no configuration has been saved yet
pub const DEFAULT_TOTAL_CAPITAL: f64 = 10_000.0;
/// Risk per trade (percent of capital) used when no configuration has been saved yet
pub const DEFAULT_RISK_PER_TRADE_PERCENT: f64 = 2.0;
/// Fraction of the configured percentage above which a risk is flagged as a warning
pub const WARNING_BAND_RATIO: f64 = 0.8;

/// Capital and per-trade risk configuration
///
/// `max_risk_per_trade` is derived and only ever written by [`RiskConfig::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub total_capital: f64,
    /// As a percentage (2.0 means 2%)
    #[serde(rename = "risk_per_trade_percentage", alias = "risk_per_trade_percent")]
    pub risk_per_trade_percent: f64,
    #[serde(default)]
    pub max_risk_per_trade: f64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl RiskConfig {
    /// Build a validated configuration
    pub fn new(total_capital: f64, risk_per_trade_percent: f64) -> Result<Self> {
        validate_capital(total_capital)?;
        validate_risk_percent(risk_per_trade_percent)?;

        let now = Utc::now();
        let mut config = Self {
            total_capital,
            risk_per_trade_percent,
            max_risk_per_trade: 0.0,
            created_at: now,
            updated_at: now,
        };
        config.normalize();
        Ok(config)
    }

    /// Recompute the derived ceiling and refresh `updated_at`
    ///
    /// `updated_at` never moves backwards, even if the wall clock does.
    pub fn normalize(&mut self) {
        self.max_risk_per_trade = max_risk_for(self.total_capital, self.risk_per_trade_percent);
        self.updated_at = Utc::now().max(self.updated_at);
    }

    /// Whether the derived ceiling matches capital and percentage
    pub fn is_consistent(&self) -> bool {
        let expected = max_risk_for(self.total_capital, self.risk_per_trade_percent);
        (self.max_risk_per_trade - expected).abs() <= f64::EPSILON * expected.abs().max(1.0)
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            total_capital: DEFAULT_TOTAL_CAPITAL,
            risk_per_trade_percent: DEFAULT_RISK_PER_TRADE_PERCENT,
            max_risk_per_trade: max_risk_for(DEFAULT_TOTAL_CAPITAL, DEFAULT_RISK_PER_TRADE_PERCENT),
            created_at: now,
            updated_at: now,
        }
    }
}

fn max_risk_for(total_capital: f64, risk_per_trade_percent: f64) -> f64 {
    total_capital * risk_per_trade_percent / 100.0
}

pub(crate) fn validate_capital(total_capital: f64) -> Result<()> {
    if !total_capital.is_finite() || total_capital <= 0.0 {
        return Err(EngineError::InvalidConfig(
            "Total capital must be positive".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_risk_percent(percent: f64) -> Result<()> {
    if !percent.is_finite() || percent <= 0.0 || percent > 100.0 {
        return Err(EngineError::InvalidConfig(
            "Risk percentage must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

/// Severity tier of a risk validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Outcome of checking a risk amount against the current configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskValidation {
    pub is_valid: bool,
    pub risk_amount: f64,
    pub max_allowed_risk: f64,
    #[serde(rename = "risk_percentage_of_capital")]
    pub risk_percent_of_capital: f64,
    #[serde(rename = "configured_max_percentage")]
    pub configured_max_percent: f64,
    pub is_over_limit: bool,
    pub severity: Severity,
    #[serde(rename = "warning_message")]
    pub message: String,
}

/// Suggested contract count for a risk budget and two price levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSizeSuggestion {
    pub suggested_contracts: u64,
    #[serde(rename = "risk_per_option")]
    pub risk_per_contract: f64,
    pub actual_risk: f64,
    pub entry_price: f64,
    pub stop_loss_price: f64,
    pub total_capital: f64,
    pub max_allowed_risk: f64,
    #[serde(rename = "risk_validation")]
    pub validation: RiskValidation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RiskConfig::default();
        assert_eq!(config.total_capital, 10_000.0);
        assert_eq!(config.risk_per_trade_percent, 2.0);
        assert_eq!(config.max_risk_per_trade, 200.0);
        assert!(config.is_consistent());
    }

    #[test]
    fn test_new_rejects_out_of_range_values() {
        assert!(RiskConfig::new(0.0, 2.0).is_err());
        assert!(RiskConfig::new(-5.0, 2.0).is_err());
        assert!(RiskConfig::new(1000.0, 0.0).is_err());
        assert!(RiskConfig::new(1000.0, 100.5).is_err());
        assert!(RiskConfig::new(f64::NAN, 2.0).is_err());
        assert!(RiskConfig::new(1000.0, 100.0).is_ok());
    }

    #[test]
    fn test_normalize_restores_derived_ceiling() {
        let mut config = RiskConfig::default();
        config.max_risk_per_trade = 1.0;
        config.total_capital = 15_000.0;
        config.risk_per_trade_percent = 1.5;
        let before = config.updated_at;

        config.normalize();

        assert_eq!(config.max_risk_per_trade, 225.0);
        assert!(config.is_consistent());
        assert!(config.updated_at >= before);
    }

    #[test]
    fn test_config_fills_derived_fields_on_load() {
        let json = r#"{"total_capital": 5000.0, "risk_per_trade_percentage": 1.0}"#;
        let mut config: RiskConfig = serde_json::from_str(json).unwrap();
        config.normalize();
        assert_eq!(config.risk_per_trade_percent, 1.0);
        assert_eq!(config.max_risk_per_trade, 50.0);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
