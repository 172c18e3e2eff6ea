//! Capital-based risk policy and position sizing
//!
//! # Components
//!
//! - [`RiskConfig`]: total capital, risk percentage and the derived per-trade ceiling
//! - [`RiskPolicy`]: owns the live configuration behind a read-write lock and
//!   validates risk amounts with a three-tier [`Severity`]
//! - [`PositionSizer`]: turns a risk budget and two price levels into a contract
//!   count, validated by the policy
//!
//! # Example
//!
//! ```ignore
//! let policy = Arc::new(RiskPolicy::new(RiskConfig::default()));
//! let validation = policy.validate_risk(161.0)?;
//! assert_eq!(validation.severity, Severity::Warning);
//!
//! let sizer = PositionSizer::new(policy.clone());
//! let suggestion = sizer.suggest(200.0, 10.0, 8.0)?;
//! assert_eq!(suggestion.suggested_contracts, 100);
//! ```

mod policy;
mod sizer;
mod types;

pub use policy::RiskPolicy;

pub use sizer::PositionSizer;

pub use types::{
    PositionSizeSuggestion,
    RiskConfig,
    RiskValidation,
    Severity,
    DEFAULT_RISK_PER_TRADE_PERCENT,
    DEFAULT_TOTAL_CAPITAL,
    WARNING_BAND_RATIO,
};
