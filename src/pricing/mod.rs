//! Trade pricing: decay, exit levels and trade evaluation
//!
//! # Flow
//!
//! ```text
//!  TradeInput
//!      │
//!      ▼
//!  TradeCalculator ── decay, take-profit, stop-loss (pure)
//!      │
//!      ▼
//!  TradeEvaluator ─── RiskPolicy::validate_risk(risk_amount)
//!      │
//!      ▼
//!  TradeEvaluation
//! ```
//!
//! [`evaluate_batch`] runs the evaluator over independent trades and keeps
//! going when individual trades fail.

mod batch;
mod calculator;
mod evaluator;

pub use batch::{evaluate_batch, BatchOutcome, BatchReport, BatchSlot};

pub use calculator::{TradeCalculator, TradeLevels};

pub use evaluator::{TradeEvaluation, TradeEvaluator};
