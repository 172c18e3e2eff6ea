use serde::Serialize;
use tracing::{info, warn};

use crate::common::errors::Result;
use crate::common::types::TradeInput;
use crate::pricing::evaluator::{TradeEvaluation, TradeEvaluator};

/// Result for one position in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSlot {
    pub index: usize,
    pub outcome: BatchOutcome,
}

/// Per-trade outcome of a batch run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Evaluated {
        input: TradeInput,
        evaluation: TradeEvaluation,
    },
    Failed {
        error: String,
    },
}

/// Summary of a batch evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
    pub slots: Vec<BatchSlot>,
}

impl BatchReport {
    /// Successful slots in input order
    pub fn evaluated(&self) -> impl Iterator<Item = (usize, &TradeInput, &TradeEvaluation)> + '_ {
        self.slots.iter().filter_map(|slot| match &slot.outcome {
            BatchOutcome::Evaluated { input, evaluation } => Some((slot.index, input, evaluation)),
            BatchOutcome::Failed { .. } => None,
        })
    }

    /// Failed slots in input order
    pub fn failures(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.slots.iter().filter_map(|slot| match &slot.outcome {
            BatchOutcome::Failed { error } => Some((slot.index, error.as_str())),
            BatchOutcome::Evaluated { .. } => None,
        })
    }
}

/// Evaluate independently parsed trades
///
/// Each item is either a parsed input or the error produced while parsing it.
/// A failure stays in its own slot; the batch always runs to completion.
pub fn evaluate_batch<I>(evaluator: &TradeEvaluator, items: I) -> BatchReport
where
    I: IntoIterator<Item = Result<TradeInput>>,
{
    let mut report = BatchReport::default();

    for (index, item) in items.into_iter().enumerate() {
        let outcome = match item.and_then(|input| {
            evaluator
                .evaluate(&input)
                .map(|evaluation| (input, evaluation))
        }) {
            Ok((input, evaluation)) => {
                report.processed += 1;
                BatchOutcome::Evaluated { input, evaluation }
            }
            Err(e) => {
                warn!(trade_index = index, error = %e, "Trade in batch failed");
                report.failed += 1;
                BatchOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        report.slots.push(BatchSlot { index, outcome });
    }

    info!(
        processed = report.processed,
        failed = report.failed,
        "Batch evaluation complete"
    );
    report
}
