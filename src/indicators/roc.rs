// =============================================================================
// Rate of Change (ROC) — Momentum Indicator
// =============================================================================
//
// ROC measures the percentage change in price over a look-back period:
//   ROC = ((close - close_n) / close_n) * 100
//
// The playbook compares the current ROC with the ROC measured five bars
// earlier: momentum is "improving" when it has picked up but is still below
// 5% (not yet extended).

use serde::{Deserialize, Serialize};

/// Bars between the current and prior ROC readings.
const PRIOR_OFFSET: usize = 5;
/// ROC at or above this is already extended, not improving.
const EXTENDED_ROC: f64 = 5.0;

/// Calculate the Rate of Change (ROC) for the given closing prices and period.
///
/// Returns a vector of ROC values, one per close starting at index `period`.
pub fn calculate_roc(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() <= period {
        return Vec::new();
    }

    closes
        .iter()
        .skip(period)
        .zip(closes.iter())
        .map(|(&cur, &prev)| if prev == 0.0 { 0.0 } else { (cur - prev) / prev * 100.0 })
        .collect()
}

/// Current vs prior ROC reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocMomentum {
    pub roc: f64,
    pub prior_roc: f64,
    /// `roc > prior_roc && roc < 5`
    pub improving: bool,
}

/// Compare the latest ROC with the ROC five bars earlier.
///
/// Returns `None` until both readings exist (`period + 6` closes).
pub fn roc_momentum(closes: &[f64], period: usize) -> Option<RocMomentum> {
    let series = calculate_roc(closes, period);
    if series.len() <= PRIOR_OFFSET {
        return None;
    }

    let roc = series[series.len() - 1];
    let prior_roc = series[series.len() - 1 - PRIOR_OFFSET];

    Some(RocMomentum {
        roc,
        prior_roc,
        improving: roc > prior_roc && roc < EXTENDED_ROC,
    })
}
