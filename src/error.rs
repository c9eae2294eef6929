// =============================================================================
// Boundary errors
// =============================================================================
//
// The analysis core never fails on short history (it returns `None`).  These
// errors are raised only where raw candle data enters the crate, so malformed
// input is rejected loudly instead of being scored.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("malformed kline at index {index}: {reason}")]
    MalformedKline { index: usize, reason: String },

    #[error("non-monotonic open time at index {index}: {previous} followed by {current}")]
    NonMonotonic {
        index: usize,
        previous: i64,
        current: i64,
    },

    #[error("inconsistent candle at index {index}: {reason}")]
    InconsistentCandle { index: usize, reason: String },

    #[error("benchmark {0} missing from snapshot")]
    MissingBenchmark(String),

    #[error("instrument {symbol}: {source}")]
    Instrument {
        symbol: String,
        #[source]
        source: Box<ScanError>,
    },
}

impl ScanError {
    /// Attach the instrument symbol to an error raised while validating its
    /// candles.
    pub fn for_symbol(self, symbol: impl Into<String>) -> Self {
        ScanError::Instrument {
            symbol: symbol.into(),
            source: Box::new(self),
        }
    }
}
