// =============================================================================
// Playbook Scanner — rule-based spot setup scoring over OHLCV candles
// =============================================================================
//
// Candles enter through `market_data`, get reduced to indicator and structure
// readings, and are scored by an ordered rule list with a rejection gate in
// front.  `scanner` runs the whole roster; `export` restates results as the
// hand-off payload.
// =============================================================================

pub mod benchmark;
pub mod error;
pub mod export;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod scanner;
pub mod scoring;
pub mod session;
pub mod structure;
pub mod types;

pub use benchmark::BenchmarkState;
pub use error::ScanError;
pub use export::{BatchExport, ExportPayload};
pub use market_data::{Candle, InstrumentCandles, MarketSnapshot};
pub use runtime_config::ScannerConfig;
pub use scanner::{ScanReport, Scanner};
pub use scoring::{analyze, analyze_with_clock, SetupAnalysis, TradeLevels};
pub use session::{Clock, FixedClock, SystemClock};
pub use types::{InstrumentSpec, SetupStatus, SetupType};
