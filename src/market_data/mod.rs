pub mod candle;
pub mod snapshot;

// Re-export the Candle struct for convenient access (e.g. `use crate::market_data::Candle`).
pub use candle::{closes, parse_kline, parse_klines, validate_series, volumes, Candle};
pub use snapshot::{InstrumentCandles, MarketSnapshot, RawInstrumentCandles};
