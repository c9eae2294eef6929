use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::candle::{parse_klines, Candle};
use crate::error::ScanError;

/// Raw kline arrays for one instrument, exactly as the data collaborator
/// delivered them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInstrumentCandles {
    #[serde(default)]
    pub candles_1h: Vec<serde_json::Value>,
    #[serde(default)]
    pub candles_4h: Vec<serde_json::Value>,
}

/// A point-in-time capture of every instrument's candles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub instruments: BTreeMap<String, RawInstrumentCandles>,
}

/// Validated 1-hour and 4-hour candle sequences for a single instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentCandles {
    pub candles_1h: Vec<Candle>,
    pub candles_4h: Vec<Candle>,
}

impl InstrumentCandles {
    pub fn from_raw(raw: &RawInstrumentCandles) -> Result<Self, ScanError> {
        Ok(Self {
            candles_1h: parse_klines(&raw.candles_1h)?,
            candles_4h: parse_klines(&raw.candles_4h)?,
        })
    }
}

impl MarketSnapshot {
    /// Load a snapshot from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read market snapshot from {}", path.display()))?;

        let snapshot: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse market snapshot from {}", path.display()))?;

        info!(
            path = %path.display(),
            instruments = snapshot.instruments.len(),
            "market snapshot loaded"
        );

        Ok(snapshot)
    }

    /// Parse and validate the candles for `symbol`.
    ///
    /// Returns `Ok(None)` when the symbol is absent from the snapshot, and an
    /// error tagged with the symbol when its rows are malformed.
    pub fn instrument(&self, symbol: &str) -> Result<Option<InstrumentCandles>, ScanError> {
        match self.instruments.get(symbol) {
            Some(raw) => InstrumentCandles::from_raw(raw)
                .map(Some)
                .map_err(|e| e.for_symbol(symbol)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_parses_and_validates_instrument() {
        let json = r#"{
            "instruments": {
                "ETHUSDT": {
                    "candles_1h": [
                        [0, "1", "2", "0.5", "1.5", "10"],
                        [3600000, "1.5", "2", "1", "1.8", "12"]
                    ],
                    "candles_4h": [[0, "1", "2", "0.5", "1.5", "40"]]
                }
            }
        }"#;
        let snapshot: MarketSnapshot = serde_json::from_str(json).unwrap();
        let eth = snapshot.instrument("ETHUSDT").unwrap().unwrap();
        assert_eq!(eth.candles_1h.len(), 2);
        assert_eq!(eth.candles_4h.len(), 1);
        assert!(snapshot.instrument("SOLUSDT").unwrap().is_none());
    }

    #[test]
    fn malformed_instrument_error_carries_symbol() {
        let json = r#"{
            "instruments": {
                "ETHUSDT": { "candles_1h": [[0, "x", "2", "0.5", "1.5", "10"]], "candles_4h": [] }
            }
        }"#;
        let snapshot: MarketSnapshot = serde_json::from_str(json).unwrap();
        let err = snapshot.instrument("ETHUSDT").unwrap_err();
        assert!(err.to_string().starts_with("instrument ETHUSDT:"));
    }
}
