use serde::{Deserialize, Serialize};

use crate::error::ScanError;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV candle for one time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket open time, milliseconds since the Unix epoch (UTC).
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Absolute body size.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Closing prices, index-aligned with `candles`.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Volumes, index-aligned with `candles`.
pub fn volumes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.volume).collect()
}

// ---------------------------------------------------------------------------
// Kline parsing
// ---------------------------------------------------------------------------

/// Parse one exchange kline tuple:
/// `[openTime, "open", "high", "low", "close", "volume", ...]`.
///
/// Numeric fields may be JSON strings or numbers.  Trailing fields (close
/// time, quote volume, trade count, ...) are ignored.
pub fn parse_kline(index: usize, row: &serde_json::Value) -> Result<Candle, ScanError> {
    let fields = row.as_array().ok_or_else(|| ScanError::MalformedKline {
        index,
        reason: "expected a JSON array".to_string(),
    })?;

    if fields.len() < 6 {
        return Err(ScanError::MalformedKline {
            index,
            reason: format!("expected at least 6 fields, got {}", fields.len()),
        });
    }

    let open_time = match &fields[0] {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ScanError::MalformedKline {
        index,
        reason: "open time is not an integer".to_string(),
    })?;

    Ok(Candle {
        open_time,
        open: parse_string_f64(index, &fields[1], "open")?,
        high: parse_string_f64(index, &fields[2], "high")?,
        low: parse_string_f64(index, &fields[3], "low")?,
        close: parse_string_f64(index, &fields[4], "close")?,
        volume: parse_string_f64(index, &fields[5], "volume")?,
    })
}

/// Parse and validate a whole kline array (oldest first).
pub fn parse_klines(rows: &[serde_json::Value]) -> Result<Vec<Candle>, ScanError> {
    let candles = rows
        .iter()
        .enumerate()
        .map(|(i, row)| parse_kline(i, row))
        .collect::<Result<Vec<_>, _>>()?;
    validate_series(&candles)?;
    Ok(candles)
}

/// Exchanges send numeric values as JSON strings inside kline rows.
fn parse_string_f64(index: usize, val: &serde_json::Value, name: &str) -> Result<f64, ScanError> {
    let parsed = match val {
        serde_json::Value::String(s) => s.parse::<f64>().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| ScanError::MalformedKline {
        index,
        reason: format!("field {name} is not numeric: {val}"),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject sequences the analysis core is not entitled to score: non-finite
/// values, `high < low`, negative volume, or open times that do not strictly
/// increase.
pub fn validate_series(candles: &[Candle]) -> Result<(), ScanError> {
    for (i, c) in candles.iter().enumerate() {
        let values = [c.open, c.high, c.low, c.close, c.volume];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ScanError::InconsistentCandle {
                index: i,
                reason: "non-finite value".to_string(),
            });
        }
        if c.high < c.low {
            return Err(ScanError::InconsistentCandle {
                index: i,
                reason: format!("high {} below low {}", c.high, c.low),
            });
        }
        if c.volume < 0.0 {
            return Err(ScanError::InconsistentCandle {
                index: i,
                reason: format!("negative volume {}", c.volume),
            });
        }
        if i > 0 && c.open_time <= candles[i - 1].open_time {
            return Err(ScanError::NonMonotonic {
                index: i,
                previous: candles[i - 1].open_time,
                current: c.open_time,
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candle(open_time: i64, close: f64) -> Candle {
        Candle {
            open_time,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 100.0,
        }
    }

    #[test]
    fn parse_exchange_tuple_with_string_fields() {
        let row = json!([
            1700000000000i64,
            "37000.00",
            "37050.00",
            "36990.00",
            "37020.00",
            "123.456",
            1700003599999i64,
            "4567890.12",
            1500,
            "60.123",
            "2224455.66",
            "0"
        ]);
        let c = parse_kline(0, &row).expect("should parse");
        assert_eq!(c.open_time, 1_700_000_000_000);
        assert!((c.close - 37020.0).abs() < f64::EPSILON);
        assert!((c.volume - 123.456).abs() < 1e-9);
    }

    #[test]
    fn parse_numeric_fields() {
        let row = json!([0, 1.0, 2.0, 0.5, 1.5, 10]);
        let c = parse_kline(0, &row).unwrap();
        assert!((c.high - 2.0).abs() < f64::EPSILON);
        assert!((c.volume - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_rejects_short_row() {
        let row = json!([0, "1", "2"]);
        let err = parse_kline(3, &row).unwrap_err();
        assert!(matches!(err, ScanError::MalformedKline { index: 3, .. }));
    }

    #[test]
    fn parse_rejects_non_numeric_field() {
        let row = json!([0, "1", "abc", "0.5", "1", "1"]);
        assert!(parse_kline(0, &row).is_err());
    }

    #[test]
    fn parse_klines_rejects_non_monotonic_times() {
        let rows = vec![
            json!([2000, "1", "2", "0.5", "1.5", "1"]),
            json!([1000, "1", "2", "0.5", "1.5", "1"]),
        ];
        let err = parse_klines(&rows).unwrap_err();
        assert_eq!(
            err,
            ScanError::NonMonotonic {
                index: 1,
                previous: 2000,
                current: 1000
            }
        );
    }

    #[test]
    fn validate_rejects_high_below_low() {
        let mut c = candle(0, 100.0);
        c.high = 90.0;
        assert!(matches!(
            validate_series(&[c]),
            Err(ScanError::InconsistentCandle { index: 0, .. })
        ));
    }

    #[test]
    fn validate_accepts_increasing_series() {
        let candles: Vec<Candle> = (0..10).map(|i| candle(i * 3_600_000, 100.0)).collect();
        assert!(validate_series(&candles).is_ok());
    }

    #[test]
    fn wick_and_body_geometry() {
        let c = Candle {
            open_time: 0,
            open: 100.0,
            high: 103.0,
            low: 95.0,
            close: 101.0,
            volume: 1.0,
        };
        assert!((c.body() - 1.0).abs() < 1e-12);
        assert!((c.lower_wick() - 5.0).abs() < 1e-12);
        assert!((c.upper_wick() - 2.0).abs() < 1e-12);
        assert!(c.is_bullish());
    }
}
