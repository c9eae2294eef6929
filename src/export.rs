// =============================================================================
// Export Payload — stable hand-off record for an external reviewer
// =============================================================================
//
// Restates a `SetupAnalysis` into a compact camelCase structure with fixed
// rounding: prices unrounded, percentages and ratios to 2 dp, RSI to 2 dp,
// %B to 3 dp, MACD histogram and ATR to 6 dp.
//
// Field names and nesting are a contract with downstream parsers; change
// them only together with the consumers.
// =============================================================================

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::benchmark::BenchmarkState;
use crate::scanner::ScanReport;
use crate::scoring::SetupAnalysis;
use crate::session::SessionInfo;
use crate::types::InstrumentSpec;

fn round_to(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor).round() / factor
}

fn scan_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenExport {
    pub symbol: String,
    pub pair: String,
    pub name: String,
    pub narratives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExport {
    pub current: String,
    pub next_open: String,
    pub mins_to_next: u32,
    pub danger_window: bool,
    pub transition_risk: bool,
}

impl From<&SessionInfo> for SessionExport {
    fn from(s: &SessionInfo) -> Self {
        Self {
            current: s.session.to_string(),
            next_open: s.next_session.to_string(),
            mins_to_next: s.mins_to_next,
            danger_window: s.in_danger_window,
            transition_risk: s.transition_risk,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkExport {
    pub symbol: String,
    pub safe: bool,
    pub change_4h: f64,
    pub price: Option<f64>,
    pub rsi_1h: Option<f64>,
}

impl From<&BenchmarkState> for BenchmarkExport {
    fn from(b: &BenchmarkState) -> Self {
        Self {
            symbol: b.symbol.clone(),
            safe: b.safe,
            change_4h: round_to(b.change_4h, 2),
            price: b.price,
            rsi_1h: b.rsi_1h.map(|r| round_to(r, 2)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceExport {
    pub current: f64,
    pub change_24h: f64,
    #[serde(rename = "vsEMA200")]
    pub vs_ema200: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdExport {
    pub histogram: f64,
    pub bullish_cross: bool,
    pub bearish_cross: bool,
    pub rising: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BollingerExport {
    pub percent_b: f64,
    pub squeeze: bool,
    pub bandwidth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorsExport {
    pub rsi_1h: Option<f64>,
    pub rsi_4h: Option<f64>,
    pub macd: Option<MacdExport>,
    pub bollinger_bands: Option<BollingerExport>,
    pub atr: Option<f64>,
    pub roc: Option<f64>,
    pub momentum_improving: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendExport {
    pub direction: &'static str,
    #[serde(rename = "ema20vsEma50")]
    pub ema20_vs_ema50: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeExport {
    pub ratio: f64,
    pub session_ratio: f64,
    pub grade: String,
    pub spike: f64,
    pub climax: bool,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FvgExport {
    pub in_zone: bool,
    pub high: f64,
    pub low: f64,
    pub mid: f64,
    pub rejection_candle: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureExport {
    pub pattern: String,
    pub bullish_candle: bool,
    pub confirmation: String,
    pub near_support: bool,
    pub supports: Vec<f64>,
    pub resistances: Vec<f64>,
    pub fvg: Option<FvgExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsianRangeExport {
    pub high: f64,
    pub low: f64,
    pub range_pct: f64,
    pub tight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepExport {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub level: f64,
    pub bullish: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupExport {
    #[serde(rename = "type")]
    pub setup_type: String,
    pub status: String,
    pub score: i32,
    pub entry: bool,
    pub rejection: Option<String>,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistExport {
    pub passed: usize,
    pub total: usize,
    pub verdict: String,
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeLevelsExport {
    pub entry: f64,
    pub stop_loss: f64,
    /// Present only when it differs from `stop_loss`.
    pub session_adjusted_stop: Option<f64>,
    pub tp1: f64,
    pub tp2: f64,
    pub risk_pct: f64,
    pub rr_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookLevelsExport {
    pub stop_loss: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub risk_pct: f64,
    pub rr_ratio: f64,
}

/// Export record for one instrument.
///
/// `instruction`, `scan_time`, `session` and `benchmark` are omitted when the
/// token is embedded in a [`BatchExport`], which carries them once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    pub token: TokenExport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionExport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchmarkExport>,
    pub price: PriceExport,
    pub indicators: IndicatorsExport,
    pub trend: Option<TrendExport>,
    pub volume: Option<VolumeExport>,
    pub structure: StructureExport,
    pub asian_range: Option<AsianRangeExport>,
    pub liquidity_sweep: Option<SweepExport>,
    pub setup: SetupExport,
    pub checklist: ChecklistExport,
    pub trade_levels: TradeLevelsExport,
    pub playbook_levels: PlaybookLevelsExport,
}

impl ExportPayload {
    /// Standalone payload for a single instrument.
    pub fn single(
        instrument: &InstrumentSpec,
        analysis: &SetupAnalysis,
        benchmark: &BenchmarkState,
        instruction: &str,
        scan_time: DateTime<Utc>,
    ) -> Self {
        Self {
            instruction: Some(instruction.to_string()),
            scan_time: Some(scan_timestamp(scan_time)),
            session: Some(SessionExport::from(&analysis.context.session)),
            benchmark: Some(BenchmarkExport::from(benchmark)),
            ..Self::token_only(instrument, analysis)
        }
    }

    /// Payload without the blocks a batch carries at top level.
    pub fn token_only(instrument: &InstrumentSpec, a: &SetupAnalysis) -> Self {
        let ctx = &a.context;

        let indicators = IndicatorsExport {
            rsi_1h: ctx.rsi_1h.map(|r| round_to(r, 2)),
            rsi_4h: ctx.rsi_4h.map(|r| round_to(r, 2)),
            macd: ctx.macd.map(|m| MacdExport {
                histogram: round_to(m.histogram, 6),
                bullish_cross: m.bullish_cross,
                bearish_cross: m.bearish_cross,
                rising: m.rising,
            }),
            bollinger_bands: ctx.bollinger.map(|b| BollingerExport {
                percent_b: round_to(b.percent_b, 3),
                squeeze: b.squeeze,
                bandwidth: round_to(b.bandwidth, 2),
            }),
            atr: ctx.atr.map(|v| round_to(v, 6)),
            roc: ctx.roc.map(|r| round_to(r.roc, 2)),
            momentum_improving: ctx.roc.is_some_and(|r| r.improving),
        };

        let structure = StructureExport {
            pattern: ctx.candle.pattern.to_string(),
            bullish_candle: ctx.candle.bullish,
            confirmation: ctx.candle.confirmation.to_string(),
            near_support: ctx.structure.near_support,
            supports: ctx.structure.supports.clone(),
            resistances: ctx.structure.resistances.clone(),
            fvg: ctx.fvg.map(|f| FvgExport {
                in_zone: f.in_zone,
                high: f.high,
                low: f.low,
                mid: f.mid,
                rejection_candle: f.rejection_candle,
            }),
        };

        let levels = &a.atr_levels;
        let trade_levels = TradeLevelsExport {
            entry: levels.entry,
            stop_loss: levels.stop_loss,
            session_adjusted_stop: (a.session_adjusted_stop != levels.stop_loss)
                .then_some(a.session_adjusted_stop),
            tp1: levels.tp1,
            tp2: levels.tp2,
            risk_pct: round_to(levels.risk_pct, 2),
            rr_ratio: round_to(levels.reward_risk, 2),
        };

        let pb = &a.playbook_levels;

        Self {
            instruction: None,
            token: TokenExport {
                symbol: instrument.base_asset().to_string(),
                pair: instrument.symbol.clone(),
                name: instrument.name.clone(),
                narratives: instrument.narratives.clone(),
            },
            scan_time: None,
            session: None,
            benchmark: None,
            price: PriceExport {
                current: ctx.price,
                change_24h: round_to(ctx.change_24h, 2),
                vs_ema200: ctx.price_vs_ema200.map(|p| round_to(p, 2)),
            },
            indicators,
            trend: ctx.trend.map(|t| TrendExport {
                direction: if t.in_uptrend { "UP" } else { "DOWN" },
                ema20_vs_ema50: round_to(t.strength_pct, 2),
            }),
            volume: ctx.volume.map(|v| VolumeExport {
                ratio: round_to(v.raw_ratio, 2),
                session_ratio: round_to(v.session_ratio, 2),
                grade: v.grade.to_string(),
                spike: round_to(v.spike, 2),
                climax: v.climax,
                context: v.context.as_str().to_string(),
            }),
            structure,
            asian_range: ctx.asian_range.map(|r| AsianRangeExport {
                high: r.high,
                low: r.low,
                range_pct: round_to(r.range_pct, 2),
                tight: r.tight,
            }),
            liquidity_sweep: ctx.sweep.map(|s| SweepExport {
                kind: s.kind.as_str().to_string(),
                label: s.label().to_string(),
                level: s.level,
                bullish: s.bullish(),
            }),
            setup: SetupExport {
                setup_type: a.setup.label().to_string(),
                status: a.status.to_string(),
                score: a.score,
                entry: a.entry,
                rejection: a.rejection.clone(),
                reasons: a.reasons.clone(),
            },
            checklist: ChecklistExport {
                passed: a.checklist.passed,
                total: a.checklist.total,
                verdict: a.checklist.verdict.to_string(),
                failed: a
                    .checklist
                    .items
                    .iter()
                    .filter(|i| !i.passed)
                    .map(|i| i.label.clone())
                    .collect(),
            },
            trade_levels,
            playbook_levels: PlaybookLevelsExport {
                stop_loss: pb.stop_loss,
                tp1: pb.tp1,
                tp2: pb.tp2,
                risk_pct: round_to(pb.risk_pct, 2),
                rr_ratio: round_to(pb.reward_risk, 2),
            },
        }
    }
}

/// Several instruments sharing one session and benchmark block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchExport {
    pub instruction: String,
    pub scan_id: String,
    pub scan_time: String,
    pub session: SessionExport,
    pub benchmark: BenchmarkExport,
    pub tokens: Vec<ExportPayload>,
}

impl BatchExport {
    /// Export the given symbols from `report`, in report order.  An empty
    /// selection exports every scored instrument.
    pub fn from_report(report: &ScanReport, instruction: &str, symbols: &[String]) -> Self {
        let tokens = report
            .results
            .iter()
            .filter(|r| symbols.is_empty() || symbols.contains(&r.instrument.symbol))
            .map(|r| ExportPayload::token_only(&r.instrument, &r.analysis))
            .collect();

        Self {
            instruction: instruction.to_string(),
            scan_id: report.scan_id.clone(),
            scan_time: scan_timestamp(report.scan_time),
            session: SessionExport::from(&report.session),
            benchmark: BenchmarkExport::from(&report.benchmark),
            tokens,
        }
    }
}
