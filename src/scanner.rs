// =============================================================================
// Batch Scanner — score the whole roster against one benchmark reading
// =============================================================================
//
// Pipeline:
//   1. Read the clock once; every instrument is scored at the same instant
//   2. Compute the benchmark state once, shared read-only
//   3. Score the roster in parallel (rayon), skipping bad or short data
//   4. Sort, shortlist, aggregate narrative heat and concentration
// =============================================================================

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::benchmark::BenchmarkState;
use crate::error::ScanError;
use crate::market_data::MarketSnapshot;
use crate::runtime_config::ScannerConfig;
use crate::scoring::{analyze, SetupAnalysis};
use crate::session::{Clock, SessionInfo};
use crate::types::{InstrumentSpec, SortKey};

/// 24h change above which a narrative member counts as pumping.
const PUMPING_CHANGE_PCT: f64 = 5.0;
const HOT_MIN_PUMPING: usize = 2;
const HOT_AVG_CHANGE_PCT: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredInstrument {
    pub instrument: InstrumentSpec,
    pub analysis: SetupAnalysis,
}

/// Aggregate 24h performance of one thematic tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeHeat {
    pub name: String,
    pub avg_change_24h: f64,
    pub pumping: usize,
    pub total: usize,
    pub hot: bool,
}

/// Too many shortlisted setups sharing one tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcentrationWarning {
    pub narrative: String,
    pub instruments: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedInstrument {
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub scan_id: String,
    pub scan_time: DateTime<Utc>,
    pub session: SessionInfo,
    pub benchmark: BenchmarkState,
    /// Scored instruments in the configured sort order.
    pub results: Vec<ScoredInstrument>,
    /// Symbols meeting the shortlist score with the benchmark safe.
    pub shortlist: Vec<String>,
    pub narrative_heat: Vec<NarrativeHeat>,
    pub concentration_warnings: Vec<ConcentrationWarning>,
    pub skipped: Vec<SkippedInstrument>,
}

impl ScanReport {
    pub fn shortlisted(&self) -> impl Iterator<Item = &ScoredInstrument> + '_ {
        self.results
            .iter()
            .filter(|r| self.shortlist.contains(&r.instrument.symbol))
    }
}

pub struct Scanner {
    config: ScannerConfig,
}

enum Outcome {
    Scored(ScoredInstrument),
    Skipped(SkippedInstrument),
}

impl Scanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Score every roster instrument found in `snapshot`.
    ///
    /// Fails only when the benchmark is absent or malformed; individual
    /// instruments with bad or short data are reported as skipped.
    pub fn scan(
        &self,
        snapshot: &MarketSnapshot,
        clock: &dyn Clock,
    ) -> Result<ScanReport, ScanError> {
        let now = clock.now();
        let bench_symbol = &self.config.benchmark.symbol;

        let bench_candles = snapshot
            .instrument(bench_symbol)?
            .ok_or_else(|| ScanError::MissingBenchmark(bench_symbol.clone()))?;
        let benchmark = BenchmarkState::from_candles(bench_symbol.clone(), &bench_candles);

        let outcomes: Vec<Outcome> = self
            .config
            .instruments
            .par_iter()
            .map(|instrument| score_one(instrument, snapshot, &benchmark, now))
            .collect();

        let mut results = Vec::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Outcome::Scored(s) => results.push(s),
                Outcome::Skipped(s) => skipped.push(s),
            }
        }

        sort_results(&mut results, self.config.sort_by);

        let shortlist: Vec<String> = results
            .iter()
            .filter(|r| is_shortlisted(&r.analysis, self.config.shortlist_min_score))
            .map(|r| r.instrument.symbol.clone())
            .collect();

        let narrative_heat = narrative_heat(&results);
        let concentration_warnings = concentration_warnings(
            &results,
            self.config.shortlist_min_score,
            self.config.concentration_min_setups,
        );

        let report = ScanReport {
            scan_id: uuid::Uuid::new_v4().to_string(),
            scan_time: now,
            session: SessionInfo::at(now),
            benchmark,
            results,
            shortlist,
            narrative_heat,
            concentration_warnings,
            skipped,
        };

        info!(
            scan_id = %report.scan_id,
            scored = report.results.len(),
            skipped = report.skipped.len(),
            shortlisted = report.shortlist.len(),
            session = %report.session.session,
            benchmark_safe = report.benchmark.safe,
            "scan complete"
        );

        Ok(report)
    }
}

fn score_one(
    instrument: &InstrumentSpec,
    snapshot: &MarketSnapshot,
    benchmark: &BenchmarkState,
    now: DateTime<Utc>,
) -> Outcome {
    let skipped = |reason: String| {
        Outcome::Skipped(SkippedInstrument {
            symbol: instrument.symbol.clone(),
            reason,
        })
    };

    match snapshot.instrument(&instrument.symbol) {
        Ok(Some(candles)) => match analyze(instrument, &candles, benchmark, now) {
            Some(analysis) => Outcome::Scored(ScoredInstrument {
                instrument: instrument.clone(),
                analysis,
            }),
            None => skipped("insufficient history".to_string()),
        },
        Ok(None) => skipped("not in snapshot".to_string()),
        Err(e) => {
            warn!(symbol = %instrument.symbol, error = %e, "skipping malformed instrument");
            skipped(e.to_string())
        }
    }
}

fn is_shortlisted(analysis: &SetupAnalysis, min_score: i32) -> bool {
    analysis.score >= min_score && analysis.context.benchmark_safe
}

/// Stable sort: score and volume and change descending, RSI ascending with
/// missing RSI last.
pub fn sort_results(results: &mut [ScoredInstrument], key: SortKey) {
    match key {
        SortKey::Score => results.sort_by(|a, b| b.analysis.score.cmp(&a.analysis.score)),
        SortKey::Rsi => results.sort_by(|a, b| {
            let rsi = |r: &ScoredInstrument| r.analysis.rsi_1h().unwrap_or(100.0);
            rsi(a).total_cmp(&rsi(b))
        }),
        SortKey::Volume => results.sort_by(|a, b| {
            b.analysis
                .volume_ratio()
                .total_cmp(&a.analysis.volume_ratio())
        }),
        SortKey::Change => results.sort_by(|a, b| {
            b.analysis
                .change_24h()
                .total_cmp(&a.analysis.change_24h())
        }),
    }
}

/// Per-tag 24h performance over every scored instrument, hottest first.
pub fn narrative_heat(results: &[ScoredInstrument]) -> Vec<NarrativeHeat> {
    let mut by_tag: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in results {
        for tag in &r.instrument.narratives {
            by_tag
                .entry(tag.as_str())
                .or_default()
                .push(r.analysis.change_24h());
        }
    }

    let mut heat: Vec<NarrativeHeat> = by_tag
        .into_iter()
        .map(|(name, changes)| {
            let avg = changes.iter().sum::<f64>() / changes.len() as f64;
            let pumping = changes.iter().filter(|c| **c > PUMPING_CHANGE_PCT).count();
            NarrativeHeat {
                name: name.to_string(),
                avg_change_24h: avg,
                pumping,
                total: changes.len(),
                hot: pumping >= HOT_MIN_PUMPING || avg > HOT_AVG_CHANGE_PCT,
            }
        })
        .collect();
    heat.sort_by(|a, b| b.avg_change_24h.total_cmp(&a.avg_change_24h));
    heat
}

/// Tags carried by at least `min_setups` shortlisted instruments.
pub fn concentration_warnings(
    results: &[ScoredInstrument],
    min_score: i32,
    min_setups: usize,
) -> Vec<ConcentrationWarning> {
    let mut by_tag: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for r in results.iter().filter(|r| is_shortlisted(&r.analysis, min_score)) {
        for tag in &r.instrument.narratives {
            by_tag
                .entry(tag.as_str())
                .or_default()
                .push(r.instrument.name.clone());
        }
    }

    by_tag
        .into_iter()
        .filter(|(_, names)| names.len() >= min_setups)
        .map(|(narrative, instruments)| ConcentrationWarning {
            narrative: narrative.to_string(),
            count: instruments.len(),
            instruments,
        })
        .collect()
}
