// =============================================================================
// Scoring Engine — one deterministic pass per instrument
// =============================================================================
//
// Pipeline:
//   1. Build the scoring context (indicators, structure, session, volume)
//   2. Rejection gate: first failing gate fixes the score at -50
//   3. Fold the ordered scoring rules
//   4. Classify the setup (A → B → C) and add its bonus
//   5. Reward:risk gate on the playbook ratio
//   6. Trade levels, session-adjusted stop and checklist
// =============================================================================

use chrono::{DateTime, Utc};
use tracing::debug;

use super::analysis::SetupAnalysis;
use super::checklist::Checklist;
use super::context::ScoringContext;
use super::gate::{RejectionGate, REJECTED_SCORE};
use super::levels::{
    atr_levels, playbook_levels, playbook_reward_risk, session_adjusted_stop, MIN_REWARD_RISK,
};
use super::rules::{apply_rules, Tally};
use super::setup::{classify, SetupACriteria, SetupInputs};
use crate::benchmark::BenchmarkState;
use crate::market_data::InstrumentCandles;
use crate::session::Clock;
use crate::types::{InstrumentSpec, SetupStatus, SetupType};

const REWARD_RISK_PENALTY: i32 = -20;

/// Score one instrument at `now`.
///
/// Returns `None` when the instrument has fewer than 50 one-hour candles or
/// no 4-hour candles.  Identical inputs always produce an identical result.
pub fn analyze(
    instrument: &InstrumentSpec,
    candles: &InstrumentCandles,
    benchmark: &BenchmarkState,
    now: DateTime<Utc>,
) -> Option<SetupAnalysis> {
    let ctx = ScoringContext::build(candles, benchmark, instrument.has_narrative(), now)?;

    let setup_a = SetupACriteria::evaluate(&ctx);
    let atr = atr_levels(ctx.price, ctx.atr, ctx.structure.nearest_support());
    let playbook = playbook_levels(ctx.price);
    let session_stop =
        session_adjusted_stop(atr.stop_loss, &ctx.session, ctx.asian_range.as_ref());
    let checklist = Checklist::evaluate(&ctx);

    let rejection = RejectionGate::check(&ctx);
    let (tally, setup, status) = match &rejection {
        Some(reason) => {
            debug!(symbol = %instrument.symbol, reason = %reason, "instrument rejected");
            let mut tally = Tally::default();
            tally.push("rejection_gate", REJECTED_SCORE, reason.clone());
            (tally, SetupType::None, SetupStatus::Rejected)
        }
        None => {
            let mut tally = apply_rules(&ctx);
            let decision = classify(&SetupInputs::from_context(&ctx, tally.score));
            if let Some(reason) = decision.reason {
                tally.push("setup", decision.bonus, reason);
            }

            if let Some((delta, reason)) =
                reward_risk_penalty(decision.setup, playbook_reward_risk())
            {
                tally.push("reward_risk", delta, reason);
            }
            (tally, decision.setup, decision.status)
        }
    };

    let entry = rejection.is_none() && !setup.is_none() && ctx.benchmark_safe;

    debug!(
        symbol = %instrument.symbol,
        score = tally.score,
        setup = %setup,
        status = %status,
        session = %ctx.session.session,
        "instrument scored"
    );

    Some(SetupAnalysis {
        symbol: instrument.symbol.clone(),
        score: tally.score,
        reasons: tally.reasons(),
        contributions: tally.contributions,
        rejection,
        setup,
        status,
        setup_a,
        atr_levels: atr,
        playbook_levels: playbook,
        session_adjusted_stop: session_stop,
        checklist,
        entry,
        context: ctx,
    })
}

/// Penalty for a classified setup whose reward:risk is under the minimum.
/// The classification itself stands.
pub fn reward_risk_penalty(setup: SetupType, reward_risk: f64) -> Option<(i32, String)> {
    if setup.is_none() || reward_risk >= MIN_REWARD_RISK {
        return None;
    }
    Some((
        REWARD_RISK_PENALTY,
        format!("R:R {reward_risk:.2} below {MIN_REWARD_RISK:.1}, setup penalised"),
    ))
}

/// [`analyze`] with the time taken from `clock`.
pub fn analyze_with_clock(
    instrument: &InstrumentSpec,
    candles: &InstrumentCandles,
    benchmark: &BenchmarkState,
    clock: &dyn Clock,
) -> Option<SetupAnalysis> {
    analyze(instrument, candles, benchmark, clock.now())
}
