// =============================================================================
// Rejection Gate — hard stops checked before any additive scoring
// =============================================================================
//
// Gates, in order:
//   1. BenchmarkSafe — benchmark 4h change above -3%
//   2. NotOverbought — RSI 1h at or below 70
//   3. VolumeAlive   — session-adjusted volume not DEAD, unless a climax bar
//                      printed
//
// The first failing gate short-circuits scoring with a fixed penalty.
// =============================================================================

use tracing::debug;

use super::context::ScoringContext;
use crate::session::VolumeGrade;

/// Score assigned to every rejected instrument.
pub const REJECTED_SCORE: i32 = -50;

const OVERBOUGHT_RSI: f64 = 70.0;

pub struct RejectionGate;

impl RejectionGate {
    /// Returns `None` if every gate passes, or `Some(reason)` for the first
    /// one that blocks.
    pub fn check(ctx: &ScoringContext) -> Option<String> {
        // Gate 1: benchmark risk-off
        if !ctx.benchmark_safe {
            return Some(format!(
                "Benchmark risk-off ({:.1}% on 4H)",
                ctx.benchmark_change_4h
            ));
        }

        // Gate 2: overbought
        if let Some(rsi) = ctx.rsi_1h.filter(|r| *r > OVERBOUGHT_RSI) {
            return Some(format!("RSI 1H overbought ({rsi:.1})"));
        }

        // Gate 3: dead volume with no climax
        if let Some(v) = ctx.volume {
            if v.grade == VolumeGrade::Dead && !v.climax {
                return Some(format!(
                    "Dead volume for the {} session ({:.2}x adjusted), no climax",
                    ctx.session.session, v.session_ratio
                ));
            }
        }

        debug!("all rejection gates passed");
        None
    }
}
