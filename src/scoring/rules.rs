// =============================================================================
// Scoring Rules — ordered, independent, pure
// =============================================================================
//
// Each rule reads the context and either abstains or returns a signed delta
// with the reason text shown to the user.  `apply_rules` folds them left to
// right, so the reason list always comes out in table order.

use serde::{Deserialize, Serialize};

use super::context::ScoringContext;
use crate::session::VolumeContext;
use crate::structure::CandlePattern;
use crate::types::Confirmation;

/// One rule's effect on the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub rule: String,
    pub delta: i32,
    pub reason: String,
}

/// A named pure scoring rule.
pub struct ScoringRule {
    pub name: &'static str,
    pub eval: fn(&ScoringContext) -> Option<(i32, String)>,
}

/// Running total plus the contributions that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub score: i32,
    pub contributions: Vec<Contribution>,
}

impl Tally {
    pub fn push(&mut self, rule: &str, delta: i32, reason: String) {
        self.score += delta;
        self.contributions.push(Contribution {
            rule: rule.to_string(),
            delta,
            reason,
        });
    }

    pub fn reasons(&self) -> Vec<String> {
        self.contributions
            .iter()
            .map(|c| c.reason.clone())
            .collect()
    }
}

pub const RULES: &[ScoringRule] = &[
    ScoringRule {
        name: "rsi_zone",
        eval: rsi_zone,
    },
    ScoringRule {
        name: "rsi_alignment",
        eval: rsi_alignment,
    },
    ScoringRule {
        name: "near_support",
        eval: near_support,
    },
    ScoringRule {
        name: "near_ema200",
        eval: near_ema200,
    },
    ScoringRule {
        name: "session_volume",
        eval: session_volume,
    },
    ScoringRule {
        name: "volume_climax",
        eval: volume_climax,
    },
    ScoringRule {
        name: "candle_pattern",
        eval: candle_pattern,
    },
    ScoringRule {
        name: "fvg_reclaim",
        eval: fvg_reclaim,
    },
    ScoringRule {
        name: "macd_momentum",
        eval: macd_momentum,
    },
    ScoringRule {
        name: "macd_bearish_cross",
        eval: macd_bearish_cross,
    },
    ScoringRule {
        name: "trend_dip",
        eval: trend_dip,
    },
    ScoringRule {
        name: "bollinger_lower",
        eval: bollinger_lower,
    },
    ScoringRule {
        name: "bollinger_squeeze",
        eval: bollinger_squeeze,
    },
    ScoringRule {
        name: "bollinger_upper",
        eval: bollinger_upper,
    },
    ScoringRule {
        name: "roc_momentum",
        eval: roc_momentum,
    },
    ScoringRule {
        name: "liquidity_sweep",
        eval: liquidity_sweep,
    },
    ScoringRule {
        name: "session_transition",
        eval: session_transition,
    },
    ScoringRule {
        name: "asian_range",
        eval: asian_range,
    },
];

/// Fold every rule over `ctx`, in order.
pub fn apply_rules(ctx: &ScoringContext) -> Tally {
    RULES.iter().fold(Tally::default(), |mut tally, rule| {
        if let Some((delta, reason)) = (rule.eval)(ctx) {
            tally.push(rule.name, delta, reason);
        }
        tally
    })
}

// ---------------------------------------------------------------------------
// RSI
// ---------------------------------------------------------------------------

fn rsi_zone(ctx: &ScoringContext) -> Option<(i32, String)> {
    let rsi = ctx.rsi_1h?;
    if (30.0..=40.0).contains(&rsi) {
        Some((30, format!("RSI 1H in primary zone ({rsi:.1})")))
    } else if rsi > 40.0 && rsi <= 50.0 {
        Some((15, format!("RSI 1H neutral ({rsi:.1})")))
    } else if rsi < 30.0 {
        Some((20, format!("RSI 1H deeply oversold ({rsi:.1})")))
    } else if rsi > 70.0 {
        Some((-20, format!("RSI 1H overbought ({rsi:.1})")))
    } else {
        None
    }
}

fn rsi_alignment(ctx: &ScoringContext) -> Option<(i32, String)> {
    let (r1, r4) = (ctx.rsi_1h?, ctx.rsi_4h?);
    if r1 < 40.0 && r4 < 40.0 {
        Some((15, format!("RSI aligned oversold (4H: {r4:.0})")))
    } else if r1 > 65.0 && r4 > 65.0 {
        Some((-15, format!("RSI aligned overbought (4H: {r4:.0})")))
    } else if (r1 < 40.0 && r4 > 60.0) || (r1 > 60.0 && r4 < 40.0) {
        Some((-5, format!("RSI timeframe divergence (4H: {r4:.0})")))
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

fn near_support(ctx: &ScoringContext) -> Option<(i32, String)> {
    ctx.structure
        .near_support
        .then(|| (20, "Price near key support level".to_string()))
}

fn near_ema200(ctx: &ScoringContext) -> Option<(i32, String)> {
    let pct = ctx.price_vs_ema200?;
    (pct > -2.0 && pct < 2.0).then(|| (10, format!("Near 200 EMA ({pct:+.1}%)")))
}

// ---------------------------------------------------------------------------
// Volume
// ---------------------------------------------------------------------------

fn session_volume(ctx: &ScoringContext) -> Option<(i32, String)> {
    let v = ctx.volume?;
    Some((
        v.grade.score(),
        format!(
            "{} ({:.2}x, {} adjusted)",
            v.grade.note(),
            v.session_ratio,
            ctx.session.session
        ),
    ))
}

fn volume_climax(ctx: &ScoringContext) -> Option<(i32, String)> {
    match ctx.volume?.context {
        VolumeContext::Accumulation => {
            Some((10, "Volume climax at support, accumulation".to_string()))
        }
        VolumeContext::Distribution => {
            Some((-5, "Volume climax at resistance, distribution risk".to_string()))
        }
        VolumeContext::Spike | VolumeContext::Normal => None,
    }
}

// ---------------------------------------------------------------------------
// Price action
// ---------------------------------------------------------------------------

fn candle_pattern(ctx: &ScoringContext) -> Option<(i32, String)> {
    let c = &ctx.candle;
    let name = c.pattern.name();
    match (c.bullish, c.confirmation) {
        (true, Confirmation::High) if ctx.structure.near_support => {
            Some((15, format!("{name} at support (confirmed)")))
        }
        (true, Confirmation::High) => Some((10, format!("{name} (confirmed)"))),
        (true, _) if c.pattern == CandlePattern::GreenCandle => {
            Some((5, format!("{name} (unconfirmed)")))
        }
        (false, Confirmation::High) => Some((-5, format!("{name}, bearish reversal"))),
        _ => None,
    }
}

fn fvg_reclaim(ctx: &ScoringContext) -> Option<(i32, String)> {
    let fvg = ctx.fvg?;
    if !fvg.in_zone || !ctx.rsi_below(50.0) {
        return None;
    }
    if fvg.rejection_candle {
        Some((20, "Price in FVG reclaim zone with rejection candle".to_string()))
    } else {
        Some((10, "Price in FVG reclaim zone, no rejection yet".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Momentum
// ---------------------------------------------------------------------------

fn macd_momentum(ctx: &ScoringContext) -> Option<(i32, String)> {
    let m = ctx.macd?;
    if m.bullish_cross {
        Some((15, "MACD bullish crossover".to_string()))
    } else if m.rising && m.histogram < 0.0 {
        Some((5, "MACD momentum improving".to_string()))
    } else {
        None
    }
}

fn macd_bearish_cross(ctx: &ScoringContext) -> Option<(i32, String)> {
    ctx.macd?
        .bearish_cross
        .then(|| (-10, "MACD bearish crossover".to_string()))
}

fn trend_dip(ctx: &ScoringContext) -> Option<(i32, String)> {
    let t = ctx.trend?;
    if t.in_uptrend && ctx.rsi_below(45.0) {
        Some((
            10,
            format!("Dip in uptrend (EMA20 > EMA50 by {:.1}%)", t.strength_pct),
        ))
    } else if !t.in_uptrend && ctx.rsi_below(40.0) {
        Some((-10, "Dip in downtrend, catching knife risk".to_string()))
    } else {
        None
    }
}

fn bollinger_lower(ctx: &ScoringContext) -> Option<(i32, String)> {
    let bb = ctx.bollinger?;
    if bb.percent_b < 0.15 && ctx.rsi_below(40.0) {
        Some((15, "Price at lower Bollinger Band + RSI oversold".to_string()))
    } else if bb.percent_b < 0.2 {
        Some((5, "Near lower Bollinger Band".to_string()))
    } else {
        None
    }
}

fn bollinger_squeeze(ctx: &ScoringContext) -> Option<(i32, String)> {
    ctx.bollinger?
        .squeeze
        .then(|| (5, "Bollinger squeeze, breakout imminent".to_string()))
}

fn bollinger_upper(ctx: &ScoringContext) -> Option<(i32, String)> {
    let bb = ctx.bollinger?;
    let rsi_high = ctx.rsi_1h.is_some_and(|r| r > 65.0);
    (bb.percent_b > 0.95 && rsi_high)
        .then(|| (-10, "At upper BB + RSI high, overextended".to_string()))
}

fn roc_momentum(ctx: &ScoringContext) -> Option<(i32, String)> {
    let roc = ctx.roc?;
    if roc.improving && ctx.rsi_below(55.0) {
        Some((10, format!("Momentum improving (ROC: {:.1}%)", roc.roc)))
    } else if roc.roc < -8.0 {
        Some((-5, format!("Momentum deteriorating (ROC: {:.1}%)", roc.roc)))
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Session & liquidity
// ---------------------------------------------------------------------------

fn liquidity_sweep(ctx: &ScoringContext) -> Option<(i32, String)> {
    let sweep = ctx.sweep?;
    let delta = if sweep.bullish() { 15 } else { -15 };
    Some((delta, format!("Liquidity sweep: {}", sweep.label())))
}

fn session_transition(ctx: &ScoringContext) -> Option<(i32, String)> {
    let s = &ctx.session;
    s.transition_risk.then(|| {
        (
            -10,
            format!(
                "Session risk: {} open in {}min, stop hunt likely",
                s.next_session, s.mins_to_next
            ),
        )
    })
}

fn asian_range(ctx: &ScoringContext) -> Option<(i32, String)> {
    let range = ctx.asian_range?;
    (range.tight && ctx.session.in_asian).then(|| {
        (
            0,
            format!(
                "Asian range tight ({:.2}%), big move expected at session open",
                range.range_pct
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::super::context::fixtures::neutral;
    use super::*;
    use crate::indicators::{BollingerState, MacdState, RocMomentum, TrendState};
    use crate::session::{AsianRange, LiquiditySweep, SessionInfo, SweepKind};
    use crate::structure::{CandleSignal, FairValueGap};

    fn delta_of(tally: &Tally, rule: &str) -> Option<i32> {
        tally
            .contributions
            .iter()
            .find(|c| c.rule == rule)
            .map(|c| c.delta)
    }

    #[test]
    fn neutral_context_only_reports_volume() {
        let tally = apply_rules(&neutral());
        assert_eq!(tally.score, 0);
        assert_eq!(tally.contributions.len(), 1);
        assert_eq!(tally.contributions[0].rule, "session_volume");
    }

    #[test]
    fn score_is_sum_of_deltas_in_rule_order() {
        let mut ctx = neutral();
        ctx.rsi_1h = Some(35.0);
        ctx.rsi_4h = Some(38.0);
        ctx.structure.near_support = true;
        let tally = apply_rules(&ctx);
        assert_eq!(delta_of(&tally, "rsi_zone"), Some(30));
        assert_eq!(delta_of(&tally, "rsi_alignment"), Some(15));
        assert_eq!(delta_of(&tally, "near_support"), Some(20));
        assert_eq!(tally.score, tally.contributions.iter().map(|c| c.delta).sum::<i32>());

        let order: Vec<&str> = tally
            .contributions
            .iter()
            .map(|c| c.rule.as_str())
            .collect();
        let table: Vec<&str> = RULES
            .iter()
            .map(|r| r.name)
            .filter(|n| order.contains(n))
            .collect();
        assert_eq!(order, table);
    }

    #[test]
    fn rsi_zone_bands() {
        let mut ctx = neutral();
        let bands = [
            (30.0, Some(30)),
            (40.0, Some(30)),
            (45.0, Some(15)),
            (29.9, Some(20)),
            (71.0, Some(-20)),
            (60.0, None),
        ];
        for (rsi, expected) in bands {
            ctx.rsi_1h = Some(rsi);
            assert_eq!(rsi_zone(&ctx).map(|(d, _)| d), expected, "rsi {rsi}");
        }
        ctx.rsi_1h = None;
        assert!(rsi_zone(&ctx).is_none());
    }

    #[test]
    fn rsi_divergence_penalised() {
        let mut ctx = neutral();
        ctx.rsi_1h = Some(35.0);
        ctx.rsi_4h = Some(62.0);
        assert_eq!(rsi_alignment(&ctx).map(|(d, _)| d), Some(-5));
    }

    #[test]
    fn candle_scoring_depends_on_confirmation_and_support() {
        let mut ctx = neutral();
        ctx.candle = CandleSignal {
            pattern: CandlePattern::Hammer,
            bullish: true,
            confirmation: Confirmation::High,
        };
        assert_eq!(candle_pattern(&ctx).map(|(d, _)| d), Some(10));
        ctx.structure.near_support = true;
        assert_eq!(candle_pattern(&ctx).map(|(d, _)| d), Some(15));

        ctx.candle = CandleSignal {
            pattern: CandlePattern::GreenCandle,
            bullish: true,
            confirmation: Confirmation::Low,
        };
        assert_eq!(candle_pattern(&ctx).map(|(d, _)| d), Some(5));

        ctx.candle = CandleSignal {
            pattern: CandlePattern::ShootingStar,
            bullish: false,
            confirmation: Confirmation::High,
        };
        assert_eq!(candle_pattern(&ctx).map(|(d, _)| d), Some(-5));
    }

    #[test]
    fn fvg_reclaim_rewards_rejection() {
        let mut ctx = neutral();
        ctx.rsi_1h = Some(45.0);
        ctx.fvg = Some(FairValueGap {
            low: 99.0,
            high: 101.0,
            mid: 100.0,
            in_zone: true,
            rejection_candle: false,
        });
        assert_eq!(fvg_reclaim(&ctx).map(|(d, _)| d), Some(10));
        ctx.fvg.as_mut().unwrap().rejection_candle = true;
        assert_eq!(fvg_reclaim(&ctx).map(|(d, _)| d), Some(20));
        ctx.rsi_1h = Some(50.0);
        assert!(fvg_reclaim(&ctx).is_none());
    }

    #[test]
    fn macd_cross_and_momentum() {
        let mut ctx = neutral();
        let base = MacdState {
            macd: -0.1,
            signal: -0.05,
            histogram: -0.05,
            prev_histogram: -0.08,
            bullish_cross: false,
            bearish_cross: false,
            rising: true,
        };
        ctx.macd = Some(base);
        assert_eq!(macd_momentum(&ctx).map(|(d, _)| d), Some(5));
        ctx.macd = Some(MacdState {
            bullish_cross: true,
            histogram: 0.01,
            ..base
        });
        assert_eq!(macd_momentum(&ctx).map(|(d, _)| d), Some(15));
        ctx.macd = Some(MacdState {
            bearish_cross: true,
            rising: false,
            ..base
        });
        assert_eq!(macd_bearish_cross(&ctx).map(|(d, _)| d), Some(-10));
        assert!(macd_momentum(&ctx).is_none());
    }

    #[test]
    fn trend_and_bollinger() {
        let mut ctx = neutral();
        ctx.rsi_1h = Some(38.0);
        ctx.trend = Some(TrendState {
            ema20: 101.0,
            ema50: 100.0,
            in_uptrend: true,
            strength_pct: 1.0,
        });
        assert_eq!(trend_dip(&ctx).map(|(d, _)| d), Some(10));
        ctx.trend = Some(TrendState {
            ema20: 99.0,
            ema50: 100.0,
            in_uptrend: false,
            strength_pct: -1.0,
        });
        assert_eq!(trend_dip(&ctx).map(|(d, _)| d), Some(-10));

        let bb = BollingerState {
            upper: 104.0,
            mean: 100.0,
            lower: 96.0,
            bandwidth: 8.0,
            percent_b: 0.1,
            avg_bandwidth: 12.0,
            squeeze: true,
        };
        ctx.bollinger = Some(bb);
        assert_eq!(bollinger_lower(&ctx).map(|(d, _)| d), Some(15));
        assert_eq!(bollinger_squeeze(&ctx).map(|(d, _)| d), Some(5));
        ctx.rsi_1h = Some(68.0);
        ctx.bollinger = Some(BollingerState {
            percent_b: 0.97,
            squeeze: false,
            ..bb
        });
        assert_eq!(bollinger_upper(&ctx).map(|(d, _)| d), Some(-10));
        assert!(bollinger_lower(&ctx).is_none());
    }

    #[test]
    fn roc_rules() {
        let mut ctx = neutral();
        ctx.rsi_1h = Some(50.0);
        ctx.roc = Some(RocMomentum {
            roc: 1.0,
            prior_roc: -2.0,
            improving: true,
        });
        assert_eq!(roc_momentum(&ctx).map(|(d, _)| d), Some(10));
        ctx.roc = Some(RocMomentum {
            roc: -9.0,
            prior_roc: -5.0,
            improving: false,
        });
        assert_eq!(roc_momentum(&ctx).map(|(d, _)| d), Some(-5));
    }

    #[test]
    fn sweep_direction_sets_sign() {
        let mut ctx = neutral();
        ctx.sweep = Some(LiquiditySweep {
            kind: SweepKind::AsianLowSweep,
            level: 99.0,
        });
        assert_eq!(liquidity_sweep(&ctx).map(|(d, _)| d), Some(15));
        ctx.sweep = Some(LiquiditySweep {
            kind: SweepKind::BearishSweep,
            level: 101.0,
        });
        let (delta, reason) = liquidity_sweep(&ctx).unwrap();
        assert_eq!(delta, -15);
        assert_eq!(reason, "Liquidity sweep: Stop Hunt Above Resistance");
    }

    #[test]
    fn transition_risk_and_tight_asian_note() {
        let mut ctx = neutral();
        ctx.session = SessionInfo::from_minutes(7 * 60);
        ctx.asian_range = Some(AsianRange {
            high: 101.0,
            low: 100.0,
            range_pct: 1.0,
            tight: true,
            candle_count: 7,
        });
        let tally = apply_rules(&ctx);
        assert_eq!(delta_of(&tally, "session_transition"), Some(-10));
        assert_eq!(delta_of(&tally, "asian_range"), Some(0));
        assert!(tally
            .reasons()
            .iter()
            .any(|r| r == "Session risk: London open in 60min, stop hunt likely"));
    }
}
