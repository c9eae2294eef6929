use serde::{Deserialize, Serialize};

use super::context::ScoringContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "ALL CHECKS PASS")]
    AllChecksPass,
    #[serde(rename = "FORMING")]
    Forming,
    #[serde(rename = "WAIT")]
    Wait,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllChecksPass => write!(f, "ALL CHECKS PASS"),
            Self::Forming => write!(f, "FORMING"),
            Self::Wait => write!(f, "WAIT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub label: String,
    pub passed: bool,
}

/// The seven-item pre-entry checklist.  Independent of the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub items: Vec<ChecklistItem>,
    pub passed: usize,
    pub total: usize,
    pub verdict: Verdict,
}

impl Checklist {
    pub fn evaluate(ctx: &ScoringContext) -> Self {
        let checks = [
            ("Benchmark not dumping", ctx.benchmark_safe),
            ("Daily bias favorable", ctx.daily_bias_up == Some(true)),
            ("Active narrative", ctx.has_narrative),
            (
                "Volume above session-adjusted average",
                ctx.session_volume_ratio() >= 1.0,
            ),
            (
                "No session open within 30 min",
                !ctx.session.in_danger_window,
            ),
            ("RSI 1H in 30-40 zone", ctx.rsi_in_primary_zone()),
            ("Confirmed candle", ctx.candle.is_confirmed_bullish()),
        ];

        let items: Vec<ChecklistItem> = checks
            .iter()
            .map(|(label, passed)| ChecklistItem {
                label: label.to_string(),
                passed: *passed,
            })
            .collect();
        let passed = items.iter().filter(|i| i.passed).count();
        let total = items.len();

        let verdict = if passed == total {
            Verdict::AllChecksPass
        } else if passed >= 5 {
            Verdict::Forming
        } else {
            Verdict::Wait
        };

        Self {
            items,
            passed,
            total,
            verdict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::context::fixtures::neutral;
    use super::*;
    use crate::structure::{CandlePattern, CandleSignal};
    use crate::types::Confirmation;

    #[test]
    fn neutral_context_waits() {
        let c = Checklist::evaluate(&neutral());
        assert_eq!(c.total, 7);
        // benchmark safe and no session open imminent
        assert_eq!(c.passed, 2);
        assert_eq!(c.verdict, Verdict::Wait);
    }

    #[test]
    fn all_items_pass() {
        let mut ctx = neutral();
        ctx.daily_bias_up = Some(true);
        ctx.has_narrative = true;
        ctx.volume.as_mut().unwrap().session_ratio = 1.0;
        ctx.rsi_1h = Some(33.0);
        ctx.candle = CandleSignal {
            pattern: CandlePattern::BullishEngulfing,
            bullish: true,
            confirmation: Confirmation::High,
        };
        let c = Checklist::evaluate(&ctx);
        assert_eq!(c.passed, 7);
        assert_eq!(c.verdict, Verdict::AllChecksPass);

        ctx.has_narrative = false;
        ctx.daily_bias_up = None;
        assert_eq!(Checklist::evaluate(&ctx).verdict, Verdict::Forming);
        ctx.rsi_1h = Some(45.0);
        assert_eq!(Checklist::evaluate(&ctx).verdict, Verdict::Wait);
    }

    #[test]
    fn verdict_serialises_as_label() {
        assert_eq!(
            serde_json::to_string(&Verdict::AllChecksPass).unwrap(),
            "\"ALL CHECKS PASS\""
        );
    }
}
