use serde::Serialize;

use super::checklist::Checklist;
use super::context::ScoringContext;
use super::levels::TradeLevels;
use super::rules::Contribution;
use super::setup::SetupACriteria;
use crate::types::{SetupStatus, SetupType};

/// Terminal result of one scoring pass for one instrument.
///
/// Built once by [`super::analyze`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupAnalysis {
    pub symbol: String,
    pub context: ScoringContext,
    pub score: i32,
    /// Reason text per contribution, in rule order.
    pub reasons: Vec<String>,
    pub contributions: Vec<Contribution>,
    /// Set when a hard gate short-circuited scoring.
    pub rejection: Option<String>,
    pub setup: SetupType,
    pub status: SetupStatus,
    pub setup_a: SetupACriteria,
    pub atr_levels: TradeLevels,
    pub playbook_levels: TradeLevels,
    pub session_adjusted_stop: f64,
    pub checklist: Checklist,
    /// Setup classified, benchmark safe, not rejected.
    pub entry: bool,
}

impl SetupAnalysis {
    pub fn price(&self) -> f64 {
        self.context.price
    }

    pub fn rsi_1h(&self) -> Option<f64> {
        self.context.rsi_1h
    }

    pub fn change_24h(&self) -> f64 {
        self.context.change_24h
    }

    pub fn volume_ratio(&self) -> f64 {
        self.context.session_volume_ratio()
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}
