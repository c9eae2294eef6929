// =============================================================================
// Scoring & Classification Engine
// =============================================================================
//
// Fuses indicators, structure, session state and the benchmark into one
// score, a reason list, a setup classification and trade levels.

pub mod analysis;
pub mod checklist;
pub mod context;
pub mod engine;
pub mod gate;
pub mod levels;
pub mod rules;
pub mod setup;

pub use analysis::SetupAnalysis;
pub use checklist::{Checklist, ChecklistItem, Verdict};
pub use context::ScoringContext;
pub use engine::{analyze, analyze_with_clock, reward_risk_penalty};
pub use gate::{RejectionGate, REJECTED_SCORE};
pub use levels::{
    atr_levels, playbook_levels, playbook_reward_risk, session_adjusted_stop, TradeLevels,
};
pub use rules::{apply_rules, Contribution, ScoringRule, Tally, RULES};
pub use setup::{classify, SetupACriteria, SetupDecision, SetupInputs};
