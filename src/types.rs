// =============================================================================
// Shared types used across the playbook scanner
// =============================================================================

use serde::{Deserialize, Serialize};

/// Named macro trading window, derived from UTC time-of-day only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionName {
    #[serde(rename = "ASIAN")]
    Asian,
    #[serde(rename = "LONDON")]
    London,
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "LONDON/US")]
    LondonUs,
    #[serde(rename = "OFF-HOURS")]
    OffHours,
}

impl std::fmt::Display for SessionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asian => write!(f, "ASIAN"),
            Self::London => write!(f, "LONDON"),
            Self::Us => write!(f, "US"),
            Self::LondonUs => write!(f, "LONDON/US"),
            Self::OffHours => write!(f, "OFF-HOURS"),
        }
    }
}

/// The next session open on the daily cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextSession {
    London,
    #[serde(rename = "US")]
    Us,
    Asian,
}

impl std::fmt::Display for NextSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::London => write!(f, "London"),
            Self::Us => write!(f, "US"),
            Self::Asian => write!(f, "Asian"),
        }
    }
}

/// Strength of the candle signal on the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confirmation {
    None,
    Low,
    High,
}

impl std::fmt::Display for Confirmation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Classified trade setup, in priority order A -> B -> C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupType {
    None,
    RsiStructure,
    FvgReclaim,
    Momentum,
    NarrativeMomentum,
}

impl SetupType {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short playbook label, without the status suffix.
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::RsiStructure => "A: RSI+Structure",
            Self::FvgReclaim => "B: FVG Reclaim",
            Self::Momentum => "C: Momentum Candidate",
            Self::NarrativeMomentum => "C: Narrative Momentum",
        }
    }
}

impl Default for SetupType {
    fn default() -> Self {
        Self::None
    }
}

impl std::fmt::Display for SetupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Lifecycle status of the classified setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SetupStatus {
    None,
    Forming,
    Confirmed,
    Rejected,
}

impl Default for SetupStatus {
    fn default() -> Self {
        Self::None
    }
}

impl std::fmt::Display for SetupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Forming => write!(f, "FORMING"),
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Ordering applied to batch scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Score,
    Rsi,
    Volume,
    Change,
}

impl Default for SortKey {
    fn default() -> Self {
        Self::Score
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score => write!(f, "score"),
            Self::Rsi => write!(f, "rsi"),
            Self::Volume => write!(f, "volume"),
            Self::Change => write!(f, "change"),
        }
    }
}

/// A tradable instrument and the thematic tags it trades under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSpec {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub narratives: Vec<String>,
}

impl InstrumentSpec {
    pub fn new(symbol: &str, name: &str, narratives: &[&str]) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            narratives: narratives.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Symbol without the quote currency, e.g. `ETH` for `ETHUSDT`.
    pub fn base_asset(&self) -> &str {
        self.symbol.strip_suffix("USDT").unwrap_or(&self.symbol)
    }

    pub fn has_narrative(&self) -> bool {
        !self.narratives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_name_serialises_to_playbook_labels() {
        assert_eq!(serde_json::to_string(&SessionName::LondonUs).unwrap(), "\"LONDON/US\"");
        assert_eq!(serde_json::to_string(&SessionName::OffHours).unwrap(), "\"OFF-HOURS\"");
        assert_eq!(SessionName::Asian.to_string(), "ASIAN");
    }

    #[test]
    fn setup_labels() {
        assert_eq!(SetupType::RsiStructure.label(), "A: RSI+Structure");
        assert_eq!(SetupType::FvgReclaim.to_string(), "B: FVG Reclaim");
        assert!(SetupType::default().is_none());
        assert_eq!(serde_json::to_string(&SetupStatus::Forming).unwrap(), "\"FORMING\"");
    }

    #[test]
    fn instrument_base_asset() {
        let eth = InstrumentSpec::new("ETHUSDT", "Ethereum", &["L1"]);
        assert_eq!(eth.base_asset(), "ETH");
        assert!(eth.has_narrative());
        let raw = InstrumentSpec::new("BTCEUR", "Bitcoin", &[]);
        assert_eq!(raw.base_asset(), "BTCEUR");
        assert!(!raw.has_narrative());
    }

    #[test]
    fn sort_key_parses_lowercase() {
        let key: SortKey = serde_json::from_str("\"volume\"").unwrap();
        assert_eq!(key, SortKey::Volume);
    }
}
