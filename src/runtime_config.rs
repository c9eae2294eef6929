// =============================================================================
// Scanner Configuration — roster and batch settings with atomic save
// =============================================================================
//
// The instrument roster, the benchmark and the batch-level thresholds live
// here.  Scoring constants are fixed playbook values and are not
// configurable.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{InstrumentSpec, SortKey};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_benchmark() -> InstrumentSpec {
    InstrumentSpec::new("BTCUSDT", "Bitcoin", &[])
}

/// Default alt roster with thematic tags.
const DEFAULT_ROSTER: &[(&str, &str, &[&str])] = &[
    ("ETHUSDT", "Ethereum", &["Infra", "L1"]),
    ("SOLUSDT", "Solana", &["L1"]),
    ("LINKUSDT", "Chainlink", &["Oracle", "RWA"]),
    ("AVAXUSDT", "Avalanche", &["L1"]),
    ("UNIUSDT", "Uniswap", &["DeFi"]),
    ("AAVEUSDT", "Aave", &["DeFi"]),
    ("ONDOUSDT", "Ondo", &["RWA"]),
    ("TAOUSDT", "Bittensor", &["AI"]),
    ("RENDERUSDT", "Render", &["AI", "Infra"]),
    ("INJUSDT", "Injective", &["DeFi"]),
    ("SUIUSDT", "Sui", &["L1"]),
    ("NEARUSDT", "NEAR", &["AI", "L1"]),
    ("FETUSDT", "Fetch.ai", &["AI"]),
    ("APTUSDT", "Aptos", &["L1"]),
    ("MKRUSDT", "Maker", &["DeFi", "RWA"]),
    ("PENDLEUSDT", "Pendle", &["DeFi"]),
    ("CRVUSDT", "Curve", &["DeFi"]),
    ("ARBUSDT", "Arbitrum", &["L2", "Infra"]),
    ("OPUSDT", "Optimism", &["L2", "Infra"]),
    ("ATOMUSDT", "Cosmos", &["L1", "Infra"]),
    ("TIAUSDT", "Celestia", &["L1", "Infra"]),
    ("ARKMUSDT", "Arkham", &["AI", "Infra"]),
    ("WLDUSDT", "Worldcoin", &["AI"]),
    ("IMXUSDT", "Immutable", &["Gaming", "L2"]),
    ("DOGEUSDT", "Dogecoin", &["Meme"]),
];

fn default_instruments() -> Vec<InstrumentSpec> {
    DEFAULT_ROSTER
        .iter()
        .map(|(symbol, name, tags)| InstrumentSpec::new(symbol, name, tags))
        .collect()
}

fn default_shortlist_min_score() -> i32 {
    40
}

fn default_concentration_min_setups() -> usize {
    3
}

fn default_export_instruction() -> String {
    "Analyze this token setup. Ask me for 1H and 4H chart screenshots if the setup looks \
     strong. Focus on whether this is a valid entry or if I should wait."
        .to_string()
}

fn default_batch_export_instruction() -> String {
    "Analyze these token setups together. Compare which has the strongest setup and best \
     R:R. Ask me for chart screenshots (1H + 4H) of the top picks before confirming entries."
        .to_string()
}

// =============================================================================
// ScannerConfig
// =============================================================================

/// Top-level configuration for a batch scan.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Instrument whose 4h change gates every other setup.
    #[serde(default = "default_benchmark")]
    pub benchmark: InstrumentSpec,

    /// Instruments scored on every scan.
    #[serde(default = "default_instruments")]
    pub instruments: Vec<InstrumentSpec>,

    /// Ordering of the result list.
    #[serde(default)]
    pub sort_by: SortKey,

    /// Minimum score for the shortlist.
    #[serde(default = "default_shortlist_min_score")]
    pub shortlist_min_score: i32,

    /// Shortlisted members a narrative needs before it is flagged as
    /// concentrated exposure.
    #[serde(default = "default_concentration_min_setups")]
    pub concentration_min_setups: usize,

    /// Prepended to single-instrument export payloads.
    #[serde(default = "default_export_instruction")]
    pub export_instruction: String,

    /// Prepended to batch export payloads, which ask for a comparison.
    #[serde(default = "default_batch_export_instruction")]
    pub batch_export_instruction: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            benchmark: default_benchmark(),
            instruments: default_instruments(),
            sort_by: SortKey::default(),
            shortlist_min_score: default_shortlist_min_score(),
            concentration_min_setups: default_concentration_min_setups(),
            export_instruction: default_export_instruction(),
            batch_export_instruction: default_batch_export_instruction(),
        }
    }
}

impl ScannerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scanner config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scanner config from {}", path.display()))?;

        info!(
            path = %path.display(),
            benchmark = %config.benchmark.symbol,
            instruments = config.instruments.len(),
            sort_by = %config.sort_by,
            "scanner config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write (write to
    /// `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise scanner config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "scanner config saved (atomic)");
        Ok(())
    }

    /// Keep only roster entries whose symbol is listed, in roster order.
    /// Listed symbols missing from the roster are added untagged.
    pub fn restrict_to(&mut self, symbols: &[String]) {
        let mut kept: Vec<InstrumentSpec> = self
            .instruments
            .iter()
            .filter(|i| symbols.contains(&i.symbol))
            .cloned()
            .collect();
        for symbol in symbols {
            if !kept.iter().any(|i| &i.symbol == symbol) {
                kept.push(InstrumentSpec::new(symbol, symbol, &[]));
            }
        }
        self.instruments = kept;
    }
}
