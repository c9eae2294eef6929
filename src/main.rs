// =============================================================================
// Playbook Scanner — Main Entry Point
// =============================================================================
//
// Scores a captured market snapshot against the configured roster and prints
// the batch export payload to stdout.  Logs go to stderr.
//
// Usage: playbook-scanner [SNAPSHOT_PATH]
//   PLAYBOOK_SNAPSHOT  snapshot path when no argument is given
//   PLAYBOOK_CONFIG    scanner config (default: scanner_config.json)
//   PLAYBOOK_SYMBOLS   comma-separated roster override
// =============================================================================

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use playbook_scanner::export::BatchExport;
use playbook_scanner::{MarketSnapshot, ScannerConfig, Scanner, SystemClock};

fn main() -> Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("PLAYBOOK_CONFIG").unwrap_or_else(|_| "scanner_config.json".to_string());
    let mut config = ScannerConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ScannerConfig::default()
    });

    if let Ok(syms) = std::env::var("PLAYBOOK_SYMBOLS") {
        let symbols: Vec<String> = syms
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if !symbols.is_empty() {
            config.restrict_to(&symbols);
        }
    }

    // ── 2. Snapshot ──────────────────────────────────────────────────────
    let snapshot_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PLAYBOOK_SNAPSHOT").ok())
        .context("no snapshot path given (argument or PLAYBOOK_SNAPSHOT)")?;
    let snapshot = MarketSnapshot::load(&snapshot_path)?;

    // ── 3. Scan ──────────────────────────────────────────────────────────
    let scanner = Scanner::new(config);
    let report = scanner.scan(&snapshot, &SystemClock)?;

    info!(
        scan_id = %report.scan_id,
        session = %report.session.session,
        benchmark_safe = report.benchmark.safe,
        scored = report.results.len(),
        skipped = report.skipped.len(),
        shortlist = ?report.shortlist,
        "scan complete"
    );
    for heat in report.narrative_heat.iter().filter(|h| h.hot) {
        info!(
            narrative = %heat.name,
            avg_change = format!("{:.2}", heat.avg_change_24h),
            pumping = heat.pumping,
            total = heat.total,
            "hot narrative"
        );
    }
    for w in &report.concentration_warnings {
        warn!(
            narrative = %w.narrative,
            count = w.count,
            instruments = ?w.instruments,
            "concentrated exposure"
        );
    }
    for s in &report.skipped {
        warn!(symbol = %s.symbol, reason = %s.reason, "instrument skipped");
    }

    // ── 4. Export ────────────────────────────────────────────────────────
    let batch =
        BatchExport::from_report(&report, &scanner.config().batch_export_instruction, &[]);
    let json = serde_json::to_string_pretty(&batch).context("failed to serialise export")?;
    println!("{json}");

    Ok(())
}
