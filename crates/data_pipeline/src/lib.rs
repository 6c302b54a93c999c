//! Batch processing: discover statements, parse them in parallel, price the
//! equity holdings, consolidate and write the summaries.

pub mod batch;
pub mod discover;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use logger::EventLog;
use models::{AccountStatement, EquitySummary, MfSummary, NetWorthSummary};
use prices::{CachedResolver, PriceCache, PriceResolver, RateLimiter, StaticPriceSource};
use settings_loader::Settings;

pub use batch::{parse_batch, BatchOutcome, FailureReport, FileFailure};
pub use discover::discover_files;

pub const EQUITY_OUTPUT: &str = "equity_data.json";
pub const MF_OUTPUT: &str = "mf_data.json";
pub const NETWORTH_OUTPUT: &str = "networth_data.json";
pub const EVENT_LOG: &str = "events.jsonl";

pub struct Config {
    pub settings: Settings,
    /// Skip price enrichment even when a price file is configured.
    pub skip_prices: bool,
}

impl Config {
    pub fn output_dir(&self) -> PathBuf {
        self.settings.base_dir.join(&self.settings.output_dir)
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub equity: EquitySummary,
    pub mf: MfSummary,
    pub networth: NetWorthSummary,
    pub failures: Vec<FileFailure>,
    pub priced_holdings: usize,
    pub written: Vec<PathBuf>,
}

pub fn parse_equity(settings: &Settings) -> BatchOutcome<AccountStatement> {
    let files = discover_files(&settings.nsdl_dir(), true, nsdl_parser::is_supported);
    info!("Found {} depository export(s) in {}", files.len(), settings.nsdl_dir().display());

    let parser = nsdl_parser::NsdlParser::new(settings.header_scan_rows);
    parse_batch(&files, |p| parser.parse_file(p))
}

pub fn parse_mutual_funds(settings: &Settings) -> BatchOutcome<models::MfStatement> {
    let files = discover_files(&settings.mf_dir(), false, mf_central::is_supported);
    info!("Found {} MF statement(s) in {}", files.len(), settings.mf_dir().display());

    let parser = mf_central::MfCentralParser::new();
    parse_batch(&files, |p| parser.parse_file(p))
}

/// Builds the configured resolver, or `None` when no price file is set.
pub fn price_resolver(settings: &Settings) -> Result<Option<CachedResolver<StaticPriceSource>>> {
    let Some(prices_file) = &settings.prices_file else {
        return Ok(None);
    };
    let prices_file = settings.base_dir.join(prices_file);
    let source = StaticPriceSource::from_file(&prices_file)
        .with_context(|| format!("Loading prices from {}", prices_file.display()))?;

    let cache = match &settings.price_cache_file {
        Some(p) => PriceCache::load(settings.base_dir.join(p)),
        None => PriceCache::in_memory(),
    };
    let max_age = chrono::Duration::hours(settings.price_max_age_hours as i64);

    Ok(Some(CachedResolver::new(
        source,
        cache,
        RateLimiter::from_millis(settings.rate_limit_ms),
        max_age,
    )))
}

/// Prices all statements in place; returns the number of holdings updated.
pub fn enrich(statements: &mut [AccountStatement], resolver: &dyn PriceResolver) -> usize {
    let identifiers: BTreeSet<String> = statements
        .iter()
        .flat_map(|s| s.holdings.iter().map(|h| h.identifier.clone()))
        .collect();
    if identifiers.is_empty() {
        return 0;
    }

    let prices = resolver.resolve(&identifiers);
    statements
        .iter_mut()
        .map(|s| prices::apply_prices(s, &prices))
        .sum()
}

fn record_outcome(log: &EventLog, parsed: &[(String, usize)], failures: &[FileFailure]) {
    for (file, holdings) in parsed {
        if let Err(e) = log.info(file, "parsed", &format!("{} holdings", holdings)) {
            warn!("Cannot write event log {}: {}", log.path().display(), e);
        }
    }
    for f in failures {
        let file = f.file.display().to_string();
        warn!("{}: {}", file, f.error);
        let mut detail = f.error.clone();
        for line in &f.diagnostic {
            detail.push('\n');
            detail.push_str(line);
        }
        if let Err(e) = log.error(&file, "parse_failed", &detail) {
            warn!("Cannot write event log {}: {}", log.path().display(), e);
        }
    }
}

fn write_output(dir: &Path, name: &str, value: &impl serde::Serialize) -> Result<PathBuf> {
    let path = dir.join(name);
    utils::write_json(&path, value).with_context(|| format!("Writing {}", path.display()))
}

/// Runs the full pipeline for one reporting period.
pub fn run(cfg: Config) -> Result<RunReport> {
    let settings = &cfg.settings;
    let output_dir = cfg.output_dir();
    let log = EventLog::open(output_dir.join(EVENT_LOG))
        .with_context(|| format!("Opening event log in {}", output_dir.display()))?;

    let equity_batch = parse_equity(settings);
    let mut statements = equity_batch.parsed;

    let mut priced_holdings = 0;
    if !cfg.skip_prices {
        match price_resolver(settings) {
            Ok(Some(resolver)) => priced_holdings = enrich(&mut statements, &resolver),
            Ok(None) => {}
            Err(e) => {
                let message = format!("{:#}", e);
                warn!("Skipping price enrichment: {}", message);
                if let Err(e) = log.warn("prices", "enrichment_skipped", &message) {
                    warn!("Cannot write event log {}: {}", log.path().display(), e);
                }
            }
        }
    }

    let parsed_equity: Vec<(String, usize)> = statements
        .iter()
        .map(|s| (s.source_file.clone(), s.holdings.len()))
        .collect();
    record_outcome(&log, &parsed_equity, &equity_batch.failures);
    let equity = utils::consolidate_equity(statements);

    let mf_batch = parse_mutual_funds(settings);
    let parsed_mf: Vec<(String, usize)> = mf_batch
        .parsed
        .iter()
        .map(|s| (s.source_file.clone(), s.total_holdings))
        .collect();
    record_outcome(&log, &parsed_mf, &mf_batch.failures);
    let mf = utils::consolidate_mf(mf_batch.parsed);

    let networth = NetWorthSummary {
        generated_at: Utc::now().to_rfc3339(),
        equity_value: equity.total_value,
        mutual_fund_value: mf.total_value,
        total: equity.total_value + mf.total_value,
    };

    let written = vec![
        write_output(&output_dir, EQUITY_OUTPUT, &equity)?,
        write_output(&output_dir, MF_OUTPUT, &mf)?,
        write_output(&output_dir, NETWORTH_OUTPUT, &networth)?,
    ];

    let mut failures = equity_batch.failures;
    failures.extend(mf_batch.failures);

    info!(
        "Period {}: equity {:.2}, mutual funds {:.2}, {} failure(s)",
        settings.period,
        equity.total_value,
        mf.total_value,
        failures.len()
    );

    Ok(RunReport {
        equity,
        mf,
        networth,
        failures,
        priced_holdings,
        written,
    })
}
