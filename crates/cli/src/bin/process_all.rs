use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use data_pipeline::Config;

#[derive(Parser, Debug)]
#[command(
    name = "process-all",
    about = "Parse every equity and mutual fund statement of a period and write the consolidated summaries."
)]
struct Args {
    /// Settings file; falls back to ./settings.json, then built-in defaults
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Reporting period, e.g. 10.25 (overrides settings and NETWORTH_PERIOD)
    #[arg(short, long)]
    period: Option<String>,

    /// Root directory holding data/<period>/
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Output directory, relative to the base directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not look up prices even if a price file is configured
    #[arg(long, default_value_t = false)]
    skip_prices: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    logger::init_tracing("info");

    let args = Args::parse();

    let mut settings = settings_loader::resolve_settings(args.settings.as_ref())
        .context("Loading settings")?;
    if let Some(period) = &args.period {
        settings = settings.with_period(period.as_str());
    }
    if let Some(base) = args.base_dir {
        settings.base_dir = base;
    }
    if let Some(out) = args.output {
        settings.output_dir = out;
    }

    println!("📖 Processing period {} under {}", settings.period, settings.data_dir().display());

    let report = data_pipeline::run(Config {
        settings,
        skip_prices: args.skip_prices,
    })?;

    println!("\n📊 Summary:");
    println!(
        "✓ Equity: {} account(s), {} holding(s), ₹{:.2} ({} priced)",
        report.equity.total_accounts,
        report.equity.total_holdings,
        report.equity.total_value,
        report.priced_holdings
    );
    println!(
        "✓ Mutual funds: {} statement(s), {} holding(s), ₹{:.2}",
        report.mf.total_accounts, report.mf.total_holdings, report.mf.total_value
    );
    println!("✓ Net worth: ₹{:.2}", report.networth.total);

    if !report.failures.is_empty() {
        println!("\n⚠️  {} file(s) could not be parsed:", report.failures.len());
        for f in &report.failures {
            println!("  ✗ {}: {}", f.file.display(), f.error);
            for line in &f.diagnostic {
                println!("      {}", line);
            }
        }
    }

    for path in &report.written {
        println!("✅ Written: {}", path.display());
    }

    Ok(())
}
