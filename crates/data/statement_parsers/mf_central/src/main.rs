use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

use mf_central::{is_supported, MfCentralParser};

fn main() -> Result<()> {
    // Usage:
    //   mf_central statement.md other.txt ... [output.json]
    //
    // Inputs are the text renderings of MF Central PDFs. Without input files,
    // every .md/.txt in the current directory is parsed.
    logger::init_tracing("info");

    let args: Vec<String> = env::args().skip(1).collect();

    let mut inputs: Vec<PathBuf> = args
        .iter()
        .map(PathBuf::from)
        .filter(|p| is_supported(p))
        .collect();
    let output: Option<PathBuf> = args
        .iter()
        .map(PathBuf::from)
        .find(|p| p.extension().and_then(|e| e.to_str()) == Some("json"));

    if inputs.is_empty() {
        for entry in fs::read_dir(".").context("Cannot read current directory")? {
            let path = entry?.path();
            if path.is_file() && is_supported(&path) {
                inputs.push(path);
            }
        }
        inputs.sort();
    }

    if inputs.is_empty() {
        println!("❌ No statement text files found (expected .md or .txt).");
        return Ok(());
    }

    let parser = MfCentralParser::new();
    println!("📖 Parsing {} statement(s)", inputs.len());

    let mut statements = Vec::new();
    for p in &inputs {
        let stmt = parser
            .parse_file(p)
            .with_context(|| format!("Failed parsing {}", p.display()))?;
        println!(
            "  • {} → {} SOA, {} DEMAT, ₹{:.2}",
            p.display(),
            stmt.soa_holdings.len(),
            stmt.demat_holdings.len(),
            stmt.total_value
        );
        statements.push(stmt);
    }

    let summary = utils::consolidate_mf(statements);
    println!("\n📊 Summary:");
    println!("✓ Statements: {}", summary.total_accounts);
    println!("✓ Holdings: {}", summary.total_holdings);
    println!("✓ SOA value: ₹{:.2}", summary.soa_value);
    println!("✓ DEMAT value: ₹{:.2}", summary.demat_value);
    println!("✓ Total value: ₹{:.2}", summary.total_value);

    if let Some(out) = output {
        let written = utils::write_json(&out, &summary)
            .with_context(|| format!("Failed writing {}", out.display()))?;
        println!("✅ Summary written to: {}", written.display());
    }

    Ok(())
}
