use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

use nsdl_parser::{is_supported, NsdlParser};

fn main() -> Result<()> {
    // Usage:
    //   nsdl_parser holdings.xlsx other.csv ... [output.json]
    //
    // Without input files, every supported export in the current directory is parsed.
    // Without an output path, only the summary is printed.
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
        println!("❌ No holdings exports found (expected .xlsx, .xls, .ods or .csv).");
        return Ok(());
    }

    let parser = NsdlParser::default();
    println!("📖 Parsing {} file(s)", inputs.len());

    let mut statements = Vec::new();
    for p in &inputs {
        match parser.parse_file(p) {
            Ok(stmt) => {
                println!(
                    "  ✓ {} → {} holdings ({})",
                    p.display(),
                    stmt.holdings.len(),
                    stmt.account_identifier
                );
                statements.push(stmt);
            }
            Err(e) => {
                println!("  ✗ {}: {}", p.display(), e);
                for line in e.diagnostic() {
                    println!("      {}", line);
                }
            }
        }
    }

    let holdings: usize = statements.iter().map(|s| s.holdings.len()).sum();
    println!("\n📊 Summary:");
    println!("✓ Accounts parsed: {}/{}", statements.len(), inputs.len());
    println!("✓ Holdings extracted: {}", holdings);

    if let Some(out) = output {
        let written = utils::write_json(&out, &statements)
            .with_context(|| format!("Failed writing {}", out.display()))?;
        println!("✅ Statements written to: {}", written.display());
    }

    Ok(())
}
