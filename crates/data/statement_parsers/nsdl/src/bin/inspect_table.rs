use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use general_parser::{header_columns, ColumnClassifier, HeaderLocator};
use nsdl_parser::read_table;

/// Prints what the header and column inference sees in one export.
fn main() -> Result<()> {
    let path = PathBuf::from(
        env::args()
            .nth(1)
            .context("Usage: inspect_table <export.xlsx|.csv>")?,
    );

    let table = read_table(&path).with_context(|| format!("Loading table from {}", path.display()))?;
    println!("size: rows={}, cols={}", table.height(), table.width());

    for (i, cells) in table.preview(15).iter().enumerate() {
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }
        println!("  row {:>4}: {}", i, cells.join(" | "));
    }

    let header = match HeaderLocator::default().locate(&table) {
        Ok(h) => h,
        Err(e) => {
            println!("\n❌ {}", e);
            return Ok(());
        }
    };
    println!("\nheader row: {} ({:?})", header.row, header.rule);

    let columns = header_columns(&table, header.row);
    for c in &columns {
        println!("  col {:>2}: {}", c.index, c.label.as_deref().unwrap_or("<placeholder>"));
    }

    match ColumnClassifier::classify(&table, &columns, header.row) {
        Ok(m) => println!(
            "\nidentifier={} name={} quantity={} via {:?}",
            m.identifier, m.name, m.quantity, m.strategy
        ),
        Err(e) => println!("\n❌ {}", e),
    }

    Ok(())
}
