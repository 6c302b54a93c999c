//! Column-to-role mapping with an ordered fallback chain:
//! keyword match, then adjacency to the name column, then position.

use tracing::{debug, warn};

use crate::error::TableError;
use crate::keywords::{classify_label, Role};
use crate::table::{Cell, Table};

/// How far right of the name column the quantity is searched for.
const QUANTITY_LOOKAHEAD: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub index: usize,
    /// `None` for a placeholder (blank header cell).
    pub label: Option<String>,
}

impl Column {
    pub fn is_placeholder(&self) -> bool {
        self.label.is_none()
    }
}

/// Columns of the table as labelled by its header row.
pub fn header_columns(table: &Table, header_row: usize) -> Vec<Column> {
    (0..table.width())
        .map(|index| {
            let text = table.cell(header_row, index).as_text();
            Column {
                index,
                label: (!text.is_empty()).then_some(text),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Keyword,
    Adjacency,
    Positional,
    RawPositional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub identifier: usize,
    pub name: usize,
    pub quantity: usize,
    pub strategy: Strategy,
}

#[derive(Debug, Default, Clone, Copy)]
struct Partial {
    identifier: Option<usize>,
    name: Option<usize>,
    quantity: Option<usize>,
}

impl Partial {
    fn slot(&mut self, role: Role) -> &mut Option<usize> {
        match role {
            Role::Identifier => &mut self.identifier,
            Role::Name => &mut self.name,
            Role::Quantity => &mut self.quantity,
        }
    }

    fn claimed(&self, index: usize) -> bool {
        [self.identifier, self.name, self.quantity].contains(&Some(index))
    }

    fn complete(&self, strategy: Strategy) -> Option<ColumnMapping> {
        Some(ColumnMapping {
            identifier: self.identifier?,
            name: self.name?,
            quantity: self.quantity?,
            strategy,
        })
    }
}

pub struct ColumnClassifier;

impl ColumnClassifier {
    /// Maps columns to roles. `header_row` bounds the data rows consulted by
    /// the adjacency fallback.
    pub fn classify(
        table: &Table,
        columns: &[Column],
        header_row: usize,
    ) -> Result<ColumnMapping, TableError> {
        if columns.len() < 3 {
            return Err(TableError::ColumnsUnclassifiable {
                columns: columns.len(),
            });
        }

        let mut found = Self::by_keyword(columns);
        if let Some(m) = found.complete(Strategy::Keyword) {
            debug!("Columns by keyword: {:?}", m);
            return Ok(m);
        }

        if found.name.is_some() {
            Self::by_adjacency(table, columns, header_row, &mut found);
            if let Some(m) = found.complete(Strategy::Adjacency) {
                debug!("Columns by adjacency: {:?}", m);
                return Ok(m);
            }
        }

        let labelled: Vec<usize> = columns
            .iter()
            .filter(|c| !c.is_placeholder())
            .map(|c| c.index)
            .collect();
        let (picked, strategy) = if labelled.len() >= 3 {
            (labelled, Strategy::Positional)
        } else {
            (columns.iter().map(|c| c.index).collect(), Strategy::RawPositional)
        };
        warn!("Column roles unresolved by keyword; using {:?} fallback", strategy);

        Ok(ColumnMapping {
            identifier: picked[0],
            name: picked[1],
            quantity: picked[2],
            strategy,
        })
    }

    /// Left to right; each column goes to the first matching vocabulary.
    /// A role already claimed stays with its first column.
    fn by_keyword(columns: &[Column]) -> Partial {
        let mut found = Partial::default();
        for col in columns {
            let Some(label) = &col.label else { continue };
            if let Some(role) = classify_label(label) {
                let slot = found.slot(role);
                if slot.is_none() {
                    *slot = Some(col.index);
                }
            }
        }
        found
    }

    fn by_adjacency(table: &Table, columns: &[Column], header_row: usize, found: &mut Partial) {
        let Some(name) = found.name else { return };

        if found.identifier.is_none() && name > 0 && !found.claimed(name - 1) {
            found.identifier = Some(name - 1);
        }

        if found.quantity.is_none() {
            let last = columns.len().min(name + 1 + QUANTITY_LOOKAHEAD);
            let quantity = (name + 1..last).find(|&idx| {
                !found.claimed(idx)
                    && first_value(table, idx, header_row)
                        .and_then(Cell::as_number)
                        .is_some_and(|v| v > 0.0)
            });
            found.quantity = quantity;
        }
    }
}

/// First non-empty cell below the header in a column.
fn first_value(table: &Table, col: usize, header_row: usize) -> Option<&Cell> {
    (header_row + 1..table.height())
        .map(|r| table.cell(r, col))
        .find(|c| !c.is_empty())
}
