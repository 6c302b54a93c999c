//! Reconstructs scheme holdings from the linear text of a converted
//! statement.
//!
//! The text has no table structure left: every cell is its own line, names
//! wrap over several lines and optional cells simply disappear. Records are
//! rebuilt by a state machine that finds the SOA/DEMAT sections, starts a
//! record at a folio (or client) key, gathers the wrapped scheme name and
//! then fills a fixed five-slot numeric tail positionally.

use chrono::NaiveDate;
use models::{HoldingType, SchemeHolding};
use tracing::debug;

use crate::patterns::{self, DEMAT_KEY_RE, DECIMAL_RE, ISO_DATE_RE, SOA_KEY_RE};

const SOA_MARKER: &str = "Folio No.";
const DEMAT_MARKER: &str = "Client Id";
const SCHEME_DETAILS: &str = "Scheme Details";
const NO_DEMAT_HOLDINGS: &str = "No MF holdings in Demat";
/// Lines after a marker searched for "Scheme Details".
const MARKER_LOOKAHEAD: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Soa,
    Demat,
}

impl Section {
    fn marker(self) -> &'static str {
        match self {
            Section::Soa => SOA_MARKER,
            Section::Demat => DEMAT_MARKER,
        }
    }

    fn other(self) -> Section {
        match self {
            Section::Soa => Section::Demat,
            Section::Demat => Section::Soa,
        }
    }

    fn holding_type(self) -> HoldingType {
        match self {
            Section::Soa => HoldingType::NonDemat,
            Section::Demat => HoldingType::Demat,
        }
    }

    fn is_record_key(self, line: &str) -> bool {
        match self {
            Section::Soa => SOA_KEY_RE.is_match(line),
            Section::Demat => DEMAT_KEY_RE.is_match(line),
        }
    }

    /// "Total…", the other section's marker, or (DEMAT) the closing notes.
    fn is_exit(self, line: &str) -> bool {
        line.starts_with("Total")
            || line == self.other().marker()
            || (self == Section::Demat && line.starts_with("Please note"))
    }
}

/// Numeric tail slots, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailField {
    InvestedValue,
    Units,
    ValuationDate,
    UnitPrice,
    MarketValue,
}

impl TailField {
    fn next(self) -> Option<TailField> {
        match self {
            TailField::InvestedValue => Some(TailField::Units),
            TailField::Units => Some(TailField::ValuationDate),
            TailField::ValuationDate => Some(TailField::UnitPrice),
            TailField::UnitPrice => Some(TailField::MarketValue),
            TailField::MarketValue => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PendingRecord {
    section: Section,
    key: String,
    name_parts: Vec<String>,
    invested_value: Option<f64>,
    units: Option<f64>,
    valuation_date: Option<NaiveDate>,
    unit_price: Option<f64>,
    market_value: Option<f64>,
}

impl PendingRecord {
    fn new(section: Section, key: &str) -> Self {
        Self {
            section,
            key: key.to_string(),
            name_parts: Vec::new(),
            invested_value: None,
            units: None,
            valuation_date: None,
            unit_price: None,
            market_value: None,
        }
    }

    /// Tries to fill `field` from `line`; true if the line was consumed.
    fn fill(&mut self, field: TailField, line: &str) -> bool {
        match field {
            TailField::InvestedValue => store(&mut self.invested_value, patterns::amount(line)),
            TailField::Units => store(&mut self.units, patterns::decimal(line)),
            TailField::ValuationDate => store(&mut self.valuation_date, patterns::valuation_date(line)),
            TailField::UnitPrice => match patterns::decimal(line) {
                // Zero is a placeholder: consumed, never recorded.
                Some(v) if v == 0.0 => true,
                price => store(&mut self.unit_price, price),
            },
            TailField::MarketValue => store(&mut self.market_value, patterns::amount(line)),
        }
    }

    fn finish(self) -> Option<SchemeHolding> {
        let scheme_name = self.name_parts.join(" ");
        let market_value = self.market_value.filter(|v| *v > 0.0)?;
        if scheme_name.is_empty() {
            return None;
        }
        Some(SchemeHolding {
            account_or_folio_id: self.key,
            scheme_name,
            invested_value: self.invested_value.unwrap_or(0.0),
            units: self.units.unwrap_or(0.0),
            valuation_date: self.valuation_date,
            unit_price: self.unit_price,
            market_value,
            holding_type: self.section.holding_type(),
        })
    }
}

fn store<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = Some(v);
            true
        }
        None => false,
    }
}

#[derive(Debug, Clone)]
pub enum ScanState {
    SeekingSection,
    SeekingRecordStart(Section),
    CollectingName(PendingRecord),
    CollectingNumericTail(PendingRecord, TailField),
}

/// Whether the current line was used up or must be looked at again in the
/// new state.
enum Step {
    Consume,
    Reexamine,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub emitted: usize,
    /// Records started at a key but never completed.
    pub discarded: usize,
}

#[derive(Debug, Default, Clone)]
pub struct ScanResult {
    pub soa: Vec<SchemeHolding>,
    pub demat: Vec<SchemeHolding>,
    pub stats: ScanStats,
}

struct Scanner<'a> {
    lines: Vec<&'a str>,
    soa_entered: bool,
    demat_entered: bool,
    demat_disabled: bool,
    result: ScanResult,
}

pub fn scan_holdings(text: &str) -> ScanResult {
    let mut scanner = Scanner {
        lines: text.lines().map(str::trim).collect(),
        soa_entered: false,
        demat_entered: false,
        demat_disabled: text.contains(NO_DEMAT_HOLDINGS),
        result: ScanResult::default(),
    };
    scanner.run();
    scanner.result
}

impl<'a> Scanner<'a> {
    fn run(&mut self) {
        let mut state = ScanState::SeekingSection;
        let mut i = 0;

        while i < self.lines.len() {
            let (next, step) = self.step(state, i);
            state = next;
            if let Step::Consume = step {
                i += 1;
            }
        }

        // End of text inside a record: complete what was gathered.
        match state {
            ScanState::CollectingName(pending) => self.emit(pending),
            ScanState::CollectingNumericTail(pending, _) => self.emit(pending),
            _ => {}
        }
    }

    fn has_scheme_details_after(&self, i: usize) -> bool {
        self.lines
            .iter()
            .skip(i + 1)
            .take(MARKER_LOOKAHEAD)
            .any(|l| l.contains(SCHEME_DETAILS))
    }

    fn step(&mut self, state: ScanState, i: usize) -> (ScanState, Step) {
        let line = self.lines[i];

        match state {
            ScanState::SeekingSection => {
                if line == SOA_MARKER && !self.soa_entered && self.has_scheme_details_after(i) {
                    self.soa_entered = true;
                    debug!("SOA section at line {}", i + 1);
                    return (ScanState::SeekingRecordStart(Section::Soa), Step::Consume);
                }
                if line == DEMAT_MARKER
                    && !self.demat_entered
                    && !self.demat_disabled
                    && self.has_scheme_details_after(i)
                {
                    self.demat_entered = true;
                    debug!("DEMAT section at line {}", i + 1);
                    return (ScanState::SeekingRecordStart(Section::Demat), Step::Consume);
                }
                (ScanState::SeekingSection, Step::Consume)
            }

            ScanState::SeekingRecordStart(section) => {
                if line.is_empty() {
                    (ScanState::SeekingRecordStart(section), Step::Consume)
                } else if line == section.other().marker() {
                    (ScanState::SeekingSection, Step::Reexamine)
                } else if section.is_exit(line) {
                    (ScanState::SeekingSection, Step::Consume)
                } else if section.is_record_key(line) {
                    (ScanState::CollectingName(PendingRecord::new(section, line)), Step::Consume)
                } else {
                    (ScanState::SeekingRecordStart(section), Step::Consume)
                }
            }

            ScanState::CollectingName(mut pending) => {
                let section = pending.section;
                if line.is_empty() {
                    (ScanState::CollectingName(pending), Step::Consume)
                } else if section.is_exit(line) || section.is_record_key(line) {
                    self.result.stats.discarded += 1;
                    (ScanState::SeekingRecordStart(section), Step::Reexamine)
                } else if DECIMAL_RE.is_match(line) {
                    (
                        ScanState::CollectingNumericTail(pending, TailField::InvestedValue),
                        Step::Reexamine,
                    )
                } else if ISO_DATE_RE.is_match(line) {
                    (
                        ScanState::CollectingNumericTail(pending, TailField::InvestedValue),
                        Step::Consume,
                    )
                } else {
                    pending.name_parts.push(line.to_string());
                    (ScanState::CollectingName(pending), Step::Consume)
                }
            }

            ScanState::CollectingNumericTail(mut pending, field) => {
                if line.is_empty() {
                    return (ScanState::CollectingNumericTail(pending, field), Step::Consume);
                }
                let section = pending.section;
                let consumed = pending.fill(field, line);
                let step = if consumed { Step::Consume } else { Step::Reexamine };
                match field.next() {
                    Some(next) => (ScanState::CollectingNumericTail(pending, next), step),
                    None => {
                        self.emit(pending);
                        (ScanState::SeekingRecordStart(section), step)
                    }
                }
            }
        }
    }

    fn emit(&mut self, pending: PendingRecord) {
        let section = pending.section;
        let key = pending.key.clone();
        match pending.finish() {
            Some(holding) => {
                self.result.stats.emitted += 1;
                match section {
                    Section::Soa => self.result.soa.push(holding),
                    Section::Demat => self.result.demat.push(holding),
                }
            }
            None => {
                debug!("Discarding incomplete record {}", key);
                self.result.stats.discarded += 1;
            }
        }
    }
}
