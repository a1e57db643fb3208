//! CSV journal file adapter.
//!
//! One row per trade, then one sentinel row whose `Instrument` is
//! [`CAPITAL_SENTINEL`] and whose `Profit` column holds the starting capital.
//! The sentinel is turned back into [`Ledger::starting_capital`] on import and
//! never reaches the ledger as a trade.
//!
//! Import is lenient: bad dates, bad numbers and unknown columns are
//! normalized and the row is kept. Only a source that is not a journal table
//! at all fails with [`ParseError`].

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use csv::ByteRecord;
use tracing::{debug, info, warn};

use super::column_migration::{
    ColumnMap, CANONICAL_COLUMNS, DATE, INSTRUMENT, MIGRATIONS, OBSERVATION, OUTCOME, PROFIT,
    REWARD_PCT, RISK_PCT, SESSION, SETUP, STAKE,
};
use crate::domain::error::{JournalError, ParseError};
use crate::domain::ledger::Ledger;
use crate::domain::trade::{BreakevenRule, Outcome, TradeRecord, RESERVED_INSTRUMENT};
use crate::domain::trade_date::{format_date, normalize_date};
use crate::ports::journal_port::JournalPort;

/// Reserved `Instrument` value marking the starting-capital row.
pub const CAPITAL_SENTINEL: &str = RESERVED_INSTRUMENT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportResult {
    /// Trade rows stored in the ledger.
    pub accepted: usize,
    /// Rows dropped: blank rows, rows without a usable outcome, extra
    /// sentinel rows.
    pub skipped: usize,
    /// Accepted rows where at least one field was reset to a default.
    pub normalized: usize,
}

/// Serialize the ledger in canonical form. Identical ledgers produce
/// identical bytes.
pub fn export_bytes(ledger: &Ledger) -> Result<Vec<u8>, JournalError> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(CANONICAL_COLUMNS).map_err(io::Error::from)?;

    for record in ledger.records() {
        wtr.write_record([
            format_date(record.date),
            record.session.clone(),
            record.instrument.clone(),
            record.outcome.label().to_string(),
            format_amount(record.stake),
            format_amount(record.risk_pct),
            format_amount(record.reward_pct),
            format_amount(record.profit),
            record.setup.clone(),
            record.observation.clone(),
        ])
        .map_err(io::Error::from)?;
    }

    let mut capital_row = vec![String::new(); CANONICAL_COLUMNS.len()];
    capital_row[2] = CAPITAL_SENTINEL.to_string();
    capital_row[7] = format_amount(Some(ledger.starting_capital()));
    wtr.write_record(&capital_row).map_err(io::Error::from)?;

    wtr.into_inner()
        .map_err(|e| JournalError::Io(e.into_error()))
}

/// Replace the ledger's trades and starting capital with the content of
/// `source`. The ledger is untouched if the source is unreadable.
pub fn import_rows(ledger: &mut Ledger, source: &[u8]) -> Result<ImportResult, JournalError> {
    if source.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::new("source is empty").into());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);

    let headers = rdr
        .byte_headers()
        .map_err(|e| ParseError::new(format!("cannot read header row: {}", e)))?
        .clone();
    let header_names: Vec<String> = headers
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let mut columns = ColumnMap::from_headers(header_names.iter().map(String::as_str));
    for rule in columns.migrate(MIGRATIONS) {
        debug!(target_column = rule.target, source_column = rule.source, "migrated legacy column");
    }
    for required in [INSTRUMENT, OUTCOME] {
        if !columns.contains(required) {
            return Err(ParseError::new(format!("missing '{}' column", required)).into());
        }
    }

    let mut result = ImportResult::default();
    let mut records = Vec::new();
    let mut capital: Option<f64> = None;

    for record in rdr.byte_records() {
        let record =
            record.map_err(|e| ParseError::new(format!("cannot read row: {}", e)))?;
        let row = Row {
            columns: &columns,
            record: &record,
        };
        let line = row.line();

        if row.is_blank() {
            result.skipped += 1;
            continue;
        }

        if row.text(INSTRUMENT).trim() == CAPITAL_SENTINEL {
            if capital.is_some() {
                warn!(line, "duplicate capital row skipped");
                result.skipped += 1;
            } else {
                capital = Some(row.capital());
            }
            continue;
        }

        match row.trade() {
            Some((trade, normalized)) => {
                if normalized {
                    result.normalized += 1;
                }
                records.push(trade);
                result.accepted += 1;
            }
            None => {
                warn!(line, outcome = %row.text(OUTCOME), "row without a known outcome skipped");
                result.skipped += 1;
            }
        }
    }

    ledger.restore(records, capital.unwrap_or(0.0));
    info!(
        accepted = result.accepted,
        skipped = result.skipped,
        normalized = result.normalized,
        "journal imported"
    );
    Ok(result)
}

fn format_amount(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// A numeric field: `Ok(None)` for an empty field, `Err(())` for text that is
/// not a finite number.
fn parse_amount(raw: &str) -> Result<Option<f64>, ()> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(()),
    }
}

struct Row<'a> {
    columns: &'a ColumnMap,
    record: &'a ByteRecord,
}

impl Row<'_> {
    fn line(&self) -> u64 {
        self.record.position().map(|p| p.line()).unwrap_or(0)
    }

    fn text(&self, column: &str) -> Cow<'_, str> {
        self.columns
            .position(column)
            .and_then(|i| self.record.get(i))
            .map(String::from_utf8_lossy)
            .unwrap_or(Cow::Borrowed(""))
    }

    fn is_blank(&self) -> bool {
        self.record
            .iter()
            .all(|field| field.iter().all(u8::is_ascii_whitespace))
    }

    fn capital(&self) -> f64 {
        let raw = self.text(PROFIT);
        match parse_amount(&raw) {
            Ok(Some(v)) if v >= 0.0 => v,
            _ => {
                warn!(line = self.line(), value = %raw, "unusable starting capital, using 0");
                0.0
            }
        }
    }

    fn amount(&self, column: &str, normalized: &mut bool) -> Option<f64> {
        let raw = self.text(column);
        parse_amount(&raw).unwrap_or_else(|()| {
            warn!(line = self.line(), column, value = %raw, "unparseable number stored as missing");
            *normalized = true;
            None
        })
    }

    /// The trade on this row and whether any field had to be normalized.
    /// `None` when the outcome is blank or unknown.
    fn trade(&self) -> Option<(TradeRecord, bool)> {
        let outcome = Outcome::parse(&self.text(OUTCOME))?;
        let mut normalized = false;

        let raw_date = self.text(DATE);
        let date = normalize_date(&raw_date);
        if date.is_none() && !raw_date.trim().is_empty() {
            warn!(line = self.line(), value = %raw_date, "unparseable date stored as unknown");
            normalized = true;
        }

        let trade = TradeRecord {
            date,
            session: self.text(SESSION).into_owned(),
            instrument: self.text(INSTRUMENT).into_owned(),
            outcome,
            stake: self.amount(STAKE, &mut normalized),
            risk_pct: self.amount(RISK_PCT, &mut normalized),
            reward_pct: self.amount(REWARD_PCT, &mut normalized),
            profit: self.amount(PROFIT, &mut normalized),
            setup: self.text(SETUP).into_owned(),
            observation: self.text(OBSERVATION).into_owned(),
        };
        Some((trade, normalized))
    }
}

/// [`JournalPort`] backed by a CSV file on disk.
pub struct CsvJournalAdapter {
    path: PathBuf,
}

impl CsvJournalAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl JournalPort for CsvJournalAdapter {
    fn load(&self, rule: BreakevenRule) -> Result<Ledger, JournalError> {
        let mut ledger = Ledger::with_breakeven_rule(rule);

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no journal file yet, starting empty");
                return Ok(ledger);
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.is_empty() {
            info!(path = %self.path.display(), "journal file is empty, starting empty");
            return Ok(ledger);
        }

        import_rows(&mut ledger, &bytes)?;
        debug!(path = %self.path.display(), trades = ledger.len(), "journal loaded");
        Ok(ledger)
    }

    fn save(&self, ledger: &Ledger) -> Result<(), JournalError> {
        let bytes = export_bytes(ledger)?;
        fs::write(&self.path, bytes)?;
        debug!(path = %self.path.display(), trades = ledger.len(), "journal saved");
        Ok(())
    }
}
