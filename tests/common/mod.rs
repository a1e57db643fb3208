#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use tradelog::adapters::csv_journal;
use tradelog::domain::error::JournalError;
use tradelog::domain::ledger::Ledger;
use tradelog::domain::trade::{BreakevenRule, Outcome, TradeCandidate};
use tradelog::ports::journal_port::JournalPort;

/// In-memory journal store holding the last saved CSV bytes.
pub struct MockJournalPort {
    pub stored: RefCell<Option<Vec<u8>>>,
    pub saves: RefCell<usize>,
    pub fail_save: bool,
}

impl MockJournalPort {
    pub fn new() -> Self {
        Self {
            stored: RefCell::new(None),
            saves: RefCell::new(0),
            fail_save: false,
        }
    }

    pub fn with_content(content: &str) -> Self {
        let port = Self::new();
        *port.stored.borrow_mut() = Some(content.as_bytes().to_vec());
        port
    }

    pub fn failing() -> Self {
        Self {
            fail_save: true,
            ..Self::new()
        }
    }

    pub fn stored_text(&self) -> Option<String> {
        self.stored
            .borrow()
            .as_ref()
            .map(|b| String::from_utf8(b.clone()).unwrap())
    }
}

impl JournalPort for MockJournalPort {
    fn load(&self, rule: BreakevenRule) -> Result<Ledger, JournalError> {
        let mut ledger = Ledger::with_breakeven_rule(rule);
        if let Some(bytes) = self.stored.borrow().as_ref() {
            csv_journal::import_rows(&mut ledger, bytes)?;
        }
        Ok(ledger)
    }

    fn save(&self, ledger: &Ledger) -> Result<(), JournalError> {
        if self.fail_save {
            return Err(JournalError::Io(std::io::Error::other("disk full")));
        }
        *self.stored.borrow_mut() = Some(csv_journal::export_bytes(ledger)?);
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn trade(date_str: &str, outcome: Outcome, stake: f64, risk: f64, reward: f64) -> TradeCandidate {
    let mut candidate = TradeCandidate::new(outcome, stake, risk, reward);
    candidate.date = Some(date(date_str));
    candidate.instrument = "EUR/USD".to_string();
    candidate.session = "OPR 9h".to_string();
    candidate
}

pub fn take_profit(date_str: &str, stake: f64, reward: f64) -> TradeCandidate {
    trade(date_str, Outcome::TakeProfit, stake, 1.0, reward)
}

pub fn stop_loss(date_str: &str, stake: f64, risk: f64) -> TradeCandidate {
    trade(date_str, Outcome::StopLoss, stake, risk, 0.0)
}

pub fn ledger_of(candidates: Vec<TradeCandidate>) -> Ledger {
    let mut ledger = Ledger::new();
    for candidate in candidates {
        ledger.add_trade(candidate).unwrap();
    }
    ledger
}
