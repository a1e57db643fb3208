//! Trade records and the profit derivation rule.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use super::error::ValidationError;
use super::trade_date::is_storable;

/// Instrument name reserved for the starting-capital row of a journal file.
pub const RESERVED_INSTRUMENT: &str = "__CAPITAL__";

/// How a logged session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Outcome {
    TakeProfit,
    StopLoss,
    Breakeven,
    #[default]
    NoTrade,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [
        Outcome::TakeProfit,
        Outcome::StopLoss,
        Outcome::Breakeven,
        Outcome::NoTrade,
    ];

    /// Label written to the journal file.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::TakeProfit => "TP",
            Outcome::StopLoss => "SL",
            Outcome::Breakeven => "Breakeven",
            Outcome::NoTrade => "NoTrade",
        }
    }

    /// Parse a canonical label or one of the spellings older journals used.
    /// Matching ignores case and surrounding whitespace.
    pub fn parse(input: &str) -> Option<Outcome> {
        match input.trim().to_lowercase().as_str() {
            "tp" | "takeprofit" | "take profit" => Some(Outcome::TakeProfit),
            "sl" | "stoploss" | "stop loss" => Some(Outcome::StopLoss),
            "breakeven" | "be" => Some(Outcome::Breakeven),
            "notrade" | "no trade" | "pas de trade" => Some(Outcome::NoTrade),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Outcome::parse(s).ok_or_else(|| format!("unknown outcome '{}'", s))
    }
}

/// Profit booked for a breakeven trade.
///
/// Most journal revisions book the stake itself as profit on breakeven; a few
/// book zero. `ReturnStake` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakevenRule {
    #[default]
    ReturnStake,
    Zero,
}

impl BreakevenRule {
    pub fn parse(input: &str) -> Option<BreakevenRule> {
        match input.trim().to_lowercase().as_str() {
            "stake" | "return_stake" => Some(BreakevenRule::ReturnStake),
            "zero" => Some(BreakevenRule::Zero),
            _ => None,
        }
    }
}

/// Numeric columns that aggregations can sum over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeField {
    Stake,
    RiskPct,
    RewardPct,
    Profit,
}

/// One logged trade or non-trade session.
///
/// Numeric fields are `None` when an imported value could not be read; they
/// count as zero in aggregations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradeRecord {
    pub date: Option<NaiveDate>,
    pub session: String,
    pub instrument: String,
    pub outcome: Outcome,
    pub stake: Option<f64>,
    pub risk_pct: Option<f64>,
    pub reward_pct: Option<f64>,
    pub profit: Option<f64>,
    pub setup: String,
    pub observation: String,
}

impl TradeRecord {
    pub fn field(&self, field: TradeField) -> f64 {
        match field {
            TradeField::Stake => self.stake,
            TradeField::RiskPct => self.risk_pct,
            TradeField::RewardPct => self.reward_pct,
            TradeField::Profit => self.profit,
        }
        .unwrap_or(0.0)
    }

    pub fn profit_or_zero(&self) -> f64 {
        self.field(TradeField::Profit)
    }

    pub fn is(&self, outcome: Outcome) -> bool {
        self.outcome == outcome
    }
}

/// User input for a new or edited trade. `profit` is derived, never supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeCandidate {
    pub date: Option<NaiveDate>,
    pub session: String,
    pub instrument: String,
    pub outcome: Outcome,
    pub stake: f64,
    pub risk_pct: f64,
    pub reward_pct: f64,
    pub setup: String,
    pub observation: String,
}

impl TradeCandidate {
    pub fn new(outcome: Outcome, stake: f64, risk_pct: f64, reward_pct: f64) -> Self {
        Self {
            date: None,
            session: String::new(),
            instrument: String::new(),
            outcome,
            stake,
            risk_pct,
            reward_pct,
            setup: String::new(),
            observation: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_amount("stake", self.stake)?;
        check_amount("risk_pct", self.risk_pct)?;
        check_amount("reward_pct", self.reward_pct)?;
        if self.instrument.trim() == RESERVED_INSTRUMENT {
            return Err(ValidationError::ReservedInstrument {
                instrument: self.instrument.clone(),
            });
        }
        if let Some(date) = self.date.filter(|d| !is_storable(*d)) {
            return Err(ValidationError::DateOutOfRange { date });
        }
        Ok(())
    }

    /// Validate and derive the stored record.
    pub fn into_record(self, rule: BreakevenRule) -> Result<TradeRecord, ValidationError> {
        self.validate()?;

        let (stake, profit) = derive_profit(
            self.outcome,
            self.stake,
            self.risk_pct,
            self.reward_pct,
            rule,
        );
        check_finite("profit", profit)?;

        Ok(TradeRecord {
            date: self.date,
            session: self.session,
            instrument: self.instrument,
            outcome: self.outcome,
            stake: Some(stake),
            risk_pct: Some(self.risk_pct),
            reward_pct: Some(self.reward_pct),
            profit: Some(profit),
            setup: self.setup,
            observation: self.observation,
        })
    }
}

/// Returns `(stake, profit)` as stored for the given outcome. NoTrade forces
/// the stake to zero.
pub fn derive_profit(
    outcome: Outcome,
    stake: f64,
    risk_pct: f64,
    reward_pct: f64,
    rule: BreakevenRule,
) -> (f64, f64) {
    match outcome {
        Outcome::TakeProfit => (stake, stake * reward_pct),
        Outcome::StopLoss => (stake, -stake * risk_pct),
        Outcome::Breakeven => match rule {
            BreakevenRule::ReturnStake => (stake, stake),
            BreakevenRule::Zero => (stake, 0.0),
        },
        Outcome::NoTrade => (0.0, 0.0),
    }
}

pub(crate) fn check_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidAmount { field, value })
    }
}

pub(crate) fn check_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { field, value })
    }
}
