//! Summary statistics over a ledger.
//!
//! Everything here is a pure function of the ledger's current state and is
//! recomputed on every call.

use super::ledger::Ledger;
use super::trade::{Outcome, TradeField, TradeRecord};

/// Number of records per outcome. Every outcome is present, possibly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutcomeCounts {
    pub take_profit: usize,
    pub stop_loss: usize,
    pub breakeven: usize,
    pub no_trade: usize,
}

impl OutcomeCounts {
    pub fn tally<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TradeRecord>,
    {
        let mut counts = OutcomeCounts::default();
        for record in records {
            counts.increment(record.outcome);
        }
        counts
    }

    pub fn increment(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::TakeProfit => self.take_profit += 1,
            Outcome::StopLoss => self.stop_loss += 1,
            Outcome::Breakeven => self.breakeven += 1,
            Outcome::NoTrade => self.no_trade += 1,
        }
    }

    pub fn get(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::TakeProfit => self.take_profit,
            Outcome::StopLoss => self.stop_loss,
            Outcome::Breakeven => self.breakeven,
            Outcome::NoTrade => self.no_trade,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Outcome, usize)> + '_ {
        Outcome::ALL.into_iter().map(move |o| (o, self.get(o)))
    }

    pub fn total(&self) -> usize {
        self.take_profit + self.stop_loss + self.breakeven + self.no_trade
    }

    /// `TP / (TP + SL) * 100`, or 0 when there are no decided trades.
    pub fn win_rate(&self) -> f64 {
        let decided = self.take_profit + self.stop_loss;
        if decided > 0 {
            self.take_profit as f64 / decided as f64 * 100.0
        } else {
            0.0
        }
    }
}

pub fn counts_by_outcome(ledger: &Ledger) -> OutcomeCounts {
    OutcomeCounts::tally(ledger.records())
}

pub fn win_rate(ledger: &Ledger) -> f64 {
    counts_by_outcome(ledger).win_rate()
}

pub fn total_profit(ledger: &Ledger) -> f64 {
    ledger.records().iter().map(TradeRecord::profit_or_zero).sum()
}

pub fn capital_total(ledger: &Ledger) -> f64 {
    ledger.starting_capital() + total_profit(ledger)
}

/// Sum of `field` over the records with the given outcome.
pub fn sum_for_outcome(ledger: &Ledger, outcome: Outcome, field: TradeField) -> f64 {
    ledger
        .records()
        .iter()
        .filter(|r| r.is(outcome))
        .map(|r| r.field(field))
        .sum()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub counts: OutcomeCounts,
    pub win_rate: f64,
    pub total_profit: f64,
    /// Reward multiples summed over take-profit trades.
    pub total_reward: f64,
    /// Risk multiples summed over stop-loss trades.
    pub total_risk: f64,
    pub starting_capital: f64,
    pub capital_total: f64,
}

impl Summary {
    pub fn compute(ledger: &Ledger) -> Self {
        let counts = counts_by_outcome(ledger);
        let total_profit = total_profit(ledger);

        Summary {
            counts,
            win_rate: counts.win_rate(),
            total_profit,
            total_reward: sum_for_outcome(ledger, Outcome::TakeProfit, TradeField::RewardPct),
            total_risk: sum_for_outcome(ledger, Outcome::StopLoss, TradeField::RiskPct),
            starting_capital: ledger.starting_capital(),
            capital_total: ledger.starting_capital() + total_profit,
        }
    }
}
