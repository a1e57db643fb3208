//! Time-bucketed statistics (per month, per year).

use chrono::Datelike;
use std::collections::BTreeMap;
use std::fmt;

use super::ledger::Ledger;
use super::stats::OutcomeCounts;
use super::trade::TradeRecord;

/// A calendar bucket. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    Year(i32),
    Month { year: i32, month: u32 },
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Year(year) => write!(f, "{year}"),
            Period::Month { year, month } => write!(f, "{year}-{month:02}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BucketStats {
    pub period: Period,
    pub counts: OutcomeCounts,
    pub win_rate: f64,
    pub profit: f64,
}

#[derive(Default)]
struct Accumulator {
    counts: OutcomeCounts,
    profit: f64,
}

/// Per-month statistics for `year`, January first. Months without records
/// and records with an unknown date are left out.
pub fn monthly_breakdown(ledger: &Ledger, year: i32) -> Vec<BucketStats> {
    bucket(ledger.records(), |record| {
        record
            .date
            .filter(|d| d.year() == year)
            .map(|d| Period::Month {
                year: d.year(),
                month: d.month(),
            })
    })
}

/// Per-year statistics, oldest first. Records with an unknown date are left
/// out.
pub fn yearly_breakdown(ledger: &Ledger) -> Vec<BucketStats> {
    bucket(ledger.records(), |record| {
        record.date.map(|d| Period::Year(d.year()))
    })
}

fn bucket<F>(records: &[TradeRecord], period_of: F) -> Vec<BucketStats>
where
    F: Fn(&TradeRecord) -> Option<Period>,
{
    let mut buckets: BTreeMap<Period, Accumulator> = BTreeMap::new();

    for record in records {
        if let Some(period) = period_of(record) {
            let acc = buckets.entry(period).or_default();
            acc.counts.increment(record.outcome);
            acc.profit += record.profit_or_zero();
        }
    }

    buckets
        .into_iter()
        .map(|(period, acc)| BucketStats {
            period,
            counts: acc.counts,
            win_rate: acc.counts.win_rate(),
            profit: acc.profit,
        })
        .collect()
}
