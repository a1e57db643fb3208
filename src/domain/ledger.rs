//! The trade ledger: ordered records plus starting capital.

use super::error::ValidationError;
use super::trade::{check_amount, check_finite, BreakevenRule, TradeCandidate, TradeRecord};

/// Ordered trade records and the starting capital they are measured against.
///
/// Insertion order is display and report order. Every mutating operation
/// either succeeds completely or leaves the ledger untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger {
    records: Vec<TradeRecord>,
    starting_capital: f64,
    breakeven_rule: BreakevenRule,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_breakeven_rule(breakeven_rule: BreakevenRule) -> Self {
        Ledger {
            breakeven_rule,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&TradeRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn starting_capital(&self) -> f64 {
        self.starting_capital
    }

    pub fn breakeven_rule(&self) -> BreakevenRule {
        self.breakeven_rule
    }

    /// Derive profit for `candidate` and append it. Returns the new index.
    pub fn add_trade(&mut self, candidate: TradeCandidate) -> Result<usize, ValidationError> {
        let record = candidate.into_record(self.breakeven_rule)?;
        self.records.push(record);
        Ok(self.records.len() - 1)
    }

    /// Replace the record at `index`, re-deriving its profit.
    pub fn edit_trade(
        &mut self,
        index: usize,
        candidate: TradeCandidate,
    ) -> Result<(), ValidationError> {
        self.check_index(index)?;
        let record = candidate.into_record(self.breakeven_rule)?;
        self.records[index] = record;
        Ok(())
    }

    /// Remove the record at `index`; later records shift down by one.
    pub fn remove_trade(&mut self, index: usize) -> Result<TradeRecord, ValidationError> {
        self.check_index(index)?;
        Ok(self.records.remove(index))
    }

    pub fn set_starting_capital(&mut self, amount: f64) -> Result<(), ValidationError> {
        check_amount("capital", amount)?;
        self.starting_capital = amount;
        Ok(())
    }

    /// Top up the starting capital. Only additions are accepted.
    pub fn add_to_capital(&mut self, delta: f64) -> Result<(), ValidationError> {
        check_amount("capital top-up", delta)?;
        let total = self.starting_capital + delta;
        check_finite("capital", total)?;
        self.starting_capital = total;
        Ok(())
    }

    pub fn reset_capital(&mut self) {
        self.starting_capital = 0.0;
    }

    /// Swap in content read from storage. Stored profits are kept as-is.
    pub(crate) fn restore(&mut self, records: Vec<TradeRecord>, starting_capital: f64) {
        self.records = records;
        self.starting_capital = starting_capital;
    }

    fn check_index(&self, index: usize) -> Result<(), ValidationError> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange {
                index,
                len: self.records.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::Outcome;

    fn tp(stake: f64, reward: f64) -> TradeCandidate {
        TradeCandidate::new(Outcome::TakeProfit, stake, 1.0, reward)
    }

    fn sl(stake: f64) -> TradeCandidate {
        TradeCandidate::new(Outcome::StopLoss, stake, 1.0, 0.0)
    }

    #[test]
    fn new_ledger_is_empty() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
        assert_eq!(ledger.starting_capital(), 0.0);
        assert_eq!(ledger.breakeven_rule(), BreakevenRule::ReturnStake);
    }

    #[test]
    fn add_trade_appends_in_order() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.add_trade(tp(50.0, 2.0)).unwrap(), 0);
        assert_eq!(ledger.add_trade(sl(30.0)).unwrap(), 1);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.records()[0].outcome, Outcome::TakeProfit);
        assert_eq!(ledger.records()[0].profit, Some(100.0));
        assert_eq!(ledger.records()[1].outcome, Outcome::StopLoss);
        assert_eq!(ledger.records()[1].profit, Some(-30.0));
    }

    #[test]
    fn stop_loss_then_remove_leaves_empty_ledger() {
        let mut ledger = Ledger::new();
        ledger.add_trade(sl(100.0)).unwrap();
        assert_eq!(ledger.get(0).unwrap().profit, Some(-100.0));

        let removed = ledger.remove_trade(0).unwrap();
        assert_eq!(removed.profit, Some(-100.0));
        assert!(ledger.is_empty());
    }

    #[test]
    fn remove_closes_gap() {
        let mut ledger = Ledger::new();
        ledger.add_trade(tp(10.0, 1.0)).unwrap();
        ledger.add_trade(tp(20.0, 1.0)).unwrap();
        ledger.add_trade(tp(30.0, 1.0)).unwrap();

        ledger.remove_trade(1).unwrap();
        let stakes: Vec<_> = ledger.records().iter().map(|r| r.stake).collect();
        assert_eq!(stakes, vec![Some(10.0), Some(30.0)]);
    }

    #[test]
    fn remove_out_of_range() {
        let mut ledger = Ledger::new();
        ledger.add_trade(tp(10.0, 1.0)).unwrap();
        let err = ledger.remove_trade(1).unwrap_err();
        assert_eq!(err, ValidationError::OutOfRange { index: 1, len: 1 });
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn edit_recomputes_profit_in_place() {
        let mut ledger = Ledger::new();
        ledger.add_trade(tp(10.0, 1.0)).unwrap();
        ledger.add_trade(tp(20.0, 3.0)).unwrap();

        ledger.edit_trade(0, sl(40.0)).unwrap();
        assert_eq!(ledger.records()[0].outcome, Outcome::StopLoss);
        assert_eq!(ledger.records()[0].profit, Some(-40.0));
        assert_eq!(ledger.records()[1].profit, Some(60.0));
    }

    #[test]
    fn edit_out_of_range() {
        let mut ledger = Ledger::new();
        let err = ledger.edit_trade(0, sl(40.0)).unwrap_err();
        assert_eq!(err, ValidationError::OutOfRange { index: 0, len: 0 });
    }

    #[test]
    fn rejected_edit_keeps_original_record() {
        let mut ledger = Ledger::new();
        ledger.add_trade(tp(10.0, 1.0)).unwrap();
        let before = ledger.clone();

        assert!(ledger.edit_trade(0, sl(-5.0)).is_err());
        assert_eq!(ledger, before);
    }

    #[test]
    fn rejected_add_keeps_ledger_unchanged() {
        let mut ledger = Ledger::new();
        ledger.add_trade(tp(10.0, 1.0)).unwrap();
        let before = ledger.clone();

        assert!(ledger.add_trade(tp(-10.0, 1.0)).is_err());
        assert_eq!(ledger, before);
    }

    #[test]
    fn capital_operations() {
        let mut ledger = Ledger::new();
        ledger.set_starting_capital(1000.0).unwrap();
        ledger.add_to_capital(250.5).unwrap();
        assert_eq!(ledger.starting_capital(), 1250.5);

        ledger.reset_capital();
        assert_eq!(ledger.starting_capital(), 0.0);
    }

    #[test]
    fn negative_capital_rejected() {
        let mut ledger = Ledger::new();
        ledger.set_starting_capital(500.0).unwrap();

        let err = ledger.set_starting_capital(-1.0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAmount { .. }));
        let err = ledger.add_to_capital(-100.0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAmount { .. }));

        assert_eq!(ledger.starting_capital(), 500.0);
    }

    #[test]
    fn zero_breakeven_rule_applies_to_new_trades() {
        let mut ledger = Ledger::with_breakeven_rule(BreakevenRule::Zero);
        ledger
            .add_trade(TradeCandidate::new(Outcome::Breakeven, 75.0, 1.0, 2.0))
            .unwrap();
        assert_eq!(ledger.records()[0].profit, Some(0.0));
        assert_eq!(ledger.records()[0].stake, Some(75.0));
    }

    #[test]
    fn restore_keeps_stored_profit() {
        let mut ledger = Ledger::new();
        let record = TradeRecord {
            outcome: Outcome::TakeProfit,
            stake: Some(10.0),
            reward_pct: Some(2.0),
            profit: Some(999.0),
            ..Default::default()
        };
        ledger.restore(vec![record], 42.0);
        assert_eq!(ledger.records()[0].profit, Some(999.0));
        assert_eq!(ledger.starting_capital(), 42.0);
    }

    #[test]
    fn capital_row_name_cannot_be_a_trade() {
        let mut ledger = Ledger::new();
        ledger.add_trade(tp(10.0, 2.0)).unwrap();

        let mut reserved = tp(10.0, 2.0);
        reserved.instrument = "__CAPITAL__".into();
        let err = ledger.add_trade(reserved.clone()).unwrap_err();
        assert!(matches!(err, ValidationError::ReservedInstrument { .. }));
        let err = ledger.edit_trade(0, reserved).unwrap_err();
        assert!(matches!(err, ValidationError::ReservedInstrument { .. }));

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.records()[0].instrument, "");
    }

    #[test]
    fn overflowing_profit_leaves_ledger_untouched() {
        let mut ledger = Ledger::new();
        let err = ledger.add_trade(tp(1e300, 1e10)).unwrap_err();
        assert!(matches!(err, ValidationError::NonFinite { field: "profit", .. }));
        assert!(ledger.is_empty());
    }

    #[test]
    fn overflowing_capital_top_up_rejected() {
        let mut ledger = Ledger::new();
        ledger.set_starting_capital(f64::MAX).unwrap();
        let err = ledger.add_to_capital(f64::MAX).unwrap_err();
        assert!(matches!(err, ValidationError::NonFinite { field: "capital", .. }));
        assert_eq!(ledger.starting_capital(), f64::MAX);
    }
}
