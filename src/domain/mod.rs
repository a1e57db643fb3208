//! Core domain types and logic: trades, the ledger and its statistics.

pub mod trade;
pub mod trade_date;
pub mod ledger;
pub mod stats;
pub mod breakdown;
pub mod journal_config;
pub mod config_validation;
pub mod error;
