//! Concrete adapter implementations for ports.

pub mod column_migration;
pub mod csv_journal;
pub mod file_config_adapter;
