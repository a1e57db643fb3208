//! Port traits between the domain and its storage/configuration sources.

pub mod config_port;
pub mod journal_port;
