//! tradelog: personal trading journal.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], and a command-line host in
//! [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
