//! Settings for the journal host.

use std::path::PathBuf;

use super::error::JournalError;
use super::trade::BreakevenRule;

pub const DEFAULT_JOURNAL_FILE: &str = "journal_trading.csv";
pub const DEFAULT_RISK_PCT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct JournalConfig {
    pub journal_file: PathBuf,
    pub breakeven_rule: BreakevenRule,
    pub default_risk_pct: f64,
    pub default_reward_pct: f64,
    pub default_instrument: String,
    /// Accepted session labels. Empty means any label is accepted.
    pub session_labels: Vec<String>,
    pub log_level: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        JournalConfig {
            journal_file: PathBuf::from(DEFAULT_JOURNAL_FILE),
            breakeven_rule: BreakevenRule::ReturnStake,
            default_risk_pct: DEFAULT_RISK_PCT,
            default_reward_pct: 0.0,
            default_instrument: String::new(),
            session_labels: Vec::new(),
            log_level: "warn".to_string(),
        }
    }
}

impl JournalConfig {
    pub fn check_session(&self, session: &str) -> Result<(), JournalError> {
        if self.session_labels.is_empty() || self.session_labels.iter().any(|s| s == session) {
            Ok(())
        } else {
            Err(JournalError::InvalidInput {
                field: "session".to_string(),
                reason: format!(
                    "'{}' is not one of: {}",
                    session,
                    self.session_labels.join(", ")
                ),
            })
        }
    }
}
