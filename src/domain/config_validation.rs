//! Configuration validation.
//!
//! Every key is optional; only values that are present get checked.

use crate::domain::error::JournalError;
use crate::domain::trade::BreakevenRule;
use crate::ports::config_port::ConfigPort;

pub fn validate_journal_config(config: &dyn ConfigPort) -> Result<(), JournalError> {
    validate_journal_file(config)?;
    validate_breakeven_rule(config)?;
    validate_default_amount(config, "default_risk_pct")?;
    validate_default_amount(config, "default_reward_pct")?;
    validate_session_labels(config)?;
    validate_log_level(config)?;
    Ok(())
}

fn validate_journal_file(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_string("journal", "file") {
        Some(s) if s.trim().is_empty() => Err(JournalError::ConfigInvalid {
            section: "journal".to_string(),
            key: "file".to_string(),
            reason: "file must not be empty".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_breakeven_rule(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_string("journal", "breakeven_rule") {
        Some(s) if BreakevenRule::parse(&s).is_none() => Err(JournalError::ConfigInvalid {
            section: "journal".to_string(),
            key: "breakeven_rule".to_string(),
            reason: format!("unknown rule '{}', expected 'stake' or 'zero'", s),
        }),
        _ => Ok(()),
    }
}

fn validate_default_amount(config: &dyn ConfigPort, key: &str) -> Result<(), JournalError> {
    let Some(raw) = config.get_string("journal", key) else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(()),
        Ok(_) => Err(JournalError::ConfigInvalid {
            section: "journal".to_string(),
            key: key.to_string(),
            reason: format!("{} must be non-negative", key),
        }),
        Err(_) => Err(JournalError::ConfigInvalid {
            section: "journal".to_string(),
            key: key.to_string(),
            reason: format!("{} must be a number", key),
        }),
    }
}

fn validate_session_labels(config: &dyn ConfigPort) -> Result<(), JournalError> {
    if config
        .get_list("sessions", "labels")
        .iter()
        .any(|label| label.is_empty())
    {
        return Err(JournalError::ConfigInvalid {
            section: "sessions".to_string(),
            key: "labels".to_string(),
            reason: "empty session label in list".to_string(),
        });
    }
    Ok(())
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

fn validate_log_level(config: &dyn ConfigPort) -> Result<(), JournalError> {
    match config.get_string("logging", "level") {
        Some(level) if !LOG_LEVELS.contains(&level.trim().to_ascii_lowercase().as_str()) => {
            Err(JournalError::ConfigInvalid {
                section: "logging".to_string(),
                key: "level".to_string(),
                reason: format!("unknown level '{}', expected one of {}", level, LOG_LEVELS.join(", ")),
            })
        }
        _ => Ok(()),
    }
}
