//! Journal persistence port trait.

use crate::domain::error::JournalError;
use crate::domain::ledger::Ledger;
use crate::domain::trade::BreakevenRule;

/// Durable storage for a ledger.
pub trait JournalPort {
    /// Hydrate a ledger. A store that holds nothing yet yields an empty ledger
    /// using `rule` for future entries.
    fn load(&self, rule: BreakevenRule) -> Result<Ledger, JournalError>;

    fn save(&self, ledger: &Ledger) -> Result<(), JournalError>;
}
