//! Header migration for journals written by older revisions.
//!
//! Column names drifted between revisions (French headers, annotation column
//! renamed `Motif` -> `Remarque` -> `Observation`). Each rule says: if column
//! `target` is absent and column `source` is present, read `target` from
//! `source`. Rules run once per import, in order, so the first matching source
//! wins.

use std::collections::HashMap;

pub const DATE: &str = "Date";
pub const SESSION: &str = "Session";
pub const INSTRUMENT: &str = "Instrument";
pub const OUTCOME: &str = "Outcome";
pub const STAKE: &str = "Stake";
pub const RISK_PCT: &str = "RiskPct";
pub const REWARD_PCT: &str = "RewardPct";
pub const PROFIT: &str = "Profit";
pub const SETUP: &str = "Setup";
pub const OBSERVATION: &str = "Observation";

/// Header written on export, in column order.
pub const CANONICAL_COLUMNS: [&str; 10] = [
    DATE,
    SESSION,
    INSTRUMENT,
    OUTCOME,
    STAKE,
    RISK_PCT,
    REWARD_PCT,
    PROFIT,
    SETUP,
    OBSERVATION,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMigration {
    pub target: &'static str,
    pub source: &'static str,
}

const fn rule(target: &'static str, source: &'static str) -> ColumnMigration {
    ColumnMigration { target, source }
}

pub const MIGRATIONS: &[ColumnMigration] = &[
    rule(INSTRUMENT, "Actif"),
    rule(INSTRUMENT, "Asset"),
    rule(OUTCOME, "Résultat"),
    rule(OUTCOME, "Resultat"),
    rule(STAKE, "Mise (€)"),
    rule(STAKE, "Mise"),
    rule(RISK_PCT, "Risk (%)"),
    rule(REWARD_PCT, "Reward (%)"),
    rule(PROFIT, "Gain (€)"),
    rule(PROFIT, "Gain"),
    rule(OBSERVATION, "Remarque"),
    rule(OBSERVATION, "Motif"),
];

/// Column name to field position, after migration.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    positions: HashMap<String, usize>,
}

impl ColumnMap {
    pub fn from_headers<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut positions = HashMap::new();
        for (i, name) in headers.into_iter().enumerate() {
            let name = name.trim_start_matches('\u{feff}').trim();
            // Duplicate headers: the first one wins.
            positions.entry(name.to_string()).or_insert(i);
        }
        ColumnMap { positions }
    }

    /// Apply `rules` in order. Returns the rules that fired.
    pub fn migrate(&mut self, rules: &[ColumnMigration]) -> Vec<ColumnMigration> {
        let mut applied = Vec::new();
        for rule in rules {
            if self.positions.contains_key(rule.target) {
                continue;
            }
            if let Some(&pos) = self.positions.get(rule.source) {
                self.positions.insert(rule.target.to_string(), pos);
                applied.push(*rule);
            }
        }
        applied
    }

    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_header_needs_no_migration() {
        let mut map = ColumnMap::from_headers(CANONICAL_COLUMNS);
        assert!(map.migrate(MIGRATIONS).is_empty());
        assert_eq!(map.position(PROFIT), Some(7));
    }

    #[test]
    fn legacy_french_header_is_mapped() {
        let headers = [
            "Date",
            "Session",
            "Actif",
            "Résultat",
            "Mise (€)",
            "Risk (%)",
            "Reward (%)",
            "Gain (€)",
        ];
        let mut map = ColumnMap::from_headers(headers);
        let applied = map.migrate(MIGRATIONS);

        assert_eq!(applied.len(), 6);
        assert_eq!(map.position(INSTRUMENT), Some(2));
        assert_eq!(map.position(OUTCOME), Some(3));
        assert_eq!(map.position(STAKE), Some(4));
        assert_eq!(map.position(RISK_PCT), Some(5));
        assert_eq!(map.position(REWARD_PCT), Some(6));
        assert_eq!(map.position(PROFIT), Some(7));
        assert!(!map.contains(OBSERVATION));
    }

    #[test]
    fn existing_target_is_never_overridden() {
        let mut map = ColumnMap::from_headers(["Instrument", "Actif"]);
        assert!(map.migrate(MIGRATIONS).is_empty());
        assert_eq!(map.position(INSTRUMENT), Some(0));
    }

    #[test]
    fn annotation_rename_chain_prefers_newer_name() {
        let mut map = ColumnMap::from_headers(["Motif", "Remarque"]);
        map.migrate(MIGRATIONS);
        assert_eq!(map.position(OBSERVATION), Some(1));

        let mut map = ColumnMap::from_headers(["Motif"]);
        map.migrate(MIGRATIONS);
        assert_eq!(map.position(OBSERVATION), Some(0));
    }

    #[test]
    fn byte_order_mark_and_padding_ignored() {
        let map = ColumnMap::from_headers(["\u{feff}Date", " Outcome "]);
        assert_eq!(map.position(DATE), Some(0));
        assert_eq!(map.position(OUTCOME), Some(1));
    }
}
