use crate::domain::model::{Identifier, LedgerEntry};
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// Every identifier issued so far, in issuance order.
///
/// The value is owned by the caller for the duration of a run: loaded once,
/// extended once with [`Ledger::record`], persisted once.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    index: HashSet<Identifier>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<LedgerEntry>) -> Self {
        let index = entries.iter().map(|e| e.identifier.clone()).collect();
        Self { entries, index }
    }

    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.index.contains(identifier)
    }

    /// Distinct identifiers; a hand-edited file may repeat one.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Appends `identifiers` with one shared timestamp and returns the new entries.
    ///
    /// Membership is not re-checked here; the allocator already filtered the batch.
    pub fn record(&mut self, identifiers: &[Identifier], issued_at: NaiveDateTime) -> Vec<LedgerEntry> {
        let new_entries: Vec<LedgerEntry> = identifiers
            .iter()
            .map(|identifier| LedgerEntry {
                identifier: identifier.clone(),
                issued_at,
            })
            .collect();

        self.index.extend(identifiers.iter().cloned());
        self.entries.extend(new_entries.iter().cloned());
        new_entries
    }
}
