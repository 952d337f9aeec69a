//! Append-only event log consumed by off-chain monitoring tooling.

use log::debug;
use serde::{Deserialize, Serialize};

use recicla_shared_types::Event;

/// Ordered record of everything the ledger has emitted. Entries are only
/// ever appended; subscribers poll with [`EventLog::since`] using the index
/// of the last entry they consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: Event) {
        debug!("event emitted: {:?}", event);
        self.entries.push(event);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries emitted so far, oldest first.
    pub fn all(&self) -> &[Event] {
        &self.entries
    }

    /// Entries emitted at or after `index`. An index past the end yields
    /// an empty slice rather than an error.
    pub fn since(&self, index: usize) -> &[Event] {
        &self.entries[index.min(self.entries.len())..]
    }

    /// Serializes the full log as JSON for export to monitoring tooling.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }
}
