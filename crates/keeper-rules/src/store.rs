//! Versioned character persistence.
//!
//! Two sessions may load the same character, each change it, and save. The
//! store tracks a version per record so the second save notices the first.
//! [`commit`] resolves such a conflict by letting the last writer win and
//! logging that it happened.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{RulesError, RulesResult};
use crate::sheet::CharacterSheet;

/// A record together with the version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    /// Monotonic version, starting at 1.
    pub version: u64,
    /// The record.
    pub value: T,
}

/// Somewhere character sheets are kept between sessions.
pub trait CharacterStore {
    /// Load a character and its current version.
    fn load(&self, id: &str) -> RulesResult<Versioned<CharacterSheet>>;

    /// Save a character read at `expected_version`. Returns the new version.
    ///
    /// Fails with [`RulesError::PersistenceConflict`] if someone else saved
    /// in between.
    fn save(&self, id: &str, sheet: &CharacterSheet, expected_version: u64) -> RulesResult<u64>;
}

/// An in-memory store guarded by a mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Versioned<CharacterSheet>>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite a character unconditionally. Returns its new version.
    pub fn insert(&self, id: impl Into<String>, sheet: CharacterSheet) -> u64 {
        let mut records = self.records.lock().unwrap_or_else(|p| p.into_inner());
        let id = id.into();
        let version = records.get(&id).map_or(1, |r| r.version + 1);
        records.insert(
            id,
            Versioned {
                version,
                value: sheet,
            },
        );
        version
    }

    /// Number of stored characters.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CharacterStore for MemoryStore {
    fn load(&self, id: &str) -> RulesResult<Versioned<CharacterSheet>> {
        let records = self.records.lock().unwrap_or_else(|p| p.into_inner());
        records
            .get(id)
            .cloned()
            .ok_or_else(|| RulesError::CharacterNotFound(id.to_string()))
    }

    fn save(&self, id: &str, sheet: &CharacterSheet, expected_version: u64) -> RulesResult<u64> {
        let mut records = self.records.lock().unwrap_or_else(|p| p.into_inner());
        let record = records
            .get_mut(id)
            .ok_or_else(|| RulesError::CharacterNotFound(id.to_string()))?;
        if record.version != expected_version {
            return Err(RulesError::PersistenceConflict {
                id: id.to_string(),
                expected: expected_version,
                found: record.version,
            });
        }
        record.version += 1;
        record.value = sheet.clone();
        Ok(record.version)
    }
}

/// Save `sheet`, overwriting any newer version written in the meantime.
///
/// The overwrite is logged at warn level. Gives up after a few rounds if
/// other writers keep getting in first.
pub fn commit(
    store: &dyn CharacterStore,
    id: &str,
    sheet: &CharacterSheet,
    expected_version: u64,
) -> RulesResult<u64> {
    const ATTEMPTS: usize = 3;

    let mut expected = expected_version;
    let mut attempt = 1;
    loop {
        match store.save(id, sheet, expected) {
            Err(RulesError::PersistenceConflict { found, .. }) if attempt < ATTEMPTS => {
                tracing::warn!(
                    character = id,
                    expected,
                    found,
                    "character changed since it was loaded, overwriting"
                );
                expected = found;
                attempt += 1;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(luck: u32) -> CharacterSheet {
        let mut sheet = CharacterSheet::new("Test");
        sheet.luck = crate::sheet::LuckLedger::new(luck);
        sheet
    }

    #[test]
    fn load_and_save_bump_version() {
        let store = MemoryStore::new();
        assert_eq!(store.insert("harvey", sheet(50)), 1);
        let loaded = store.load("harvey").unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(store.save("harvey", &sheet(45), 1).unwrap(), 2);
        assert_eq!(store.load("harvey").unwrap().value.luck.value(), 45);
    }

    #[test]
    fn stale_save_conflicts() {
        let store = MemoryStore::new();
        store.insert("harvey", sheet(50));
        store.save("harvey", &sheet(40), 1).unwrap();
        let err = store.save("harvey", &sheet(45), 1).unwrap_err();
        assert!(matches!(
            err,
            RulesError::PersistenceConflict {
                expected: 1,
                found: 2,
                ..
            }
        ));
        assert_eq!(store.load("harvey").unwrap().value.luck.value(), 40);
    }

    #[test]
    fn commit_lets_last_writer_win() {
        let store = MemoryStore::new();
        store.insert("harvey", sheet(50));
        let first = store.load("harvey").unwrap();
        let second = store.load("harvey").unwrap();

        store.save("harvey", &sheet(40), first.version).unwrap();
        let version = commit(&store, "harvey", &sheet(45), second.version).unwrap();
        assert_eq!(version, 3);
        assert_eq!(store.load("harvey").unwrap().value.luck.value(), 45);
    }

    #[test]
    fn missing_character() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(matches!(
            store.load("nobody"),
            Err(RulesError::CharacterNotFound(_))
        ));
        assert!(matches!(
            commit(&store, "nobody", &sheet(1), 1),
            Err(RulesError::CharacterNotFound(_))
        ));
    }
}
