//! Ledger persistence.
//!
//! Manages loading and saving the ledger blob from a key-value slot.
//! Loading never fails: anything unreadable degrades to an empty ledger.

use super::LedgerState;
use crate::error::StorageError;
use crate::policy::{DAILY_TARGET, STORAGE_KEY};
use crate::storage::Slot;

/// Storage for the user's ledger
pub struct LedgerStore {
    slot: Box<dyn Slot>,
    key: String,
}

impl LedgerStore {
    /// Store the ledger under the standard key.
    pub fn new(slot: Box<dyn Slot>) -> Self {
        Self::with_key(slot, STORAGE_KEY)
    }

    pub fn with_key(slot: Box<dyn Slot>, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored ledger. `Ok(None)` when nothing was saved yet.
    ///
    /// # Errors
    /// Returns an error if the slot cannot be read or the blob is malformed.
    pub fn try_load(&self) -> Result<Option<LedgerState>, StorageError> {
        let Some(blob) = self.slot.read(&self.key)? else {
            return Ok(None);
        };
        let mut state: LedgerState = serde_json::from_str(&blob)?;
        state.daily_target = DAILY_TARGET;
        Ok(Some(state))
    }

    /// Load the ledger, falling back to the zero-valued default.
    pub fn load(&self) -> LedgerState {
        match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no saved ledger, starting fresh");
                LedgerState::default()
            }
            Err(e) => {
                tracing::warn!(key = %self.key, "error loading saved data: {e}");
                LedgerState::default()
            }
        }
    }

    /// Serialize and write the whole ledger.
    ///
    /// # Errors
    /// Returns an error if the slot rejects the write. The caller's
    /// in-memory state stays authoritative either way.
    pub fn save(&mut self, state: &LedgerState) -> Result<(), StorageError> {
        let blob = serde_json::to_string(state)?;
        self.slot.write(&self.key, &blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlot;
    use chrono::{TimeZone, Utc};

    struct FullSlot;

    impl Slot for FullSlot {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: "unavailable".into(),
            })
        }

        fn write(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteFailed {
                key: key.to_string(),
                message: "quota exceeded".into(),
            })
        }
    }

    #[test]
    fn missing_key_loads_default() {
        let store = LedgerStore::new(Box::new(MemorySlot::new()));
        assert_eq!(store.load(), LedgerState::default());
    }

    #[test]
    fn malformed_blob_loads_default() {
        let slot = MemorySlot::new();
        slot.put_raw(STORAGE_KEY, "{not json");
        let store = LedgerStore::new(Box::new(slot.clone()));
        assert!(store.try_load().is_err());
        assert_eq!(store.load(), LedgerState::default());

        slot.put_raw(STORAGE_KEY, r#"{"tokenCount": -5}"#);
        assert_eq!(store.load(), LedgerState::default());
    }

    #[test]
    fn unreadable_slot_loads_default() {
        let store = LedgerStore::new(Box::new(FullSlot));
        assert_eq!(store.load(), LedgerState::default());
    }

    #[test]
    fn failed_write_is_reported() {
        let mut store = LedgerStore::new(Box::new(FullSlot));
        let err = store.save(&LedgerState::default()).unwrap_err();
        assert!(matches!(err, StorageError::WriteFailed { .. }));
    }

    #[test]
    fn stored_target_is_ignored() {
        let slot = MemorySlot::new();
        slot.put_raw(STORAGE_KEY, r#"{"tokenCount": 200, "dailyTarget": 5}"#);
        let store = LedgerStore::new(Box::new(slot));
        let state = store.load();
        assert_eq!(state.token_balance, 200);
        assert_eq!(state.daily_target, DAILY_TARGET);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let mut store = LedgerStore::new(Box::new(MemorySlot::new()));
        let mut state = LedgerState::default();
        state.credit(100, Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap());
        state.last_reset_date = "Fri Oct 16 2026".into();
        store.save(&state).unwrap();
        assert_eq!(store.load(), state);
    }
}
