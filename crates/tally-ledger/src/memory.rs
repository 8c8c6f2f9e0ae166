use std::sync::RwLock;

use crate::error::LedgerResult;
use crate::traits::{recent_window, Ledger};

/// In-memory, process-lifetime record ledger.
///
/// Records are held in a `Vec` behind a `RwLock` for safe concurrent access
/// and vanish when the process exits. `close` is a no-op.
pub struct MemoryLedger {
    records: RwLock<Vec<String>>,
}

impl MemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.records.read().expect("lock poisoned").is_empty()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for MemoryLedger {
    fn append(&self, record: &str) {
        self.records
            .write()
            .expect("lock poisoned")
            .push(record.to_string());
    }

    fn recent(&self, n: usize) -> Vec<String> {
        let records = self.records.read().expect("lock poisoned");
        recent_window(&records, n)
    }

    fn close(&self) -> LedgerResult<()> {
        Ok(())
    }
}

impl std::fmt::Debug for MemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryLedger")
            .field("record_count", &self.len())
            .finish()
    }
}
