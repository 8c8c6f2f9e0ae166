//! Append-only record ledger for the Tally calculation service.
//!
//! Every completed calculation is stored as one formatted string (a
//! *record*, e.g. `"3 + 4 = 7"`) in an ordered, insertion-order-preserving
//! sequence. Two backends implement the [`Ledger`] capability:
//!
//! - [`MemoryLedger`] -- process-lifetime storage; nothing survives exit
//! - [`FileLedger`] -- loads existing records on open, persists on close
//!
//! # Design Rules
//!
//! 1. Records are immutable once appended and never reordered or deleted.
//! 2. Queries receive independent copies, never views into the sequence.
//! 3. Writers are serialized; readers may run concurrently with each other.
//! 4. The ledger never interprets record contents -- it stores opaque lines.
//! 5. Load failures other than "file absent" abort construction.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{LedgerError, LedgerResult};
pub use file::FileLedger;
pub use memory::MemoryLedger;
pub use traits::Ledger;

use std::path::Path;

/// Construct the ledger backend named by `kind`.
///
/// `"memory"` ignores `path`; `"file"` opens (or later creates) the file at
/// `path`. An unrecognized kind is rejected with
/// [`LedgerError::UnknownBackend`] rather than yielding an unusable
/// placeholder.
pub fn open_ledger(kind: &str, path: &Path) -> LedgerResult<Box<dyn Ledger>> {
    match kind {
        "memory" => Ok(Box::new(MemoryLedger::new())),
        "file" => Ok(Box::new(FileLedger::open(path)?)),
        other => Err(LedgerError::UnknownBackend(other.to_string())),
    }
}
