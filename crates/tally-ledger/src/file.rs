use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::traits::{recent_window, Ledger};

/// File-backed record ledger.
///
/// On open, existing records are loaded from the configured path, one record
/// per line in file order, blank lines skipped. At runtime records accumulate
/// in memory exactly like [`MemoryLedger`]; no per-append disk write occurs.
/// Durability happens only at `close`, which appends the full in-memory
/// sequence to the file (creating it if absent) -- so a crash between opens
/// loses unsaved records, and closing more than once writes the sequence
/// once per call.
///
/// On-disk format: plain text, newline-terminated records in chronological
/// append order, no header.
///
/// [`MemoryLedger`]: crate::memory::MemoryLedger
pub struct FileLedger {
    path: PathBuf,
    records: RwLock<Vec<String>>,
}

impl FileLedger {
    /// Open a ledger backed by the file at `path`.
    ///
    /// A missing file is not an error: the ledger starts empty and the file
    /// is created on `close`. Any other open failure (permissions, I/O
    /// fault) is surfaced -- the service must not start against storage it
    /// could not load.
    pub fn open(path: &Path) -> LedgerResult<Self> {
        let records = match File::open(path) {
            Ok(file) => load_records(file).map_err(|source| LedgerError::Load {
                path: path.to_path_buf(),
                source,
            })?,
            Err(source) if source.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(LedgerError::Load {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        debug!(path = %path.display(), loaded = records.len(), "opened file ledger");
        Ok(Self {
            path: path.to_path_buf(),
            records: RwLock::new(records),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records currently held in memory.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the ledger holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().expect("lock poisoned").is_empty()
    }

    fn persist_err(&self, source: io::Error) -> LedgerError {
        LedgerError::Persist {
            path: self.path.clone(),
            source,
        }
    }
}

fn load_records(file: File) -> io::Result<Vec<String>> {
    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if !line.is_empty() {
            records.push(line);
        }
    }
    Ok(records)
}

impl Ledger for FileLedger {
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
        let records = self.records.read().expect("lock poisoned");

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.persist_err(e))?;
        let mut writer = BufWriter::new(file);

        for record in records.iter() {
            writer.write_all(record.as_bytes()).map_err(|e| self.persist_err(e))?;
            writer.write_all(b"\n").map_err(|e| self.persist_err(e))?;
        }
        writer.flush().map_err(|e| self.persist_err(e))?;

        debug!(path = %self.path.display(), persisted = records.len(), "file ledger flushed");
        Ok(())
    }
}

impl std::fmt::Debug for FileLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLedger")
            .field("path", &self.path)
            .field("record_count", &self.len())
            .finish()
    }
}
