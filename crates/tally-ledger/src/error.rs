use std::io;
use std::path::PathBuf;

/// Errors from ledger construction and persistence.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The configured backend kind is not recognized.
    #[error("unknown ledger backend {0:?} (expected \"memory\" or \"file\")")]
    UnknownBackend(String),

    /// An existing record file could not be loaded for a reason other than
    /// being absent (permissions, I/O fault).
    #[error("failed to load records from {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing records to the backing file failed.
    #[error("failed to persist records to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
