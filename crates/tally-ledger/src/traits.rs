use crate::error::LedgerResult;

/// Append-only record ledger.
///
/// All implementations must satisfy these invariants:
/// - Records are immutable once appended and the sequence is never
///   reordered; there is no delete operation.
/// - `append` serializes writers: under concurrent invocation no record is
///   lost and no reader observes a torn intermediate state.
/// - Any number of `recent` calls may run concurrently with each other; a
///   writer excludes both readers and other writers.
/// - Query results are independent copies; the internal sequence is never
///   exposed to callers.
pub trait Ledger: std::fmt::Debug + Send + Sync {
    /// Append one record to the end of the sequence.
    fn append(&self, record: &str);

    /// Return the last `min(n, len)` records, oldest-first within the
    /// returned window.
    ///
    /// Never fails: a ledger shorter than `n` simply yields fewer records,
    /// and `n = 0` yields an empty vector. Count defaulting and clamping
    /// belong to the caller, not the ledger.
    fn recent(&self, n: usize) -> Vec<String>;

    /// Flush records to durable storage, where the backend has any.
    ///
    /// Non-durable backends return `Ok(())` without side effects. Called
    /// once at service shutdown; the caller decides whether a failure is
    /// fatal.
    fn close(&self) -> LedgerResult<()>;
}

/// Trailing window of `records`, oldest-first, copied out.
pub(crate) fn recent_window(records: &[String], n: usize) -> Vec<String> {
    let start = records.len().saturating_sub(n);
    records[start..].to_vec()
}
