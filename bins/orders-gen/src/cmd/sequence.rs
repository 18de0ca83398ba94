use std::path::PathBuf;

use super::error::OrdersGenError;

// ═══════════════════════════════════════════════════════════════
//  SequenceStore
// ═══════════════════════════════════════════════════════════════

/// Persisted id horizon: the next unused monotonic id.
///
/// One producer run owns the store exclusively; the same loop works
/// against a local file, a database row or a counter service behind this
/// interface.
pub trait SequenceStore {
    /// Last persisted value. Returns 1 when the backing artifact is
    /// missing or does not hold a valid non-negative integer, treating the
    /// run as fresh. Nothing is written at read time.
    fn read_current(&self) -> u64;

    /// Durably persist the next unused id. Errors are surfaced to the
    /// caller: a run must not continue believing a horizon was persisted
    /// when it was not.
    fn commit(&self, next_id: u64) -> Result<(), OrdersGenError>;
}

// ═══════════════════════════════════════════════════════════════
//  FileSequenceStore
// ═══════════════════════════════════════════════════════════════

/// The horizon as a decimal-text file.
///
/// Commits write a sibling temp file and rename it over the target, so a
/// reader never observes a torn value.
pub struct FileSequenceStore {
    path: PathBuf,
}

impl FileSequenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn store_err(&self, source: std::io::Error) -> OrdersGenError {
        OrdersGenError::Store {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl SequenceStore for FileSequenceStore {
    fn read_current(&self) -> u64 {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match contents.trim().parse::<u64>() {
                Ok(value) => value,
                Err(_) => {
                    tracing::info!(path = %self.path.display(), "unreadable counter, starting from 1");
                    1
                }
            },
            Err(_) => 1,
        }
    }

    fn commit(&self, next_id: u64) -> Result<(), OrdersGenError> {
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, next_id.to_string()).map_err(|e| self.store_err(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.store_err(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_one_and_stays_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.txt");
        let store = FileSequenceStore::new(&path);

        assert_eq!(store.read_current(), 1);
        assert!(!path.exists()); // read does not initialize the artifact
    }

    #[test]
    fn corrupt_file_reads_as_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.txt");
        std::fs::write(&path, "abc").unwrap();

        assert_eq!(FileSequenceStore::new(&path).read_current(), 1);
    }

    #[test]
    fn negative_value_reads_as_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.txt");
        std::fs::write(&path, "-5").unwrap();

        assert_eq!(FileSequenceStore::new(&path).read_current(), 1);
    }

    #[test]
    fn commit_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.txt");
        let store = FileSequenceStore::new(&path);

        store.commit(101).unwrap();
        assert_eq!(store.read_current(), 101);

        store.commit(251).unwrap();
        assert_eq!(store.read_current(), 251);
    }

    #[test]
    fn restart_sees_last_committed_horizon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.txt");

        FileSequenceStore::new(&path).commit(101).unwrap();

        // A new instance, as after a crash and restart.
        assert_eq!(FileSequenceStore::new(&path).read_current(), 101);
    }

    #[test]
    fn commit_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("id.txt");
        let store = FileSequenceStore::new(&path);

        assert!(matches!(store.commit(5), Err(OrdersGenError::Store { .. })));
    }

    #[test]
    fn whitespace_around_value_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.txt");
        std::fs::write(&path, " 42\n").unwrap();

        assert_eq!(FileSequenceStore::new(&path).read_current(), 42);
    }
}
