//! Durable key-value storage used to mirror planner state.
//!
//! # Responsibility
//! - Define the `put/get` contract the color store persists through.
//! - Provide SQLite-backed and in-memory implementations.
//! - Run writes on a background thread so callers never wait on the backend.
//!
//! # Invariants
//! - Values are opaque UTF-8 strings (JSON by convention of the callers).
//! - `put` replaces any previous value stored under the same key.

use crate::db::migrations::latest_version;
use crate::db::{open_db, open_db_in_memory, DbError};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};

pub type StorageResult<T> = Result<T, StorageError>;

/// Errors from durable storage reads and writes.
#[derive(Debug)]
pub enum StorageError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Stored value could not be encoded or decoded.
    Serialization(serde_json::Error),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection { expected: u32, actual: u32 },
    /// Backend cannot serve requests (for example a poisoned lock).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid stored value: {err}"),
            Self::UninitializedConnection { expected, actual } => write!(
                f,
                "storage connection schema version {actual} does not match expected {expected}"
            ),
            Self::Unavailable(details) => write!(f, "storage unavailable: {details}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::UninitializedConnection { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Durable key-value contract.
pub trait KeyValueStorage: Send {
    fn put(&self, key: &str, value: &str) -> StorageResult<()>;
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
}

/// SQLite-backed storage over the `kv_entries` table.
pub struct SqliteKeyValueStorage {
    conn: Connection,
}

impl SqliteKeyValueStorage {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a migrated in-memory database.
    pub fn in_memory() -> StorageResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Wraps an existing connection after checking it is fully migrated.
    pub fn try_new(conn: Connection) -> StorageResult<Self> {
        let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected = latest_version();
        if actual != expected {
            return Err(StorageError::UninitializedConnection { expected, actual });
        }
        Ok(Self { conn })
    }
}

impl KeyValueStorage for SqliteKeyValueStorage {
    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

/// Process-local storage; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> T,
    ) -> StorageResult<T> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))?;
        Ok(f(&mut entries))
    }
}

impl KeyValueStorage for MemoryKeyValueStorage {
    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.with_entries(|entries| entries.get(key).cloned())
    }
}

enum WriteCommand {
    Put { key: String, value: String },
    Flush(mpsc::Sender<()>),
}

/// Fire-and-forget writer that owns a backend on a dedicated thread.
///
/// `put` only enqueues; the thread applies writes in submission order and
/// logs failures. Dropping the writer drains the queue before returning.
pub struct WriteBehind {
    sender: Option<mpsc::Sender<WriteCommand>>,
    worker: Option<JoinHandle<()>>,
}

impl WriteBehind {
    pub fn spawn(storage: Box<dyn KeyValueStorage>) -> StorageResult<Self> {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("warmap-storage".to_string())
            .spawn(move || run_writer(storage.as_ref(), receiver))
            .map_err(|err| StorageError::Unavailable(format!("writer thread: {err}")))?;
        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Queues `value` under `key` without waiting for the backend.
    pub fn put(&self, key: &str, value: String) -> StorageResult<()> {
        self.send(WriteCommand::Put {
            key: key.to_string(),
            value,
        })
    }

    /// Blocks until every write queued before this call has been applied.
    pub fn flush(&self) -> StorageResult<()> {
        let (ack, done) = mpsc::channel();
        self.send(WriteCommand::Flush(ack))?;
        done.recv()
            .map_err(|_| StorageError::Unavailable("storage writer stopped".to_string()))
    }

    fn send(&self, command: WriteCommand) -> StorageResult<()> {
        self.sender
            .as_ref()
            .and_then(|sender| sender.send(command).ok())
            .ok_or_else(|| StorageError::Unavailable("storage writer stopped".to_string()))
    }
}

impl Drop for WriteBehind {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("event=storage_writer module=storage status=error error=writer_panicked");
            }
        }
    }
}

fn run_writer(storage: &dyn KeyValueStorage, receiver: mpsc::Receiver<WriteCommand>) {
    for command in receiver {
        match command {
            WriteCommand::Put { key, value } => match storage.put(&key, &value) {
                Ok(()) => debug!(
                    "event=storage_put module=storage status=ok key={} bytes={}",
                    key,
                    value.len()
                ),
                Err(err) => warn!(
                    "event=storage_put module=storage status=error key={} error={}",
                    key, err
                ),
            },
            WriteCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        KeyValueStorage, MemoryKeyValueStorage, SqliteKeyValueStorage, StorageError, WriteBehind,
    };
    use rusqlite::Connection;

    #[test]
    fn sqlite_put_replaces_previous_value() {
        let storage = SqliteKeyValueStorage::in_memory().unwrap();
        assert_eq!(storage.get("dayColorsMap").unwrap(), None);

        storage.put("dayColorsMap", "{}").unwrap();
        storage.put("dayColorsMap", r#"{"Jan":{}}"#).unwrap();
        assert_eq!(
            storage.get("dayColorsMap").unwrap().as_deref(),
            Some(r#"{"Jan":{}}"#)
        );
    }

    #[test]
    fn try_new_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteKeyValueStorage::try_new(conn)
            .err()
            .expect("unmigrated connection must be rejected");
        assert!(matches!(
            err,
            StorageError::UninitializedConnection { actual: 0, .. }
        ));
    }

    #[test]
    fn memory_clones_share_entries() {
        let storage = MemoryKeyValueStorage::new();
        let observer = storage.clone();
        storage.put("k", "v").unwrap();
        assert_eq!(observer.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn write_behind_applies_writes_in_order() {
        let backend = MemoryKeyValueStorage::new();
        let writer = WriteBehind::spawn(Box::new(backend.clone())).unwrap();
        writer.put("k", "first".to_string()).unwrap();
        writer.put("k", "second".to_string()).unwrap();
        writer.flush().unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn dropping_write_behind_drains_queue() {
        let backend = MemoryKeyValueStorage::new();
        let writer = WriteBehind::spawn(Box::new(backend.clone())).unwrap();
        writer.put("k", "v".to_string()).unwrap();
        drop(writer);
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("v"));
    }
}
