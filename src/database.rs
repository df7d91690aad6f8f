use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Database worker failed: {0}")]
    WorkerError(String),
}

impl DatabaseError {
    /// True when SQLite rejected a write because of a PRIMARY KEY, UNIQUE,
    /// NOT NULL or FOREIGN KEY constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::SqliteError(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
        )
    }
}

/// Shared handle to the task database.
///
/// Cloning is cheap; every clone refers to the same connection. Work is done
/// through [`Database::transaction`], which scopes a single transaction to
/// one closure: committed when the closure returns `Ok`, rolled back on
/// `Err` or panic.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) a database file and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;

        tracing::info!(path = %db_path.display(), "Opened task database");
        Self::from_connection(conn)
    }

    /// Open a private in-memory database, used by tests and `--database :memory:`
    pub fn in_memory() -> Result<Self, DatabaseError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        // Cascades from tasks to dones depend on this; SQLite leaves it off per connection.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::initialize_schema(&conn)?;

        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(conn: &Connection) -> Result<(), DatabaseError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           VARCHAR(1024) NOT NULL,
                due_date        DATE
            );
            CREATE TABLE IF NOT EXISTS dones (
                id              INTEGER PRIMARY KEY
                                REFERENCES tasks(id) ON DELETE CASCADE
            );",
        )?;
        Ok(())
    }

    /// Run `f` inside one transaction on the calling thread.
    ///
    /// The connection stays locked for the whole closure, so a read followed
    /// by a dependent write cannot interleave with another caller.
    pub fn transaction_blocking<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<DatabaseError>,
    {
        let mut conn = self.conn.lock().unwrap_or_else(|poisoned| {
            // The panicking holder's transaction was rolled back when it unwound.
            tracing::warn!("Recovering database connection from a poisoned lock");
            poisoned.into_inner()
        });

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(DatabaseError::from)?;
        let value = f(&tx)?;
        tx.commit().map_err(DatabaseError::from)?;
        Ok(value)
    }

    /// Run `f` inside one transaction on tokio's blocking pool.
    pub async fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<DatabaseError> + Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.transaction_blocking(f))
            .await
            .map_err(|e| DatabaseError::WorkerError(e.to_string()))?
    }
}
