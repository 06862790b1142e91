use rusqlite::Connection;
use std::cell::RefCell;
use std::time::Duration;

use crate::errors::ApiError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

// Thread-local connection slot. astra handles each request on a worker
// thread, so every worker lazily opens its own connection; SQLite's own
// locking (plus the busy timeout) serializes writes.
thread_local! {
    static DB_CONN: RefCell<Option<Connection>> = const { RefCell::new(None) };
}

#[derive(Clone)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Provides a mutable connection to the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ApiError>,
    {
        DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                if slot.is_none() {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| ApiError::Storage(format!("open db failed: {e}")))?;
                    conn.busy_timeout(Duration::from_secs(5))
                        .map_err(|e| ApiError::Storage(format!("busy_timeout failed: {e}")))?;
                    *slot = Some(conn);
                }
                let conn = slot.as_mut().expect("connection populated above");
                f(conn)
            })
            .map_err(|e| ApiError::Internal(format!("thread-local access failed: {e}")))?
    }
}

/// Apply the bundled schema. Idempotent; tables are `create if not exists`.
pub fn init_db(db: &Database) -> Result<(), ApiError> {
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| ApiError::Storage(format!("failed to apply schema: {e}")))
    })?;

    tracing::info!("database schema applied");
    Ok(())
}
