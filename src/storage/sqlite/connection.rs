use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::errors::{StripError, StripResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS strips (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_name TEXT NOT NULL,
    guid TEXT NOT NULL UNIQUE,
    number TEXT NOT NULL,
    title TEXT,
    alt_text TEXT,
    url TEXT NOT NULL,
    image_url TEXT NOT NULL,
    publish_date TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_strips_source ON strips(source_name);
CREATE INDEX IF NOT EXISTS idx_strips_guid ON strips(guid);
"#;

#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> StripResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> StripResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StripError> {
        self.conn
            .lock()
            .map_err(|_| StripError::Database(rusqlite::Error::InvalidQuery))
    }
}
