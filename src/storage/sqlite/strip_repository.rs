use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;

use crate::domain::{Strip, StripNumber};
use crate::errors::{StripError, StripResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::StripRepository;

pub struct SqliteStripRepository {
    storage: SqliteStorage,
}

impl SqliteStripRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

/// Numbers are stored as text; only values that round-trip exactly come back
/// numeric, so zero-padded identifiers like `042413` survive unchanged.
fn number_from_text(value: String) -> StripNumber {
    match value.parse::<i64>() {
        Ok(n) if n.to_string() == value => StripNumber::Numeric(n),
        _ => StripNumber::Tag(value),
    }
}

fn row_to_strip(row: &rusqlite::Row) -> rusqlite::Result<Strip> {
    let number: String = row.get(0)?;
    let publish_date: String = row.get(6)?;
    let publish_date = DateTime::parse_from_rfc3339(&publish_date)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Strip {
        number: number_from_text(number),
        guid: row.get(1)?,
        title: row.get(2)?,
        alt_text: row.get(3)?,
        url: row.get(4)?,
        image_url: row.get(5)?,
        publish_date,
    })
}

const STRIP_COLUMNS: &str = "number, guid, title, alt_text, url, image_url, publish_date";

impl StripRepository for SqliteStripRepository {
    fn insert(&self, source_name: &str, strip: &Strip) -> StripResult<()> {
        let conn = self.storage.connection()?;
        conn.execute(
            "INSERT OR IGNORE INTO strips
                (source_name, guid, number, title, alt_text, url, image_url, publish_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            (
                source_name,
                &strip.guid,
                strip.number.to_string(),
                &strip.title,
                &strip.alt_text,
                &strip.url,
                &strip.image_url,
                strip.publish_date.to_rfc3339(),
            ),
        )?;
        Ok(())
    }

    fn known_guids(&self, source_name: &str) -> StripResult<HashSet<String>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare("SELECT guid FROM strips WHERE source_name = ?1")?;
        let guids = stmt.query_map([source_name], |row| row.get::<_, String>(0))?;
        guids
            .collect::<Result<HashSet<_>, _>>()
            .map_err(StripError::from)
    }

    fn latest_publish_date(&self, source_name: &str) -> StripResult<Option<DateTime<Utc>>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(
            "SELECT publish_date FROM strips WHERE source_name = ?1
             ORDER BY publish_date DESC LIMIT 1",
        )?;

        let date = stmt.query_row([source_name], |row| row.get::<_, String>(0));
        match date {
            Ok(raw) => {
                let parsed = DateTime::parse_from_rfc3339(&raw)
                    .map_err(|e| StripError::Parse(e.to_string()))?;
                Ok(Some(parsed.with_timezone(&Utc)))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StripError::from(e)),
        }
    }

    fn strips_for_source(
        &self,
        source_name: &str,
        limit: Option<usize>,
    ) -> StripResult<Vec<Strip>> {
        let conn = self.storage.connection()?;
        // Most recent N, returned oldest-first like every other strip sequence
        let mut stmt = conn.prepare(&format!(
            "SELECT {STRIP_COLUMNS} FROM (
                 SELECT {STRIP_COLUMNS} FROM strips WHERE source_name = ?1
                 ORDER BY publish_date DESC LIMIT ?2
             ) ORDER BY publish_date ASC"
        ))?;

        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let strips = stmt.query_map((source_name, limit), row_to_strip)?;
        strips
            .collect::<Result<Vec<_>, _>>()
            .map_err(StripError::from)
    }

    fn count(&self, source_name: &str) -> StripResult<i64> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare("SELECT COUNT(*) FROM strips WHERE source_name = ?1")?;
        let count: i64 = stmt.query_row([source_name], |row| row.get(0))?;
        Ok(count)
    }
}
