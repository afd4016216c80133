//! Newshound Storage Layer
//!
//! SQLite-backed implementation of the `ProfileStore` trait: source
//! profiles with bounded selector histories, article records with
//! upsert-replace semantics, and the persisted generation-call counter.
//!
//! # Examples
//!
//! ```no_run
//! use newshound_store::SqliteStore;
//!
//! let store = SqliteStore::open(":memory:").unwrap();
//! // Store is now ready for profile and article operations
//! ```

#![warn(missing_docs)]

use newshound_domain::traits::ProfileStore;
use newshound_domain::{ArticleRecord, Field, FieldSet, SelectorHistory, SourceProfile};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Name of the persisted generation-call counter row.
const GENERATION_CALLS: &str = "generation_calls";

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format in a stored column
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of `ProfileStore`.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Callers that share a store
/// across threads must wrap it in a mutex; the resolution pipeline holds
/// one `Arc<Mutex<SqliteStore>>` so that append-and-evict sequences for
/// the same source serialize.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (and create if needed) a store at the given database path.
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let store = Self { conn };
        store.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(store)
    }

    /// Encode a selector history as a JSON array column value.
    fn encode_history(history: &SelectorHistory) -> Result<String, StoreError> {
        serde_json::to_string(history.entries())
            .map_err(|e| StoreError::InvalidData(format!("history encode: {e}")))
    }

    /// Decode a JSON array column value, re-applying the cap and dedup
    /// invariants.
    fn decode_history(raw: &str) -> Result<SelectorHistory, StoreError> {
        if raw.trim().is_empty() {
            return Ok(SelectorHistory::new());
        }
        let entries: Vec<String> = serde_json::from_str(raw)
            .map_err(|e| StoreError::InvalidData(format!("history decode: {e}")))?;
        Ok(SelectorHistory::from_entries(entries))
    }

    fn read_profile(conn: &Connection, source: &str) -> Result<Option<SourceProfile>, StoreError> {
        let row = conn
            .query_row(
                "SELECT total_failures, author_selectors, title_selectors, date_selectors,
                        time_selectors, content_selectors, last_updated
                 FROM source_profiles WHERE source = ?1",
                params![source],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, Option<String>>(6)?,
                    ))
                },
            )
            .optional()?;

        let Some((failures, author, title, date, time, content, last_updated)) = row else {
            return Ok(None);
        };

        Ok(Some(SourceProfile {
            source: source.to_string(),
            total_failures: failures.max(0) as u64,
            selectors: FieldSet {
                author: Self::decode_history(&author)?,
                title: Self::decode_history(&title)?,
                date: Self::decode_history(&date)?,
                time: Self::decode_history(&time)?,
                content: Self::decode_history(&content)?,
            },
            last_updated,
        }))
    }

    fn write_profile(conn: &Connection, profile: &SourceProfile) -> Result<(), StoreError> {
        conn.execute(
            "INSERT INTO source_profiles
                 (source, total_failures, author_selectors, title_selectors,
                  date_selectors, time_selectors, content_selectors, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, datetime('now'))
             ON CONFLICT(source) DO UPDATE SET
                 total_failures    = excluded.total_failures,
                 author_selectors  = excluded.author_selectors,
                 title_selectors   = excluded.title_selectors,
                 date_selectors    = excluded.date_selectors,
                 time_selectors    = excluded.time_selectors,
                 content_selectors = excluded.content_selectors,
                 last_updated      = excluded.last_updated",
            params![
                profile.source,
                profile.total_failures as i64,
                Self::encode_history(&profile.selectors.author)?,
                Self::encode_history(&profile.selectors.title)?,
                Self::encode_history(&profile.selectors.date)?,
                Self::encode_history(&profile.selectors.time)?,
                Self::encode_history(&profile.selectors.content)?,
            ],
        )?;
        Ok(())
    }
}

impl ProfileStore for SqliteStore {
    type Error = StoreError;

    fn lookup(&self, source: &str) -> Result<Option<SourceProfile>, Self::Error> {
        Self::read_profile(&self.conn, source)
    }

    fn create(&mut self, source: &str, initial: &FieldSet<String>) -> Result<(), Self::Error> {
        let profile = SourceProfile::seeded(source, initial);
        // OR IGNORE: a concurrent invocation may have seeded this source
        // between our lookup and this insert; first writer wins.
        self.conn.execute(
            "INSERT OR IGNORE INTO source_profiles
                 (source, total_failures, author_selectors, title_selectors,
                  date_selectors, time_selectors, content_selectors, last_updated)
             VALUES (?1, 0, ?2, ?3, ?4, ?5, ?6, datetime('now'))",
            params![
                source,
                Self::encode_history(&profile.selectors.author)?,
                Self::encode_history(&profile.selectors.title)?,
                Self::encode_history(&profile.selectors.date)?,
                Self::encode_history(&profile.selectors.time)?,
                Self::encode_history(&profile.selectors.content)?,
            ],
        )?;
        debug!(source, "seeded new source profile");
        Ok(())
    }

    fn record_validated(
        &mut self,
        source: &str,
        validated: &BTreeMap<Field, String>,
        retries_spent: u32,
    ) -> Result<(), Self::Error> {
        // Read-modify-write inside one transaction so concurrent writers
        // for the same source serialize their append-and-evict sequences.
        // Immediate takes the write lock at BEGIN, so a second writer
        // waits on the busy timeout instead of hitting SQLITE_BUSY when
        // its deferred read lock tries to upgrade.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut profile = Self::read_profile(&tx, source)?
            .unwrap_or_else(|| SourceProfile::new(source));
        profile.total_failures += u64::from(retries_spent);
        for (&field, expression) in validated {
            profile.selectors.get_mut(field).record(expression);
        }
        Self::write_profile(&tx, &profile)?;

        tx.commit()?;
        debug!(
            source,
            fields = validated.len(),
            retries_spent,
            "recorded validated selectors"
        );
        Ok(())
    }

    fn upsert_article(&mut self, record: &ArticleRecord) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO articles (source, url, author, title, date, time, content)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.source,
                record.url,
                record.author,
                record.title,
                record.date,
                record.time,
                record.content,
            ],
        )?;
        Ok(())
    }

    fn get_article(&self, source: &str, url: &str) -> Result<Option<ArticleRecord>, Self::Error> {
        let record = self
            .conn
            .query_row(
                "SELECT author, title, date, time, content
                 FROM articles WHERE source = ?1 AND url = ?2",
                params![source, url],
                |row| {
                    Ok(ArticleRecord {
                        source: source.to_string(),
                        url: url.to_string(),
                        author: row.get(0)?,
                        title: row.get(1)?,
                        date: row.get(2)?,
                        time: row.get(3)?,
                        content: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn generation_calls(&self) -> Result<u64, Self::Error> {
        let value: Option<i64> = self
            .conn
            .query_row(
                "SELECT value FROM counters WHERE name = ?1",
                params![GENERATION_CALLS],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or(0).max(0) as u64)
    }

    fn count_generation_call(&mut self) -> Result<u64, Self::Error> {
        let value: i64 = self.conn.query_row(
            "INSERT INTO counters (name, value) VALUES (?1, 1)
             ON CONFLICT(name) DO UPDATE SET value = value + 1
             RETURNING value",
            params![GENERATION_CALLS],
            |row| row.get(0),
        )?;
        Ok(value.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> SqliteStore {
        SqliteStore::open(":memory:").unwrap()
    }

    #[test]
    fn lookup_of_unseen_source_is_none() {
        let store = memory_store();
        assert!(store.lookup("example.com").unwrap().is_none());
    }

    #[test]
    fn create_seeds_profile_with_zero_failures() {
        let mut store = memory_store();
        let initial = FieldSet::from_fn(|f| format!(".{}", f.as_str()));
        store.create("example.com", &initial).unwrap();

        let profile = store.lookup("example.com").unwrap().unwrap();
        assert_eq!(profile.total_failures, 0);
        assert_eq!(profile.selectors.title.newest(), Some(".title"));
        assert!(profile.last_updated.is_some());
    }

    #[test]
    fn create_is_first_writer_wins() {
        let mut store = memory_store();
        let first = FieldSet::from_fn(|_| "h1".to_string());
        let second = FieldSet::from_fn(|_| "h2".to_string());
        store.create("example.com", &first).unwrap();
        store.create("example.com", &second).unwrap();

        let profile = store.lookup("example.com").unwrap().unwrap();
        assert_eq!(profile.selectors.title.newest(), Some("h1"));
    }

    #[test]
    fn record_validated_accumulates_failures() {
        let mut store = memory_store();
        let mut validated = BTreeMap::new();
        validated.insert(Field::Title, "h1".to_string());
        store.record_validated("example.com", &validated, 2).unwrap();
        store.record_validated("example.com", &validated, 1).unwrap();

        let profile = store.lookup("example.com").unwrap().unwrap();
        assert_eq!(profile.total_failures, 3);
        assert_eq!(profile.selectors.title.len(), 1);
    }

    #[test]
    fn counter_starts_at_zero_and_increments() {
        let mut store = memory_store();
        assert_eq!(store.generation_calls().unwrap(), 0);
        assert_eq!(store.count_generation_call().unwrap(), 1);
        assert_eq!(store.count_generation_call().unwrap(), 2);
        assert_eq!(store.generation_calls().unwrap(), 2);
    }

    #[test]
    fn decode_history_tolerates_legacy_blank_column() {
        assert!(SqliteStore::decode_history("").unwrap().is_empty());
        assert_eq!(SqliteStore::decode_history(r#"["a","b"]"#).unwrap().len(), 2);
        assert!(SqliteStore::decode_history("not json").is_err());
    }
}
