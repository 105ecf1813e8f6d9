//! SQLite-backed index storage.
//!
//! One table, `entries`, keyed by `full_path`, with secondary indexes on
//! `name`, `type_label` and `relative_path`. File databases run in WAL mode
//! with a dedicated read connection, so searches are not queued behind a
//! rebuild's bulk write.

use std::path::Path;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, Row, params, params_from_iter};
use tracing::{debug, info};

use super::backend::IndexBackend;
use super::query::SearchParams;
use super::types::{EntryRecord, IndexStats, IndexedEntry, SearchPage, TypeCount};
use crate::error::{Error, Result, StorageContext};

const CREATE_SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS entries (
        full_path     TEXT PRIMARY KEY,
        name          TEXT    NOT NULL,
        size_bytes    INTEGER NOT NULL DEFAULT 0,
        type_label    TEXT    NOT NULL,
        is_directory  INTEGER NOT NULL DEFAULT 0,
        relative_path TEXT    NOT NULL,
        modified_at   INTEGER NOT NULL,
        created_at    INTEGER NOT NULL,
        updated_at    INTEGER NOT NULL,
        CHECK (is_directory = 0 OR size_bytes = 0)
    );

    CREATE INDEX IF NOT EXISTS idx_entries_name ON entries (name);
    CREATE INDEX IF NOT EXISTS idx_entries_type_label ON entries (type_label);
    CREATE INDEX IF NOT EXISTS idx_entries_relative_path ON entries (relative_path);
";

const UPSERT_SQL: &str = "
    INSERT INTO entries
        (full_path, name, size_bytes, type_label, is_directory, relative_path,
         modified_at, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
    ON CONFLICT(full_path) DO UPDATE SET
        name          = excluded.name,
        size_bytes    = excluded.size_bytes,
        type_label    = excluded.type_label,
        is_directory  = excluded.is_directory,
        relative_path = excluded.relative_path,
        modified_at   = excluded.modified_at,
        updated_at    = excluded.updated_at
";

const SELECT_COLUMNS: &str = "full_path, name, size_bytes, type_label, is_directory, \
                              relative_path, modified_at, created_at, updated_at";

const STATS_TOTALS_SQL: &str = "
    SELECT
        COALESCE(SUM(CASE WHEN is_directory = 0 THEN 1 ELSE 0 END), 0),
        COALESCE(SUM(CASE WHEN is_directory = 1 THEN 1 ELSE 0 END), 0),
        COALESCE(SUM(CASE WHEN is_directory = 0 THEN size_bytes ELSE 0 END), 0)
    FROM entries
";

const STATS_TYPES_SQL: &str = "
    SELECT type_label, COUNT(*) AS count
    FROM entries
    WHERE is_directory = 0
    GROUP BY type_label
    ORDER BY count DESC, type_label ASC
";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed index storage backend.
///
/// # Thread Safety
///
/// Connections are guarded by mutexes. File databases keep a second,
/// read-only connection; in-memory databases share the single connection.
pub struct SqliteBackend {
    writer: Mutex<Connection>,
    reader: Option<Mutex<Connection>>,
}

impl SqliteBackend {
    /// Opens or creates the index database at `path`.
    ///
    /// Creates parent directories if needed, switches the database to WAL
    /// mode and creates the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// database cannot be opened or initialized.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::filesystem(parent, e))?;
        }

        let writer = Connection::open(path).storage_context("open index database")?;
        writer
            .busy_timeout(BUSY_TIMEOUT)
            .storage_context("configure busy timeout")?;
        writer
            .execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;",
            )
            .storage_context("apply pragmas")?;
        create_schema(&writer)?;

        let reader = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .storage_context("open read connection")?;
        reader
            .busy_timeout(BUSY_TIMEOUT)
            .storage_context("configure busy timeout")?;

        info!(path = %path.display(), "Index database opened");

        Ok(Self {
            writer: Mutex::new(writer),
            reader: Some(Mutex::new(reader)),
        })
    }

    /// Creates a private in-memory index. Data is lost on drop.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn memory() -> Result<Self> {
        let conn = Connection::open_in_memory().storage_context("open in-memory database")?;
        create_schema(&conn)?;
        Ok(Self {
            writer: Mutex::new(conn),
            reader: None,
        })
    }

    fn read_conn(&self) -> MutexGuard<'_, Connection> {
        match &self.reader {
            Some(reader) => reader.lock(),
            None => self.writer.lock(),
        }
    }
}

impl IndexBackend for SqliteBackend {
    fn clear(&self) -> Result<()> {
        let conn = self.writer.lock();
        let removed = conn
            .execute("DELETE FROM entries", [])
            .storage_context("clear index")?;
        debug!(removed, "Index cleared");
        Ok(())
    }

    fn insert_or_replace(&self, records: &[EntryRecord], now: i64) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut conn = self.writer.lock();
        let tx = conn.transaction().storage_context("begin bulk insert")?;
        {
            let mut stmt = tx
                .prepare_cached(UPSERT_SQL)
                .storage_context("prepare bulk insert")?;
            for record in records {
                stmt.execute(params![
                    record.full_path(),
                    record.name(),
                    to_sql_int(record.size_bytes()),
                    record.type_label(),
                    record.is_directory(),
                    record.relative_path(),
                    record.modified_at(),
                    now,
                ])
                .map_err(|e| Error::storage(format!("insert '{}'", record.full_path()), e))?;
            }
        }
        tx.commit().storage_context("commit bulk insert")?;

        Ok(records.len())
    }

    fn search(&self, params: &SearchParams) -> Result<SearchPage> {
        let filter = params.filter();
        let where_clause = filter.where_clause();

        let conn = self.read_conn();
        // Count and page read the same snapshot.
        let tx = conn
            .unchecked_transaction()
            .storage_context("begin search")?;

        let total: i64 = tx
            .query_row(
                &format!("SELECT COUNT(*) FROM entries{where_clause}"),
                params_from_iter(filter.params()),
                |row| row.get(0),
            )
            .storage_context("count search matches")?;

        let mut bound = filter.params().to_vec();
        bound.push(Value::Integer(params.limit));
        bound.push(Value::Integer(params.offset));

        let entries = {
            let mut stmt = tx
                .prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM entries{where_clause} \
                     ORDER BY name ASC, full_path ASC LIMIT ? OFFSET ?"
                ))
                .storage_context("prepare search")?;
            let rows = stmt
                .query_map(params_from_iter(bound.iter()), entry_from_row)
                .storage_context("run search")?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .storage_context("read search results")?
        };
        tx.commit().storage_context("finish search")?;

        Ok(SearchPage {
            entries,
            total: from_sql_int(total),
        })
    }

    fn stats(&self) -> Result<IndexStats> {
        let conn = self.read_conn();
        let tx = conn
            .unchecked_transaction()
            .storage_context("begin stats")?;

        let (files, directories, size): (i64, i64, i64) = tx
            .query_row(STATS_TOTALS_SQL, [], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .storage_context("compute totals")?;

        let file_types = {
            let mut stmt = tx
                .prepare(STATS_TYPES_SQL)
                .storage_context("prepare type breakdown")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(TypeCount {
                        type_label: row.get(0)?,
                        count: from_sql_int(row.get(1)?),
                    })
                })
                .storage_context("run type breakdown")?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .storage_context("read type breakdown")?
        };
        tx.commit().storage_context("finish stats")?;

        Ok(IndexStats {
            total_files: from_sql_int(files),
            total_directories: from_sql_int(directories),
            total_size_bytes: from_sql_int(size),
            file_types,
        })
    }

    fn count(&self) -> Result<u64> {
        let conn = self.read_conn();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .storage_context("count entries")?;
        Ok(from_sql_int(count))
    }
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_SCHEMA_SQL)
        .storage_context("create schema")
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<IndexedEntry> {
    Ok(IndexedEntry {
        full_path: row.get(0)?,
        name: row.get(1)?,
        size_bytes: from_sql_int(row.get(2)?),
        type_label: row.get(3)?,
        is_directory: row.get(4)?,
        relative_path: row.get(5)?,
        modified_at: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// SQLite integers are signed; sizes beyond `i64::MAX` saturate.
fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_sql_int(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
