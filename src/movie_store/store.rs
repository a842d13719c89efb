//! SQLite-backed movie store.
//!
//! `SqliteMovieStore` is the storage handle every core operation receives.
//! It owns one connection and serializes access to it; multi-statement
//! mutations run inside `in_transaction`.

use super::error::StoreError;
use super::models::StoreCounts;
use super::schema::MOVIE_VERSIONED_SCHEMAS;
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

/// How long a writer waits for another connection's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct SqliteMovieStore {
    conn: Arc<Mutex<Connection>>,
}

fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let latest_version = MOVIE_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &MOVIE_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating movie db schema at version {}", latest_version);
        let tx = conn.transaction()?;
        latest_schema.create(&tx)?;
        tx.commit()?;
        return Ok(());
    }

    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version < BASE_DB_VERSION as i64 {
        bail!(
            "Database has user_version {}, it was not created by this server",
            db_version
        );
    }
    let mut current_version = (db_version - BASE_DB_VERSION as i64) as usize;

    if current_version < latest_version {
        let tx = conn.transaction()?;
        for schema in MOVIE_VERSIONED_SCHEMAS.iter().skip(current_version + 1) {
            if let Some(migration_fn) = schema.migration {
                info!(
                    "Migrating movie db from version {} to {}",
                    current_version, schema.version
                );
                migration_fn(&tx)?;
            }
            current_version = schema.version;
        }
        tx.pragma_update(None, "user_version", BASE_DB_VERSION + current_version)?;
        tx.commit()?;
    }

    latest_schema
        .validate(conn)
        .context("Movie database schema does not match the expected layout")
}

impl SqliteMovieStore {
    /// Open (or create) the movie database at `db_path`.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open movie database at {:?}", db_path))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn)
    }

    /// A private, empty in-memory database. Mostly useful in tests.
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migrate_if_needed(&mut conn)?;

        let store = SqliteMovieStore {
            conn: Arc::new(Mutex::new(conn)),
        };
        let counts = store.get_counts()?;
        info!(
            "Opened movie catalog: {} movies, {} actors, {} genres",
            counts.movies, counts.actors, counts.genres
        );
        Ok(store)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| {
            // a holder panicked, possibly mid-transaction
            let conn = poisoned.into_inner();
            if !conn.is_autocommit() {
                if let Err(e) = conn.execute_batch("ROLLBACK") {
                    debug!("Rollback of abandoned transaction failed: {}", e);
                }
            }
            conn
        })
    }

    /// Run read-only work against the connection.
    pub fn read<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E> {
        let conn = self.lock();
        f(&conn)
    }

    /// Run `f` inside an `IMMEDIATE` transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back when it
    /// returns `Err`, so either every write of `f` is visible or none is.
    pub fn in_transaction<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<rusqlite::Error>,
    {
        let conn = self.lock();
        conn.execute_batch("BEGIN IMMEDIATE")?;

        let result = f(&conn).and_then(|value| {
            conn.execute_batch("COMMIT")?;
            Ok(value)
        });

        if result.is_err() {
            if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                debug!("Rollback after failed transaction: {}", rollback_err);
            }
        }
        result
    }

    pub fn get_counts(&self) -> Result<StoreCounts, StoreError> {
        self.read(|conn| Ok(super::rows::count_rows(conn)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie_store::rows;

    #[test]
    fn test_new_store_is_empty() {
        let store = SqliteMovieStore::in_memory().unwrap();
        assert_eq!(store.get_counts().unwrap(), StoreCounts::default());
    }

    #[test]
    fn test_reopen_existing_database() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("movies.db");

        {
            let store = SqliteMovieStore::new(&db_path).unwrap();
            store
                .in_transaction(|conn| rows::insert_movie(conn, "Big", 1988))
                .unwrap();
        }

        let reopened = SqliteMovieStore::new(&db_path).unwrap();
        assert_eq!(reopened.get_counts().unwrap().movies, 1);
    }

    #[test]
    fn test_rejects_foreign_database() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("other.db");
        {
            let conn = Connection::open(&db_path).unwrap();
            conn.execute("CREATE TABLE something (id INTEGER)", [])
                .unwrap();
        }

        assert!(SqliteMovieStore::new(&db_path).is_err());
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let store = SqliteMovieStore::in_memory().unwrap();

        let result: Result<(), StoreError> = store.in_transaction(|conn| {
            rows::insert_movie(conn, "Big", 1988)?;
            Err(StoreError::Conflict {
                entity: "movie",
                key: "Big".to_string(),
            })
        });

        assert!(result.is_err());
        assert_eq!(store.get_counts().unwrap().movies, 0);
    }

    #[test]
    fn test_transaction_commits_on_success() {
        let store = SqliteMovieStore::in_memory().unwrap();

        let id = store
            .in_transaction(|conn| rows::insert_movie(conn, "Big", 1988))
            .unwrap();

        let row = store.read(|conn| rows::get_movie_row(conn, id)).unwrap();
        assert_eq!(row.unwrap().title, "Big");
    }
}
