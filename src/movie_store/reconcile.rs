//! Get-or-create for rows identified by a unique key.
//!
//! `reconcile` looks a row up by its unique key and inserts it when missing.
//! The insert runs inside a savepoint: if another writer stored the same key
//! in the meantime, the unique constraint fires, the savepoint is rolled back
//! and the now-existing row is fetched once more. Any other failure
//! propagates unchanged.

use super::error::{is_unique_violation, StoreError};
use super::models::{Actor, ActorMovie, Genre, GenreMovie};
use super::rows;
use rusqlite::Connection;
use std::fmt::Debug;
use tracing::debug;

/// A row kind that can be found by, and created from, a unique key.
pub trait Reconcilable: Sized {
    /// Table-level name used in diagnostics and `Conflict` errors.
    const ENTITY: &'static str;

    type Key: Debug + ?Sized;

    /// Extra fields only used when inserting.
    type Defaults: Default;

    fn find(conn: &Connection, key: &Self::Key) -> rusqlite::Result<Option<Self>>;

    fn insert(
        conn: &Connection,
        key: &Self::Key,
        defaults: Self::Defaults,
    ) -> rusqlite::Result<Self>;
}

impl Reconcilable for Actor {
    const ENTITY: &'static str = "actor";
    type Key = str;
    type Defaults = ();

    fn find(conn: &Connection, name: &str) -> rusqlite::Result<Option<Self>> {
        rows::find_actor_by_name(conn, name)
    }

    fn insert(conn: &Connection, name: &str, _: ()) -> rusqlite::Result<Self> {
        rows::insert_actor(conn, name)
    }
}

impl Reconcilable for Genre {
    const ENTITY: &'static str = "genre";
    type Key = str;
    type Defaults = ();

    fn find(conn: &Connection, name: &str) -> rusqlite::Result<Option<Self>> {
        rows::find_genre_by_name(conn, name)
    }

    fn insert(conn: &Connection, name: &str, _: ()) -> rusqlite::Result<Self> {
        rows::insert_genre(conn, name)
    }
}

impl Reconcilable for ActorMovie {
    const ENTITY: &'static str = "actor_movie";
    type Key = ActorMovie;
    type Defaults = ();

    fn find(conn: &Connection, link: &ActorMovie) -> rusqlite::Result<Option<Self>> {
        rows::find_actor_link(conn, link)
    }

    fn insert(conn: &Connection, link: &ActorMovie, _: ()) -> rusqlite::Result<Self> {
        rows::insert_actor_link(conn, link)?;
        Ok(*link)
    }
}

impl Reconcilable for GenreMovie {
    const ENTITY: &'static str = "genre_movie";
    type Key = GenreMovie;
    type Defaults = ();

    fn find(conn: &Connection, link: &GenreMovie) -> rusqlite::Result<Option<Self>> {
        rows::find_genre_link(conn, link)
    }

    fn insert(conn: &Connection, link: &GenreMovie, _: ()) -> rusqlite::Result<Self> {
        rows::insert_genre_link(conn, link)?;
        Ok(*link)
    }
}

/// Find the row stored under `key`, creating it when absent.
pub fn reconcile<T: Reconcilable>(conn: &Connection, key: &T::Key) -> Result<T, StoreError> {
    reconcile_with_defaults(conn, key, T::Defaults::default())
}

/// Like [`reconcile`], with `defaults` applied only if a row gets inserted.
pub fn reconcile_with_defaults<T: Reconcilable>(
    conn: &Connection,
    key: &T::Key,
    defaults: T::Defaults,
) -> Result<T, StoreError> {
    if let Some(existing) = T::find(conn, key)? {
        return Ok(existing);
    }

    match insert_in_savepoint::<T>(conn, key, defaults) {
        Ok(created) => Ok(created),
        Err(StoreError::Conflict { entity, key: conflict_key }) => {
            debug!(
                "Lost insert race for {} {}, fetching the stored row",
                entity, conflict_key
            );
            match T::find(conn, key)? {
                Some(existing) => Ok(existing),
                None => Err(StoreError::Conflict {
                    entity,
                    key: conflict_key,
                }),
            }
        }
        Err(e) => Err(e),
    }
}

fn insert_in_savepoint<T: Reconcilable>(
    conn: &Connection,
    key: &T::Key,
    defaults: T::Defaults,
) -> Result<T, StoreError> {
    conn.execute_batch("SAVEPOINT reconcile")?;
    match T::insert(conn, key, defaults) {
        Ok(created) => {
            conn.execute_batch("RELEASE reconcile")?;
            Ok(created)
        }
        Err(err) => {
            conn.execute_batch("ROLLBACK TO reconcile; RELEASE reconcile")?;
            if is_unique_violation(&err) {
                Err(StoreError::Conflict {
                    entity: T::ENTITY,
                    key: format!("{:?}", key),
                })
            } else {
                Err(StoreError::Sqlite(err))
            }
        }
    }
}
