//! Row-level primitives on a single connection.
//!
//! Nothing here opens a transaction; callers decide the transactional scope.

use super::models::{Actor, ActorMovie, Genre, GenreMovie, Movie, MovieRow, StoreCounts};
use rusqlite::{params, Connection, OptionalExtension, Row};

fn parse_movie_row(row: &Row) -> rusqlite::Result<MovieRow> {
    Ok(MovieRow {
        id: row.get(0)?,
        title: row.get(1)?,
        year: row.get(2)?,
    })
}

// =============================================================================
// Movies
// =============================================================================

pub fn insert_movie(conn: &Connection, title: &str, year: i32) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO movie (title, year) VALUES (?1, ?2)",
        params![title, year],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrite the fields that are `Some`; `None` keeps the stored value.
pub fn update_movie_fields(
    conn: &Connection,
    id: i64,
    title: Option<&str>,
    year: Option<i32>,
) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE movie SET title = COALESCE(?2, title), year = COALESCE(?3, year) WHERE id = ?1",
        params![id, title, year],
    )?;
    Ok(())
}

pub fn get_movie_row(conn: &Connection, id: i64) -> rusqlite::Result<Option<MovieRow>> {
    let mut stmt = conn.prepare_cached("SELECT id, title, year FROM movie WHERE id = ?1")?;
    match stmt.query_row(params![id], parse_movie_row) {
        Ok(row) => Ok(Some(row)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn movie_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM movie WHERE id = ?1)",
        params![id],
        |r| r.get(0),
    )
}

/// Returns the number of deleted rows, 0 or 1.
pub fn delete_movie_row(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM movie WHERE id = ?1", params![id])
}

/// The movie row together with its cast and genres.
pub fn load_movie(conn: &Connection, id: i64) -> rusqlite::Result<Option<Movie>> {
    let Some(row) = get_movie_row(conn, id)? else {
        return Ok(None);
    };
    let cast = get_movie_cast(conn, id)?;
    let genres = get_movie_genres(conn, id)?;
    Ok(Some(Movie::from_row(row, cast, genres)))
}

// =============================================================================
// Actors and genres
// =============================================================================

pub fn find_actor_by_name(conn: &Connection, name: &str) -> rusqlite::Result<Option<Actor>> {
    conn.query_row(
        "SELECT id, name FROM actor WHERE name = ?1",
        params![name],
        |r| {
            Ok(Actor {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        },
    )
    .optional()
}

pub fn insert_actor(conn: &Connection, name: &str) -> rusqlite::Result<Actor> {
    conn.execute("INSERT INTO actor (name) VALUES (?1)", params![name])?;
    Ok(Actor {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

pub fn find_genre_by_name(conn: &Connection, name: &str) -> rusqlite::Result<Option<Genre>> {
    conn.query_row(
        "SELECT id, name FROM genre WHERE name = ?1",
        params![name],
        |r| {
            Ok(Genre {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        },
    )
    .optional()
}

pub fn insert_genre(conn: &Connection, name: &str) -> rusqlite::Result<Genre> {
    conn.execute("INSERT INTO genre (name) VALUES (?1)", params![name])?;
    Ok(Genre {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

pub fn actor_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM actor WHERE id = ?1)",
        params![id],
        |r| r.get(0),
    )
}

pub fn genre_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM genre WHERE id = ?1)",
        params![id],
        |r| r.get(0),
    )
}

// =============================================================================
// Links
// =============================================================================

pub fn find_actor_link(conn: &Connection, link: &ActorMovie) -> rusqlite::Result<Option<ActorMovie>> {
    conn.query_row(
        "SELECT actor_id, movie_id FROM actor_movie WHERE actor_id = ?1 AND movie_id = ?2",
        params![link.actor_id, link.movie_id],
        |r| {
            Ok(ActorMovie {
                actor_id: r.get(0)?,
                movie_id: r.get(1)?,
            })
        },
    )
    .optional()
}

pub fn insert_actor_link(conn: &Connection, link: &ActorMovie) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO actor_movie (actor_id, movie_id) VALUES (?1, ?2)",
        params![link.actor_id, link.movie_id],
    )?;
    Ok(())
}

pub fn find_genre_link(conn: &Connection, link: &GenreMovie) -> rusqlite::Result<Option<GenreMovie>> {
    conn.query_row(
        "SELECT genre_id, movie_id FROM genre_movie WHERE genre_id = ?1 AND movie_id = ?2",
        params![link.genre_id, link.movie_id],
        |r| {
            Ok(GenreMovie {
                genre_id: r.get(0)?,
                movie_id: r.get(1)?,
            })
        },
    )
    .optional()
}

pub fn insert_genre_link(conn: &Connection, link: &GenreMovie) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO genre_movie (genre_id, movie_id) VALUES (?1, ?2)",
        params![link.genre_id, link.movie_id],
    )?;
    Ok(())
}

pub fn delete_cast_links(conn: &Connection, movie_id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM actor_movie WHERE movie_id = ?1",
        params![movie_id],
    )
}

pub fn delete_genre_links(conn: &Connection, movie_id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM genre_movie WHERE movie_id = ?1",
        params![movie_id],
    )
}

pub fn get_movie_cast(conn: &Connection, movie_id: i64) -> rusqlite::Result<Vec<Actor>> {
    let mut stmt = conn.prepare_cached(
        "SELECT a.id, a.name FROM actor a
         INNER JOIN actor_movie am ON am.actor_id = a.id
         WHERE am.movie_id = ?1
         ORDER BY a.name",
    )?;
    let cast = stmt
        .query_map(params![movie_id], |r| {
            Ok(Actor {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cast)
}

pub fn get_movie_genres(conn: &Connection, movie_id: i64) -> rusqlite::Result<Vec<Genre>> {
    let mut stmt = conn.prepare_cached(
        "SELECT g.id, g.name FROM genre g
         INNER JOIN genre_movie gm ON gm.genre_id = g.id
         WHERE gm.movie_id = ?1
         ORDER BY g.name",
    )?;
    let genres = stmt
        .query_map(params![movie_id], |r| {
            Ok(Genre {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(genres)
}

// =============================================================================
// Whole catalog
// =============================================================================

fn count_table(conn: &Connection, table: &str) -> rusqlite::Result<usize> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
        r.get(0)
    })?;
    Ok(count as usize)
}

pub fn count_rows(conn: &Connection) -> rusqlite::Result<StoreCounts> {
    Ok(StoreCounts {
        movies: count_table(conn, "movie")?,
        actors: count_table(conn, "actor")?,
        genres: count_table(conn, "genre")?,
        actor_links: count_table(conn, "actor_movie")?,
        genre_links: count_table(conn, "genre_movie")?,
    })
}

/// Remove every row of every table, links first.
pub fn delete_all(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "DELETE FROM actor_movie;
         DELETE FROM genre_movie;
         DELETE FROM movie;
         DELETE FROM actor;
         DELETE FROM genre;",
    )
}
