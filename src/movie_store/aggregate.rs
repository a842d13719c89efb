//! Create, update and delete a movie together with its cast and genre links.
//!
//! Each operation runs in a single transaction on the store: either the movie
//! row and all of its links change, or nothing does.

use super::error::{MovieError, ValidationError};
use super::models::{Actor, ActorMovie, Genre, GenreMovie, Movie, StoreCounts};
use super::reconcile::reconcile;
use super::rows;
use super::store::SqliteMovieStore;
use super::validation::{
    validate, validate_actor_name, BulkMovie, CreateRules, UpdateRules,
};
use rusqlite::Connection;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Outcome of importing one bulk entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportedMovie {
    pub movie: Movie,
    /// Cast names that failed validation and were left out.
    pub rejected_cast: Vec<String>,
}

fn check_references(conn: &Connection, cast: &[i64], genres: &[i64]) -> Result<(), MovieError> {
    for &id in cast {
        if !rows::actor_exists(conn, id)? {
            return Err(ValidationError::UnknownReference { entity: "actor", id }.into());
        }
    }
    for &id in genres {
        if !rows::genre_exists(conn, id)? {
            return Err(ValidationError::UnknownReference { entity: "genre", id }.into());
        }
    }
    Ok(())
}

fn link_cast(conn: &Connection, movie_id: i64, actor_ids: &[i64]) -> Result<(), MovieError> {
    for &actor_id in actor_ids {
        reconcile::<ActorMovie>(conn, &ActorMovie { actor_id, movie_id })?;
    }
    Ok(())
}

fn link_genres(conn: &Connection, movie_id: i64, genre_ids: &[i64]) -> Result<(), MovieError> {
    for &genre_id in genre_ids {
        reconcile::<GenreMovie>(conn, &GenreMovie { genre_id, movie_id })?;
    }
    Ok(())
}

fn load_existing(conn: &Connection, id: i64) -> Result<Movie, MovieError> {
    rows::load_movie(conn, id)?.ok_or(MovieError::NotFound(id))
}

/// Create a movie from an API payload whose cast and genres are ids.
pub fn create_movie(store: &SqliteMovieStore, payload: &Value) -> Result<Movie, MovieError> {
    let new_movie = validate::<CreateRules>(payload)?;

    let movie = store.in_transaction(|conn| {
        check_references(conn, &new_movie.cast, &new_movie.genres)?;
        let id = rows::insert_movie(conn, &new_movie.title, new_movie.year)?;
        link_cast(conn, id, &new_movie.cast)?;
        link_genres(conn, id, &new_movie.genres)?;
        load_existing(conn, id)
    })?;

    info!("Created movie {} '{}' ({})", movie.id, movie.title, movie.year);
    Ok(movie)
}

/// Create a movie from a bulk entry, resolving cast and genres by name.
///
/// Actor names with forbidden characters are skipped and reported back;
/// the rest of the entry is still imported.
pub fn create_movie_from_bulk(
    store: &SqliteMovieStore,
    entry: &BulkMovie,
) -> Result<ImportedMovie, MovieError> {
    let mut accepted_cast = Vec::with_capacity(entry.cast.len());
    let mut rejected_cast = Vec::new();
    for name in &entry.cast {
        match validate_actor_name(name) {
            Ok(()) => accepted_cast.push(name.as_str()),
            Err(e) => {
                warn!("Skipping actor of '{}': {}", entry.title, e);
                rejected_cast.push(name.clone());
            }
        }
    }

    let movie = store.in_transaction(|conn| {
        let id = rows::insert_movie(conn, &entry.title, entry.year)?;
        for name in &accepted_cast {
            let actor: Actor = reconcile(conn, *name)?;
            reconcile::<ActorMovie>(
                conn,
                &ActorMovie {
                    actor_id: actor.id,
                    movie_id: id,
                },
            )?;
        }
        for name in &entry.genres {
            let genre: Genre = reconcile(conn, name.as_str())?;
            reconcile::<GenreMovie>(
                conn,
                &GenreMovie {
                    genre_id: genre.id,
                    movie_id: id,
                },
            )?;
        }
        load_existing(conn, id)
    })?;

    debug!(
        "Imported movie {} '{}' with {} actors and {} genres",
        movie.id,
        movie.title,
        movie.cast.len(),
        movie.genres.len()
    );
    Ok(ImportedMovie {
        movie,
        rejected_cast,
    })
}

/// Update a movie. A cast or genre list that is present replaces every
/// existing link of that kind.
pub fn update_movie(
    store: &SqliteMovieStore,
    id: i64,
    payload: &Value,
) -> Result<Movie, MovieError> {
    let movie = store.in_transaction(|conn| {
        if !rows::movie_exists(conn, id)? {
            return Err(MovieError::NotFound(id));
        }
        let update = validate::<UpdateRules>(payload)?;
        check_references(
            conn,
            update.cast.as_deref().unwrap_or_default(),
            update.genres.as_deref().unwrap_or_default(),
        )?;

        rows::update_movie_fields(conn, id, update.title.as_deref(), update.year)?;
        if let Some(cast) = &update.cast {
            rows::delete_cast_links(conn, id)?;
            link_cast(conn, id, cast)?;
        }
        if let Some(genres) = &update.genres {
            rows::delete_genre_links(conn, id)?;
            link_genres(conn, id, genres)?;
        }
        load_existing(conn, id)
    })?;

    info!("Updated movie {} '{}'", movie.id, movie.title);
    Ok(movie)
}

/// Delete a movie and its links, returning what was deleted.
pub fn delete_movie(store: &SqliteMovieStore, id: i64) -> Result<Movie, MovieError> {
    let movie = store.in_transaction(|conn| {
        let movie = load_existing(conn, id)?;
        rows::delete_cast_links(conn, id)?;
        rows::delete_genre_links(conn, id)?;
        rows::delete_movie_row(conn, id)?;
        Ok::<_, MovieError>(movie)
    })?;

    info!("Deleted movie {} '{}'", movie.id, movie.title);
    Ok(movie)
}

pub fn get_movie(store: &SqliteMovieStore, id: i64) -> Result<Movie, MovieError> {
    store.read(|conn| load_existing(conn, id))
}

/// Remove every movie, actor, genre and link. Returns the counts before
/// the wipe.
pub fn delete_all_data(store: &SqliteMovieStore) -> Result<StoreCounts, MovieError> {
    let counts = store.in_transaction(|conn| {
        let counts = rows::count_rows(conn)?;
        rows::delete_all(conn)?;
        Ok::<_, MovieError>(counts)
    })?;

    info!(
        "Deleted all data: {} movies, {} actors, {} genres",
        counts.movies, counts.actors, counts.genres
    );
    Ok(counts)
}
