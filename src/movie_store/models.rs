//! Movie catalog models.
//!
//! Row types map one-to-one onto the SQLite tables; `Movie` is the
//! aggregate representation returned to callers.

use serde::{Deserialize, Serialize};

/// A row of the `actor` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub name: String,
}

/// A row of the `genre` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Movie <-> Actor link row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorMovie {
    pub actor_id: i64,
    pub movie_id: i64,
}

/// Movie <-> Genre link row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenreMovie {
    pub genre_id: i64,
    pub movie_id: i64,
}

/// A row of the `movie` table, without its links.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieRow {
    pub id: i64,
    pub title: String,
    pub year: i32,
}

/// A movie together with its resolved cast and genres.
///
/// Cast and genres are ordered by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub cast: Vec<Actor>,
    pub genres: Vec<Genre>,
}

impl Movie {
    pub fn from_row(row: MovieRow, cast: Vec<Actor>, genres: Vec<Genre>) -> Self {
        Movie {
            id: row.id,
            title: row.title,
            year: row.year,
            cast,
            genres,
        }
    }
}

/// One line of the actor/year report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountMoviesByActorYear {
    pub actor_name: String,
    pub year: i32,
    pub amount_of_movies: i64,
}

/// Row counts of every table in the movie catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub movies: usize,
    pub actors: usize,
    pub genres: usize,
    pub actor_links: usize,
    pub genre_links: usize,
}
