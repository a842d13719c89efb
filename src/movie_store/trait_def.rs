//! MovieCatalog trait definition.
//!
//! The HTTP layer only talks to this trait, so handlers can be exercised
//! against any backend that implements it.

use super::aggregate;
use super::error::{MovieError, StoreError};
use super::models::{AmountMoviesByActorYear, Movie, StoreCounts};
use super::report;
use super::store::SqliteMovieStore;
use serde_json::Value;

pub trait MovieCatalog: Send + Sync {
    // =========================================================================
    // Movie aggregate
    // =========================================================================

    /// Create a movie from an API payload (cast and genres given by id).
    fn create_movie(&self, payload: &Value) -> Result<Movie, MovieError>;

    /// Get a movie with its cast and genres.
    fn get_movie(&self, id: i64) -> Result<Movie, MovieError>;

    /// Update a movie, replacing the links of every list present in `payload`.
    fn update_movie(&self, id: i64, payload: &Value) -> Result<Movie, MovieError>;

    /// Delete a movie, returning its last representation.
    fn delete_movie(&self, id: i64) -> Result<Movie, MovieError>;

    // =========================================================================
    // Reports
    // =========================================================================

    fn count_movies_by_actor_and_year(&self) -> Result<Vec<AmountMoviesByActorYear>, StoreError>;

    fn get_counts(&self) -> Result<StoreCounts, StoreError>;
}

impl MovieCatalog for SqliteMovieStore {
    fn create_movie(&self, payload: &Value) -> Result<Movie, MovieError> {
        aggregate::create_movie(self, payload)
    }

    fn get_movie(&self, id: i64) -> Result<Movie, MovieError> {
        aggregate::get_movie(self, id)
    }

    fn update_movie(&self, id: i64, payload: &Value) -> Result<Movie, MovieError> {
        aggregate::update_movie(self, id, payload)
    }

    fn delete_movie(&self, id: i64) -> Result<Movie, MovieError> {
        aggregate::delete_movie(self, id)
    }

    fn count_movies_by_actor_and_year(&self) -> Result<Vec<AmountMoviesByActorYear>, StoreError> {
        report::count_movies_by_actor_and_year(self)
    }

    fn get_counts(&self) -> Result<StoreCounts, StoreError> {
        SqliteMovieStore::get_counts(self)
    }
}
