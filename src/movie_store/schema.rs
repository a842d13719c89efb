//! SQLite schema definitions for the movie catalog database.
//!
//! Actors and genres are keyed by a surrogate integer id and are unique by
//! name. Link tables carry no identity beyond the (reference, movie) pair.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

// =============================================================================
// Core Tables
// =============================================================================

const MOVIE_TABLE: Table = Table {
    name: "movie",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_movie_year", "year")],
    unique_constraints: &[],
};

const ACTOR_TABLE: Table = Table {
    name: "actor",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["name"]],
};

const GENRE_TABLE: Table = Table {
    name: "genre",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["name"]],
};

// =============================================================================
// Junction Tables
// =============================================================================

// Links are removed explicitly before their parents, so parents restrict deletion.
const MOVIE_FK: ForeignKey = ForeignKey {
    foreign_table: "movie",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const ACTOR_FK: ForeignKey = ForeignKey {
    foreign_table: "actor",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const GENRE_FK: ForeignKey = ForeignKey {
    foreign_table: "genre",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const ACTOR_MOVIE_TABLE: Table = Table {
    name: "actor_movie",
    columns: &[
        sqlite_column!(
            "actor_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ACTOR_FK)
        ),
        sqlite_column!(
            "movie_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&MOVIE_FK)
        ),
    ],
    indices: &[("idx_actor_movie_movie", "movie_id")],
    unique_constraints: &[&["actor_id", "movie_id"]],
};

const GENRE_MOVIE_TABLE: Table = Table {
    name: "genre_movie",
    columns: &[
        sqlite_column!(
            "genre_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&GENRE_FK)
        ),
        sqlite_column!(
            "movie_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&MOVIE_FK)
        ),
    ],
    indices: &[("idx_genre_movie_movie", "movie_id")],
    unique_constraints: &[&["genre_id", "movie_id"]],
};

// =============================================================================
// Versioned Schema Definition
// =============================================================================

pub const MOVIE_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        MOVIE_TABLE,
        ACTOR_TABLE,
        GENRE_TABLE,
        ACTOR_MOVIE_TABLE,
        GENRE_MOVIE_TABLE,
    ],
    migration: None,
}];
