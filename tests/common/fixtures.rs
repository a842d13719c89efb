//! Test fixture creation for the movie database

use anyhow::Result;
use movie_catalog_server::bulk_upload::upload_file;
use movie_catalog_server::SqliteMovieStore;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Seed catalog, in the bulk loader's file format.
///
/// The last entry has no year and is skipped by the loader.
const TEST_CATALOG_JSON: &str = r#"[
    {
        "title": "Big",
        "year": 1988,
        "cast": ["Tom Hanks", "Elizabeth Perkins"],
        "genres": ["Comedy", "Fantasy"]
    },
    {
        "title": "Splash",
        "year": 1984,
        "cast": ["Tom Hanks", "Daryl Hannah", "John Candy (?)"],
        "genres": ["Comedy", "Romance"]
    },
    {
        "title": "Bachelor Party",
        "year": 1984,
        "cast": ["Tom Hanks"],
        "genres": ["Comedy"]
    },
    {
        "title": "Blade Runner",
        "year": 1982,
        "cast": ["Harrison Ford", "Daryl Hannah"],
        "genres": ["Science Fiction"]
    },
    {
        "title": "Untitled",
        "cast": [],
        "genres": []
    }
]"#;

/// Creates a temporary movie database seeded through the bulk loader.
/// Returns (temp_dir, db_path)
pub fn create_test_db() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;

    let catalog_path = dir.path().join("movies.json");
    fs::write(&catalog_path, TEST_CATALOG_JSON)?;

    let db_path = dir.path().join("movies.db");
    let store = SqliteMovieStore::new(&db_path)?;
    upload_file(&store, &catalog_path, false, false)?;

    Ok((dir, db_path))
}
