//! Bulk import of a JSON movie catalog.
//!
//! The file holds an array of `{title, year, cast, genres}` objects where
//! cast and genres are names. Invalid entries are skipped with a warning,
//! every other entry is imported in its own transaction.

use crate::movie_store::aggregate::{create_movie_from_bulk, delete_all_data};
use crate::movie_store::validation::{validate, BulkRules};
use crate::movie_store::SqliteMovieStore;
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadStats {
    pub processed: usize,
    pub imported: usize,
    pub skipped_entries: usize,
    pub skipped_actors: usize,
}

/// Read the catalog file, which must contain a JSON array.
pub fn load_entries(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read movie file {}", path.display()))?;
    info!(
        "Loaded {} ({:#})",
        path.display(),
        byte_unit::Byte::from(content.len())
    );

    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse movie file {}", path.display()))?;
    match value {
        Value::Array(entries) => Ok(entries),
        _ => bail!("Movie file {} is not a JSON array", path.display()),
    }
}

/// Import `entries`, advancing `progress` once per entry.
pub fn upload(
    store: &SqliteMovieStore,
    entries: &[Value],
    progress: &ProgressBar,
) -> Result<UploadStats> {
    let mut stats = UploadStats::default();

    for (index, entry) in entries.iter().enumerate() {
        stats.processed += 1;
        progress.inc(1);

        let movie = match validate::<BulkRules>(entry) {
            Ok(movie) => movie,
            Err(e) => {
                warn!("Skipping entry #{}: {}", index, e);
                stats.skipped_entries += 1;
                continue;
            }
        };

        let imported = create_movie_from_bulk(store, &movie)
            .with_context(|| format!("Failed to import entry #{} '{}'", index, movie.title))?;
        stats.imported += 1;
        stats.skipped_actors += imported.rejected_cast.len();
    }

    progress.finish_and_clear();
    Ok(stats)
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} movies ({eta})")
    {
        pb.set_style(style);
    }
    pb
}

/// Import the catalog at `path`, optionally wiping the store first.
pub fn upload_file(
    store: &SqliteMovieStore,
    path: &Path,
    delete_first: bool,
    show_progress: bool,
) -> Result<UploadStats> {
    let entries = load_entries(path)?;

    if delete_first {
        delete_all_data(store).context("Failed to delete existing data")?;
    }

    info!("Start movies bulk upload of {} entries", entries.len());
    let stats = upload(store, &entries, &progress_bar(entries.len(), show_progress))?;
    info!(
        "Movies uploaded: {} imported, {} entries skipped, {} actor names skipped",
        stats.imported, stats.skipped_entries, stats.skipped_actors
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie_store::report::count_movies_by_actor_and_year;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CATALOG: &str = r#"[
        {"title": "After Dark in Central Park", "year": 1900, "cast": [], "genres": []},
        {"title": "The Reluctant Astronaut", "year": 1967,
         "cast": ["Don Knotts", "Leslie Nielsen"], "genres": ["Comedy"]},
        {"title": "Airplane!", "year": 1980,
         "cast": ["Leslie Nielsen", "Who?"], "genres": ["Comedy"]},
        {"title": "No Year", "cast": [], "genres": []}
    ]"#;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn imports_valid_entries_and_counts_skips() {
        let store = SqliteMovieStore::in_memory().unwrap();
        let file = write_file(CATALOG);

        let stats = upload_file(&store, file.path(), false, false).unwrap();

        assert_eq!(
            stats,
            UploadStats {
                processed: 4,
                imported: 3,
                skipped_entries: 1,
                skipped_actors: 1,
            }
        );
        let counts = store.get_counts().unwrap();
        assert_eq!(counts.movies, 3);
        assert_eq!(counts.actors, 2);
        assert_eq!(counts.genres, 1);
        assert_eq!(counts.actor_links, 3);
        assert_eq!(counts.genre_links, 2);

        let report = count_movies_by_actor_and_year(&store).unwrap();
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn delete_flag_replaces_existing_data() {
        let store = SqliteMovieStore::in_memory().unwrap();
        let file = write_file(CATALOG);

        upload_file(&store, file.path(), false, false).unwrap();
        upload_file(&store, file.path(), true, false).unwrap();

        assert_eq!(store.get_counts().unwrap().movies, 3);
    }

    #[test]
    fn uploading_twice_without_delete_duplicates_movies_only() {
        let store = SqliteMovieStore::in_memory().unwrap();
        let file = write_file(CATALOG);

        upload_file(&store, file.path(), false, false).unwrap();
        upload_file(&store, file.path(), false, false).unwrap();

        let counts = store.get_counts().unwrap();
        assert_eq!(counts.movies, 6);
        assert_eq!(counts.actors, 2);
        assert_eq!(counts.genres, 1);
    }

    #[test]
    fn rejects_non_array_file() {
        let file = write_file(r#"{"title": "Big", "year": 1988}"#);
        assert!(load_entries(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let store = SqliteMovieStore::in_memory().unwrap();
        let result = upload_file(&store, Path::new("/nonexistent/movies.json"), false, false);
        assert!(result.is_err());
    }
}
