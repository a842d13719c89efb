//! Movie Bulk Loader
//!
//! Imports a JSON array of `{title, year, cast, genres}` entries into the
//! movie database, resolving actors and genres by name.

use anyhow::Result;
use clap::Parser;
use movie_catalog_server::bulk_upload::upload_file;
use movie_catalog_server::SqliteMovieStore;
use std::path::PathBuf;
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "movie-bulk-upload")]
#[command(about = "Bulk upload movies from a JSON file")]
struct Args {
    /// File path to the JSON file with the movies to import
    #[arg(value_name = "FILEPATH")]
    filepath: PathBuf,

    /// Path to the SQLite movie database file
    #[arg(long, default_value = "movies.db")]
    db_path: PathBuf,

    /// Logging level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    /// Delete all data before the upload
    #[arg(short, long, default_value_t = false)]
    delete: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    info!(
        "Movie bulk loader started for the file: {}",
        args.filepath.display()
    );
    info!("Database: {}", args.db_path.display());
    if args.delete {
        warn!("All existing movies, actors and genres will be deleted first");
    }

    let store = SqliteMovieStore::new(&args.db_path)?;
    let stats = upload_file(&store, &args.filepath, args.delete, true)?;

    info!("");
    info!("Upload Summary");
    info!("==============");
    info!("Entries processed: {}", stats.processed);
    info!("Movies imported: {}", stats.imported);
    if stats.skipped_entries > 0 {
        warn!("Invalid entries skipped: {}", stats.skipped_entries);
    }
    if stats.skipped_actors > 0 {
        warn!("Invalid actor names skipped: {}", stats.skipped_actors);
    }

    let counts = store.get_counts()?;
    info!("");
    info!("Database contains:");
    info!("  {} movies", counts.movies);
    info!("  {} actors", counts.actors);
    info!("  {} genres", counts.genres);

    Ok(())
}
