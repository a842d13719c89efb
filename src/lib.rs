//! Movie Catalog Server Library
//!
//! This library exposes the internal modules for the binaries and for testing.

pub mod bulk_upload;
pub mod config;
pub mod movie_store;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use movie_store::{MovieCatalog, SqliteMovieStore};
pub use server::{run_server, RequestsLoggingLevel};
