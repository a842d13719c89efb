pub mod aggregate;
mod error;
mod models;
pub mod reconcile;
pub mod report;
pub mod rows;
mod schema;
mod store;
mod trait_def;
pub mod validation;

pub use aggregate::ImportedMovie;
pub use error::{MovieError, StoreError, ValidationError};
pub use models::*;
pub use schema::MOVIE_VERSIONED_SCHEMAS;
pub use store::SqliteMovieStore;
pub use trait_def::MovieCatalog;
