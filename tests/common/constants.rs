//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the seeded catalog changes, update only this file and
//! `fixtures::TEST_CATALOG_JSON`.

// ============================================================================
// Test Catalog Movies
// ============================================================================

pub const MOVIE_BIG_TITLE: &str = "Big";
pub const MOVIE_BIG_YEAR: i64 = 1988;

pub const MOVIE_SPLASH_TITLE: &str = "Splash";
pub const MOVIE_SPLASH_YEAR: i64 = 1984;

pub const MOVIE_BACHELOR_PARTY_TITLE: &str = "Bachelor Party";

pub const MOVIE_BLADE_RUNNER_TITLE: &str = "Blade Runner";

/// Number of movies in the seeded catalog
pub const SEEDED_MOVIES: usize = 4;

// ============================================================================
// Test Catalog Actors and Genres
// ============================================================================

/// In Big, Splash and Bachelor Party
pub const ACTOR_TOM_HANKS: &str = "Tom Hanks";

/// In Big
pub const ACTOR_ELIZABETH_PERKINS: &str = "Elizabeth Perkins";

/// In Splash and Blade Runner
pub const ACTOR_DARYL_HANNAH: &str = "Daryl Hannah";

/// In Blade Runner
pub const ACTOR_HARRISON_FORD: &str = "Harrison Ford";

/// Listed in the fixture for Splash, rejected for its forbidden character
pub const ACTOR_REJECTED_NAME: &str = "John Candy (?)";

pub const GENRE_COMEDY: &str = "Comedy";
pub const GENRE_FANTASY: &str = "Fantasy";
pub const GENRE_ROMANCE: &str = "Romance";
pub const GENRE_SCIENCE_FICTION: &str = "Science Fiction";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
