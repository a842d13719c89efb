use axum::extract::FromRef;

use crate::movie_store::MovieCatalog;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedMovieCatalog = Arc<dyn MovieCatalog>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub movie_catalog: GuardedMovieCatalog,
    pub version: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, movie_catalog: GuardedMovieCatalog) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            movie_catalog,
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedMovieCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.movie_catalog.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
