use anyhow::{Context, Result};
use std::{net::SocketAddr, time::Duration};

use tracing::{error, info};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use super::{log_requests, state::*, ServerConfig};
use crate::movie_store::{Movie, MovieError, StoreError};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

/// Body of every successful movie mutation or fetch.
#[derive(Serialize)]
struct MovieResponse {
    message: String,
    result: Movie,
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        let status = match &err {
            MovieError::Validation(_) => StatusCode::BAD_REQUEST,
            MovieError::NotFound(_) => StatusCode::NOT_FOUND,
            MovieError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        MovieError::Store(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {}", self.message);
        }
        (
            self.status,
            Json(ErrorResponse {
                message: self.message,
            }),
        )
            .into_response()
    }
}

fn movie_response(status: StatusCode, message: &str, movie: Movie) -> Response {
    (
        status,
        Json(MovieResponse {
            message: message.to_owned(),
            result: movie,
        }),
    )
        .into_response()
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: state.version.clone(),
    };
    Json(stats)
}

async fn post_movie(
    State(catalog): State<GuardedMovieCatalog>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let movie = catalog.create_movie(&payload)?;
    Ok(movie_response(StatusCode::CREATED, "Movie created", movie))
}

async fn get_movie(
    State(catalog): State<GuardedMovieCatalog>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let movie = catalog.get_movie(id)?;
    Ok(movie_response(StatusCode::OK, "Movie found", movie))
}

async fn put_movie(
    State(catalog): State<GuardedMovieCatalog>,
    Path(id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let movie = catalog.update_movie(id, &payload)?;
    Ok(movie_response(StatusCode::OK, "Movie updated", movie))
}

async fn delete_movie(
    State(catalog): State<GuardedMovieCatalog>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let movie = catalog.delete_movie(id)?;
    Ok(movie_response(StatusCode::OK, "Movie deleted", movie))
}

async fn get_report(State(catalog): State<GuardedMovieCatalog>) -> Result<Response, ApiError> {
    let report = catalog.count_movies_by_actor_and_year()?;
    Ok(Json(report).into_response())
}

pub fn make_app(config: ServerConfig, movie_catalog: GuardedMovieCatalog) -> Router {
    let state = ServerState::new(config, movie_catalog);

    let movie_routes: Router = Router::new()
        .route("/movie", axum::routing::post(post_movie))
        .route(
            "/movie/{id}",
            get(get_movie).put(put_movie).delete(delete_movie),
        )
        .route("/report", get(get_report))
        .with_state(state.clone());

    Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .merge(movie_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

pub async fn run_server(config: ServerConfig, movie_catalog: GuardedMovieCatalog) -> Result<()> {
    let addr = SocketAddr::new(config.bind_address, config.port);
    let app = make_app(config, movie_catalog);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Ready to serve at {}!", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}
