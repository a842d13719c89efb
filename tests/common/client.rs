//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all movie-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // Server
    // ========================================================================

    /// GET /
    pub async fn get_stats(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Get stats request failed")
    }

    // ========================================================================
    // Movie Endpoints
    // ========================================================================

    /// POST /movie
    pub async fn create_movie(&self, payload: &Value) -> Response {
        self.client
            .post(format!("{}/movie", self.base_url))
            .json(payload)
            .send()
            .await
            .expect("Create movie request failed")
    }

    /// POST /movie with a raw, possibly malformed, body
    pub async fn create_movie_raw(&self, body: &str) -> Response {
        self.client
            .post(format!("{}/movie", self.base_url))
            .header("content-type", "application/json")
            .body(body.to_owned())
            .send()
            .await
            .expect("Create movie request failed")
    }

    /// GET /movie/{id}
    pub async fn get_movie(&self, id: i64) -> Response {
        self.client
            .get(format!("{}/movie/{}", self.base_url, id))
            .send()
            .await
            .expect("Get movie request failed")
    }

    /// PUT /movie/{id}
    pub async fn update_movie(&self, id: i64, payload: &Value) -> Response {
        self.client
            .put(format!("{}/movie/{}", self.base_url, id))
            .json(payload)
            .send()
            .await
            .expect("Update movie request failed")
    }

    /// DELETE /movie/{id}
    pub async fn delete_movie(&self, id: i64) -> Response {
        self.client
            .delete(format!("{}/movie/{}", self.base_url, id))
            .send()
            .await
            .expect("Delete movie request failed")
    }

    // ========================================================================
    // Reports
    // ========================================================================

    /// GET /report
    pub async fn get_report(&self) -> Response {
        self.client
            .get(format!("{}/report", self.base_url))
            .send()
            .await
            .expect("Get report request failed")
    }
}
