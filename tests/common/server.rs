//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own seeded database.

use super::constants::*;
use super::fixtures::create_test_db;
use movie_catalog_server::movie_store::{rows, StoreCounts};
use movie_catalog_server::server::{server::make_app, RequestsLoggingLevel, ServerConfig};
use movie_catalog_server::SqliteMovieStore;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated database
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// The store the server runs on, for direct database access in tests
    pub store: Arc<SqliteMovieStore>,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// This function:
    /// 1. Creates a temporary database seeded through the bulk loader
    /// 2. Binds to a random port (127.0.0.1:0)
    /// 3. Spawns the server in a background task
    /// 4. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if database creation, port binding or server startup fails,
    /// or if the server doesn't become ready within timeout.
    pub async fn spawn() -> Self {
        let (temp_db_dir, db_path) = create_test_db().expect("Failed to create test database");

        let store =
            Arc::new(SqliteMovieStore::new(&db_path).expect("Failed to open movie store"));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        let app = make_app(config, store.clone());

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            store,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }

    /// Row counts of the server's database
    pub fn counts(&self) -> StoreCounts {
        self.store.get_counts().expect("Failed to count rows")
    }

    /// Id of the seeded movie with the given title
    pub fn movie_id(&self, title: &str) -> i64 {
        self.store
            .read(|conn| {
                conn.query_row("SELECT id FROM movie WHERE title = ?1", [title], |r| {
                    r.get(0)
                })
            })
            .unwrap_or_else(|e| panic!("Movie {} not seeded: {}", title, e))
    }

    /// Id of the seeded actor with the given name
    pub fn actor_id(&self, name: &str) -> i64 {
        self.store
            .read(|conn| rows::find_actor_by_name(conn, name))
            .expect("Actor lookup failed")
            .unwrap_or_else(|| panic!("Actor {} not seeded", name))
            .id
    }

    /// Id of the seeded genre with the given name
    pub fn genre_id(&self, name: &str) -> i64 {
        self.store
            .read(|conn| rows::find_genre_by_name(conn, name))
            .expect("Genre lookup failed")
            .unwrap_or_else(|| panic!("Genre {} not seeded", name))
            .id
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
