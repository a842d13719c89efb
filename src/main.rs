use anyhow::{Context, Result};
use clap::Parser;
use movie_catalog_server::config::{AppConfig, CliConfig, FileConfig};
use movie_catalog_server::server::{run_server, RequestsLoggingLevel, ServerConfig};
use movie_catalog_server::SqliteMovieStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "movie-server")]
#[command(about = "Serve the movie catalog over HTTP")]
struct CliArgs {
    /// Path to the SQLite movie database file, created if missing.
    #[clap(value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8000)]
    pub port: u16,

    /// The address to bind to.
    #[clap(long, default_value = "0.0.0.0")]
    pub bind_address: String,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// TOML config file; its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };

    let cli_config = CliConfig {
        db_path: cli_args.db_path,
        port: cli_args.port,
        bind_address: cli_args.bind_address,
        logging_level: cli_args.logging_level,
    };
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening SQLite movie database at {:?}...", app_config.db_path);
    let movie_store = Arc::new(SqliteMovieStore::new(&app_config.db_path)?);

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level,
        port: app_config.port,
        bind_address: app_config.bind_address,
    };
    run_server(server_config, movie_store).await
}
