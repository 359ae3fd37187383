//! srm-classes - class composition service for the school records manager
//!
//! Serves the class, student/teacher directory and subject catalog endpoints
//! over a single SQLite database.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use srm_classes::{build_router, AppState, ComposerConfig};
use srm_common::config::{self, TomlConfig, ROOT_FOLDER_ENV};
use srm_common::db::init_database;
use tracing::{error, info};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "srm-classes")]
#[command(about = "Class composition service for the school records manager")]
#[command(version)]
struct Args {
    /// Root folder holding school.db (overrides SRM_ROOT_FOLDER and config file)
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Bind address
    #[arg(long, env = "SRM_HOST")]
    host: Option<String>,

    /// Listen port
    #[arg(long, env = "SRM_PORT")]
    port: Option<u16>,

    /// Academic year used when a create request omits one
    #[arg(long, env = "SRM_ACADEMIC_YEAR")]
    academic_year: Option<String>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Build identification goes out before any database work
    info!(
        "Starting srm-classes v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let toml_config = TomlConfig::load_or_default(args.config.as_deref());

    let root_folder =
        config::resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &toml_config);
    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let composer_config = ComposerConfig {
        default_academic_year: args
            .academic_year
            .or(toml_config.default_academic_year)
            .unwrap_or_else(config::current_academic_year),
        operation_timeout: toml_config.operation_timeout_ms.map(Duration::from_millis),
    };
    info!(
        "Default academic year: {}",
        composer_config.default_academic_year
    );

    let app = build_router(AppState::new(pool, composer_config));

    let host = args
        .host
        .or(toml_config.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("srm-classes listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
