//! Link Store backends.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - PostgreSQL storage via SQLx
//! - [`InMemoryLinkRepository`] - process-local map for development and tests
//!
//! [`connect`] picks the backend from the configured database URL.

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::domain::repositories::LinkRepository;

/// Database URL selecting the in-memory store.
pub const MEMORY_URL: &str = "memory://";

/// Connects the Link Store described by `config`.
///
/// For PostgreSQL this builds a pool with the configured limits and applies
/// the embedded migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    let database_url = config.database_url()?;

    if database_url.starts_with(MEMORY_URL) {
        tracing::warn!("Using in-memory link store; links are lost on restart");
        return Ok(Arc::new(InMemoryLinkRepository::new()));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
}
