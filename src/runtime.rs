//! Reloadable service snapshot.
//!
//! Everything a request needs (link service, allow-list, index redirect,
//! not-found page) lives in one immutable [`Runtime`]. [`RuntimeHandle`] swaps
//! the whole snapshot on reload, so a request observes either the old or the
//! new configuration, never a mix.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::Result;
use tokio::sync::Mutex;

use crate::application::services::LinkService;
use crate::config::{self, Config};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::persistence;

/// Served when the configured not-found page cannot be read.
pub const FALLBACK_NOT_FOUND_PAGE: &str = "<!DOCTYPE html>\n<html>\n<head><title>404 Not Found</title></head>\n<body><h1>404 Not Found</h1></body>\n</html>\n";

/// One consistent view of the configuration and the services built from it.
pub struct Runtime {
    pub links: LinkService<dyn LinkRepository>,
    pub index_url: Option<String>,
    pub not_found_page: Arc<str>,
    pub listen_addr: String,
    pub database_url: String,
}

impl Runtime {
    /// Builds a snapshot from `config` around an already connected store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database URL cannot be resolved.
    pub async fn from_config(config: &Config, repository: Arc<dyn LinkRepository>) -> Result<Self> {
        Ok(Self {
            links: LinkService::new(repository, config.keys.iter().cloned(), config.token_length),
            index_url: config.index_url.clone(),
            not_found_page: load_not_found_page(&config.not_found_page).await,
            listen_addr: config.listen_addr.clone(),
            database_url: config.database_url()?,
        })
    }
}

/// Reads the not-found document, falling back to a built-in page.
pub async fn load_not_found_page(path: &Path) -> Arc<str> {
    match tokio::fs::read_to_string(path).await {
        Ok(page) => Arc::from(page),
        Err(e) => {
            tracing::warn!(
                "Could not read not-found page {}: {}. Using built-in page.",
                path.display(),
                e
            );
            Arc::from(FALLBACK_NOT_FOUND_PAGE)
        }
    }
}

/// Shared owner of the active [`Runtime`].
pub struct RuntimeHandle {
    current: RwLock<Arc<Runtime>>,
    config_path: PathBuf,
    reload_lock: Mutex<()>,
}

impl RuntimeHandle {
    pub fn new(runtime: Runtime, config_path: impl Into<PathBuf>) -> Self {
        Self {
            current: RwLock::new(Arc::new(runtime)),
            config_path: config_path.into(),
            reload_lock: Mutex::new(()),
        }
    }

    /// Returns the active snapshot. The lock is released before this returns.
    pub fn current(&self) -> Arc<Runtime> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Re-reads the config file and environment and swaps in a new snapshot.
    ///
    /// The store is reused when the database URL is unchanged. Concurrent
    /// reloads run one at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the new store cannot be
    /// connected. The previous snapshot stays active in that case.
    pub async fn reload(&self) -> Result<()> {
        let _guard = self.reload_lock.lock().await;

        let config = config::load(&self.config_path)?;
        let current = self.current();

        let database_url = config.database_url()?;
        let repository = if database_url == current.database_url {
            Arc::clone(current.links.repository())
        } else {
            tracing::info!("Database settings changed, connecting new link store");
            persistence::connect(&config).await?
        };

        if config.listen_addr != current.listen_addr {
            tracing::warn!(
                "Listen address changed from {} to {}; restart required to apply",
                current.listen_addr,
                config.listen_addr
            );
        }

        let next = Runtime::from_config(&config, repository).await?;

        *self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = Arc::new(next);
        tracing::info!(keys = config.keys.len(), "Configuration reloaded");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::InMemoryLinkRepository;
    use serial_test::serial;
    use std::env;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("shortlink-runtime-{}-{}", std::process::id(), name))
    }

    fn write_config(path: &Path, keys: &[&str]) {
        let doc = serde_json::json!({
            "database_url": "memory://",
            "keys": keys,
            "not_found_page": temp_path("missing-404.html"),
        });
        std::fs::write(path, doc.to_string()).unwrap();
    }

    async fn handle(path: &Path) -> RuntimeHandle {
        let config = config::load(path).unwrap();
        let repository: Arc<dyn LinkRepository> = Arc::new(InMemoryLinkRepository::new());
        RuntimeHandle::new(Runtime::from_config(&config, repository).await.unwrap(), path)
    }

    #[tokio::test]
    async fn test_missing_page_uses_fallback() {
        let page = load_not_found_page(&temp_path("no-such-page.html")).await;
        assert_eq!(&*page, FALLBACK_NOT_FOUND_PAGE);
    }

    #[tokio::test]
    async fn test_page_is_read_from_disk() {
        let path = temp_path("page.html");
        std::fs::write(&path, "<h1>gone</h1>").unwrap();

        let page = load_not_found_page(&path).await;
        assert_eq!(&*page, "<h1>gone</h1>");

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    #[serial]
    async fn test_reload_swaps_keys_and_keeps_store() {
        let path = temp_path("swap.json");
        write_config(&path, &["old"]);
        let handle = handle(&path).await;

        let before = handle.current();
        let token = before
            .links
            .create("old", "https://example.com", None)
            .await
            .unwrap();

        write_config(&path, &["new"]);
        handle.reload().await.unwrap();

        let after = handle.current();
        assert!(!after.links.is_allowed("old"));
        assert!(after.links.is_allowed("new"));
        assert!(Arc::ptr_eq(before.links.repository(), after.links.repository()));
        assert_eq!(after.links.resolve(&token).await.unwrap(), "https://example.com");

        // Requests holding the old snapshot still see the old keys.
        assert!(before.links.is_allowed("old"));

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    #[serial]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let path = temp_path("broken.json");
        write_config(&path, &["old"]);
        let handle = handle(&path).await;

        std::fs::write(&path, "{ broken").unwrap();
        assert!(handle.reload().await.is_err());
        assert!(handle.current().links.is_allowed("old"));

        std::fs::write(&path, r#"{ "database_url": "memory://", "token_length": 0 }"#).unwrap();
        assert!(handle.reload().await.is_err());
        assert!(handle.current().links.is_allowed("old"));

        std::fs::remove_file(path).ok();
    }
}
