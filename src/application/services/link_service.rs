//! Link creation and resolution service.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::application::services::id_allocator::{Allocation, IdAllocator};
use crate::domain::entities::NewLink;
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, StoreError};
use crate::utils::base62;

/// Service for creating short links and resolving tokens to their targets.
///
/// Holds the store handle, the id allocator and the allow-list of creation
/// keys. A reload builds a new service rather than mutating this one.
pub struct LinkService<L: LinkRepository + ?Sized + 'static> {
    repository: Arc<L>,
    allocator: IdAllocator,
    keys: HashSet<String>,
}

impl<L: LinkRepository + ?Sized + 'static> LinkService<L> {
    /// Creates a service with an OS-seeded allocator producing `token_length`-symbol tokens.
    pub fn new(repository: Arc<L>, keys: impl IntoIterator<Item = String>, token_length: usize) -> Self {
        Self::with_allocator(repository, keys, IdAllocator::new(token_length))
    }

    pub fn with_allocator(
        repository: Arc<L>,
        keys: impl IntoIterator<Item = String>,
        allocator: IdAllocator,
    ) -> Self {
        Self {
            repository,
            allocator,
            keys: keys.into_iter().collect(),
        }
    }

    pub fn repository(&self) -> &Arc<L> {
        &self.repository
    }

    pub fn is_allowed(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Registers `target` for a caller presenting `key`.
    ///
    /// Checks run in this order:
    /// 1. `key` and `target` are non-empty
    /// 2. `key` is on the allow-list
    /// 3. `validity`, when present, is an integer later than now
    ///
    /// # Errors
    ///
    /// - [`AppError::BadRequest`] for missing fields or a bad `validity`
    /// - [`AppError::Forbidden`] for an unknown key
    /// - [`AppError::Internal`] when the store fails
    pub async fn create(
        &self,
        key: &str,
        target: &str,
        validity: Option<&str>,
    ) -> Result<String, AppError> {
        self.create_at(key, target, validity, Utc::now().timestamp()).await
    }

    /// [`Self::create`] against an explicit clock.
    pub async fn create_at(
        &self,
        key: &str,
        target: &str,
        validity: Option<&str>,
        now: i64,
    ) -> Result<String, AppError> {
        if key.is_empty() || target.is_empty() {
            return Err(AppError::bad_request(
                "bad field(s)",
                json!({ "key_empty": key.is_empty(), "link_empty": target.is_empty() }),
            ));
        }

        if !self.is_allowed(key) {
            return Err(AppError::forbidden("forbidden", json!({})));
        }

        let expiry = match validity {
            Some(raw) => Some(parse_validity(raw, now)?),
            None => None,
        };

        let allocation = self.shorten(target, expiry).await?;
        Ok(allocation.token)
    }

    /// Allocates an unused id and stores `target` under it.
    ///
    /// A concurrent writer can take the allocated id between the check and the
    /// insert. That case is retried once with a fresh allocation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store failure or a second duplicate.
    pub async fn shorten(&self, target: &str, expiry: Option<i64>) -> Result<Allocation, AppError> {
        match self.try_shorten(target, expiry).await {
            Err(StoreError::Duplicate(id)) => {
                tracing::warn!(id, "id taken between check and insert, allocating again");
                Ok(self.try_shorten(target, expiry).await?)
            }
            other => Ok(other?),
        }
    }

    async fn try_shorten(&self, target: &str, expiry: Option<i64>) -> Result<Allocation, StoreError> {
        let allocation = self.allocator.allocate(self.repository.as_ref()).await?;

        self.repository
            .create(NewLink {
                id: allocation.id,
                target: target.to_string(),
                expiry,
            })
            .await?;

        tracing::info!(id = allocation.id, token = %allocation.token, "link created");
        Ok(allocation)
    }

    /// Resolves `token` to its redirect target.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for malformed tokens, unknown ids, empty targets and expired links
    /// - [`AppError::Internal`] when the lookup fails
    pub async fn resolve(&self, token: &str) -> Result<String, AppError> {
        self.resolve_at(token, Utc::now().timestamp()).await
    }

    /// [`Self::resolve`] against an explicit clock.
    ///
    /// Expired links are removed by a detached task; the caller never waits on it.
    pub async fn resolve_at(&self, token: &str, now: i64) -> Result<String, AppError> {
        if !base62::is_valid_token(token) {
            return Err(not_found(token));
        }

        let id = base62::decode(token)
            .ok()
            .and_then(|value| i64::try_from(value).ok())
            .ok_or_else(|| not_found(token))?;

        let link = match self.repository.find_by_id(id).await? {
            Some(link) if !link.target.is_empty() => link,
            _ => return Err(not_found(token)),
        };

        if link.is_expired_at(now) {
            self.sweep(id);
            return Err(not_found(token));
        }

        Ok(link.target)
    }

    fn sweep(&self, id: i64) {
        let repository = Arc::clone(&self.repository);

        tokio::spawn(async move {
            match repository.delete(id).await {
                Ok(()) => tracing::info!(id, "expired link removed"),
                Err(e) => tracing::warn!(id, error = %e, "failed to remove expired link"),
            }
        });
    }
}

fn not_found(token: &str) -> AppError {
    AppError::not_found("not found", json!({ "token": token }))
}

fn parse_validity(raw: &str, now: i64) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(expiry) if expiry > now => Ok(expiry),
        Ok(expiry) => Err(AppError::bad_request(
            "bad field(s)",
            json!({ "validity": expiry, "now": now }),
        )),
        Err(e) => Err(AppError::bad_request(
            "bad field(s)",
            json!({ "validity": raw, "reason": e.to_string() }),
        )),
    }
}
