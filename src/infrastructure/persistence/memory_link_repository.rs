//! In-process link store.
//!
//! Selected with `database_url = "memory://"`. Contents are lost on restart;
//! used for local development and by the HTTP integration tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::StoreError;

/// Link store backed by a `HashMap` behind an async read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    links: RwLock<HashMap<i64, Link>>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, StoreError> {
        Ok(self.links.read().await.get(&id).cloned())
    }

    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let mut links = self.links.write().await;

        if links.contains_key(&new_link.id) {
            return Err(StoreError::Duplicate(new_link.id));
        }

        let link = Link::from(new_link);
        links.insert(link.id, link.clone());
        Ok(link)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.links.write().await.remove(&id);
        Ok(())
    }

    async fn delete_expired(&self, now: i64) -> Result<u64, StoreError> {
        let mut links = self.links.write().await;
        let before = links.len();
        links.retain(|_, link| !link.is_expired_at(now));
        Ok((before - links.len()) as u64)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.links.read().await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_link(id: i64, target: &str, expiry: Option<i64>) -> NewLink {
        NewLink {
            id,
            target: target.to_string(),
            expiry,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryLinkRepository::new();

        repo.create(new_link(1, "https://example.com", None))
            .await
            .unwrap();

        let link = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(link.target, "https://example.com");
        assert_eq!(link.expiry, None);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repo = InMemoryLinkRepository::new();
        assert!(repo.find_by_id(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let repo = InMemoryLinkRepository::new();

        repo.create(new_link(1, "https://example.com", None))
            .await
            .unwrap();
        let err = repo
            .create(new_link(1, "https://other.com", None))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Duplicate(1)));
        assert_eq!(
            repo.find_by_id(1).await.unwrap().unwrap().target,
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn test_expired_rows_are_returned() {
        let repo = InMemoryLinkRepository::new();
        repo.create(new_link(1, "https://example.com", Some(10)))
            .await
            .unwrap();

        let link = repo.find_by_id(1).await.unwrap().unwrap();
        assert!(link.is_expired_at(11));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = InMemoryLinkRepository::new();
        repo.create(new_link(1, "https://example.com", None))
            .await
            .unwrap();

        repo.delete(1).await.unwrap();
        repo.delete(1).await.unwrap();

        assert!(repo.find_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_expired_and_count() {
        let repo = InMemoryLinkRepository::new();
        repo.create(new_link(1, "https://a.example", Some(100)))
            .await
            .unwrap();
        repo.create(new_link(2, "https://b.example", Some(300)))
            .await
            .unwrap();
        repo.create(new_link(3, "https://c.example", None))
            .await
            .unwrap();

        assert_eq!(repo.delete_expired(200).await.unwrap(), 1);
        assert_eq!(repo.count().await.unwrap(), 2);
        assert!(repo.find_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_creates_of_same_id() {
        let repo = Arc::new(InMemoryLinkRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.create(new_link(7, &format!("https://{i}.example"), None))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
