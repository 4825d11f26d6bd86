//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::StoreError;

/// Row shape of the `links` table.
#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    id: i64,
    target: String,
    expiry: Option<i64>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link::new(row.id, row.target, row.expiry)
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses bound parameters for every query; the primary key on `id` enforces
/// uniqueness across concurrent inserts.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, target, expiry
            FROM links
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let id = new_link.id;

        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (id, target, expiry)
            VALUES ($1, $2, $3)
            RETURNING id, target, expiry
            "#,
        )
        .bind(new_link.id)
        .bind(new_link.target)
        .bind(new_link.expiry)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| StoreError::from_insert(id, e))?;

        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn delete_expired(&self, now: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM links WHERE expiry IS NOT NULL AND expiry < $1")
            .bind(now)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
