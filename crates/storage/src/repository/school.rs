use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::SchoolId;

pub struct SchoolRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SchoolRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Oldest school with exactly this name, if any
    pub async fn find_id_by_name(&self, name: &str) -> Result<Option<SchoolId>> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM school WHERE name = ? ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(id)
    }

    /// Resolve a school by exact name, creating it when absent.
    ///
    /// Not transactional: two concurrent first registrations for the same new
    /// school can both insert. Readers always pick the oldest row.
    pub async fn resolve_or_create(&self, name: &str) -> Result<SchoolId> {
        if let Some(id) = self.find_id_by_name(name).await? {
            return Ok(id);
        }

        let id = sqlx::query_scalar::<_, i64>("INSERT INTO school (name) VALUES (?) RETURNING id")
            .bind(name)
            .fetch_one(self.pool)
            .await?;

        tracing::debug!(school_id = id, name, "Created school");
        Ok(id)
    }
}
