use sqlx::SqlitePool;

use crate::error::{Result, StorageError};
use crate::models::Category;

pub struct CategoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all categories in id order
    pub async fn list(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM category ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        Ok(categories)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Category> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM category WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SEED_CATEGORIES;
    use crate::test_support::migrated_db;

    #[tokio::test]
    async fn test_list_returns_seeded_categories_in_id_order() {
        let db = migrated_db().await;
        let categories = CategoryRepository::new(db.pool()).list().await.unwrap();

        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, SEED_CATEGORIES);
        assert!(categories.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_find_missing_category() {
        let db = migrated_db().await;
        let err = CategoryRepository::new(db.pool())
            .find_by_id(999)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
