//! Category queries.

use crate::db::{DatabaseError, unix_timestamp};
use crate::validation::CategoryFields;

use super::db::AwardsDatabase;
use super::models::{Category, CategoryRemoval, CategoryStats, Nominee};

impl AwardsDatabase {
    /// Create a category from already-validated fields.
    ///
    /// A duplicate name surfaces as [`DatabaseError::Conflict`].
    pub async fn create_category(
        &self,
        id: &str,
        fields: &CategoryFields,
    ) -> Result<Category, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO categories (id, name, description, voting_locked, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.voting_locked)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_category(id).await
    }

    /// Get a category by ID.
    pub async fn get_category(&self, id: &str) -> Result<Category, DatabaseError> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Category {id}")))
    }

    /// Get a category by its exact name.
    pub async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, DatabaseError> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool())
            .await?;

        Ok(category)
    }

    /// List all categories in creation order.
    pub async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY created_at, rowid")
                .fetch_all(self.pool())
                .await?;

        Ok(categories)
    }

    /// Overwrite a category's fields with already-validated values.
    pub async fn update_category(
        &self,
        id: &str,
        fields: &CategoryFields,
    ) -> Result<Category, DatabaseError> {
        let result = sqlx::query(
            "UPDATE categories SET name = ?, description = ?, voting_locked = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.voting_locked)
        .bind(unix_timestamp())
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Category {id}")));
        }

        self.get_category(id).await
    }

    /// Remove a category together with its nominees and votes (transactionally).
    pub async fn remove_category(&self, id: &str) -> Result<CategoryRemoval, DatabaseError> {
        let mut tx = self.pool().begin().await?;

        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Category {id}")))?;

        let nominees = sqlx::query_as::<_, Nominee>("SELECT * FROM nominees WHERE category_id = ?")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        let votes = sqlx::query("DELETE FROM votes WHERE category_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM nominees WHERE category_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(CategoryRemoval {
            category,
            nominees,
            deleted_votes: votes.rows_affected(),
        })
    }

    /// Nominee and vote counts for every category, in creation order.
    pub async fn category_stats(&self) -> Result<Vec<CategoryStats>, DatabaseError> {
        let stats = sqlx::query_as::<_, CategoryStats>(
            "SELECT c.id, c.name, c.voting_locked, \
                    (SELECT COUNT(*) FROM nominees n WHERE n.category_id = c.id) AS nominee_count, \
                    (SELECT COUNT(*) FROM votes v WHERE v.category_id = c.id) AS vote_count \
             FROM categories c ORDER BY c.created_at, c.rowid",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(stats)
    }

    /// Delete every vote, nominee, and category. Admin accounts are kept.
    ///
    /// Returns the number of categories removed.
    pub async fn clear_registry(&self) -> Result<u64, DatabaseError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM votes").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM nominees").execute(&mut *tx).await?;
        let categories = sqlx::query("DELETE FROM categories")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(categories.rows_affected())
    }
}
