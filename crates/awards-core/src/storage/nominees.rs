//! Nominee queries.

use crate::db::{DatabaseError, unix_timestamp};
use crate::validation::NomineeFields;

use super::db::AwardsDatabase;
use super::models::{Nominee, NomineeRemoval};

impl AwardsDatabase {
    /// Create a nominee from already-validated fields.
    ///
    /// An unknown `category_id` surfaces as [`DatabaseError::InvalidReference`].
    pub async fn create_nominee(
        &self,
        id: &str,
        fields: &NomineeFields,
    ) -> Result<Nominee, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO nominees \
             (id, name, description, category_id, image_url, youtube_url, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.category_id)
        .bind(fields.image_url.as_deref())
        .bind(fields.youtube_url.as_deref())
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_nominee(id).await
    }

    /// Get a nominee by ID.
    pub async fn get_nominee(&self, id: &str) -> Result<Nominee, DatabaseError> {
        sqlx::query_as::<_, Nominee>("SELECT * FROM nominees WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Nominee {id}")))
    }

    /// List nominees in creation order, optionally restricted to one category.
    pub async fn list_nominees(
        &self,
        category_id: Option<&str>,
    ) -> Result<Vec<Nominee>, DatabaseError> {
        let nominees = if let Some(category_id) = category_id {
            sqlx::query_as::<_, Nominee>(
                "SELECT * FROM nominees WHERE category_id = ? ORDER BY created_at, rowid",
            )
            .bind(category_id)
            .fetch_all(self.pool())
            .await?
        } else {
            sqlx::query_as::<_, Nominee>("SELECT * FROM nominees ORDER BY created_at, rowid")
                .fetch_all(self.pool())
                .await?
        };

        Ok(nominees)
    }

    /// Overwrite a nominee's fields with already-validated values.
    pub async fn update_nominee(
        &self,
        id: &str,
        fields: &NomineeFields,
    ) -> Result<Nominee, DatabaseError> {
        let result = sqlx::query(
            "UPDATE nominees SET name = ?, description = ?, category_id = ?, image_url = ?, \
             youtube_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.category_id)
        .bind(fields.image_url.as_deref())
        .bind(fields.youtube_url.as_deref())
        .bind(unix_timestamp())
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Nominee {id}")));
        }

        self.get_nominee(id).await
    }

    /// Clear a nominee's image URL and return the nominee as it was before.
    pub async fn clear_nominee_image(&self, id: &str) -> Result<Nominee, DatabaseError> {
        let mut tx = self.pool().begin().await?;

        let nominee = sqlx::query_as::<_, Nominee>("SELECT * FROM nominees WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Nominee {id}")))?;

        sqlx::query("UPDATE nominees SET image_url = NULL, updated_at = ? WHERE id = ?")
            .bind(unix_timestamp())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(nominee)
    }

    /// Remove a nominee and every vote cast for it (transactionally).
    pub async fn remove_nominee(&self, id: &str) -> Result<NomineeRemoval, DatabaseError> {
        let mut tx = self.pool().begin().await?;

        let nominee = sqlx::query_as::<_, Nominee>("SELECT * FROM nominees WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Nominee {id}")))?;

        let votes = sqlx::query("DELETE FROM votes WHERE nominee_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM nominees WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(NomineeRemoval {
            nominee,
            deleted_votes: votes.rows_affected(),
        })
    }
}
