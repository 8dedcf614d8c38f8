//! Admin account queries.

use crate::db::{DatabaseError, unix_timestamp};

use super::db::AwardsDatabase;
use super::models::AdminUser;

/// Role assigned to every seeded or created admin.
pub const ADMIN_ROLE: &str = "admin";

impl AwardsDatabase {
    /// Create an admin account with an already-hashed password.
    pub async fn create_admin(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<AdminUser, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO admin_users (id, username, password_hash, role, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .bind(ADMIN_ROLE)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_admin_by_username(username).await
    }

    /// Create the admin unless the username is already taken.
    ///
    /// Returns `true` if a new account was inserted.
    pub async fn ensure_admin(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "INSERT INTO admin_users (id, username, password_hash, role, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) ON CONFLICT(username) DO NOTHING",
        )
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .bind(ADMIN_ROLE)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get an admin by username.
    pub async fn get_admin_by_username(&self, username: &str) -> Result<AdminUser, DatabaseError> {
        sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Admin {username}")))
    }

    /// Replace an admin's password hash and stamp `password_changed_at`.
    pub async fn update_admin_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "UPDATE admin_users SET password_hash = ?, password_changed_at = ?, updated_at = ? \
             WHERE username = ?",
        )
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .bind(username)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Admin {username}")));
        }

        Ok(())
    }
}
