//! Startup seeding of default admin accounts.

use tracing::info;

use awards_core::DatabaseError;
use awards_core::db::new_id;
use awards_core::password::hash_password;
use awards_core::storage::AwardsDatabase;

/// Failure while creating default admin accounts.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Password hashing failed for {username}: {reason}")]
    Hashing { username: String, reason: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Username/password pair created at startup when the username is free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultAdmin {
    pub username: String,
    pub password: String,
}

impl DefaultAdmin {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Create each default admin that does not exist yet.
///
/// Existing accounts keep their current password. Returns how many accounts
/// were created.
pub async fn seed_default_admins(
    db: &AwardsDatabase,
    admins: &[DefaultAdmin],
) -> Result<usize, SeedError> {
    let mut created = 0;

    for admin in admins {
        if db.get_admin_by_username(&admin.username).await.is_ok() {
            continue;
        }

        let hash = hash_password(&admin.password).map_err(|e| SeedError::Hashing {
            username: admin.username.clone(),
            reason: e.to_string(),
        })?;

        if db.ensure_admin(&new_id(), &admin.username, &hash).await? {
            info!(username = %admin.username, "Created default admin user");
            created += 1;
        }
    }

    Ok(created)
}
