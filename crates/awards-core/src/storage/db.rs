//! `SQLite` database handle for the awards service.

use std::path::Path;

use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::db::{DatabaseError, open_pool, open_pool_in_memory};

/// Cloneable handle to the awards database. Clones share one pool.
#[derive(Clone)]
pub struct AwardsDatabase {
    pool: Pool<Sqlite>,
}

impl AwardsDatabase {
    /// Open or create a database at the given path and apply migrations.
    pub async fn open(path: &Path) -> Result<Self, DatabaseError> {
        let db = Self {
            pool: open_pool(path).await?,
        };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub async fn open_in_memory() -> Result<Self, DatabaseError> {
        let db = Self {
            pool: open_pool_in_memory().await?,
        };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;

        info!("Awards database migrations complete");
        Ok(())
    }

    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
