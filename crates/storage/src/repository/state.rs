use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::ActiveState;

/// Access to the versioned active-season/active-episode singleton. Every
/// update is a compare-and-set on the version column; a stale write fails
/// with a constraint violation instead of silently clobbering.
pub struct StateRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StateRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self) -> Result<ActiveState> {
        let state = sqlx::query_as::<_, ActiveState>(
            "SELECT season_id, episode_id, version, updated_at FROM active_state WHERE id = 1",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(state)
    }

    /// Point at a new active season. The active episode resets alongside it,
    /// since episodes belong to a season.
    pub async fn set_active_season(&self, season_id: Option<Uuid>) -> Result<ActiveState> {
        let current = self.get().await?;

        let result = sqlx::query(
            r#"
            UPDATE active_state
            SET season_id = ?, episode_id = NULL, version = version + 1, updated_at = ?
            WHERE id = 1 AND version = ?
            "#,
        )
        .bind(season_id)
        .bind(Utc::now())
        .bind(current.version)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ConstraintViolation(
                "active state was updated concurrently".to_string(),
            ));
        }

        self.get().await
    }

    pub async fn set_active_episode(&self, episode_id: Option<Uuid>) -> Result<ActiveState> {
        let current = self.get().await?;

        let result = sqlx::query(
            r#"
            UPDATE active_state
            SET episode_id = ?, version = version + 1, updated_at = ?
            WHERE id = 1 AND version = ?
            "#,
        )
        .bind(episode_id)
        .bind(Utc::now())
        .bind(current.version)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ConstraintViolation(
                "active state was updated concurrently".to_string(),
            ));
        }

        self.get().await
    }
}
