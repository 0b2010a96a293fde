use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Episode;

pub struct EpisodeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EpisodeRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        season_id: Uuid,
        number: i64,
        lock_at: DateTime<Utc>,
        counts_all_roster: bool,
    ) -> Result<Episode> {
        let episode = Episode {
            episode_id: Uuid::new_v4(),
            season_id,
            number,
            lock_at,
            counts_all_roster,
            is_finalized: false,
        };

        sqlx::query(
            r#"
            INSERT INTO episodes (episode_id, season_id, number, lock_at, counts_all_roster, is_finalized)
            VALUES (?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(episode.episode_id)
        .bind(episode.season_id)
        .bind(episode.number)
        .bind(episode.lock_at)
        .bind(episode.counts_all_roster)
        .execute(self.pool)
        .await?;

        Ok(episode)
    }

    pub async fn find_by_id(&self, episode_id: Uuid) -> Result<Episode> {
        let episode = sqlx::query_as::<_, Episode>(
            r#"
            SELECT episode_id, season_id, number, lock_at, counts_all_roster, is_finalized
            FROM episodes
            WHERE episode_id = ?
            "#,
        )
        .bind(episode_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(episode)
    }

    pub async fn find_by_number(&self, season_id: Uuid, number: i64) -> Result<Option<Episode>> {
        let episode = sqlx::query_as::<_, Episode>(
            r#"
            SELECT episode_id, season_id, number, lock_at, counts_all_roster, is_finalized
            FROM episodes
            WHERE season_id = ? AND number = ?
            "#,
        )
        .bind(season_id)
        .bind(number)
        .fetch_optional(self.pool)
        .await?;

        Ok(episode)
    }

    pub async fn list_for_season(&self, season_id: Uuid) -> Result<Vec<Episode>> {
        let episodes = sqlx::query_as::<_, Episode>(
            r#"
            SELECT episode_id, season_id, number, lock_at, counts_all_roster, is_finalized
            FROM episodes
            WHERE season_id = ?
            ORDER BY number
            "#,
        )
        .bind(season_id)
        .fetch_all(self.pool)
        .await?;

        Ok(episodes)
    }

    /// Check-and-set finalization. Returns false when the episode was already
    /// finalized, so callers can surface a conflict instead of re-finalizing.
    pub async fn try_finalize(&self, episode_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE episodes SET is_finalized = 1 WHERE episode_id = ? AND is_finalized = 0",
        )
        .bind(episode_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Explicit reopen, the only gate back to score edits after finalization.
    pub async fn try_reopen(&self, episode_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE episodes SET is_finalized = 0 WHERE episode_id = ? AND is_finalized = 1",
        )
        .bind(episode_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
