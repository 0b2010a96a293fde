use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Contestant, Season};

pub struct SeasonRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SeasonRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str) -> Result<Season> {
        let season = Season {
            season_id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO seasons (season_id, name, created_at) VALUES (?, ?, ?)")
            .bind(season.season_id)
            .bind(&season.name)
            .bind(season.created_at)
            .execute(self.pool)
            .await?;

        Ok(season)
    }

    pub async fn find_by_id(&self, season_id: Uuid) -> Result<Season> {
        let season = sqlx::query_as::<_, Season>(
            "SELECT season_id, name, created_at FROM seasons WHERE season_id = ?",
        )
        .bind(season_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(season)
    }

    pub async fn create_contestant(&self, season_id: Uuid, name: &str) -> Result<Contestant> {
        let contestant = Contestant {
            contestant_id: Uuid::new_v4(),
            season_id,
            name: name.to_string(),
            eliminated_in_episode: None,
            placement: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO contestants (contestant_id, season_id, name, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(contestant.contestant_id)
        .bind(contestant.season_id)
        .bind(&contestant.name)
        .bind(contestant.created_at)
        .execute(self.pool)
        .await?;

        Ok(contestant)
    }

    /// Contestants of a season in stable order. This order is also the draft
    /// fallback order when a ranking runs out of undrafted contestants.
    pub async fn list_contestants(&self, season_id: Uuid) -> Result<Vec<Contestant>> {
        let contestants = sqlx::query_as::<_, Contestant>(
            r#"
            SELECT contestant_id, season_id, name, eliminated_in_episode, placement, created_at
            FROM contestants
            WHERE season_id = ?
            ORDER BY name, contestant_id
            "#,
        )
        .bind(season_id)
        .fetch_all(self.pool)
        .await?;

        Ok(contestants)
    }

    pub async fn mark_eliminated(
        &self,
        contestant_id: Uuid,
        episode_number: i64,
        placement: Option<i64>,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE contestants
            SET eliminated_in_episode = ?, placement = ?
            WHERE contestant_id = ?
            "#,
        )
        .bind(episode_number)
        .bind(placement)
        .bind(contestant_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
