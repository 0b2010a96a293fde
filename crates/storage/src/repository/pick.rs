use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{PickStatus, WeeklyPick};

pub struct PickRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PickRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Last-write-wins upsert keyed by (league, participant, episode). A
    /// resubmission before the deadline simply replaces the prior pick.
    pub async fn upsert_manual(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
        episode_id: Uuid,
        contestant_id: Uuid,
        picked_at: DateTime<Utc>,
    ) -> Result<WeeklyPick> {
        let pick = sqlx::query_as::<_, WeeklyPick>(
            r#"
            INSERT INTO weekly_picks (pick_id, league_id, participant_id, episode_id, contestant_id, status, picked_at)
            VALUES (?, ?, ?, ?, ?, 'manual', ?)
            ON CONFLICT (league_id, participant_id, episode_id)
            DO UPDATE SET
                contestant_id = excluded.contestant_id,
                status = 'manual',
                picked_at = excluded.picked_at
            RETURNING pick_id, league_id, participant_id, episode_id, contestant_id, status, picked_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(league_id)
        .bind(participant_id)
        .bind(episode_id)
        .bind(contestant_id)
        .bind(picked_at)
        .fetch_one(self.pool)
        .await?;

        Ok(pick)
    }

    /// Insert-if-absent write for the lock sweep. Returns None when a pick
    /// already exists; an existing pick is never overwritten, so the sweep is
    /// safe to rerun and safe against a last-second manual submission.
    pub async fn insert_auto_if_absent(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
        episode_id: Uuid,
        contestant_id: Uuid,
        picked_at: DateTime<Utc>,
    ) -> Result<Option<WeeklyPick>> {
        let pick = WeeklyPick {
            pick_id: Uuid::new_v4(),
            league_id,
            participant_id,
            episode_id,
            contestant_id,
            status: PickStatus::Auto,
            picked_at,
        };

        let result = sqlx::query(
            r#"
            INSERT INTO weekly_picks (pick_id, league_id, participant_id, episode_id, contestant_id, status, picked_at)
            VALUES (?, ?, ?, ?, ?, 'auto', ?)
            ON CONFLICT (league_id, participant_id, episode_id) DO NOTHING
            "#,
        )
        .bind(pick.pick_id)
        .bind(pick.league_id)
        .bind(pick.participant_id)
        .bind(pick.episode_id)
        .bind(pick.contestant_id)
        .bind(pick.picked_at)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(pick))
    }

    pub async fn find(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
        episode_id: Uuid,
    ) -> Result<Option<WeeklyPick>> {
        let pick = sqlx::query_as::<_, WeeklyPick>(
            r#"
            SELECT pick_id, league_id, participant_id, episode_id, contestant_id, status, picked_at
            FROM weekly_picks
            WHERE league_id = ? AND participant_id = ? AND episode_id = ?
            "#,
        )
        .bind(league_id)
        .bind(participant_id)
        .bind(episode_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(pick)
    }

    pub async fn list_for_episode(&self, episode_id: Uuid) -> Result<Vec<WeeklyPick>> {
        let picks = sqlx::query_as::<_, WeeklyPick>(
            r#"
            SELECT pick_id, league_id, participant_id, episode_id, contestant_id, status, picked_at
            FROM weekly_picks
            WHERE episode_id = ?
            ORDER BY league_id, participant_id
            "#,
        )
        .bind(episode_id)
        .fetch_all(self.pool)
        .await?;

        Ok(picks)
    }

    pub async fn list_for_league(&self, league_id: Uuid) -> Result<Vec<WeeklyPick>> {
        let picks = sqlx::query_as::<_, WeeklyPick>(
            r#"
            SELECT pick_id, league_id, participant_id, episode_id, contestant_id, status, picked_at
            FROM weekly_picks
            WHERE league_id = ?
            ORDER BY participant_id, picked_at
            "#,
        )
        .bind(league_id)
        .fetch_all(self.pool)
        .await?;

        Ok(picks)
    }
}
