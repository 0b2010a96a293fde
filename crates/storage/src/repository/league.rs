use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{DraftStatus, League, Membership};

pub struct LeagueRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LeagueRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, season_id: Uuid, name: &str) -> Result<League> {
        let league = League {
            league_id: Uuid::new_v4(),
            season_id,
            name: name.to_string(),
            draft_status: DraftStatus::Pending,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO leagues (league_id, season_id, name, draft_status, created_at)
            VALUES (?, ?, ?, 'pending', ?)
            "#,
        )
        .bind(league.league_id)
        .bind(league.season_id)
        .bind(&league.name)
        .bind(league.created_at)
        .execute(self.pool)
        .await?;

        Ok(league)
    }

    pub async fn find_by_id(&self, league_id: Uuid) -> Result<League> {
        let league = sqlx::query_as::<_, League>(
            r#"
            SELECT league_id, season_id, name, draft_status, created_at
            FROM leagues
            WHERE league_id = ?
            "#,
        )
        .bind(league_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(league)
    }

    pub async fn list_for_season(&self, season_id: Uuid) -> Result<Vec<League>> {
        let leagues = sqlx::query_as::<_, League>(
            r#"
            SELECT league_id, season_id, name, draft_status, created_at
            FROM leagues
            WHERE season_id = ?
            ORDER BY created_at, league_id
            "#,
        )
        .bind(season_id)
        .fetch_all(self.pool)
        .await?;

        Ok(leagues)
    }

    pub async fn add_member(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
        draft_position: Option<i64>,
    ) -> Result<Membership> {
        let membership = Membership {
            membership_id: Uuid::new_v4(),
            league_id,
            participant_id,
            draft_position,
            joined_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO memberships (membership_id, league_id, participant_id, draft_position, joined_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(membership.membership_id)
        .bind(membership.league_id)
        .bind(membership.participant_id)
        .bind(membership.draft_position)
        .bind(membership.joined_at)
        .execute(self.pool)
        .await?;

        Ok(membership)
    }

    /// Assign draft positions 1..N in the given participant order.
    pub async fn set_draft_order(&self, league_id: Uuid, order: &[Uuid]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for (i, participant_id) in order.iter().enumerate() {
            let result = sqlx::query(
                r#"
                UPDATE memberships
                SET draft_position = ?
                WHERE league_id = ? AND participant_id = ?
                "#,
            )
            .bind((i + 1) as i64)
            .bind(league_id)
            .bind(participant_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(StorageError::ConstraintViolation(format!(
                    "participant {participant_id} is not a member of league {league_id}"
                )));
            }
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_members(&self, league_id: Uuid) -> Result<Vec<Membership>> {
        let members = sqlx::query_as::<_, Membership>(
            r#"
            SELECT membership_id, league_id, participant_id, draft_position, joined_at
            FROM memberships
            WHERE league_id = ?
            ORDER BY draft_position IS NULL, draft_position, joined_at, participant_id
            "#,
        )
        .bind(league_id)
        .fetch_all(self.pool)
        .await?;

        Ok(members)
    }

    /// Check-and-set pending -> locked, run inside the draft-commit
    /// transaction. Returns false when the league is already locked.
    pub async fn try_lock_draft(
        &self,
        conn: &mut SqliteConnection,
        league_id: Uuid,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE leagues SET draft_status = 'locked' WHERE league_id = ? AND draft_status = 'pending'",
        )
        .bind(league_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Explicit unlock ahead of a draft recommit.
    pub async fn try_unlock_draft(&self, league_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE leagues SET draft_status = 'pending' WHERE league_id = ? AND draft_status = 'locked'",
        )
        .bind(league_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Whether the participant belongs to any league of the season whose
    /// draft has committed. Rankings freeze at that point.
    pub async fn is_in_locked_league(
        &self,
        season_id: Uuid,
        participant_id: Uuid,
    ) -> Result<bool> {
        let locked = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM memberships m
                INNER JOIN leagues l ON m.league_id = l.league_id
                WHERE l.season_id = ? AND m.participant_id = ? AND l.draft_status = 'locked'
            )
            "#,
        )
        .bind(season_id)
        .bind(participant_id)
        .fetch_one(self.pool)
        .await?;

        Ok(locked)
    }
}
