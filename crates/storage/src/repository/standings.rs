use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::dto::standings::StandingsEntry;
use crate::error::Result;
use crate::models::Standing;

/// Computed leaderboard row ready for persistence.
#[derive(Debug, Clone)]
pub struct StandingRow {
    pub participant_id: Uuid,
    pub total_points: i64,
    pub rank: i64,
}

pub struct StandingsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StandingsRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Replace the league's standings in one transaction. Delete-and-insert
    /// keeps the recompute idempotent: rerunning it lands on the same rows.
    pub async fn replace_for_league(
        &self,
        league_id: Uuid,
        rows: &[StandingRow],
        computed_at: DateTime<Utc>,
    ) -> Result<Vec<Standing>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM standings WHERE league_id = ?")
            .bind(league_id)
            .execute(&mut *tx)
            .await?;

        let mut standings = Vec::with_capacity(rows.len());
        for row in rows {
            let standing = Standing {
                standing_id: Uuid::new_v4(),
                league_id,
                participant_id: row.participant_id,
                total_points: row.total_points,
                rank: row.rank,
                computed_at,
            };

            sqlx::query(
                r#"
                INSERT INTO standings (standing_id, league_id, participant_id, total_points, rank, computed_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(standing.standing_id)
            .bind(standing.league_id)
            .bind(standing.participant_id)
            .bind(standing.total_points)
            .bind(standing.rank)
            .bind(standing.computed_at)
            .execute(&mut *tx)
            .await?;

            standings.push(standing);
        }

        tx.commit().await?;
        Ok(standings)
    }

    /// Ranked leaderboard with display names. Ties share a rank; among tied
    /// rows the earlier league join comes first.
    pub async fn list(&self, league_id: Uuid) -> Result<Vec<StandingsEntry>> {
        let entries = sqlx::query_as::<_, StandingsEntry>(
            r#"
            SELECT s.rank, s.participant_id, p.display_name, s.total_points
            FROM standings s
            INNER JOIN participants p ON s.participant_id = p.participant_id
            INNER JOIN memberships m
                ON s.league_id = m.league_id AND s.participant_id = m.participant_id
            WHERE s.league_id = ?
            ORDER BY s.rank, m.joined_at, s.participant_id
            "#,
        )
        .bind(league_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }
}
