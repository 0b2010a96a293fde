use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::RankingEntry;

pub struct RankingRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RankingRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Replace the participant's ranking as a set: delete-and-insert in one
    /// transaction so a failed write never leaves a partial order behind.
    pub async fn replace(
        &self,
        season_id: Uuid,
        participant_id: Uuid,
        ordered_contestant_ids: &[Uuid],
    ) -> Result<Vec<RankingEntry>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM rankings WHERE season_id = ? AND participant_id = ?")
            .bind(season_id)
            .bind(participant_id)
            .execute(&mut *tx)
            .await?;

        let mut entries = Vec::with_capacity(ordered_contestant_ids.len());
        for (i, contestant_id) in ordered_contestant_ids.iter().enumerate() {
            let entry = RankingEntry {
                ranking_id: Uuid::new_v4(),
                season_id,
                participant_id,
                contestant_id: *contestant_id,
                position: (i + 1) as i64,
            };

            sqlx::query(
                r#"
                INSERT INTO rankings (ranking_id, season_id, participant_id, contestant_id, position)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(entry.ranking_id)
            .bind(entry.season_id)
            .bind(entry.participant_id)
            .bind(entry.contestant_id)
            .bind(entry.position)
            .execute(&mut *tx)
            .await?;

            entries.push(entry);
        }

        tx.commit().await?;
        Ok(entries)
    }

    pub async fn get(&self, season_id: Uuid, participant_id: Uuid) -> Result<Vec<RankingEntry>> {
        let entries = sqlx::query_as::<_, RankingEntry>(
            r#"
            SELECT ranking_id, season_id, participant_id, contestant_id, position
            FROM rankings
            WHERE season_id = ? AND participant_id = ?
            ORDER BY position
            "#,
        )
        .bind(season_id)
        .bind(participant_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }
}
