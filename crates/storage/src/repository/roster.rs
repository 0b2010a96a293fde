use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::dto::draft::DraftAssignment;
use crate::dto::roster::RosterSlot;
use crate::error::Result;
use crate::models::RosterEntry;

pub struct RosterRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RosterRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Remove every roster row of the league. Runs inside the draft-commit
    /// transaction so a recommit never leaves residue from the prior draft.
    pub async fn clear_league(&self, conn: &mut SqliteConnection, league_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM roster_entries WHERE league_id = ?")
            .bind(league_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn insert_assignment(
        &self,
        conn: &mut SqliteConnection,
        league_id: Uuid,
        assignment: &DraftAssignment,
    ) -> Result<RosterEntry> {
        let entry = RosterEntry {
            roster_id: Uuid::new_v4(),
            league_id,
            participant_id: assignment.participant_id,
            contestant_id: assignment.contestant_id,
            round: assignment.round,
            pick_number: assignment.pick_number,
        };

        sqlx::query(
            r#"
            INSERT INTO roster_entries (roster_id, league_id, participant_id, contestant_id, round, pick_number)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.roster_id)
        .bind(entry.league_id)
        .bind(entry.participant_id)
        .bind(entry.contestant_id)
        .bind(entry.round)
        .bind(entry.pick_number)
        .execute(&mut *conn)
        .await?;

        Ok(entry)
    }

    pub async fn list_for_league(&self, league_id: Uuid) -> Result<Vec<RosterEntry>> {
        let entries = sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT roster_id, league_id, participant_id, contestant_id, round, pick_number
            FROM roster_entries
            WHERE league_id = ?
            ORDER BY pick_number
            "#,
        )
        .bind(league_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// A participant's roster in stable order (round, then pick number).
    /// This order doubles as the deterministic auto-pick fallback order.
    pub async fn list_for_participant(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Vec<RosterEntry>> {
        let entries = sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT roster_id, league_id, participant_id, contestant_id, round, pick_number
            FROM roster_entries
            WHERE league_id = ? AND participant_id = ?
            ORDER BY round, pick_number
            "#,
        )
        .bind(league_id)
        .bind(participant_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    /// Roster joined with contestant details, hiding the join from engines.
    pub async fn get_roster_with_contestants(
        &self,
        league_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Vec<RosterSlot>> {
        let slots = sqlx::query_as::<_, RosterSlot>(
            r#"
            SELECT r.league_id, r.participant_id, r.contestant_id, r.round, r.pick_number,
                   c.name AS contestant_name, c.eliminated_in_episode
            FROM roster_entries r
            INNER JOIN contestants c ON r.contestant_id = c.contestant_id
            WHERE r.league_id = ? AND r.participant_id = ?
            ORDER BY r.round, r.pick_number
            "#,
        )
        .bind(league_id)
        .bind(participant_id)
        .fetch_all(self.pool)
        .await?;

        Ok(slots)
    }
}
