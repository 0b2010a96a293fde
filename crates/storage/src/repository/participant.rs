use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Participant;

pub struct ParticipantRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ParticipantRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, display_name: &str) -> Result<Participant> {
        let participant = Participant {
            participant_id: Uuid::new_v4(),
            display_name: display_name.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO participants (participant_id, display_name, created_at) VALUES (?, ?, ?)",
        )
        .bind(participant.participant_id)
        .bind(&participant.display_name)
        .bind(participant.created_at)
        .execute(self.pool)
        .await?;

        Ok(participant)
    }
}
