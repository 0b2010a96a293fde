use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Fully derived leaderboard row, recomputed after every scoring commit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Standing {
    pub standing_id: Uuid,
    pub league_id: Uuid,
    pub participant_id: Uuid,
    pub total_points: i64,
    pub rank: i64,
    pub computed_at: DateTime<Utc>,
}
