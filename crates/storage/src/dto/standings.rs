use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Leaderboard row joined with the participant's display name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StandingsEntry {
    pub rank: i64,
    pub participant_id: Uuid,
    pub display_name: String,
    pub total_points: i64,
}
