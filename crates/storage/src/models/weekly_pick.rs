use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PickStatus {
    Manual,
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeeklyPick {
    pub pick_id: Uuid,
    pub league_id: Uuid,
    pub participant_id: Uuid,
    pub episode_id: Uuid,
    pub contestant_id: Uuid,
    pub status: PickStatus,
    pub picked_at: DateTime<Utc>,
}
