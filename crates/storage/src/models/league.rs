use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Pending,
    Locked,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct League {
    pub league_id: Uuid,
    pub season_id: Uuid,
    pub name: String,
    pub draft_status: DraftStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Membership {
    pub membership_id: Uuid,
    pub league_id: Uuid,
    pub participant_id: Uuid,
    /// Position 1..N in the draft order; unset until the league sets it.
    pub draft_position: Option<i64>,
    pub joined_at: DateTime<Utc>,
}
