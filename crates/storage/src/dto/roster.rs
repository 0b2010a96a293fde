use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Roster entry joined with its contestant, so engines never re-join by hand.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RosterSlot {
    pub league_id: Uuid,
    pub participant_id: Uuid,
    pub contestant_id: Uuid,
    pub round: i64,
    pub pick_number: i64,
    pub contestant_name: String,
    pub eliminated_in_episode: Option<i64>,
}
