use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RosterEntry {
    pub roster_id: Uuid,
    pub league_id: Uuid,
    pub participant_id: Uuid,
    pub contestant_id: Uuid,
    pub round: i64,
    /// Overall pick number across both rounds, 1..2N.
    pub pick_number: i64,
}
