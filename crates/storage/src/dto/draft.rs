use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One slot of a snake draft result: who picks when, and whom they get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftAssignment {
    pub round: i64,
    pub pick_number: i64,
    pub participant_id: Uuid,
    pub contestant_id: Uuid,
}

/// Computed draft outcome that has not been persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPreview {
    pub league_id: Uuid,
    pub assignments: Vec<DraftAssignment>,
}
