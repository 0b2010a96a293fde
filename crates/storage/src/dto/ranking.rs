use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Full replacement of a participant's preference order for a season.
/// The list must cover every contestant in the season exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitRankingRequest {
    pub participant_id: Uuid,
    pub season_id: Uuid,
    #[validate(length(min = 1, message = "ranking must not be empty"))]
    pub contestant_ids: Vec<Uuid>,
}
