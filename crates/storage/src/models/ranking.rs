use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row of a participant's preference order for a season. The full ranking
/// is the set of rows for (season, participant), ordered by `position`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RankingEntry {
    pub ranking_id: Uuid,
    pub season_id: Uuid,
    pub participant_id: Uuid,
    pub contestant_id: Uuid,
    pub position: i64,
}
