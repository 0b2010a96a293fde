use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Derived per-episode point total for one contestant. The set of rows for an
/// episode is replaced as a unit on every scoring submission, never appended to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EpisodeScore {
    pub score_id: Uuid,
    pub episode_id: Uuid,
    pub contestant_id: Uuid,
    pub points: i64,
}
