use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One observed rule occurrence for a contestant in an episode. A count of
/// zero is a legitimate explicit entry: it produces a zero-point score row,
/// which is how an episode becomes "complete" for quiet contestants.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RuleOccurrence {
    pub contestant_id: Uuid,
    #[validate(length(min = 1, message = "rule code must not be empty"))]
    pub rule_code: String,
    #[validate(range(min = 0, message = "occurrence count must not be negative"))]
    pub count: i64,
}

/// Result of the explicit completeness query. Completeness is never inferred
/// from absence of rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringCompleteness {
    pub episode_id: Uuid,
    pub is_complete: bool,
    pub missing_contestant_ids: Vec<Uuid>,
}
