use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named, signed point value tied to an in-show event. Immutable once the
/// season is published; the points column carries the sign.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScoringRule {
    pub rule_id: Uuid,
    pub season_id: Uuid,
    pub code: String,
    pub description: Option<String>,
    pub points: i64,
}
