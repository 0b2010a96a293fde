use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Singleton record naming the active season and episode. Updated through a
/// compare-and-set on `version`, never through ambient global lookups.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActiveState {
    pub season_id: Option<Uuid>,
    pub episode_id: Option<Uuid>,
    pub version: i64,
    pub updated_at: Option<DateTime<Utc>>,
}
