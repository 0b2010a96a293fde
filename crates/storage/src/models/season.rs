use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Season {
    pub season_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
