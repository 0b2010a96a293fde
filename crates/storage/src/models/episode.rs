use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Episode {
    pub episode_id: Uuid,
    pub season_id: Uuid,
    pub number: i64,
    /// Pick submission deadline. The sole authority for the pick window.
    pub lock_at: DateTime<Utc>,
    /// Premiere-style episodes score both roster contestants instead of the pick.
    pub counts_all_roster: bool,
    pub is_finalized: bool,
}

impl Episode {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        now >= self.lock_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn episode(lock_at: DateTime<Utc>) -> Episode {
        Episode {
            episode_id: Uuid::new_v4(),
            season_id: Uuid::new_v4(),
            number: 1,
            lock_at,
            counts_all_roster: false,
            is_finalized: false,
        }
    }

    #[test]
    fn test_open_before_deadline() {
        let now = Utc::now();
        assert!(!episode(now + Duration::minutes(1)).is_locked(now));
    }

    #[test]
    fn test_locked_at_and_after_deadline() {
        let now = Utc::now();
        assert!(episode(now).is_locked(now));
        assert!(episode(now - Duration::minutes(1)).is_locked(now));
    }
}
