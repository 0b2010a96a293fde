use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contestant {
    pub contestant_id: Uuid,
    pub season_id: Uuid,
    pub name: String,
    /// Episode number the contestant was eliminated in, if any.
    pub eliminated_in_episode: Option<i64>,
    pub placement: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Contestant {
    /// True when the contestant went out strictly before the given episode.
    /// A contestant eliminated *in* the episode still scores for it.
    pub fn eliminated_before(&self, episode_number: i64) -> bool {
        matches!(self.eliminated_in_episode, Some(n) if n < episode_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contestant(eliminated_in_episode: Option<i64>) -> Contestant {
        Contestant {
            contestant_id: Uuid::new_v4(),
            season_id: Uuid::new_v4(),
            name: "Alex".into(),
            eliminated_in_episode,
            placement: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_still_in_the_game() {
        assert!(!contestant(None).eliminated_before(5));
    }

    #[test]
    fn test_eliminated_in_current_episode_still_counts() {
        assert!(!contestant(Some(5)).eliminated_before(5));
    }

    #[test]
    fn test_eliminated_in_prior_episode() {
        assert!(contestant(Some(4)).eliminated_before(5));
    }
}
