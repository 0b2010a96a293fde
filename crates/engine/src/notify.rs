use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload emitted once an episode's picks are locked. Identifiers and counts
/// only; no contestant, score or elimination data may ever ride along, so the
/// payload stays spoiler-free wherever the dispatcher forwards it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PicksLocked {
    pub season_id: Uuid,
    pub episode_id: Uuid,
    pub episode_number: i64,
    pub auto_picks_created: usize,
}

/// Payload emitted when an episode's scores are finalized. Carries no outcome
/// data for the same reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeFinalized {
    pub season_id: Uuid,
    pub episode_id: Uuid,
    pub episode_number: i64,
    pub finalized_at: DateTime<Utc>,
}

/// Seam to the external notification dispatcher. Delivery mechanics live
/// entirely on the other side of this trait.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn picks_locked(&self, event: &PicksLocked);
    async fn episode_finalized(&self, event: &EpisodeFinalized);
}

/// Default dispatcher that just logs the structured payloads.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn picks_locked(&self, event: &PicksLocked) {
        tracing::info!(
            episode = event.episode_number,
            auto_picks = event.auto_picks_created,
            "picks locked"
        );
    }

    async fn episode_finalized(&self, event: &EpisodeFinalized) {
        tracing::info!(
            episode = event.episode_number,
            finalized_at = %event.finalized_at,
            "episode finalized"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_locked_payload_is_spoiler_free() {
        let event = PicksLocked {
            season_id: Uuid::new_v4(),
            episode_id: Uuid::new_v4(),
            episode_number: 3,
            auto_picks_created: 2,
        };

        let json = serde_json::to_value(&event).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["auto_picks_created", "episode_id", "episode_number", "season_id"],
            "payload carries identifiers and counts only"
        );
    }
}
