use sqlx::SqlitePool;
use storage::models::ActiveState;
use storage::repository::episode::EpisodeRepository;
use storage::repository::season::SeasonRepository;
use storage::repository::state::StateRepository;
use uuid::Uuid;

use crate::error::{EngineError, Result};

/// Point the versioned singleton at a new active season. The active episode
/// resets with it.
pub async fn activate_season(pool: &SqlitePool, season_id: Uuid) -> Result<ActiveState> {
    SeasonRepository::new(pool).find_by_id(season_id).await?;

    let state = StateRepository::new(pool)
        .set_active_season(Some(season_id))
        .await?;

    tracing::info!(season_id = %season_id, version = state.version, "active season set");
    Ok(state)
}

/// Mark the episode the competition is currently in. The episode must belong
/// to the active season.
pub async fn activate_episode(pool: &SqlitePool, episode_id: Uuid) -> Result<ActiveState> {
    let episode = EpisodeRepository::new(pool).find_by_id(episode_id).await?;

    let state_repo = StateRepository::new(pool);
    let current = state_repo.get().await?;
    if current.season_id != Some(episode.season_id) {
        return Err(EngineError::Validation(
            "episode does not belong to the active season".to_string(),
        ));
    }

    let state = state_repo.set_active_episode(Some(episode_id)).await?;

    tracing::info!(episode = episode.number, version = state.version, "active episode set");
    Ok(state)
}

pub async fn get_active_state(pool: &SqlitePool) -> Result<ActiveState> {
    let state = StateRepository::new(pool).get().await?;
    Ok(state)
}
