use std::collections::HashSet;

use sqlx::SqlitePool;
use storage::dto::ranking::SubmitRankingRequest;
use storage::models::RankingEntry;
use storage::repository::league::LeagueRepository;
use storage::repository::ranking::RankingRepository;
use storage::repository::season::SeasonRepository;
use uuid::Uuid;
use validator::Validate;

use crate::error::{EngineError, Result};

/// Replace a participant's preference order for a season.
///
/// The submitted list must cover every contestant of the season exactly once.
/// Rankings freeze once any of the participant's leagues in the season has
/// committed its draft; after that only an explicit draft unlock reopens them.
pub async fn submit_ranking(
    pool: &SqlitePool,
    request: &SubmitRankingRequest,
) -> Result<Vec<RankingEntry>> {
    request.validate()?;

    let season_repo = SeasonRepository::new(pool);
    season_repo.find_by_id(request.season_id).await?;

    let contestants = season_repo.list_contestants(request.season_id).await?;
    let season_ids: HashSet<Uuid> = contestants.iter().map(|c| c.contestant_id).collect();

    let mut seen = HashSet::with_capacity(request.contestant_ids.len());
    for contestant_id in &request.contestant_ids {
        if !seen.insert(*contestant_id) {
            return Err(EngineError::Validation(format!(
                "contestant {contestant_id} appears more than once in the ranking"
            )));
        }
        if !season_ids.contains(contestant_id) {
            return Err(EngineError::Validation(format!(
                "contestant {contestant_id} does not belong to the season"
            )));
        }
    }

    let missing: Vec<Uuid> = season_ids
        .iter()
        .filter(|id| !seen.contains(*id))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(EngineError::Validation(format!(
            "ranking must cover every contestant; {} missing",
            missing.len()
        )));
    }

    let league_repo = LeagueRepository::new(pool);
    if league_repo
        .is_in_locked_league(request.season_id, request.participant_id)
        .await?
    {
        return Err(EngineError::Conflict(
            "rankings are frozen after the draft commits".to_string(),
        ));
    }

    let entries = RankingRepository::new(pool)
        .replace(
            request.season_id,
            request.participant_id,
            &request.contestant_ids,
        )
        .await?;

    tracing::info!(
        participant_id = %request.participant_id,
        season_id = %request.season_id,
        entries = entries.len(),
        "ranking replaced"
    );

    Ok(entries)
}

pub async fn get_ranking(
    pool: &SqlitePool,
    season_id: Uuid,
    participant_id: Uuid,
) -> Result<Vec<RankingEntry>> {
    let entries = RankingRepository::new(pool)
        .get(season_id, participant_id)
        .await?;
    Ok(entries)
}
