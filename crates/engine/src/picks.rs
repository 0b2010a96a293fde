use chrono::Utc;
use sqlx::SqlitePool;
use storage::models::{DraftStatus, RosterEntry, WeeklyPick};
use storage::repository::episode::EpisodeRepository;
use storage::repository::league::LeagueRepository;
use storage::repository::pick::PickRepository;
use storage::repository::roster::RosterRepository;
use uuid::Uuid;

use crate::error::{EngineError, Result};

/// The roster contestant to auto-pick: whichever one the participant did not
/// pick in the immediately preceding episode. With no prior pick (or a prior
/// pick that no longer matches the roster) the first slot in stable roster
/// order wins. Elimination status is deliberately ignored; the rotation
/// stands even when the whole roster is out of the game.
fn auto_pick_contestant(roster: &[RosterEntry], prior: Option<&WeeklyPick>) -> Option<Uuid> {
    let first = roster.first()?;

    let choice = match prior {
        Some(pick) => roster
            .iter()
            .find(|e| e.contestant_id != pick.contestant_id)
            .unwrap_or(first),
        None => first,
    };

    Some(choice.contestant_id)
}

/// Last-write-wins pick submission, open strictly before the episode's lock
/// timestamp. The contestant must be on the participant's roster in this
/// league; elimination status does not matter here.
pub async fn submit_pick(
    pool: &SqlitePool,
    league_id: Uuid,
    participant_id: Uuid,
    episode_id: Uuid,
    contestant_id: Uuid,
) -> Result<WeeklyPick> {
    let episode = EpisodeRepository::new(pool).find_by_id(episode_id).await?;
    let league = LeagueRepository::new(pool).find_by_id(league_id).await?;

    if episode.season_id != league.season_id {
        return Err(EngineError::Validation(
            "episode does not belong to the league's season".to_string(),
        ));
    }

    let now = Utc::now();
    if episode.is_locked(now) {
        return Err(EngineError::WindowClosed);
    }

    let roster = RosterRepository::new(pool)
        .list_for_participant(league_id, participant_id)
        .await?;
    if !roster.iter().any(|e| e.contestant_id == contestant_id) {
        return Err(EngineError::NotOnRoster);
    }

    let pick = PickRepository::new(pool)
        .upsert_manual(league_id, participant_id, episode_id, contestant_id, now)
        .await?;

    tracing::info!(
        league_id = %league_id,
        participant_id = %participant_id,
        episode = episode.number,
        "pick submitted"
    );

    Ok(pick)
}

/// Deadline sweep for one episode, meant to be driven by the scheduler.
///
/// Before the lock timestamp this is a no-op. Afterwards every member of
/// every drafted league in the episode's season who has no pick gets an
/// auto-pick through an insert-if-absent write, so the sweep can run
/// repeatedly, or concurrently with a last-second manual submission, without
/// duplicating or overwriting anything. Returns the picks it created.
pub async fn run_pick_lock_sweep(pool: &SqlitePool, episode_id: Uuid) -> Result<Vec<WeeklyPick>> {
    let episode_repo = EpisodeRepository::new(pool);
    let episode = episode_repo.find_by_id(episode_id).await?;

    let now = Utc::now();
    if !episode.is_locked(now) {
        tracing::debug!(episode = episode.number, "sweep before deadline, nothing to do");
        return Ok(Vec::new());
    }

    let prior_episode = if episode.number > 1 {
        episode_repo
            .find_by_number(episode.season_id, episode.number - 1)
            .await?
    } else {
        None
    };

    let league_repo = LeagueRepository::new(pool);
    let roster_repo = RosterRepository::new(pool);
    let pick_repo = PickRepository::new(pool);

    let mut created = Vec::new();
    for league in league_repo.list_for_season(episode.season_id).await? {
        if league.draft_status != DraftStatus::Locked {
            continue;
        }

        for member in league_repo.list_members(league.league_id).await? {
            if pick_repo
                .find(league.league_id, member.participant_id, episode_id)
                .await?
                .is_some()
            {
                continue;
            }

            let roster = roster_repo
                .list_for_participant(league.league_id, member.participant_id)
                .await?;

            let prior_pick = match &prior_episode {
                Some(prev) => {
                    pick_repo
                        .find(league.league_id, member.participant_id, prev.episode_id)
                        .await?
                }
                None => None,
            };

            let Some(contestant_id) = auto_pick_contestant(&roster, prior_pick.as_ref()) else {
                tracing::warn!(
                    league_id = %league.league_id,
                    participant_id = %member.participant_id,
                    "member has no roster, skipping auto-pick"
                );
                continue;
            };

            // A manual pick that slips in between the check above and this
            // write simply wins; the insert is a no-op then.
            if let Some(pick) = pick_repo
                .insert_auto_if_absent(
                    league.league_id,
                    member.participant_id,
                    episode_id,
                    contestant_id,
                    now,
                )
                .await?
            {
                created.push(pick);
            }
        }
    }

    tracing::info!(
        episode = episode.number,
        auto_picks = created.len(),
        "pick lock sweep finished"
    );

    Ok(created)
}
