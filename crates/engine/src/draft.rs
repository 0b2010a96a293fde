use std::collections::{HashMap, HashSet};

use sqlx::SqlitePool;
use storage::dto::draft::{DraftAssignment, DraftPreview};
use storage::dto::roster::RosterSlot;
use storage::models::{League, RosterEntry};
use storage::repository::league::LeagueRepository;
use storage::repository::ranking::RankingRepository;
use storage::repository::roster::RosterRepository;
use storage::repository::season::SeasonRepository;
use uuid::Uuid;

use crate::error::{EngineError, Result};

pub const ROSTER_SIZE: usize = 2;

/// Everything the snake assignment needs, loaded and validated up front so
/// the commit transaction itself only writes.
struct DraftInputs {
    league: League,
    /// Participants in draft-position order 1..N.
    order: Vec<Uuid>,
    /// Each participant's full preference list, best first.
    rankings: HashMap<Uuid, Vec<Uuid>>,
    /// Stable contestant order, the fallback when a ranking is exhausted.
    fallback: Vec<Uuid>,
}

/// Fixed two-round snake assignment. Round 1 walks the draft order, round 2
/// walks it reversed; each turn takes the participant's highest-ranked
/// contestant nobody has drafted yet. A ranking exhausted of undrafted
/// contestants falls back to the first undrafted contestant in stable
/// contestant order, which keeps shared exhausted preferences deterministic:
/// whoever drafts earlier gets the earlier fallback contestant.
fn snake_assignments(
    order: &[Uuid],
    rankings: &HashMap<Uuid, Vec<Uuid>>,
    fallback: &[Uuid],
) -> Vec<DraftAssignment> {
    let mut drafted: HashSet<Uuid> = HashSet::new();
    let mut assignments = Vec::with_capacity(order.len() * ROSTER_SIZE);
    let mut pick_number = 1i64;

    for round in 1..=ROSTER_SIZE as i64 {
        let turn_order: Vec<Uuid> = if round % 2 == 1 {
            order.to_vec()
        } else {
            order.iter().rev().copied().collect()
        };

        for participant_id in turn_order {
            let preference = rankings
                .get(&participant_id)
                .map(Vec::as_slice)
                .unwrap_or_default();

            let choice = preference
                .iter()
                .chain(fallback.iter())
                .find(|c| !drafted.contains(*c))
                .copied();

            if let Some(contestant_id) = choice {
                drafted.insert(contestant_id);
                assignments.push(DraftAssignment {
                    round,
                    pick_number,
                    participant_id,
                    contestant_id,
                });
                pick_number += 1;
            }
        }
    }

    assignments
}

async fn load_draft_inputs(pool: &SqlitePool, league_id: Uuid) -> Result<DraftInputs> {
    let league = LeagueRepository::new(pool).find_by_id(league_id).await?;

    let members = LeagueRepository::new(pool).list_members(league_id).await?;
    if members.is_empty() {
        return Err(EngineError::Validation(
            "league has no members to draft for".to_string(),
        ));
    }
    if members.iter().any(|m| m.draft_position.is_none()) {
        return Err(EngineError::Validation(
            "draft order is not set for every member".to_string(),
        ));
    }

    let contestants = SeasonRepository::new(pool)
        .list_contestants(league.season_id)
        .await?;
    if contestants.len() < members.len() * ROSTER_SIZE {
        return Err(EngineError::Validation(format!(
            "season has {} contestants but the draft needs {}",
            contestants.len(),
            members.len() * ROSTER_SIZE
        )));
    }
    let fallback: Vec<Uuid> = contestants.iter().map(|c| c.contestant_id).collect();

    let ranking_repo = RankingRepository::new(pool);
    let mut rankings = HashMap::with_capacity(members.len());
    let mut missing = Vec::new();
    for member in &members {
        let entries = ranking_repo
            .get(league.season_id, member.participant_id)
            .await?;
        if entries.len() != contestants.len() {
            missing.push(member.participant_id);
            continue;
        }
        rankings.insert(
            member.participant_id,
            entries.into_iter().map(|e| e.contestant_id).collect(),
        );
    }
    if !missing.is_empty() {
        return Err(EngineError::MissingRankings(missing));
    }

    // list_members already sorts by draft_position.
    let order = members.into_iter().map(|m| m.participant_id).collect();

    Ok(DraftInputs {
        league,
        order,
        rankings,
        fallback,
    })
}

/// Compute the draft outcome without persisting anything.
pub async fn run_draft_preview(pool: &SqlitePool, league_id: Uuid) -> Result<DraftPreview> {
    let inputs = load_draft_inputs(pool, league_id).await?;
    let assignments = snake_assignments(&inputs.order, &inputs.rankings, &inputs.fallback);

    Ok(DraftPreview {
        league_id,
        assignments,
    })
}

/// Persist the draft atomically. The pending -> locked check-and-set, the
/// clearing of any prior roster and the inserts share one transaction, so a
/// double commit fails with a conflict and a recommit never leaves residue.
pub async fn commit_draft(pool: &SqlitePool, league_id: Uuid) -> Result<Vec<RosterEntry>> {
    let inputs = load_draft_inputs(pool, league_id).await?;
    let assignments = snake_assignments(&inputs.order, &inputs.rankings, &inputs.fallback);

    let league_repo = LeagueRepository::new(pool);
    let roster_repo = RosterRepository::new(pool);

    let mut tx = pool.begin().await?;

    if !league_repo.try_lock_draft(&mut tx, league_id).await? {
        return Err(EngineError::Conflict(
            "draft is already locked for this league".to_string(),
        ));
    }

    roster_repo.clear_league(&mut tx, league_id).await?;

    let mut roster = Vec::with_capacity(assignments.len());
    for assignment in &assignments {
        let entry = roster_repo
            .insert_assignment(&mut tx, league_id, assignment)
            .await?;
        roster.push(entry);
    }

    tx.commit().await?;

    tracing::info!(
        league_id = %league_id,
        season_id = %inputs.league.season_id,
        entries = roster.len(),
        "draft committed"
    );

    Ok(roster)
}

/// A participant's drafted roster with contestant details.
pub async fn get_roster(
    pool: &SqlitePool,
    league_id: Uuid,
    participant_id: Uuid,
) -> Result<Vec<RosterSlot>> {
    let slots = RosterRepository::new(pool)
        .get_roster_with_contestants(league_id, participant_id)
        .await?;
    Ok(slots)
}

/// Explicitly reopen a committed draft. The roster stays in place until the
/// recommit rebuilds it from scratch.
pub async fn unlock_draft(pool: &SqlitePool, league_id: Uuid) -> Result<()> {
    let league_repo = LeagueRepository::new(pool);
    league_repo.find_by_id(league_id).await?;

    if !league_repo.try_unlock_draft(league_id).await? {
        return Err(EngineError::Conflict(
            "draft is not locked for this league".to_string(),
        ));
    }

    tracing::info!(league_id = %league_id, "draft unlocked");
    Ok(())
}
