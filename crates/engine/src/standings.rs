use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;
use storage::dto::standings::StandingsEntry;
use storage::models::DraftStatus;
use storage::repository::episode::EpisodeRepository;
use storage::repository::league::LeagueRepository;
use storage::repository::pick::PickRepository;
use storage::repository::roster::RosterRepository;
use storage::repository::scoring::ScoringRepository;
use storage::repository::standings::{StandingRow, StandingsRepository};
use uuid::Uuid;

use crate::error::Result;
use crate::scoring::participant_episode_points;

/// Standard competition ranking over totals sorted descending: ties share a
/// rank and the next rank skips accordingly (1, 2, 2, 4).
fn competition_ranks(sorted_totals: &[i64]) -> Vec<i64> {
    let mut ranks = Vec::with_capacity(sorted_totals.len());
    for (i, total) in sorted_totals.iter().enumerate() {
        if i > 0 && *total == sorted_totals[i - 1] {
            ranks.push(ranks[i - 1]);
        } else {
            ranks.push((i + 1) as i64);
        }
    }
    ranks
}

/// Rebuild the league's leaderboard from scratch: every member's total is the
/// sum of their realized points over all episodes that have scores, finalized
/// or not. The replace is transactional, so the recompute is idempotent and
/// safe to rerun after a failure.
///
/// Tie-break among equal totals is deliberate: rows share a rank, and their
/// display order is earlier league join first, then participant id.
pub async fn recompute_league_standings(pool: &SqlitePool, league_id: Uuid) -> Result<()> {
    let league = LeagueRepository::new(pool).find_by_id(league_id).await?;
    let members = LeagueRepository::new(pool).list_members(league_id).await?;

    let episodes = EpisodeRepository::new(pool)
        .list_for_season(league.season_id)
        .await?;

    // Per-episode contestant score maps for every scored episode.
    let mut scores_by_episode: HashMap<Uuid, HashMap<Uuid, i64>> = HashMap::new();
    for score in ScoringRepository::new(pool)
        .list_for_season(league.season_id)
        .await?
    {
        scores_by_episode
            .entry(score.episode_id)
            .or_default()
            .insert(score.contestant_id, score.points);
    }

    let mut picks_by_key: HashMap<(Uuid, Uuid), storage::models::WeeklyPick> = HashMap::new();
    for pick in PickRepository::new(pool).list_for_league(league_id).await? {
        picks_by_key.insert((pick.participant_id, pick.episode_id), pick);
    }

    let roster_repo = RosterRepository::new(pool);
    let mut totals = Vec::with_capacity(members.len());
    for member in &members {
        let roster = roster_repo
            .list_for_participant(league_id, member.participant_id)
            .await?;

        let mut total = 0i64;
        for episode in &episodes {
            let Some(scores) = scores_by_episode.get(&episode.episode_id) else {
                continue;
            };
            let pick = picks_by_key.get(&(member.participant_id, episode.episode_id));
            total += participant_episode_points(episode, &roster, pick, scores);
        }

        totals.push((member.participant_id, total, member.joined_at));
    }

    totals.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| a.2.cmp(&b.2))
            .then_with(|| a.0.cmp(&b.0))
    });

    let sorted_points: Vec<i64> = totals.iter().map(|t| t.1).collect();
    let ranks = competition_ranks(&sorted_points);

    let rows: Vec<StandingRow> = totals
        .iter()
        .zip(ranks)
        .map(|((participant_id, total_points, _), rank)| StandingRow {
            participant_id: *participant_id,
            total_points: *total_points,
            rank,
        })
        .collect();

    StandingsRepository::new(pool)
        .replace_for_league(league_id, &rows, Utc::now())
        .await?;

    tracing::debug!(league_id = %league_id, members = rows.len(), "standings recomputed");
    Ok(())
}

/// Recompute every drafted league of the season. Called after each scoring
/// commit and usable standalone as the retry entry point when a recompute
/// failed mid-way.
pub async fn recompute_season_standings(pool: &SqlitePool, season_id: Uuid) -> Result<()> {
    for league in LeagueRepository::new(pool).list_for_season(season_id).await? {
        if league.draft_status != DraftStatus::Locked {
            continue;
        }
        recompute_league_standings(pool, league.league_id).await?;
    }
    Ok(())
}

pub async fn get_standings(pool: &SqlitePool, league_id: Uuid) -> Result<Vec<StandingsEntry>> {
    let entries = StandingsRepository::new(pool).list(league_id).await?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use storage::dto::scoring::RuleOccurrence;

    use super::*;
    use crate::picks::submit_pick;
    use crate::scoring::submit_episode_scores;
    use crate::testutil;

    #[test]
    fn test_competition_ranks_skip_after_tie() {
        assert_eq!(competition_ranks(&[10, 7, 7, 3]), vec![1, 2, 2, 4]);
        assert_eq!(competition_ranks(&[5, 5, 5]), vec![1, 1, 1]);
        assert_eq!(competition_ranks(&[]), Vec::<i64>::new());
    }

    async fn score_episode(
        fixture: &testutil::TestLeague,
        episode_id: Uuid,
        points: &[(Uuid, i64)],
    ) {
        let occurrences: Vec<RuleOccurrence> = points
            .iter()
            .map(|(contestant_id, count)| RuleOccurrence {
                contestant_id: *contestant_id,
                rule_code: "POINT".to_string(),
                count: *count,
            })
            .collect();
        submit_episode_scores(fixture.db.pool(), episode_id, &occurrences)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_standings_ordered_with_picked_points() {
        let fixture = testutil::committed_league(2, 4).await;
        let pool = fixture.db.pool();
        fixture.add_rule("POINT", 1).await;
        let episode = fixture.add_episode(1, Duration::hours(1), false).await;

        // Both members pick their first roster slot, then the window closes.
        let mut picked = Vec::new();
        for participant in &fixture.participants {
            let roster = RosterRepository::new(pool)
                .list_for_participant(fixture.league.league_id, participant.participant_id)
                .await
                .unwrap();
            submit_pick(
                pool,
                fixture.league.league_id,
                participant.participant_id,
                episode.episode_id,
                roster[0].contestant_id,
            )
            .await
            .unwrap();
            picked.push(roster[0].contestant_id);
        }
        fixture.set_episode_lock(episode.episode_id, Duration::hours(-1)).await;

        // Second member's pick scores higher.
        let points: Vec<(Uuid, i64)> = fixture
            .contestants
            .iter()
            .map(|c| {
                let count = if c.contestant_id == picked[1] { 9 } else { 2 };
                (c.contestant_id, count)
            })
            .collect();
        score_episode(&fixture, episode.episode_id, &points).await;

        let standings = get_standings(pool, fixture.league.league_id).await.unwrap();
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].participant_id, fixture.participants[1].participant_id);
        assert_eq!(standings[0].total_points, 9);
        assert_eq!(standings[0].rank, 1);
        assert_eq!(standings[1].total_points, 2);
        assert_eq!(standings[1].rank, 2);
    }

    #[tokio::test]
    async fn test_counts_all_roster_episode_sums_rosters() {
        let fixture = testutil::committed_league(2, 4).await;
        let pool = fixture.db.pool();
        fixture.add_rule("POINT", 1).await;
        let premiere = fixture.add_episode(1, Duration::hours(-1), true).await;

        // No picks at all; the premiere flag should still realize points.
        let points: Vec<(Uuid, i64)> = fixture
            .contestants
            .iter()
            .enumerate()
            .map(|(i, c)| (c.contestant_id, (i + 1) as i64))
            .collect();
        score_episode(&fixture, premiere.episode_id, &points).await;

        let standings = get_standings(pool, fixture.league.league_id).await.unwrap();
        let total: i64 = standings.iter().map(|s| s.total_points).sum();
        assert_eq!(total, 1 + 2 + 3 + 4, "every contestant's points realized");
    }

    #[tokio::test]
    async fn test_tied_totals_share_rank() {
        let fixture = testutil::committed_league(3, 6).await;
        let pool = fixture.db.pool();
        fixture.add_rule("POINT", 1).await;
        let premiere = fixture.add_episode(1, Duration::hours(-1), true).await;

        // Identical scores across the board: all roster sums tie.
        let points: Vec<(Uuid, i64)> = fixture
            .contestants
            .iter()
            .map(|c| (c.contestant_id, 2))
            .collect();
        score_episode(&fixture, premiere.episode_id, &points).await;

        let standings = get_standings(pool, fixture.league.league_id).await.unwrap();
        assert_eq!(standings.len(), 3);
        assert!(standings.iter().all(|s| s.rank == 1));
        assert!(standings.iter().all(|s| s.total_points == 4));

        // Deterministic order among ties: league join order.
        let expected: Vec<Uuid> = fixture
            .participants
            .iter()
            .map(|p| p.participant_id)
            .collect();
        let got: Vec<Uuid> = standings.iter().map(|s| s.participant_id).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let fixture = testutil::committed_league(2, 4).await;
        let pool = fixture.db.pool();
        fixture.add_rule("POINT", 3).await;
        let premiere = fixture.add_episode(1, Duration::hours(-1), true).await;

        let points: Vec<(Uuid, i64)> = fixture
            .contestants
            .iter()
            .map(|c| (c.contestant_id, 1))
            .collect();
        score_episode(&fixture, premiere.episode_id, &points).await;

        let first = get_standings(pool, fixture.league.league_id).await.unwrap();
        recompute_league_standings(pool, fixture.league.league_id)
            .await
            .unwrap();
        recompute_season_standings(pool, fixture.season.season_id)
            .await
            .unwrap();
        let after = get_standings(pool, fixture.league.league_id).await.unwrap();

        let as_tuples = |entries: &[StandingsEntry]| {
            entries
                .iter()
                .map(|e| (e.rank, e.participant_id, e.total_points))
                .collect::<Vec<_>>()
        };
        assert_eq!(as_tuples(&first), as_tuples(&after));
    }
}
