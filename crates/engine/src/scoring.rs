use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use sqlx::SqlitePool;
use storage::dto::scoring::{RuleOccurrence, ScoringCompleteness};
use storage::models::{Episode, EpisodeScore, RosterEntry, WeeklyPick};
use storage::repository::episode::EpisodeRepository;
use storage::repository::scoring::ScoringRepository;
use storage::repository::season::SeasonRepository;
use uuid::Uuid;
use validator::Validate;

use crate::error::{EngineError, Result};
use crate::notify::EpisodeFinalized;
use crate::standings;

/// Points a participant realizes from one episode. Premiere-style episodes
/// (`counts_all_roster`) sum the whole roster; every other episode counts
/// only the picked contestant, whether the pick was manual or auto. No pick,
/// no points.
pub fn participant_episode_points(
    episode: &Episode,
    roster: &[RosterEntry],
    pick: Option<&WeeklyPick>,
    scores: &HashMap<Uuid, i64>,
) -> i64 {
    if episode.counts_all_roster {
        return roster
            .iter()
            .map(|e| scores.get(&e.contestant_id).copied().unwrap_or(0))
            .sum();
    }

    pick.map(|p| scores.get(&p.contestant_id).copied().unwrap_or(0))
        .unwrap_or(0)
}

/// Convert a batch of rule occurrences into per-contestant episode totals and
/// replace the episode's score set with them in one transaction. Resubmitting
/// always replaces, never accumulates. After the commit the season's
/// standings are recomputed; if that recompute fails the scores stay
/// committed and the recompute is safe to rerun.
pub async fn submit_episode_scores(
    pool: &SqlitePool,
    episode_id: Uuid,
    occurrences: &[RuleOccurrence],
) -> Result<Vec<EpisodeScore>> {
    for occurrence in occurrences {
        occurrence.validate()?;
    }

    let episode = EpisodeRepository::new(pool).find_by_id(episode_id).await?;
    if episode.is_finalized {
        return Err(EngineError::Conflict(
            "episode is finalized; reopen it before editing scores".to_string(),
        ));
    }

    let scoring_repo = ScoringRepository::new(pool);
    let rules: HashMap<String, i64> = scoring_repo
        .list_rules(episode.season_id)
        .await?
        .into_iter()
        .map(|r| (r.code, r.points))
        .collect();

    let contestants: HashSet<Uuid> = SeasonRepository::new(pool)
        .list_contestants(episode.season_id)
        .await?
        .into_iter()
        .map(|c| c.contestant_id)
        .collect();

    // BTreeMap keeps the inserted row order deterministic.
    let mut totals: BTreeMap<Uuid, i64> = BTreeMap::new();
    for occurrence in occurrences {
        let points = rules.get(&occurrence.rule_code).ok_or_else(|| {
            EngineError::Validation(format!(
                "unknown rule code '{}' for this season",
                occurrence.rule_code
            ))
        })?;
        if !contestants.contains(&occurrence.contestant_id) {
            return Err(EngineError::Validation(format!(
                "contestant {} does not belong to the season",
                occurrence.contestant_id
            )));
        }

        *totals.entry(occurrence.contestant_id).or_insert(0) += occurrence.count * points;
    }

    let rows: Vec<(Uuid, i64)> = totals.into_iter().collect();
    let committed = scoring_repo.replace_episode_scores(episode_id, &rows).await?;

    tracing::info!(
        episode = episode.number,
        contestants = committed.len(),
        "episode scores replaced"
    );

    if let Err(error) = standings::recompute_season_standings(pool, episode.season_id).await {
        tracing::error!(
            episode = episode.number,
            %error,
            "standings recompute failed after scoring commit; rerun the recompute"
        );
        return Err(error);
    }

    Ok(committed)
}

/// Explicit completeness query: true only when every contestant who was not
/// already eliminated before this episode has a score row, zero-point rows
/// included. Absence of rows is never read as a zero.
pub async fn scoring_completeness(
    pool: &SqlitePool,
    episode_id: Uuid,
) -> Result<ScoringCompleteness> {
    let episode = EpisodeRepository::new(pool).find_by_id(episode_id).await?;

    let scored: HashSet<Uuid> = ScoringRepository::new(pool)
        .list_for_episode(episode_id)
        .await?
        .into_iter()
        .map(|s| s.contestant_id)
        .collect();

    let missing: Vec<Uuid> = SeasonRepository::new(pool)
        .list_contestants(episode.season_id)
        .await?
        .into_iter()
        .filter(|c| !c.eliminated_before(episode.number))
        .map(|c| c.contestant_id)
        .filter(|id| !scored.contains(id))
        .collect();

    Ok(ScoringCompleteness {
        episode_id,
        is_complete: missing.is_empty(),
        missing_contestant_ids: missing,
    })
}

/// Lock the episode's scores against ordinary edits. Requires complete
/// scoring; returns the spoiler-free event payload for the notification
/// dispatcher.
pub async fn finalize_episode(pool: &SqlitePool, episode_id: Uuid) -> Result<EpisodeFinalized> {
    let completeness = scoring_completeness(pool, episode_id).await?;
    if !completeness.is_complete {
        return Err(EngineError::IncompleteScores(
            completeness.missing_contestant_ids,
        ));
    }

    let episode_repo = EpisodeRepository::new(pool);
    let episode = episode_repo.find_by_id(episode_id).await?;

    if !episode_repo.try_finalize(episode_id).await? {
        return Err(EngineError::Conflict(
            "episode is already finalized".to_string(),
        ));
    }

    tracing::info!(episode = episode.number, "episode finalized");

    Ok(EpisodeFinalized {
        season_id: episode.season_id,
        episode_id,
        episode_number: episode.number,
        finalized_at: Utc::now(),
    })
}

/// Explicitly reopen a finalized episode for score corrections.
pub async fn reopen_episode(pool: &SqlitePool, episode_id: Uuid) -> Result<()> {
    let episode_repo = EpisodeRepository::new(pool);
    episode_repo.find_by_id(episode_id).await?;

    if !episode_repo.try_reopen(episode_id).await? {
        return Err(EngineError::Conflict(
            "episode is not finalized".to_string(),
        ));
    }

    tracing::info!(episode_id = %episode_id, "episode reopened");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::testutil;

    fn occurrence(contestant_id: Uuid, rule_code: &str, count: i64) -> RuleOccurrence {
        RuleOccurrence {
            contestant_id,
            rule_code: rule_code.to_string(),
            count,
        }
    }

    #[tokio::test]
    async fn test_resubmission_replaces_not_accumulates() {
        let fixture = testutil::committed_league(2, 4).await;
        let pool = fixture.db.pool();
        let episode = fixture.add_episode(1, Duration::hours(-1), false).await;
        fixture.add_rule("RULE_X", -1).await;

        let contestant = fixture.contestants[0].contestant_id;

        let scores =
            submit_episode_scores(pool, episode.episode_id, &[occurrence(contestant, "RULE_X", 2)])
                .await
                .unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].points, -2);

        let scores =
            submit_episode_scores(pool, episode.episode_id, &[occurrence(contestant, "RULE_X", 1)])
                .await
                .unwrap();
        assert_eq!(scores[0].points, -1, "replacement, not -3");

        let stored = ScoringRepository::new(pool)
            .list_for_episode(episode.episode_id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].points, -1);
    }

    #[tokio::test]
    async fn test_multiple_rules_sum_per_contestant() {
        let fixture = testutil::committed_league(2, 4).await;
        let pool = fixture.db.pool();
        let episode = fixture.add_episode(1, Duration::hours(-1), false).await;
        fixture.add_rule("WIN_CHALLENGE", 5).await;
        fixture.add_rule("VOTED_OUT", -3).await;

        let contestant = fixture.contestants[0].contestant_id;
        let scores = submit_episode_scores(
            pool,
            episode.episode_id,
            &[
                occurrence(contestant, "WIN_CHALLENGE", 2),
                occurrence(contestant, "VOTED_OUT", 1),
            ],
        )
        .await
        .unwrap();

        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].points, 7);
    }

    #[tokio::test]
    async fn test_unknown_rule_code_rejected() {
        let fixture = testutil::committed_league(2, 4).await;
        let pool = fixture.db.pool();
        let episode = fixture.add_episode(1, Duration::hours(-1), false).await;

        let err = submit_episode_scores(
            pool,
            episode.episode_id,
            &[occurrence(fixture.contestants[0].contestant_id, "NO_SUCH_RULE", 1)],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_negative_count_rejected() {
        let fixture = testutil::committed_league(2, 4).await;
        let pool = fixture.db.pool();
        let episode = fixture.add_episode(1, Duration::hours(-1), false).await;
        fixture.add_rule("RULE_X", 1).await;

        let err = submit_episode_scores(
            pool,
            episode.episode_id,
            &[occurrence(fixture.contestants[0].contestant_id, "RULE_X", -1)],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_completeness_counts_zero_rows_and_skips_eliminated() {
        let fixture = testutil::committed_league(2, 4).await;
        let pool = fixture.db.pool();
        let episode = fixture.add_episode(2, Duration::hours(-1), false).await;
        fixture.add_rule("RULE_X", 1).await;

        // Contestant 3 went out in episode 1 and owes no scores here.
        SeasonRepository::new(pool)
            .mark_eliminated(fixture.contestants[3].contestant_id, 1, Some(4))
            .await
            .unwrap();

        let completeness = scoring_completeness(pool, episode.episode_id).await.unwrap();
        assert!(!completeness.is_complete);
        assert_eq!(completeness.missing_contestant_ids.len(), 3);

        // Zero-count occurrences still produce explicit zero rows.
        let occurrences: Vec<RuleOccurrence> = fixture.contestants[..3]
            .iter()
            .map(|c| occurrence(c.contestant_id, "RULE_X", 0))
            .collect();
        submit_episode_scores(pool, episode.episode_id, &occurrences)
            .await
            .unwrap();

        let completeness = scoring_completeness(pool, episode.episode_id).await.unwrap();
        assert!(completeness.is_complete);
    }

    #[tokio::test]
    async fn test_finalize_requires_complete_scores() {
        let fixture = testutil::committed_league(2, 4).await;
        let pool = fixture.db.pool();
        let episode = fixture.add_episode(1, Duration::hours(-1), false).await;
        fixture.add_rule("RULE_X", 1).await;

        let err = finalize_episode(pool, episode.episode_id).await.unwrap_err();
        match err {
            EngineError::IncompleteScores(missing) => assert_eq!(missing.len(), 4),
            other => panic!("expected IncompleteScores, got {other:?}"),
        }

        let occurrences: Vec<RuleOccurrence> = fixture
            .contestants
            .iter()
            .map(|c| occurrence(c.contestant_id, "RULE_X", 0))
            .collect();
        submit_episode_scores(pool, episode.episode_id, &occurrences)
            .await
            .unwrap();

        let event = finalize_episode(pool, episode.episode_id).await.unwrap();
        assert_eq!(event.episode_number, 1);

        // Finalized means frozen, twice over.
        let err = finalize_episode(pool, episode.episode_id).await.unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));
        let err = submit_episode_scores(pool, episode.episode_id, &occurrences)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));

        // Only an explicit reopen allows edits again.
        reopen_episode(pool, episode.episode_id).await.unwrap();
        submit_episode_scores(pool, episode.episode_id, &occurrences)
            .await
            .unwrap();
    }

    #[test]
    fn test_counts_all_roster_sums_both_slots() {
        let (episode, roster, pick) = testutil::scoring_episode_fixture(true);
        let scores: HashMap<Uuid, i64> = roster
            .iter()
            .map(|e| e.contestant_id)
            .zip([3i64, 4i64])
            .collect();

        assert_eq!(
            participant_episode_points(&episode, &roster, Some(&pick), &scores),
            7
        );
    }

    #[test]
    fn test_regular_episode_counts_only_the_pick() {
        let (episode, roster, pick) = testutil::scoring_episode_fixture(false);
        let scores: HashMap<Uuid, i64> = roster
            .iter()
            .map(|e| e.contestant_id)
            .zip([3i64, 4i64])
            .collect();

        assert_eq!(
            participant_episode_points(&episode, &roster, Some(&pick), &scores),
            3,
            "pick points only"
        );
        assert_eq!(
            participant_episode_points(&episode, &roster, None, &scores),
            0,
            "no pick, no points"
        );
    }
}
