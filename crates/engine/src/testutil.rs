//! Shared fixtures for the engine test suites. Everything runs against a
//! private in-memory database with the real migrations applied.

use chrono::{Duration, Utc};
use storage::Database;
use storage::dto::ranking::SubmitRankingRequest;
use storage::models::{
    Contestant, Episode, League, Participant, PickStatus, RosterEntry, Season, WeeklyPick,
};
use storage::repository::episode::EpisodeRepository;
use storage::repository::league::LeagueRepository;
use storage::repository::participant::ParticipantRepository;
use storage::repository::scoring::ScoringRepository;
use storage::repository::season::SeasonRepository;
use uuid::Uuid;

use crate::{draft, rankings};

pub struct TestLeague {
    pub db: Database,
    pub season: Season,
    /// In stable contestant order (by name).
    pub contestants: Vec<Contestant>,
    /// In draft-position order 1..N.
    pub participants: Vec<Participant>,
    pub league: League,
}

pub async fn empty_db() -> Database {
    let db = Database::in_memory().await.expect("in-memory database");
    db.run_migrations().await.expect("migrations");
    db
}

/// A season with `n_contestants` contestants and one league whose
/// `n_participants` members already have draft positions 1..N.
pub async fn league_fixture(n_participants: usize, n_contestants: usize) -> TestLeague {
    let db = empty_db().await;
    let pool = db.pool();

    let season_repo = SeasonRepository::new(pool);
    let season = season_repo.create("Season 1").await.unwrap();

    // Zero-padded names keep creation order and stable (name) order aligned.
    for i in 0..n_contestants {
        season_repo
            .create_contestant(season.season_id, &format!("Contestant {:02}", i + 1))
            .await
            .unwrap();
    }
    let contestants = season_repo.list_contestants(season.season_id).await.unwrap();

    let participant_repo = ParticipantRepository::new(pool);
    let league_repo = LeagueRepository::new(pool);
    let league = league_repo
        .create(season.season_id, "Test League")
        .await
        .unwrap();

    let mut participants = Vec::with_capacity(n_participants);
    for i in 0..n_participants {
        let participant = participant_repo
            .create(&format!("Player {}", i + 1))
            .await
            .unwrap();
        league_repo
            .add_member(league.league_id, participant.participant_id, Some((i + 1) as i64))
            .await
            .unwrap();
        participants.push(participant);
    }

    TestLeague {
        db,
        season,
        contestants,
        participants,
        league,
    }
}

/// Fixture with identical rankings submitted and the draft committed.
pub async fn committed_league(n_participants: usize, n_contestants: usize) -> TestLeague {
    let fixture = league_fixture(n_participants, n_contestants).await;
    fixture.submit_identical_rankings().await;
    draft::commit_draft(fixture.db.pool(), fixture.league.league_id)
        .await
        .unwrap();
    fixture
}

impl TestLeague {
    pub fn contestant_ids(&self) -> Vec<Uuid> {
        self.contestants.iter().map(|c| c.contestant_id).collect()
    }

    pub async fn submit_identical_rankings(&self) {
        for i in 0..self.participants.len() {
            self.submit_ranking_for(i).await;
        }
    }

    pub async fn submit_ranking_for(&self, participant_index: usize) {
        let ids = self.contestant_ids();
        self.submit_ranking_order(participant_index, &ids).await;
    }

    pub async fn submit_ranking_order(&self, participant_index: usize, ids: &[Uuid]) {
        let request = SubmitRankingRequest {
            participant_id: self.participants[participant_index].participant_id,
            season_id: self.season.season_id,
            contestant_ids: ids.to_vec(),
        };
        rankings::submit_ranking(self.db.pool(), &request)
            .await
            .unwrap();
    }

    /// Episode whose lock deadline sits `lock_offset` away from now; negative
    /// offsets create an already-locked episode.
    pub async fn add_episode(
        &self,
        number: i64,
        lock_offset: Duration,
        counts_all_roster: bool,
    ) -> Episode {
        EpisodeRepository::new(self.db.pool())
            .create(
                self.season.season_id,
                number,
                Utc::now() + lock_offset,
                counts_all_roster,
            )
            .await
            .unwrap()
    }

    /// Move an existing episode's deadline, e.g. to close a window that was
    /// open earlier in the test.
    pub async fn set_episode_lock(&self, episode_id: Uuid, lock_offset: Duration) {
        sqlx::query("UPDATE episodes SET lock_at = ? WHERE episode_id = ?")
            .bind(Utc::now() + lock_offset)
            .bind(episode_id)
            .execute(self.db.pool())
            .await
            .unwrap();
    }

    pub async fn add_rule(&self, code: &str, points: i64) {
        ScoringRepository::new(self.db.pool())
            .create_rule(self.season.season_id, code, points, None)
            .await
            .unwrap();
    }
}

/// Two in-memory roster slots for pure-function tests.
pub fn roster_pair() -> Vec<RosterEntry> {
    let league_id = Uuid::new_v4();
    let participant_id = Uuid::new_v4();
    (1..=2)
        .map(|round| RosterEntry {
            roster_id: Uuid::new_v4(),
            league_id,
            participant_id,
            contestant_id: Uuid::new_v4(),
            round,
            pick_number: round,
        })
        .collect()
}

/// Episode, roster and a manual pick of the first slot, for the pure scoring
/// attribution tests.
pub fn scoring_episode_fixture(counts_all_roster: bool) -> (Episode, Vec<RosterEntry>, WeeklyPick) {
    let roster = roster_pair();
    let episode = Episode {
        episode_id: Uuid::new_v4(),
        season_id: Uuid::new_v4(),
        number: 1,
        lock_at: Utc::now(),
        counts_all_roster,
        is_finalized: false,
    };
    let pick = WeeklyPick {
        pick_id: Uuid::new_v4(),
        league_id: roster[0].league_id,
        participant_id: roster[0].participant_id,
        episode_id: episode.episode_id,
        contestant_id: roster[0].contestant_id,
        status: PickStatus::Manual,
        picked_at: Utc::now(),
    };
    (episode, roster, pick)
}
