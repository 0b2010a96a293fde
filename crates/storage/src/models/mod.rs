mod active_state;
mod contestant;
mod episode;
mod episode_score;
mod league;
mod participant;
mod ranking;
mod roster;
mod scoring_rule;
mod season;
mod standing;
mod weekly_pick;

pub use active_state::ActiveState;
pub use contestant::Contestant;
pub use episode::Episode;
pub use episode_score::EpisodeScore;
pub use league::{DraftStatus, League, Membership};
pub use participant::Participant;
pub use ranking::RankingEntry;
pub use roster::RosterEntry;
pub use scoring_rule::ScoringRule;
pub use season::Season;
pub use standing::Standing;
pub use weekly_pick::{PickStatus, WeeklyPick};
