pub mod episode;
pub mod league;
pub mod participant;
pub mod pick;
pub mod ranking;
pub mod roster;
pub mod scoring;
pub mod season;
pub mod standings;
pub mod state;
