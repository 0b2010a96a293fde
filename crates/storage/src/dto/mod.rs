pub mod draft;
pub mod ranking;
pub mod roster;
pub mod scoring;
pub mod standings;
