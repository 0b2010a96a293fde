pub mod draft;
pub mod error;
pub mod notify;
pub mod picks;
pub mod rankings;
pub mod scoring;
pub mod seasons;
pub mod standings;

pub use error::{EngineError, Result};

#[cfg(test)]
pub(crate) mod testutil;
