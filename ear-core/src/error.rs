//! Errors raised while parsing or validating practice settings.
//!
//! Lookups over the interval and scale tables are total and never fail;
//! these errors only come from text input and configuration checks.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TheoryError {
    #[error("unknown interval abbreviation: {0}")]
    UnknownInterval(String),

    #[error("unknown pitch: {0} (expected a number or a name like C#4)")]
    UnknownPitch(String),

    #[error("unknown scale: {0}")]
    UnknownScale(String),

    #[error("unknown direction: {0} (expected ascending, descending or both)")]
    UnknownDirection(String),

    #[error("unknown playback mode: {0} (expected melodic or harmonic)")]
    UnknownPlaybackMode(String),

    /// The enabled-interval map must carry all 12 keys
    #[error("interval selection is missing {0}")]
    IncompleteIntervalSet(String),

    #[error("not a number of seconds: {0}")]
    UnknownSustain(String),

    #[error("sustain duration {0}s is outside {min}..={max}s", min = crate::config::MIN_SUSTAIN, max = crate::config::MAX_SUSTAIN)]
    InvalidSustain(f32),

    #[error("locked base pitch {0} is outside the playable range")]
    LockedBaseOutOfRange(i32),
}

pub type Result<T> = std::result::Result<T, TheoryError>;
