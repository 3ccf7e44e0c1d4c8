//! Practice settings owned by the caller and threaded into each generation.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TheoryError};
use crate::intervals::EnabledIntervals;
use crate::notes::{Pitch, is_in_range};
use crate::playback::{DEFAULT_SUSTAIN, PlaybackMode};
use crate::question::Direction;
use crate::scales::{ScaleKey, find_matching_scale, get_intervals_for_scale};

/// Shortest allowed sustain, in seconds.
pub const MIN_SUSTAIN: f32 = 0.5;
/// Longest allowed sustain, in seconds.
pub const MAX_SUSTAIN: f32 = 4.0;

/// Everything a practice session needs to generate and play questions.
///
/// Missing fields fall back to [`PracticeConfig::default`] when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    pub intervals: EnabledIntervals,
    pub direction: Direction,
    /// Seconds each note rings
    pub sustain_duration: f32,
    pub playback_mode: PlaybackMode,
    /// Pitch number every question should start from, when it can
    pub locked_base: Option<i32>,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            intervals: EnabledIntervals::default(),
            direction: Direction::Ascending,
            sustain_duration: DEFAULT_SUSTAIN,
            playback_mode: PlaybackMode::Melodic,
            locked_base: None,
        }
    }
}

impl PracticeConfig {
    /// Replaces the interval selection with a scale preset.
    pub fn apply_scale(&mut self, scale: ScaleKey) {
        self.intervals = get_intervals_for_scale(scale);
    }

    /// The scale the current selection corresponds to.
    pub fn scale(&self) -> ScaleKey {
        find_matching_scale(&self.intervals)
    }

    pub fn locked_pitch(&self) -> Option<Pitch> {
        self.locked_base.map(Pitch::new)
    }

    /// Checks the sustain bounds and the locked base range.
    ///
    /// An empty interval selection is allowed here; it surfaces as "no
    /// question" at generation time.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SUSTAIN..=MAX_SUSTAIN).contains(&self.sustain_duration) {
            return Err(TheoryError::InvalidSustain(self.sustain_duration));
        }
        if let Some(base) = self.locked_base {
            if !is_in_range(base) {
                return Err(TheoryError::LockedBaseOutOfRange(base));
            }
        }
        Ok(())
    }
}
