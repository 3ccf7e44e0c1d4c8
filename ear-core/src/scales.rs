//! # Scales Module
//!
//! Named scales expressed two ways: as a set of training intervals measured
//! from the tonic, and as a semitone step pattern used for playback. Scales
//! double as practice presets, so an interval selection can be mapped back
//! to the scale it came from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TheoryError;
use crate::intervals::{EnabledIntervals, IntervalKey};
use crate::notes::Pitch;

use IntervalKey::*;

/// A named scale: its intervals above the tonic and the equivalent steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub name: &'static str,
    /// Never contains the unison; always ends with the octave
    pub intervals: &'static [IntervalKey],
    /// Semitones from the tonic, starting at 0 and ending at 12
    pub steps: &'static [i32],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKey {
    Major,
    NaturalMinor,
    HarmonicMinor,
    MelodicMinor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    /// Any selection that matches none of the named scales
    Custom,
}

const MAJOR: Scale = Scale {
    name: "Major",
    intervals: &[MajorSecond, MajorThird, PerfectFourth, PerfectFifth, MajorSixth, MajorSeventh, Octave],
    steps: &[0, 2, 4, 5, 7, 9, 11, 12],
};
const NATURAL_MINOR: Scale = Scale {
    name: "Natural Minor",
    intervals: &[MajorSecond, MinorThird, PerfectFourth, PerfectFifth, MinorSixth, MinorSeventh, Octave],
    steps: &[0, 2, 3, 5, 7, 8, 10, 12],
};
const HARMONIC_MINOR: Scale = Scale {
    name: "Harmonic Minor",
    intervals: &[MajorSecond, MinorThird, PerfectFourth, PerfectFifth, MinorSixth, MajorSeventh, Octave],
    steps: &[0, 2, 3, 5, 7, 8, 11, 12],
};
const MELODIC_MINOR: Scale = Scale {
    name: "Melodic Minor",
    intervals: &[MajorSecond, MinorThird, PerfectFourth, PerfectFifth, MajorSixth, MajorSeventh, Octave],
    steps: &[0, 2, 3, 5, 7, 9, 11, 12],
};
const DORIAN: Scale = Scale {
    name: "Dorian",
    intervals: &[MajorSecond, MinorThird, PerfectFourth, PerfectFifth, MajorSixth, MinorSeventh, Octave],
    steps: &[0, 2, 3, 5, 7, 9, 10, 12],
};
const PHRYGIAN: Scale = Scale {
    name: "Phrygian",
    intervals: &[MinorSecond, MinorThird, PerfectFourth, PerfectFifth, MinorSixth, MinorSeventh, Octave],
    steps: &[0, 1, 3, 5, 7, 8, 10, 12],
};
const LYDIAN: Scale = Scale {
    name: "Lydian",
    intervals: &[MajorSecond, MajorThird, Tritone, PerfectFifth, MajorSixth, MajorSeventh, Octave],
    steps: &[0, 2, 4, 6, 7, 9, 11, 12],
};
const MIXOLYDIAN: Scale = Scale {
    name: "Mixolydian",
    intervals: &[MajorSecond, MajorThird, PerfectFourth, PerfectFifth, MajorSixth, MinorSeventh, Octave],
    steps: &[0, 2, 4, 5, 7, 9, 10, 12],
};
const CUSTOM: Scale = Scale {
    name: "Custom",
    intervals: &[],
    steps: &[],
};

impl ScaleKey {
    /// The named scales in canonical matching order.
    pub const NAMED: [ScaleKey; 8] = [
        ScaleKey::Major,
        ScaleKey::NaturalMinor,
        ScaleKey::HarmonicMinor,
        ScaleKey::MelodicMinor,
        ScaleKey::Dorian,
        ScaleKey::Phrygian,
        ScaleKey::Lydian,
        ScaleKey::Mixolydian,
    ];

    pub fn scale(self) -> &'static Scale {
        match self {
            ScaleKey::Major => &MAJOR,
            ScaleKey::NaturalMinor => &NATURAL_MINOR,
            ScaleKey::HarmonicMinor => &HARMONIC_MINOR,
            ScaleKey::MelodicMinor => &MELODIC_MINOR,
            ScaleKey::Dorian => &DORIAN,
            ScaleKey::Phrygian => &PHRYGIAN,
            ScaleKey::Lydian => &LYDIAN,
            ScaleKey::Mixolydian => &MIXOLYDIAN,
            ScaleKey::Custom => &CUSTOM,
        }
    }

    pub fn name(self) -> &'static str {
        self.scale().name
    }

    /// The snake_case key used in configuration and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            ScaleKey::Major => "major",
            ScaleKey::NaturalMinor => "natural_minor",
            ScaleKey::HarmonicMinor => "harmonic_minor",
            ScaleKey::MelodicMinor => "melodic_minor",
            ScaleKey::Dorian => "dorian",
            ScaleKey::Phrygian => "phrygian",
            ScaleKey::Lydian => "lydian",
            ScaleKey::Mixolydian => "mixolydian",
            ScaleKey::Custom => "custom",
        }
    }
}

impl fmt::Display for ScaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaleKey {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        ScaleKey::NAMED
            .into_iter()
            .chain(std::iter::once(ScaleKey::Custom))
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| TheoryError::UnknownScale(s.to_string()))
    }
}

/// Builds the interval selection for a scale.
///
/// `Custom` has no intervals of its own and yields the empty selection.
pub fn get_intervals_for_scale(scale: ScaleKey) -> EnabledIntervals {
    EnabledIntervals::from_keys(scale.scale().intervals.iter().copied())
}

/// Maps an interval selection back to the named scale it equals.
///
/// All twelve flags must match, so a selection that adds an interval to a
/// scale is `Custom`. The named patterns are distinct, so at most one can
/// match; the scan still follows [`ScaleKey::NAMED`] order.
pub fn find_matching_scale(enabled: &EnabledIntervals) -> ScaleKey {
    ScaleKey::NAMED
        .into_iter()
        .find(|key| get_intervals_for_scale(*key) == *enabled)
        .unwrap_or(ScaleKey::Custom)
}

/// Pitches of a scale from `tonic`, tonic through octave.
///
/// # Returns
/// * `Some(pitches)` - One pitch per step, ascending
/// * `None` - For `Custom`, which has no step pattern, or when the octave
///   above `tonic` does not fit in an `i32`
pub fn scale_pitches(scale: ScaleKey, tonic: i32) -> Option<Vec<Pitch>> {
    let steps = scale.scale().steps;
    if steps.is_empty() {
        return None;
    }
    steps
        .iter()
        .map(|step| tonic.checked_add(*step).map(Pitch::new))
        .collect()
}
