//! # Notes Module
//!
//! This module provides the pitch model used by every other part of the trainer.
//! It converts between a numeric pitch (a MIDI-style semitone index where A4 = 69),
//! a human-readable note name, and the key used to look up an audio sample.
//!
//! ## Features
//! - Equal temperament frequency calculation referenced to A4 = 440 Hz
//! - Note name and sample key formatting ("C#4" / "Cs4")
//! - The fixed playable range (C3 to B5) and range checks against it

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;

use crate::error::TheoryError;

/// Chromatic note names, indexed by pitch class (C = 0).
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Reference frequency of A4 in Hz.
pub const A4_FREQUENCY: f32 = 440.0;
/// Pitch number of A4.
pub const A4_PITCH: i32 = 69;

/// Lowest playable pitch (C3).
pub const MIN_PITCH: i32 = 48;
/// Highest playable pitch (B5).
pub const MAX_PITCH: i32 = 83;

/// A single playable tone.
///
/// The name and sample key are derived from `number` when the pitch is built
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pitch {
    /// Semitone index, A4 = 69
    pub number: i32,
    /// Display name (e.g. "C#4")
    pub name: String,
    /// Sample lookup key (e.g. "Cs4")
    pub sample_key: String,
}

impl Pitch {
    pub fn new(number: i32) -> Self {
        Self {
            number,
            name: pitch_to_display_name(number),
            sample_key: pitch_to_sample_key(number),
        }
    }

    pub fn frequency(&self) -> f32 {
        pitch_to_frequency(self.number)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for Pitch {
    type Err = TheoryError;

    /// Accepts a pitch number ("61"), a display name ("C#4") or a sample key ("Cs4").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(number) = s.parse::<i32>() {
            return Ok(Pitch::new(number));
        }
        parse_pitch_name(s)
            .map(Pitch::new)
            .ok_or_else(|| TheoryError::UnknownPitch(s.to_string()))
    }
}

/// Parses a note name with octave back into a pitch number.
///
/// The letter is case-insensitive; a sharp may be written `#` or `s`.
/// Flats are not accepted since no name produced by this module uses them.
fn parse_pitch_name(name: &str) -> Option<i32> {
    let mut chars = name.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let rest = chars.as_str();
    let (sharp, octave) = match rest.strip_prefix(['#', 's']) {
        Some(octave) => (true, octave),
        None => (false, rest),
    };
    let octave: i32 = octave.parse().ok()?;

    let mut note = String::from(letter);
    if sharp {
        note.push('#');
    }
    let pitch_class = NOTE_NAMES.iter().position(|n| *n == note)? as i32;
    octave.checked_add(1)?.checked_mul(12)?.checked_add(pitch_class)
}

/// An inclusive range of pitch numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchRange {
    pub min: i32,
    pub max: i32,
}

impl PitchRange {
    /// The range every generated example must stay within.
    pub const PLAYABLE: PitchRange = PitchRange {
        min: MIN_PITCH,
        max: MAX_PITCH,
    };

    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Inclusive bounds check.
    pub fn contains(&self, pitch: i32) -> bool {
        pitch >= self.min && pitch <= self.max
    }

    /// Materializes every pitch in the range, in ascending order.
    pub fn pitches(&self) -> Vec<Pitch> {
        (self.min..=self.max).map(Pitch::new).collect()
    }
}

impl Default for PitchRange {
    fn default() -> Self {
        Self::PLAYABLE
    }
}

/// Statically computed pitches for the playable range.
///
/// Built once on first access; the order is ascending by pitch number.
static PLAYABLE_PITCHES: Lazy<Vec<Pitch>> = Lazy::new(|| PitchRange::PLAYABLE.pitches());

/// Calculates the equal temperament frequency of a pitch.
///
/// Defined for every integer, including pitches outside the playable range.
///
/// # Arguments
/// * `pitch` - Pitch number (A4 = 69)
///
/// # Returns
/// * Frequency in Hz
pub fn pitch_to_frequency(pitch: i32) -> f32 {
    A4_FREQUENCY * 2.0_f32.powf((pitch - A4_PITCH) as f32 / 12.0)
}

/// Formats a pitch number as a note name with octave, e.g. 61 -> "C#4".
///
/// The octave changes at C. Negative pitch numbers use floor division so the
/// conversion stays total.
pub fn pitch_to_display_name(pitch: i32) -> String {
    let (name, octave) = name_and_octave(pitch);
    format!("{}{}", name, octave)
}

/// Formats a pitch number as an audio sample key, e.g. 61 -> "Cs4".
///
/// Identical to the display name except that `#` is spelled `s`.
pub fn pitch_to_sample_key(pitch: i32) -> String {
    let (name, octave) = name_and_octave(pitch);
    format!("{}{}", name.replace('#', "s"), octave)
}

fn name_and_octave(pitch: i32) -> (&'static str, i32) {
    let pitch_class = pitch.rem_euclid(12) as usize;
    let octave = pitch.div_euclid(12) - 1;
    (NOTE_NAMES[pitch_class], octave)
}

/// Checks a pitch against the default playable range.
///
/// Use [`PitchRange::contains`] to check against other bounds.
pub fn is_in_range(pitch: i32) -> bool {
    PitchRange::PLAYABLE.contains(pitch)
}

/// Every playable pitch, ascending.
pub fn playable_range() -> &'static [Pitch] {
    &PLAYABLE_PITCHES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_follow_octave_formula() {
        assert_eq!(pitch_to_display_name(69), "A4");
        assert_eq!(pitch_to_display_name(60), "C4");
        assert_eq!(pitch_to_display_name(61), "C#4");
        assert_eq!(pitch_to_display_name(48), "C3");
        assert_eq!(pitch_to_display_name(83), "B5");
        assert_eq!(pitch_to_display_name(59), "B3");

        for p in MIN_PITCH..=MAX_PITCH {
            let expected = format!("{}{}", NOTE_NAMES[(p % 12) as usize], p / 12 - 1);
            assert_eq!(pitch_to_display_name(p), expected);
        }
    }

    #[test]
    fn sample_key_replaces_sharp() {
        assert_eq!(pitch_to_sample_key(61), "Cs4");
        assert_eq!(pitch_to_sample_key(60), "C4");
        for p in -30..140 {
            assert_eq!(pitch_to_sample_key(p), pitch_to_display_name(p).replace('#', "s"));
        }
    }

    #[test]
    fn negative_pitches_use_floor_division() {
        assert_eq!(pitch_to_display_name(0), "C-1");
        assert_eq!(pitch_to_display_name(-1), "B-2");
        assert_eq!(pitch_to_display_name(-12), "C-2");
    }

    #[test]
    fn parses_names_and_numbers() {
        assert_eq!("C4".parse::<Pitch>().map(|p| p.number), Ok(60));
        assert_eq!("c#4".parse::<Pitch>().map(|p| p.number), Ok(61));
        assert_eq!("Cs4".parse::<Pitch>().map(|p| p.number), Ok(61));
        assert_eq!("B5".parse::<Pitch>().map(|p| p.number), Ok(83));
        assert_eq!("C-1".parse::<Pitch>().map(|p| p.number), Ok(0));
        assert_eq!("69".parse::<Pitch>().map(|p| p.name), Ok("A4".to_string()));
        assert!("E#4".parse::<Pitch>().is_err());
        assert!("H2".parse::<Pitch>().is_err());
        assert!("".parse::<Pitch>().is_err());
        assert_eq!(
            "C999999999".parse::<Pitch>(),
            Err(TheoryError::UnknownPitch("C999999999".to_string()))
        );
        assert!("B-999999999".parse::<Pitch>().is_err());

        for p in playable_range() {
            assert_eq!(p.name.parse::<Pitch>().as_ref(), Ok(p));
            assert_eq!(p.sample_key.parse::<Pitch>().as_ref(), Ok(p));
        }
    }

    #[test]
    fn frequency_is_referenced_to_a440() {
        assert!((pitch_to_frequency(69) - 440.0).abs() < 1e-3);
        assert!((pitch_to_frequency(81) - 880.0).abs() < 1e-2);
        assert!((pitch_to_frequency(57) - 220.0).abs() < 1e-3);
        assert!((pitch_to_frequency(60) - 261.6256).abs() < 1e-2);
        // Outside the playable range is still meaningful
        assert!((pitch_to_frequency(21) - 27.5).abs() < 1e-3);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(is_in_range(48));
        assert!(is_in_range(83));
        assert!(!is_in_range(47));
        assert!(!is_in_range(84));

        let narrow = PitchRange::new(60, 62);
        assert!(narrow.contains(61));
        assert!(!narrow.contains(63));
    }

    #[test]
    fn playable_range_is_ascending_and_complete() {
        let pitches = playable_range();
        assert_eq!(pitches.len(), 36);
        assert_eq!(pitches.first().map(|p| p.number), Some(48));
        assert_eq!(pitches.last().map(|p| p.number), Some(83));
        assert!(pitches.windows(2).all(|w| w[1].number == w[0].number + 1));
        assert_eq!(pitches[13].name, "C#4");
        assert_eq!(pitches[13].sample_key, "Cs4");
    }
}
