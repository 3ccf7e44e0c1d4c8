//! # Intervals Module
//!
//! The twelve training intervals (minor 2nd through octave), the practice
//! selection over them, and the base-pitch filter that keeps generated
//! targets inside the playable range.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::TheoryError;
use crate::notes::{Pitch, PitchRange, playable_range};

/// A named musical distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub name: &'static str,
    pub semitones: i32,
    pub abbrev: &'static str,
}

/// Identifies one of the twelve training intervals.
///
/// Variants are declared in order of increasing distance, so the derived
/// `Ord` sorts by size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntervalKey {
    #[serde(rename = "m2")]
    MinorSecond,
    #[serde(rename = "M2")]
    MajorSecond,
    #[serde(rename = "m3")]
    MinorThird,
    #[serde(rename = "M3")]
    MajorThird,
    #[serde(rename = "P4")]
    PerfectFourth,
    #[serde(rename = "TT")]
    Tritone,
    #[serde(rename = "P5")]
    PerfectFifth,
    #[serde(rename = "m6")]
    MinorSixth,
    #[serde(rename = "M6")]
    MajorSixth,
    #[serde(rename = "m7")]
    MinorSeventh,
    #[serde(rename = "M7")]
    MajorSeventh,
    #[serde(rename = "P8")]
    Octave,
}

/// Interval table, in the same order as [`IntervalKey`].
pub const INTERVALS: [Interval; 12] = [
    Interval { name: "Minor 2nd", semitones: 1, abbrev: "m2" },
    Interval { name: "Major 2nd", semitones: 2, abbrev: "M2" },
    Interval { name: "Minor 3rd", semitones: 3, abbrev: "m3" },
    Interval { name: "Major 3rd", semitones: 4, abbrev: "M3" },
    Interval { name: "Perfect 4th", semitones: 5, abbrev: "P4" },
    Interval { name: "Tritone", semitones: 6, abbrev: "TT" },
    Interval { name: "Perfect 5th", semitones: 7, abbrev: "P5" },
    Interval { name: "Minor 6th", semitones: 8, abbrev: "m6" },
    Interval { name: "Major 6th", semitones: 9, abbrev: "M6" },
    Interval { name: "Minor 7th", semitones: 10, abbrev: "m7" },
    Interval { name: "Major 7th", semitones: 11, abbrev: "M7" },
    Interval { name: "Octave", semitones: 12, abbrev: "P8" },
];

impl IntervalKey {
    /// All keys in training order (ascending distance).
    pub const ALL: [IntervalKey; 12] = [
        IntervalKey::MinorSecond,
        IntervalKey::MajorSecond,
        IntervalKey::MinorThird,
        IntervalKey::MajorThird,
        IntervalKey::PerfectFourth,
        IntervalKey::Tritone,
        IntervalKey::PerfectFifth,
        IntervalKey::MinorSixth,
        IntervalKey::MajorSixth,
        IntervalKey::MinorSeventh,
        IntervalKey::MajorSeventh,
        IntervalKey::Octave,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn interval(self) -> &'static Interval {
        &INTERVALS[self.index()]
    }

    pub fn semitones(self) -> i32 {
        self.interval().semitones
    }

    pub fn abbrev(self) -> &'static str {
        self.interval().abbrev
    }

    pub fn name(self) -> &'static str {
        self.interval().name
    }

    /// Target pitch reached from `base` in the given direction.
    ///
    /// `None` when the target does not fit in an `i32`.
    pub fn target_from(self, base: i32, ascending: bool) -> Option<i32> {
        if ascending {
            base.checked_add(self.semitones())
        } else {
            base.checked_sub(self.semitones())
        }
    }
}

impl fmt::Display for IntervalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

impl FromStr for IntervalKey {
    type Err = TheoryError;

    /// Parses an abbreviation. Case matters: "m3" and "M3" differ.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        IntervalKey::ALL
            .into_iter()
            .find(|key| key.abbrev() == s)
            .ok_or_else(|| TheoryError::UnknownInterval(s.to_string()))
    }
}

/// Which of the twelve intervals are selected for practice.
///
/// Always carries a flag for every key. Serializes as a map keyed by
/// abbreviation; deserializing a map that lacks any key is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "BTreeMap<IntervalKey, bool>", try_from = "BTreeMap<IntervalKey, bool>")]
pub struct EnabledIntervals {
    flags: [bool; 12],
}

impl EnabledIntervals {
    pub const fn none() -> Self {
        Self { flags: [false; 12] }
    }

    pub const fn all() -> Self {
        Self { flags: [true; 12] }
    }

    /// A selection with exactly one interval enabled.
    pub fn only(key: IntervalKey) -> Self {
        let mut set = Self::none();
        set.set(key, true);
        set
    }

    pub fn from_keys(keys: impl IntoIterator<Item = IntervalKey>) -> Self {
        let mut set = Self::none();
        for key in keys {
            set.set(key, true);
        }
        set
    }

    pub fn is_enabled(&self, key: IntervalKey) -> bool {
        self.flags[key.index()]
    }

    pub fn set(&mut self, key: IntervalKey, enabled: bool) {
        self.flags[key.index()] = enabled;
    }

    pub fn toggle(&mut self, key: IntervalKey) {
        self.flags[key.index()] = !self.flags[key.index()];
    }

    /// Enabled keys in training order.
    pub fn enabled_keys(&self) -> Vec<IntervalKey> {
        IntervalKey::ALL
            .into_iter()
            .filter(|key| self.is_enabled(*key))
            .collect()
    }

    pub fn has_selection(&self) -> bool {
        self.flags.iter().any(|f| *f)
    }
}

impl Default for EnabledIntervals {
    /// The major scale pattern.
    fn default() -> Self {
        crate::scales::get_intervals_for_scale(crate::scales::ScaleKey::Major)
    }
}

impl From<EnabledIntervals> for BTreeMap<IntervalKey, bool> {
    fn from(set: EnabledIntervals) -> Self {
        IntervalKey::ALL
            .into_iter()
            .map(|key| (key, set.is_enabled(key)))
            .collect()
    }
}

impl TryFrom<BTreeMap<IntervalKey, bool>> for EnabledIntervals {
    type Error = TheoryError;

    fn try_from(map: BTreeMap<IntervalKey, bool>) -> Result<Self, Self::Error> {
        let mut set = Self::none();
        for key in IntervalKey::ALL {
            let enabled = map
                .get(&key)
                .ok_or_else(|| TheoryError::IncompleteIntervalSet(key.abbrev().to_string()))?;
            set.set(key, *enabled);
        }
        Ok(set)
    }
}

/// Finds every playable base pitch whose target is also playable.
///
/// # Arguments
/// * `key` - The interval to measure from each base
/// * `ascending` - Direction of the target relative to the base
///
/// # Returns
/// * Valid base pitches in ascending order
pub fn get_valid_base_notes(key: IntervalKey, ascending: bool) -> Vec<Pitch> {
    valid_base_notes_in(key, ascending, PitchRange::PLAYABLE)
}

/// Same as [`get_valid_base_notes`] but over an arbitrary range.
pub fn valid_base_notes_in(key: IntervalKey, ascending: bool, range: PitchRange) -> Vec<Pitch> {
    let filter = |pitch: &Pitch| {
        key.target_from(pitch.number, ascending)
            .is_some_and(|target| range.contains(target))
    };
    if range == PitchRange::PLAYABLE {
        playable_range().iter().filter(|&p| filter(p)).cloned().collect()
    } else {
        range.pitches().into_iter().filter(|p| filter(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_are_ordered_by_distance() {
        for (i, key) in IntervalKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
            assert_eq!(key.semitones(), i as i32 + 1);
        }
        assert!(INTERVALS.windows(2).all(|w| w[0].semitones < w[1].semitones));
        assert_eq!(IntervalKey::Tritone.name(), "Tritone");
        assert_eq!(IntervalKey::Octave.abbrev(), "P8");
    }

    #[test]
    fn parses_abbreviations_case_sensitively() {
        assert_eq!("m3".parse::<IntervalKey>(), Ok(IntervalKey::MinorThird));
        assert_eq!("M3".parse::<IntervalKey>(), Ok(IntervalKey::MajorThird));
        assert_eq!(" TT ".parse::<IntervalKey>(), Ok(IntervalKey::Tritone));
        assert_eq!(
            "p5".parse::<IntervalKey>(),
            Err(TheoryError::UnknownInterval("p5".to_string()))
        );
        for key in IntervalKey::ALL {
            assert_eq!(key.to_string().parse::<IntervalKey>(), Ok(key));
        }
    }

    #[test]
    fn selection_helpers() {
        let mut set = EnabledIntervals::none();
        assert!(!set.has_selection());
        set.toggle(IntervalKey::PerfectFifth);
        set.toggle(IntervalKey::MinorSecond);
        assert_eq!(
            set.enabled_keys(),
            vec![IntervalKey::MinorSecond, IntervalKey::PerfectFifth]
        );
        set.toggle(IntervalKey::MinorSecond);
        assert_eq!(set, EnabledIntervals::only(IntervalKey::PerfectFifth));
        assert_eq!(EnabledIntervals::all().enabled_keys().len(), 12);
    }

    #[test]
    fn default_selection_is_major_scale() {
        let set = EnabledIntervals::default();
        assert_eq!(
            set.enabled_keys(),
            vec![
                IntervalKey::MajorSecond,
                IntervalKey::MajorThird,
                IntervalKey::PerfectFourth,
                IntervalKey::PerfectFifth,
                IntervalKey::MajorSixth,
                IntervalKey::MajorSeventh,
                IntervalKey::Octave,
            ]
        );
    }

    #[test]
    fn selection_serializes_as_keyed_map() {
        let set = EnabledIntervals::only(IntervalKey::MajorThird);
        let json = serde_json::to_value(set).unwrap();
        assert_eq!(json["M3"], true);
        assert_eq!(json["m3"], false);
        assert_eq!(json.as_object().unwrap().len(), 12);

        let back: EnabledIntervals = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn partial_selection_map_is_rejected() {
        let err = serde_json::from_str::<EnabledIntervals>(r#"{"M3": true}"#).unwrap_err();
        assert!(err.to_string().contains("missing m2"));
    }

    #[test]
    fn valid_bases_keep_targets_in_range() {
        let up = get_valid_base_notes(IntervalKey::Octave, true);
        assert_eq!(up.first().map(|p| p.number), Some(48));
        assert_eq!(up.last().map(|p| p.number), Some(71));
        assert_eq!(up.len(), 24);

        let down = get_valid_base_notes(IntervalKey::Octave, false);
        assert_eq!(down.first().map(|p| p.number), Some(60));
        assert_eq!(down.last().map(|p| p.number), Some(83));

        let seconds = get_valid_base_notes(IntervalKey::MinorSecond, true);
        assert_eq!(seconds.len(), 35);
    }

    #[test]
    fn targets_at_the_edge_of_i32_do_not_wrap() {
        assert_eq!(IntervalKey::Octave.target_from(60, true), Some(72));
        assert_eq!(IntervalKey::Octave.target_from(60, false), Some(48));
        assert_eq!(IntervalKey::Octave.target_from(i32::MAX, true), None);
        assert_eq!(IntervalKey::MinorSecond.target_from(i32::MIN, false), None);

        let extreme = PitchRange::new(i32::MAX - 3, i32::MAX);
        let bases = valid_base_notes_in(IntervalKey::MinorThird, true, extreme);
        assert_eq!(bases.iter().map(|p| p.number).collect::<Vec<_>>(), vec![i32::MAX - 3]);
    }

    #[test]
    fn valid_bases_in_narrow_range_can_be_empty() {
        let range = PitchRange::new(60, 65);
        assert!(valid_base_notes_in(IntervalKey::Octave, true, range).is_empty());
        let thirds = valid_base_notes_in(IntervalKey::MajorThird, false, range);
        assert_eq!(thirds.iter().map(|p| p.number).collect::<Vec<_>>(), vec![64, 65]);
    }
}
