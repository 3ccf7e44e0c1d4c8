//! # Question Generator Module
//!
//! Produces one playable interval example from a practice selection.
//!
//! Each call makes up to three independent uniform draws from the supplied
//! [`RandomSource`], always in this order:
//! 1. the interval, from the enabled keys in training order
//! 2. the direction, only when the direction policy is [`Direction::Both`]
//! 3. the base pitch, only when no usable locked base was supplied
//!
//! Generation either succeeds or reports that no question is possible. Both
//! failure causes (nothing enabled, no playable base) collapse into `None`.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TheoryError;
use crate::intervals::{EnabledIntervals, IntervalKey, valid_base_notes_in};
use crate::notes::{Pitch, PitchRange};
use crate::random::RandomSource;

/// Direction policy for generated intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
    /// Each question picks ascending or descending with equal odds
    Both,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ascending => "ascending",
            Direction::Descending => "descending",
            Direction::Both => "both",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "up" => Ok(Direction::Ascending),
            "descending" | "down" => Ok(Direction::Descending),
            "both" => Ok(Direction::Both),
            _ => Err(TheoryError::UnknownDirection(s.to_string())),
        }
    }
}

/// One generated practice example.
///
/// `target.number - base.number` equals the interval's semitone distance,
/// negated when descending. Both pitches lie in the generator's range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalQuestion {
    pub base: Pitch,
    pub target: Pitch,
    pub interval_key: IntervalKey,
    pub interval_name: &'static str,
    pub ascending: bool,
}

impl fmt::Display for IntervalQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.ascending { "->" } else { "<-" };
        write!(f, "{} {} {} ({})", self.base, arrow, self.target, self.interval_name)
    }
}

/// Generates questions whose pitches stay within `range`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionGenerator {
    pub range: PitchRange,
}

impl QuestionGenerator {
    pub fn new(range: PitchRange) -> Self {
        Self { range }
    }

    /// Generates one question.
    ///
    /// # Arguments
    /// * `enabled` - Intervals that may be asked
    /// * `direction` - Direction policy
    /// * `locked_base` - Preferred base pitch; ignored for this draw when its
    ///   target would leave the range
    /// * `rng` - Source of the uniform draws
    ///
    /// # Returns
    /// * `Some(question)` - A playable example
    /// * `None` - No interval is enabled, or the chosen interval has no
    ///   playable base in the chosen direction
    ///
    /// Only the locked base's target is checked against the range, not the
    /// locked base itself. A locked base below the range whose target lands
    /// inside it is used as given, so callers that accept arbitrary pitches
    /// should run [`crate::PracticeConfig::validate`] first.
    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        enabled: &EnabledIntervals,
        direction: Direction,
        locked_base: Option<&Pitch>,
        rng: &mut R,
    ) -> Option<IntervalQuestion> {
        let keys = enabled.enabled_keys();
        if keys.is_empty() {
            warn!("[GENERATOR] No question: no intervals are enabled");
            return None;
        }

        let interval_key = keys[rng.index(keys.len())];

        let ascending = match direction {
            Direction::Ascending => true,
            Direction::Descending => false,
            Direction::Both => rng.coin(),
        };

        let locked = locked_base.filter(|pitch| {
            let fits = interval_key
                .target_from(pitch.number, ascending)
                .is_some_and(|target| self.range.contains(target));
            if !fits {
                debug!(
                    "[GENERATOR] Locked base {} cannot reach {} {}; choosing a random base",
                    pitch,
                    if ascending { "up" } else { "down" },
                    interval_key
                );
            }
            fits
        });

        let base = match locked {
            Some(pitch) => pitch.clone(),
            None => {
                let mut candidates = valid_base_notes_in(interval_key, ascending, self.range);
                if candidates.is_empty() {
                    warn!(
                        "[GENERATOR] No question: {} {} has no base within {}..={}",
                        interval_key,
                        if ascending { "ascending" } else { "descending" },
                        self.range.min,
                        self.range.max
                    );
                    return None;
                }
                let choice = rng.index(candidates.len());
                candidates.swap_remove(choice)
            }
        };

        // Every base reaching this point has an in-range target
        let target = Pitch::new(interval_key.target_from(base.number, ascending)?);

        Some(IntervalQuestion {
            base,
            target,
            interval_key,
            interval_name: interval_key.name(),
            ascending,
        })
    }
}

/// Generates one question within the default playable range.
///
/// See [`QuestionGenerator::generate`].
pub fn generate_question<R: RandomSource + ?Sized>(
    enabled: &EnabledIntervals,
    direction: Direction,
    locked_base: Option<&Pitch>,
    rng: &mut R,
) -> Option<IntervalQuestion> {
    QuestionGenerator::default().generate(enabled, direction, locked_base, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::{MAX_PITCH, MIN_PITCH};
    use crate::random::ScriptedRandom;

    fn assert_well_formed(q: &IntervalQuestion) {
        let distance = q.interval_key.semitones();
        let expected = if q.ascending { distance } else { -distance };
        assert_eq!(q.target.number - q.base.number, expected, "{q}");
        assert!((MIN_PITCH..=MAX_PITCH).contains(&q.base.number), "{q}");
        assert!((MIN_PITCH..=MAX_PITCH).contains(&q.target.number), "{q}");
        assert_eq!(q.interval_name, q.interval_key.name());
    }

    #[test]
    fn empty_selection_never_yields_a_question() {
        let mut rng = fastrand::Rng::with_seed(1);
        let locked = Pitch::new(60);
        for direction in [Direction::Ascending, Direction::Descending, Direction::Both] {
            for lock in [None, Some(&locked)] {
                assert!(generate_question(&EnabledIntervals::none(), direction, lock, &mut rng).is_none());
            }
        }
    }

    #[test]
    fn single_ascending_major_third() {
        let mut rng = fastrand::Rng::with_seed(42);
        let enabled = EnabledIntervals::only(IntervalKey::MajorThird);
        for _ in 0..1000 {
            let q = generate_question(&enabled, Direction::Ascending, None, &mut rng)
                .expect("M3 always has a valid base");
            assert_eq!(q.interval_key, IntervalKey::MajorThird);
            assert!(q.ascending);
            assert_eq!(q.target.number - q.base.number, 4);
            assert_well_formed(&q);
        }
    }

    #[test]
    fn descending_policy_always_descends() {
        let mut rng = fastrand::Rng::with_seed(3);
        let enabled = EnabledIntervals::all();
        for _ in 0..500 {
            let q = generate_question(&enabled, Direction::Descending, None, &mut rng).unwrap();
            assert!(!q.ascending);
            assert_well_formed(&q);
        }
    }

    #[test]
    fn both_directions_occur() {
        let mut rng = fastrand::Rng::with_seed(9);
        let enabled = EnabledIntervals::all();
        let mut up = 0;
        let mut down = 0;
        for _ in 0..2000 {
            let q = generate_question(&enabled, Direction::Both, None, &mut rng).unwrap();
            assert_well_formed(&q);
            if q.ascending {
                up += 1;
            } else {
                down += 1;
            }
        }
        assert!(up > 800 && down > 800, "up={up} down={down}");
    }

    #[test]
    fn every_enabled_interval_gets_asked() {
        let mut rng = fastrand::Rng::with_seed(11);
        let enabled = EnabledIntervals::from_keys([IntervalKey::MinorSecond, IntervalKey::Tritone]);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            let q = generate_question(&enabled, Direction::Both, None, &mut rng).unwrap();
            assert!(enabled.is_enabled(q.interval_key));
            seen.insert(q.interval_key);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn locked_base_is_used_when_target_fits() {
        let mut rng = fastrand::Rng::with_seed(5);
        let locked = Pitch::new(60);
        let enabled = EnabledIntervals::only(IntervalKey::PerfectFifth);
        for _ in 0..50 {
            let q = generate_question(&enabled, Direction::Both, Some(&locked), &mut rng).unwrap();
            assert_eq!(q.base, locked);
            assert_eq!(q.target.name, if q.ascending { "G4" } else { "F3" });
        }
    }

    #[test]
    fn locked_base_at_top_falls_back_for_octave() {
        let mut rng = fastrand::Rng::with_seed(8);
        let locked = Pitch::new(83);
        let enabled = EnabledIntervals::only(IntervalKey::Octave);
        for _ in 0..200 {
            let q = generate_question(&enabled, Direction::Ascending, Some(&locked), &mut rng).unwrap();
            assert_ne!(q.base.number, 83);
            assert!(q.base.number <= 71);
            assert_well_formed(&q);
        }
    }

    #[test]
    fn locked_base_only_overridden_for_out_of_range_draws() {
        // With "both", descending octaves from 83 fit and ascending ones do not.
        let locked = Pitch::new(83);
        let enabled = EnabledIntervals::only(IntervalKey::Octave);

        let mut down = ScriptedRandom::new([0], [false]);
        let q = generate_question(&enabled, Direction::Both, Some(&locked), &mut down).unwrap();
        assert_eq!(q.base.number, 83);
        assert_eq!(q.target.number, 71);

        let mut up = ScriptedRandom::new([0, 5], [true]);
        let q = generate_question(&enabled, Direction::Both, Some(&locked), &mut up).unwrap();
        assert_eq!(q.base.number, 53);
        assert_eq!(q.target.number, 65);
    }

    #[test]
    fn extreme_locked_base_falls_back_to_a_random_base() {
        let mut rng = fastrand::Rng::with_seed(12);
        let enabled = EnabledIntervals::only(IntervalKey::Octave);
        for locked in [Pitch::new(i32::MAX), Pitch::new(i32::MIN)] {
            for direction in [Direction::Ascending, Direction::Descending] {
                let q = generate_question(&enabled, direction, Some(&locked), &mut rng).unwrap();
                assert_ne!(q.base, locked);
                assert_well_formed(&q);
            }
        }
    }

    #[test]
    fn locked_base_below_range_is_kept_when_target_fits() {
        let mut rng = fastrand::Rng::with_seed(13);
        let locked = Pitch::new(45);
        let enabled = EnabledIntervals::only(IntervalKey::PerfectFifth);
        let q = generate_question(&enabled, Direction::Ascending, Some(&locked), &mut rng).unwrap();
        assert_eq!(q.base.number, 45);
        assert_eq!(q.target.number, 52);
    }

    #[test]
    fn scripted_draws_give_a_predictable_question() {
        let enabled = EnabledIntervals::from_keys([IntervalKey::MinorThird, IntervalKey::PerfectFifth]);
        // interval index 1 -> P5, coin false -> descending, base index 0 -> lowest valid base
        let mut rng = ScriptedRandom::new([1, 0], [false]);
        let q = generate_question(&enabled, Direction::Both, None, &mut rng).unwrap();
        assert_eq!(q.interval_key, IntervalKey::PerfectFifth);
        assert!(!q.ascending);
        assert_eq!(q.base.number, 55);
        assert_eq!(q.target.number, 48);
        assert_eq!(q.target.name, "C3");
        assert_eq!(rng.remaining(), (0, 0));
    }

    #[test]
    fn fixed_direction_does_not_draw_a_coin() {
        let enabled = EnabledIntervals::only(IntervalKey::MajorSecond);
        let mut rng = ScriptedRandom::new([0, 2], [false]);
        let q = generate_question(&enabled, Direction::Ascending, None, &mut rng).unwrap();
        assert!(q.ascending);
        assert_eq!(q.base.number, 50);
        assert_eq!(rng.remaining(), (0, 1));
    }

    #[test]
    fn narrow_range_without_valid_base_yields_none() {
        let generator = QuestionGenerator::new(PitchRange::new(60, 65));
        let mut rng = fastrand::Rng::with_seed(2);
        let enabled = EnabledIntervals::only(IntervalKey::Octave);
        assert!(generator.generate(&enabled, Direction::Descending, None, &mut rng).is_none());

        // A locked base cannot rescue an impossible interval either
        let locked = Pitch::new(60);
        assert!(generator.generate(&enabled, Direction::Ascending, Some(&locked), &mut rng).is_none());
    }

    #[test]
    fn parses_directions() {
        assert_eq!("Ascending".parse::<Direction>(), Ok(Direction::Ascending));
        assert_eq!("down".parse::<Direction>(), Ok(Direction::Descending));
        assert_eq!("both".parse::<Direction>(), Ok(Direction::Both));
        assert!("sideways".parse::<Direction>().is_err());
    }
}
