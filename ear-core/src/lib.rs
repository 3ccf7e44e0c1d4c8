// ear-core/src/lib.rs

//! The core logic for the interval ear trainer.
//! This crate is responsible for the pitch model, the interval and scale
//! tables, and randomized question generation. It is completely headless:
//! it contains no audio device code and no UI code, and describes playback
//! through the `AudioSink` trait instead of performing it.

pub mod config;
pub mod error;
pub mod intervals;
pub mod notes;
pub mod playback;
pub mod question;
pub mod quiz;
pub mod random;
pub mod scales;

pub use config::PracticeConfig;
pub use error::TheoryError;
pub use intervals::{EnabledIntervals, Interval, IntervalKey, get_valid_base_notes};
pub use notes::{Pitch, PitchRange, is_in_range, pitch_to_display_name, pitch_to_frequency, pitch_to_sample_key, playable_range};
pub use playback::{AudioSink, NoteEvent, PlaybackMode};
pub use question::{Direction, IntervalQuestion, QuestionGenerator, generate_question};
pub use quiz::{AnswerOutcome, QuizSession, Score};
pub use random::{RandomSource, ScriptedRandom};
pub use scales::{Scale, ScaleKey, find_matching_scale, get_intervals_for_scale};
