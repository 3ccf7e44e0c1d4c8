//! # Playback Module
//!
//! The boundary to whatever actually makes sound. The core never plays
//! audio itself: it describes what to play through [`AudioSink`], and it
//! can lay an interval or a scale out in time as a list of [`NoteEvent`]s
//! for sinks that need explicit onsets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TheoryError;
use crate::notes::Pitch;

/// Default sustain duration in seconds.
pub const DEFAULT_SUSTAIN: f32 = 1.5;

/// Fraction of the sustain duration between successive melodic notes.
pub const MELODIC_SPACING: f32 = 0.6;

/// How the two pitches of an interval are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    /// One after the other
    #[default]
    Melodic,
    /// Together
    Harmonic,
}

impl PlaybackMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackMode::Melodic => "melodic",
            PlaybackMode::Harmonic => "harmonic",
        }
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaybackMode {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "melodic" => Ok(PlaybackMode::Melodic),
            "harmonic" => Ok(PlaybackMode::Harmonic),
            _ => Err(TheoryError::UnknownPlaybackMode(s.to_string())),
        }
    }
}

/// Something that can play pitches.
///
/// All calls are fire-and-forget: implementations return immediately and
/// the core never waits for playback to finish.
pub trait AudioSink {
    fn play_note(&mut self, pitch: i32);

    fn play_interval(&mut self, first: i32, second: i32, mode: PlaybackMode);

    /// How long each note rings, in seconds.
    fn set_sustain_duration(&mut self, seconds: f32);
}

/// A single note placed in time, relative to the start of a phrase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub pitch: i32,
    /// Seconds after the phrase starts
    pub onset: f32,
    /// Seconds the note rings
    pub duration: f32,
}

/// Lays out an interval in time.
///
/// Harmonic intervals start both notes at once. Melodic intervals start the
/// second note `sustain * MELODIC_SPACING` seconds after the first.
pub fn interval_schedule(first: i32, second: i32, mode: PlaybackMode, sustain: f32) -> Vec<NoteEvent> {
    let second_onset = match mode {
        PlaybackMode::Harmonic => 0.0,
        PlaybackMode::Melodic => sustain * MELODIC_SPACING,
    };
    vec![
        NoteEvent { pitch: first, onset: 0.0, duration: sustain },
        NoteEvent { pitch: second, onset: second_onset, duration: sustain },
    ]
}

/// Lays out a scale demonstration, one note every `sustain * MELODIC_SPACING` seconds.
pub fn scale_schedule(pitches: &[Pitch], sustain: f32) -> Vec<NoteEvent> {
    let spacing = sustain * MELODIC_SPACING;
    pitches
        .iter()
        .enumerate()
        .map(|(i, pitch)| NoteEvent {
            pitch: pitch.number,
            onset: i as f32 * spacing,
            duration: sustain,
        })
        .collect()
}
