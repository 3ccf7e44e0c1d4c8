//! Command-line definitions for the ear trainer.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use ear_core::{Direction, IntervalKey, Pitch, PlaybackMode, ScaleKey};

#[derive(Debug, Parser)]
#[command(name = "ear-trainer", version, about = "Interval ear training in the terminal")]
pub struct Cli {
    #[command(flatten)]
    pub practice: PracticeArgs,

    /// Print what would be played instead of opening an audio device
    #[arg(long, global = true)]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides applied on top of the loaded practice config.
#[derive(Debug, Args)]
pub struct PracticeArgs {
    /// JSON practice config to start from
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Interval selection preset (major, dorian, ...)
    #[arg(long, global = true)]
    pub preset: Option<ScaleKey>,

    /// Comma-separated interval abbreviations, e.g. m3,M3,P5
    #[arg(long, global = true, value_delimiter = ',')]
    pub intervals: Option<Vec<IntervalKey>>,

    #[arg(long, global = true)]
    pub direction: Option<Direction>,

    #[arg(long, global = true)]
    pub mode: Option<PlaybackMode>,

    /// Seconds each note rings (0.5 to 4)
    #[arg(long, global = true)]
    pub sustain: Option<f32>,

    /// Base pitch to start every example from, e.g. C4 or 60
    #[arg(long, global = true)]
    pub lock: Option<Pitch>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Answer multiple-choice interval questions
    Quiz,
    /// Hear examples of a single interval
    Learn {
        /// Interval abbreviation, e.g. P5
        interval: IntervalKey,
    },
    /// Play a named scale from a tonic
    Scale {
        scale: ScaleKey,
        #[arg(long, default_value = "C4")]
        tonic: Pitch,
    },
    /// List the scale presets and their intervals
    Scales,
}
