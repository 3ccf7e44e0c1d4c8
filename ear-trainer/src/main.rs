//! # Ear Trainer - Terminal Interval Training
//!
//! A thin front end over `ear-core`. It loads practice settings, opens an
//! audio output, and runs one of the interactive loops (quiz or learn) or a
//! one-shot scale demonstration.
//!
//! ## Architecture
//! - **Main Thread**: reads commands from stdin and drives the quiz session
//! - **Audio Thread**: CPAL output callback rendering sine tones
//! - **Communication**: crossbeam channel carrying timed note events

mod app;
mod cli;
mod synth;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use std::fs::File;
use std::io::{self, BufRead, Read, Write};
use std::path::Path;
use std::time::Duration;

use ear_core::playback::scale_schedule;
use ear_core::scales::scale_pitches;
use ear_core::{AudioSink, EnabledIntervals, PracticeConfig, QuizSession, ScaleKey};

use app::{Command, Flow, Mode, TrainerApp};
use cli::{Cli, Commands, PracticeArgs};
use synth::Output;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = resolve_config(&cli.practice)?;
    info!("[MAIN] Practice settings: {:?}", config);

    match cli.command {
        Commands::Scales => {
            list_scales(&config);
            Ok(())
        }
        Commands::Scale { scale, tonic } => {
            let mut output = Output::open(cli.silent);
            output.set_sustain_duration(config.sustain_duration);
            play_scale(&mut output, scale, tonic.number)
        }
        Commands::Quiz => {
            if !config.intervals.has_selection() {
                anyhow::bail!("Select at least one interval to start a quiz");
            }
            run_loop(Mode::Quiz, config, cli.silent)
        }
        Commands::Learn { interval } => {
            let config = PracticeConfig {
                intervals: EnabledIntervals::only(interval),
                ..config
            };
            run_loop(Mode::Learn, config, cli.silent)
        }
    }
}

/// Loads the config file, if any, and applies command-line overrides.
fn resolve_config(args: &PracticeArgs) -> Result<PracticeConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PracticeConfig::default(),
    };

    if let Some(scale) = args.preset {
        config.apply_scale(scale);
    }
    if let Some(keys) = &args.intervals {
        config.intervals = EnabledIntervals::from_keys(keys.iter().copied());
    }
    if let Some(direction) = args.direction {
        config.direction = direction;
    }
    if let Some(mode) = args.mode {
        config.playback_mode = mode;
    }
    if let Some(sustain) = args.sustain {
        config.sustain_duration = sustain;
    }
    if let Some(pitch) = &args.lock {
        config.locked_base = Some(pitch.number);
    }

    config.validate()?;
    Ok(config)
}

/// Loads practice settings from a JSON file.
///
/// Fields missing from the file keep their defaults.
fn load_config(path: &Path) -> Result<PracticeConfig> {
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut data = String::new();
    file.read_to_string(&mut data)?;
    let config: PracticeConfig =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    info!("[MAIN] Loaded practice config from {}", path.display());
    Ok(config)
}

fn run_loop(mode: Mode, config: PracticeConfig, silent: bool) -> Result<()> {
    info!("[MAIN] Starting {:?} ({} selection)", mode, config.scale().name());
    let output = Output::open(silent);
    let mut app = TrainerApp::new(mode, QuizSession::new(config), output, fastrand::Rng::new());

    if app.start() == Flow::Stop {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line.context("reading input")?;
        match Command::parse(&line) {
            Ok(command) => {
                if app.update(command) == Flow::Stop {
                    break;
                }
            }
            Err(e) => println!("{} (type ? for help)", e),
        }
        stdout.flush()?;
    }
    Ok(())
}

fn play_scale(output: &mut Output, scale: ScaleKey, tonic: i32) -> Result<()> {
    let pitches = scale_pitches(scale, tonic)
        .with_context(|| format!("{} has no fixed step pattern", scale.name()))?;
    let names: Vec<&str> = pitches.iter().map(|p| p.name.as_str()).collect();
    println!("{}: {}", scale.name(), names.join(" "));

    let events = scale_schedule(&pitches, output.sustain());
    output.play_events(&events);

    // Keep the stream alive until the last note has rung out
    let end = events.last().map_or(0.0, |e| e.onset + e.duration);
    if let Output::Tone(_) = output {
        std::thread::sleep(Duration::from_secs_f32(end));
    }
    Ok(())
}

fn list_scales(config: &PracticeConfig) {
    let current = config.scale();
    for key in ScaleKey::NAMED {
        let scale = key.scale();
        let intervals: Vec<&str> = scale.intervals.iter().map(|k| k.abbrev()).collect();
        let marker = if key == current { "*" } else { " " };
        println!("{} {:<15} {:<14} {}", marker, key.as_str(), scale.name, intervals.join(" "));
    }
    if current == ScaleKey::Custom {
        let enabled: Vec<String> = config.intervals.enabled_keys().iter().map(|k| k.to_string()).collect();
        println!("* custom          [{}]", enabled.join(" "));
    }
}
