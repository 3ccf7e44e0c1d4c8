//! Interactive state for the quiz and learn loops.
//!
//! Each line the user types is parsed into a [`Command`] and applied with
//! [`TrainerApp::update`], which plays audio and prints the result.

use log::{info, warn};

use ear_core::config::{MAX_SUSTAIN, MIN_SUSTAIN};
use ear_core::{
    AnswerOutcome, AudioSink, Direction, EnabledIntervals, IntervalKey, IntervalQuestion, PlaybackMode,
    QuizSession, TheoryError,
};

use crate::synth::Output;

/// Which loop the app is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Quiz,
    Learn,
}

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Next,
    Replay,
    PlaybackMode(PlaybackMode),
    /// Seconds each note rings, already range-checked
    Sustain(f32),
    Direction(Direction),
    ToggleLock,
    /// Answer, compare, or switch interval depending on the mode
    Interval(IntervalKey),
    Score,
    Help,
    Quit,
}

impl Command {
    /// Parses a line. Interval abbreviations are case-sensitive ("m3" vs "M3").
    pub fn parse(line: &str) -> Result<Self, TheoryError> {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("sustain") {
            return parse_sustain(value.trim()).map(Command::Sustain);
        }
        let command = match line {
            "" | "n" | "next" => Command::Next,
            "r" | "replay" => Command::Replay,
            "m" | "melodic" => Command::PlaybackMode(PlaybackMode::Melodic),
            "h" | "harmonic" => Command::PlaybackMode(PlaybackMode::Harmonic),
            "l" | "lock" => Command::ToggleLock,
            "s" | "score" => Command::Score,
            "?" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => match line.parse::<IntervalKey>() {
                Ok(key) => Command::Interval(key),
                Err(e) => line
                    .parse::<Direction>()
                    .map(Command::Direction)
                    .map_err(|_| e)?,
            },
        };
        Ok(command)
    }
}

fn parse_sustain(value: &str) -> Result<f32, TheoryError> {
    let seconds: f32 = value
        .parse()
        .map_err(|_| TheoryError::UnknownSustain(value.to_string()))?;
    if !(MIN_SUSTAIN..=MAX_SUSTAIN).contains(&seconds) {
        return Err(TheoryError::InvalidSustain(seconds));
    }
    Ok(seconds)
}

/// Whether the loop should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct TrainerApp {
    mode: Mode,
    session: QuizSession,
    output: Output,
    rng: fastrand::Rng,
}

impl TrainerApp {
    pub fn new(mode: Mode, session: QuizSession, mut output: Output, rng: fastrand::Rng) -> Self {
        output.set_sustain_duration(session.config().sustain_duration);
        Self {
            mode,
            session,
            output,
            rng,
        }
    }

    /// Generates and plays the first question.
    pub fn start(&mut self) -> Flow {
        self.print_help();
        self.next()
    }

    pub fn update(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => {
                self.print_score();
                return Flow::Stop;
            }
            Command::Next => {
                if self.mode == Mode::Quiz && self.session.question().is_some() && !self.session.is_answered() {
                    println!("Answer first, or type r to hear it again.");
                    return Flow::Continue;
                }
                return self.next();
            }
            Command::Replay => self.replay(),
            Command::PlaybackMode(mode) => {
                self.session.config_mut().playback_mode = mode;
                println!("Playback: {}", mode);
                self.replay();
            }
            Command::Sustain(seconds) => {
                self.session.config_mut().sustain_duration = seconds;
                self.output.set_sustain_duration(seconds);
                println!("Sustain: {:.1}s", seconds);
                self.replay();
            }
            Command::Direction(direction) => {
                self.session.config_mut().direction = direction;
                println!("Direction: {}", direction);
                if self.mode == Mode::Learn {
                    return self.next();
                }
            }
            Command::ToggleLock => self.toggle_lock(),
            Command::Interval(key) => match self.mode {
                Mode::Quiz => self.answer_or_compare(key),
                Mode::Learn => {
                    self.session.config_mut().intervals = EnabledIntervals::only(key);
                    return self.next();
                }
            },
            Command::Score => self.print_score(),
            Command::Help => self.print_help(),
        }
        Flow::Continue
    }

    fn next(&mut self) -> Flow {
        match self.session.next_question(&mut self.rng).cloned() {
            Some(question) => {
                self.announce(&question);
                self.play(&question);
                Flow::Continue
            }
            None => {
                warn!("[MAIN] No question can be generated from the current settings");
                println!("No interval can be played with these settings. Select at least one interval.");
                Flow::Stop
            }
        }
    }

    fn announce(&self, question: &IntervalQuestion) {
        match self.mode {
            Mode::Quiz => {
                let choices: Vec<String> = self.session.choices().iter().map(|k| k.to_string()).collect();
                println!("\nWhich interval? [{}]", choices.join(" "));
            }
            Mode::Learn => println!("\n{}", question),
        }
    }

    fn play(&mut self, question: &IntervalQuestion) {
        let mode = self.session.config().playback_mode;
        self.output
            .play_interval(question.base.number, question.target.number, mode);
    }

    fn replay(&mut self) {
        if let Some(question) = self.session.question().cloned() {
            self.play(&question);
        }
    }

    fn answer_or_compare(&mut self, key: IntervalKey) {
        if self.session.is_answered() {
            // Let the learner hear any other choice from the same base
            let Some(question) = self.session.question() else {
                return;
            };
            let base = question.base.number;
            match self.session.comparison_target(key) {
                Some(target) => {
                    println!("{} from {}: {}", key.name(), question.base, target);
                    let mode = self.session.config().playback_mode;
                    self.output.play_interval(base, target.number, mode);
                }
                None => println!("{} from {} is out of range.", key.name(), question.base),
            }
            return;
        }

        match self.session.answer(key) {
            AnswerOutcome::Correct => println!("Correct!"),
            AnswerOutcome::Incorrect { expected } => println!("Not quite: it was a {}.", expected.name()),
            AnswerOutcome::Rejected => {
                println!("{} is not one of the choices.", key);
                return;
            }
        }
        if let Some(question) = self.session.question() {
            println!("{}", question);
        }
        self.print_score();
        println!("Enter for the next question, or an interval to compare it from the same base.");
    }

    fn toggle_lock(&mut self) {
        let Some(base) = self.session.question().map(|q| q.base.clone()) else {
            return;
        };
        match self.session.toggle_locked_base(&base) {
            Some(_) => {
                println!("Base locked to {}", base);
                self.output.play_note(base.number);
            }
            None => println!("Base unlocked"),
        }
    }

    fn print_score(&self) {
        if self.mode != Mode::Quiz {
            return;
        }
        let score = self.session.score();
        println!("Score: {}/{} ({}%)", score.correct, score.total, score.percentage());
        info!("[MAIN] Score {}/{}", score.correct, score.total);
    }

    fn print_help(&self) {
        match self.mode {
            Mode::Quiz => println!(
                "Type an interval abbreviation to answer. r replay, m/h melodic/harmonic,\n\
                 sustain <seconds>, s score, q quit."
            ),
            Mode::Learn => println!(
                "Enter for a new example. r replay, l lock/unlock base, m/h melodic/harmonic,\n\
                 up/down/both direction, sustain <seconds>, an abbreviation to switch interval, q quit."
            ),
        }
    }
}
