//! # Quiz Module
//!
//! Session state for the multiple-choice quiz and the interval explorer:
//! the current question, whether it has been answered, the running score
//! and the locked base pitch. Generation itself stays in [`crate::question`];
//! this module only threads the caller-owned state through it.

use log::{debug, info};

use crate::config::PracticeConfig;
use crate::intervals::IntervalKey;
use crate::notes::{Pitch, is_in_range};
use crate::question::{IntervalQuestion, QuestionGenerator};
use crate::random::RandomSource;

/// Correct answers out of answered questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub correct: u32,
    pub total: u32,
}

impl Score {
    /// Percentage correct, rounded to the nearest integer. 0 before any answer.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.correct as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// Outcome of submitting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect { expected: IntervalKey },
    /// No open question, already answered, or the key is not a choice
    Rejected,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    config: PracticeConfig,
    generator: QuestionGenerator,
    question: Option<IntervalQuestion>,
    answered: bool,
    score: Score,
}

impl QuizSession {
    pub fn new(config: PracticeConfig) -> Self {
        Self::with_generator(config, QuestionGenerator::default())
    }

    pub fn with_generator(config: PracticeConfig, generator: QuestionGenerator) -> Self {
        Self {
            config,
            generator,
            question: None,
            answered: false,
            score: Score::default(),
        }
    }

    pub fn config(&self) -> &PracticeConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PracticeConfig {
        &mut self.config
    }

    pub fn question(&self) -> Option<&IntervalQuestion> {
        self.question.as_ref()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    /// The answer choices: enabled intervals in training order.
    pub fn choices(&self) -> Vec<IntervalKey> {
        self.config.intervals.enabled_keys()
    }

    /// Replaces the current question with a fresh one.
    ///
    /// Returns `None`, and clears the current question, when no question can
    /// be generated from the current settings.
    pub fn next_question<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<&IntervalQuestion> {
        let locked = self.config.locked_pitch();
        self.question = self.generator.generate(
            &self.config.intervals,
            self.config.direction,
            locked.as_ref(),
            rng,
        );
        self.answered = false;
        if let Some(q) = &self.question {
            debug!("[QUIZ] New question: {}", q);
        }
        self.question.as_ref()
    }

    /// Scores an answer to the current question. Each question scores once.
    pub fn answer(&mut self, key: IntervalKey) -> AnswerOutcome {
        let Some(question) = &self.question else {
            return AnswerOutcome::Rejected;
        };
        if self.answered || !self.config.intervals.is_enabled(key) {
            return AnswerOutcome::Rejected;
        }

        self.answered = true;
        self.score.total += 1;
        let outcome = if key == question.interval_key {
            self.score.correct += 1;
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect {
                expected: question.interval_key,
            }
        };
        info!(
            "[QUIZ] Answered {} for {}: {:?} ({}/{})",
            key, question.interval_key, outcome, self.score.correct, self.score.total
        );
        outcome
    }

    /// After answering, the pitch `key` would reach from the question's base.
    ///
    /// Uses the question's direction so any choice can be compared against
    /// the one that was asked. `None` before answering or when the target
    /// would fall outside the playable range.
    pub fn comparison_target(&self, key: IntervalKey) -> Option<Pitch> {
        let question = self.question.as_ref().filter(|_| self.answered)?;
        key.target_from(question.base.number, question.ascending)
            .filter(|target| is_in_range(*target))
            .map(Pitch::new)
    }

    /// Locks `pitch` as the base, or unlocks if it is already the locked one.
    ///
    /// Returns the new locked base.
    pub fn toggle_locked_base(&mut self, pitch: &Pitch) -> Option<i32> {
        self.config.locked_base = match self.config.locked_base {
            Some(current) if current == pitch.number => None,
            _ => Some(pitch.number),
        };
        info!("[QUIZ] Locked base: {:?}", self.config.locked_base.map(Pitch::new).map(|p| p.name));
        self.config.locked_base
    }

    pub fn reset_score(&mut self) {
        self.score = Score::default();
    }
}
