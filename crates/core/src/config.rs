use std::time::Duration;

use thiserror::Error;

use crate::model::Verdict;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("advance delay must be at most {max_ms} ms")]
    InvalidAdvanceDelay { max_ms: u64 },

    #[error("thresholds must satisfy 0 <= good effort <= ready <= 100")]
    InvalidThresholds,

    #[error("distractor attempts must be > 0")]
    InvalidMaxAttempts,
}

//
// ─── VERDICT THRESHOLDS ────────────────────────────────────────────────────────
//

/// Percentage cut-offs for the final verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictThresholds {
    ready: u32,
    good_effort: u32,
}

impl VerdictThresholds {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThresholds` unless `good_effort <= ready <= 100`.
    pub fn new(ready: u32, good_effort: u32) -> Result<Self, ConfigError> {
        if ready > 100 || good_effort > ready {
            return Err(ConfigError::InvalidThresholds);
        }
        Ok(Self { ready, good_effort })
    }

    #[must_use]
    pub fn ready(&self) -> u32 {
        self.ready
    }

    #[must_use]
    pub fn good_effort(&self) -> u32 {
        self.good_effort
    }

    #[must_use]
    pub fn verdict_for(&self, percentage: u32) -> Verdict {
        if percentage >= self.ready {
            Verdict::Ready
        } else if percentage >= self.good_effort {
            Verdict::GoodEffort
        } else {
            Verdict::KeepPracticing
        }
    }
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            ready: 80,
            good_effort: 50,
        }
    }
}

//
// ─── DISTRACTORS ───────────────────────────────────────────────────────────────
//

/// Bounds for the retry-until-unique distractor sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistractorConfig {
    max_attempts: u32,
}

impl DistractorConfig {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 64;

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMaxAttempts` if `max_attempts` is zero.
    pub fn new(max_attempts: u32) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts);
        }
        Ok(Self { max_attempts })
    }

    /// Candidate draws allowed per sourcing phase.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for DistractorConfig {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

//
// ─── QUIZ CONFIG ───────────────────────────────────────────────────────────────
//

/// Session-level knobs shared by the plan builder, the session loop and the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    question_count: u32,
    advance_delay: Duration,
    badge_duration: Duration,
    thresholds: VerdictThresholds,
    distractors: DistractorConfig,
}

impl QuizConfig {
    /// Longest accepted pause between an answer and the next question.
    pub const MAX_ADVANCE_DELAY: Duration = Duration::from_secs(10);

    /// Full-length quiz: up to 30 questions, 1.4 s feedback pause.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            question_count: 30,
            advance_delay: Duration::from_millis(1400),
            badge_duration: Duration::from_millis(1400),
            thresholds: VerdictThresholds::default(),
            distractors: DistractorConfig::default(),
        }
    }

    /// Short quiz: 12 questions, 1.5 s feedback pause.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            question_count: 12,
            advance_delay: Duration::from_millis(1500),
            badge_duration: Duration::from_millis(1600),
            ..Self::standard()
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if the count is zero or the delay exceeds
    /// [`QuizConfig::MAX_ADVANCE_DELAY`].
    pub fn new(
        question_count: u32,
        advance_delay: Duration,
        thresholds: VerdictThresholds,
        distractors: DistractorConfig,
    ) -> Result<Self, ConfigError> {
        validate_count(question_count)?;
        validate_delay(advance_delay)?;
        Ok(Self {
            question_count,
            advance_delay,
            badge_duration: advance_delay,
            thresholds,
            distractors,
        })
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidQuestionCount` if `count` is zero.
    pub fn with_question_count(mut self, count: u32) -> Result<Self, ConfigError> {
        validate_count(count)?;
        self.question_count = count;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidAdvanceDelay` if `delay` is too long.
    pub fn with_advance_delay(mut self, delay: Duration) -> Result<Self, ConfigError> {
        validate_delay(delay)?;
        self.advance_delay = delay;
        Ok(self)
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn advance_delay(&self) -> Duration {
        self.advance_delay
    }

    #[must_use]
    pub fn badge_duration(&self) -> Duration {
        self.badge_duration
    }

    #[must_use]
    pub fn thresholds(&self) -> VerdictThresholds {
        self.thresholds
    }

    #[must_use]
    pub fn distractors(&self) -> DistractorConfig {
        self.distractors
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self::standard()
    }
}

fn validate_count(count: u32) -> Result<(), ConfigError> {
    if count == 0 {
        return Err(ConfigError::InvalidQuestionCount);
    }
    Ok(())
}

fn validate_delay(delay: Duration) -> Result<(), ConfigError> {
    if delay > QuizConfig::MAX_ADVANCE_DELAY {
        return Err(ConfigError::InvalidAdvanceDelay {
            max_ms: u64::try_from(QuizConfig::MAX_ADVANCE_DELAY.as_millis()).unwrap_or(u64::MAX),
        });
    }
    Ok(())
}
