use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use quiz_core::VerdictThresholds;
use quiz_core::model::{AnswerRecord, PreparedQuestion, QuizResult};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── STATE & EVENTS ────────────────────────────────────────────────────────────
//

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    /// The current question is answered and an advance is pending.
    Answered,
    Completed,
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    QuestionChanged { position: usize },
    Answered { position: usize, correct: bool },
    Completed { score: usize, total: usize },
}

/// Source of session generations, unique across every session in the process.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Handle for the single pending advance after an answer.
///
/// Tickets issued by another session, or before a restart, are stale and
/// ignored by [`QuizSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    generation: u64,
    position: usize,
}

impl AdvanceTicket {
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Result of [`QuizSession::submit_answer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Recorded {
        correct: bool,
        ticket: AdvanceTicket,
    },
    /// The session was not awaiting an answer; nothing changed.
    Ignored,
}

impl SubmitOutcome {
    #[must_use]
    pub fn ticket(&self) -> Option<AdvanceTicket> {
        match self {
            Self::Recorded { ticket, .. } => Some(*ticket),
            Self::Ignored => None,
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One run through a prepared question list.
///
/// All mutation goes through `start`, `submit_answer`, `advance` and
/// `restart`. Answers only count while the session is `InProgress`, so a
/// second click on the same question is a no-op.
pub struct QuizSession {
    questions: Vec<PreparedQuestion>,
    position: usize,
    score: usize,
    history: Vec<AnswerRecord>,
    state: SessionState,
    generation: u64,
    thresholds: VerdictThresholds,
    events: VecDeque<SessionEvent>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    #[must_use]
    pub fn new(thresholds: VerdictThresholds) -> Self {
        Self {
            questions: Vec::new(),
            position: 0,
            score: 0,
            history: Vec::new(),
            state: SessionState::NotStarted,
            generation: next_generation(),
            thresholds,
            events: VecDeque::new(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Begin the quiz on `questions`.
    ///
    /// `started_at` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `questions` is empty and
    /// `SessionError::AlreadyStarted` unless the session is `NotStarted`.
    pub fn start(
        &mut self,
        questions: Vec<PreparedQuestion>,
        started_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.state != SessionState::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        self.questions = questions;
        self.position = 0;
        self.score = 0;
        self.history.clear();
        self.started_at = Some(started_at);
        self.completed_at = None;
        self.state = SessionState::InProgress;
        self.events
            .push_back(SessionEvent::QuestionChanged { position: 0 });
        Ok(())
    }

    /// Throw away all progress and start again on a fresh question list.
    ///
    /// Any outstanding [`AdvanceTicket`] becomes stale.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `questions` is empty; the session is
    /// left `NotStarted` in that case.
    pub fn restart(
        &mut self,
        questions: Vec<PreparedQuestion>,
        started_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.generation = next_generation();
        self.questions.clear();
        self.position = 0;
        self.score = 0;
        self.history.clear();
        self.events.clear();
        self.started_at = None;
        self.completed_at = None;
        self.state = SessionState::NotStarted;
        self.start(questions, started_at)
    }

    /// Record `option` as the answer to the current question.
    pub fn submit_answer(&mut self, option: &str) -> SubmitOutcome {
        if self.state != SessionState::InProgress {
            return SubmitOutcome::Ignored;
        }
        let Some(question) = self.questions.get(self.position) else {
            return SubmitOutcome::Ignored;
        };

        let record = AnswerRecord::new(self.position, question, option);
        let correct = record.was_correct;
        if correct {
            self.score += 1;
        }
        self.history.push(record);
        self.state = SessionState::Answered;
        self.events.push_back(SessionEvent::Answered {
            position: self.position,
            correct,
        });

        SubmitOutcome::Recorded {
            correct,
            ticket: AdvanceTicket {
                generation: self.generation,
                position: self.position,
            },
        }
    }

    /// Move past the answered question.
    ///
    /// Returns the resulting event, or `None` when the ticket is stale or no
    /// advance is pending.
    pub fn advance(&mut self, ticket: AdvanceTicket, at: DateTime<Utc>) -> Option<SessionEvent> {
        if self.state != SessionState::Answered
            || ticket.generation != self.generation
            || ticket.position != self.position
        {
            return None;
        }

        self.position += 1;
        let event = if self.position >= self.questions.len() {
            self.state = SessionState::Completed;
            self.completed_at = Some(at);
            SessionEvent::Completed {
                score: self.score,
                total: self.total(),
            }
        } else {
            self.state = SessionState::InProgress;
            SessionEvent::QuestionChanged {
                position: self.position,
            }
        };
        self.events.push_back(event.clone());
        Some(event)
    }

    /// Take all events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&PreparedQuestion> {
        match self.state {
            SessionState::InProgress | SessionState::Answered => self.questions.get(self.position),
            SessionState::NotStarted | SessionState::Completed => None,
        }
    }

    /// The answer given to the current question while an advance is pending.
    #[must_use]
    pub fn pending_answer(&self) -> Option<&AnswerRecord> {
        if self.state == SessionState::Answered {
            self.history.last()
        } else {
            None
        }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn questions(&self) -> &[PreparedQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Final figures, available once the session is complete.
    #[must_use]
    pub fn result(&self) -> Option<QuizResult> {
        self.is_complete()
            .then(|| QuizResult::new(self.score, self.total(), self.thresholds))
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::new(
            self.position,
            self.total(),
            self.history.len(),
            self.score,
            self.is_complete(),
        )
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("state", &self.state)
            .field("questions_len", &self.questions.len())
            .field("position", &self.position)
            .field("score", &self.score)
            .field("history_len", &self.history.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
