use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use quiz_core::model::{Catalog, ClassLevel, QuestionRecord};
use quiz_core::{PoolStats, QuizConfig, build_question_pool};

use super::plan::{SessionBuilder, SessionPlan};
use super::service::{AdvanceTicket, QuizSession, SessionEvent, SubmitOutcome};
use crate::Clock;
use crate::catalog::CatalogService;
use crate::error::SessionError;

/// A catalog together with the question pool expanded from it.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub class_level: ClassLevel,
    pub catalog: Arc<Catalog>,
    pub pool: Arc<[QuestionRecord]>,
    pub stats: PoolStats,
}

impl LoadedCatalog {
    #[must_use]
    pub fn new(class_level: ClassLevel, catalog: Catalog) -> Self {
        let pool: Arc<[QuestionRecord]> = build_question_pool(&catalog).into();
        let stats = PoolStats::of(&pool);
        Self {
            class_level,
            catalog: Arc::new(catalog),
            pool,
            stats,
        }
    }
}

/// Result of answering the current question and waiting out the pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswerResult {
    pub outcome: SubmitOutcome,
    pub event: Option<SessionEvent>,
    pub is_complete: bool,
}

/// Orchestrates catalog loading, session start/restart and the delayed
/// advance after each answer.
#[derive(Clone, Debug)]
pub struct QuizLoopService {
    clock: Clock,
    config: QuizConfig,
    catalogs: CatalogService,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, config: QuizConfig, catalogs: CatalogService) -> Self {
        Self {
            clock,
            config,
            catalogs,
        }
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn catalogs(&self) -> &CatalogService {
        &self.catalogs
    }

    /// Load the catalog for `class_level` and expand its question pool.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Catalog` if the catalog cannot be loaded.
    pub async fn load_catalog(&self, class_level: ClassLevel) -> Result<LoadedCatalog, SessionError> {
        let catalog = self.catalogs.load(class_level).await?;
        let loaded = LoadedCatalog::new(class_level, catalog);
        debug!(
            %class_level,
            identify = loaded.stats.identify_formula,
            terms = loaded.stats.term_meaning,
            "question pool ready"
        );
        Ok(loaded)
    }

    /// Plan a session over `loaded` using thread-local randomness.
    #[must_use]
    pub fn plan(&self, loaded: &LoadedCatalog) -> SessionPlan {
        self.plan_with_rng(loaded, &mut rand::rng())
    }

    pub fn plan_with_rng<R: Rng + ?Sized>(&self, loaded: &LoadedCatalog, rng: &mut R) -> SessionPlan {
        let plan = SessionBuilder::new(&loaded.pool, &self.config).build(rng);
        debug!(
            questions = plan.total(),
            identify = plan.identify_selected,
            terms = plan.term_selected,
            padded = plan.padded_questions,
            "planned session"
        );
        plan
    }

    /// Start a new session on a fresh sample of `loaded`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the pool has no questions.
    pub fn start_session(&self, loaded: &LoadedCatalog) -> Result<QuizSession, SessionError> {
        self.start_session_with_rng(loaded, &mut rand::rng())
    }

    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the pool has no questions.
    pub fn start_session_with_rng<R: Rng + ?Sized>(
        &self,
        loaded: &LoadedCatalog,
        rng: &mut R,
    ) -> Result<QuizSession, SessionError> {
        let plan = self.plan_with_rng(loaded, rng);
        let mut session = QuizSession::new(self.config.thresholds());
        session.start(plan.questions, self.clock.now())?;
        Ok(session)
    }

    /// Reset `session` onto a fresh sample of `loaded`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the pool has no questions.
    pub fn restart(&self, session: &mut QuizSession, loaded: &LoadedCatalog) -> Result<(), SessionError> {
        self.restart_with_rng(session, loaded, &mut rand::rng())
    }

    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the pool has no questions.
    pub fn restart_with_rng<R: Rng + ?Sized>(
        &self,
        session: &mut QuizSession,
        loaded: &LoadedCatalog,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        let plan = self.plan_with_rng(loaded, rng);
        session.restart(plan.questions, self.clock.now())
    }

    /// Sleep for the configured feedback pause.
    pub async fn pause_before_advance(&self) {
        tokio::time::sleep(self.config.advance_delay()).await;
    }

    /// Apply a pending advance, stamping completion with the service clock.
    pub fn advance(&self, session: &mut QuizSession, ticket: AdvanceTicket) -> Option<SessionEvent> {
        session.advance(ticket, self.clock.now())
    }

    /// Answer the current question, wait out the pause, then advance.
    ///
    /// Callers that must stay responsive during the pause (the UI) use
    /// `submit_answer`, `pause_before_advance` and `advance` separately.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is already finished.
    pub async fn answer_current(
        &self,
        session: &mut QuizSession,
        option: &str,
    ) -> Result<SessionAnswerResult, SessionError> {
        if session.is_complete() {
            return Err(SessionError::Completed);
        }

        let outcome = session.submit_answer(option);
        let event = match outcome.ticket() {
            Some(ticket) => {
                self.pause_before_advance().await;
                self.advance(session, ticket)
            }
            None => None,
        };

        Ok(SessionAnswerResult {
            outcome,
            event,
            is_complete: session.is_complete(),
        })
    }
}
