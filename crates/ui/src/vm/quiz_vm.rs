use quiz_core::model::{ClassLevel, QuestionKind};
use services::{
    AdvanceTicket, ExportDocument, ExportFormat, LoadedCatalog, QuizLoopService, QuizSession,
    SessionError, SubmitOutcome,
};

use super::time_fmt::format_elapsed;
use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    Correct,
    Wrong,
    Muted,
}

impl OptionState {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            OptionState::Idle => "quiz-option",
            OptionState::Correct => "quiz-option quiz-option--correct",
            OptionState::Wrong => "quiz-option quiz-option--wrong",
            OptionState::Muted => "quiz-option quiz-option--muted",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub text: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub number_label: String,
    pub kind_label: &'static str,
    pub chapter: String,
    pub prompt: String,
    pub hint: Option<String>,
    pub options: Vec<OptionVm>,
    /// Set when the catalog was too small to supply real distractors.
    pub placeholder_note: Option<String>,
    /// An answer was given and the advance is pending.
    pub locked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarVm {
    pub class_level: ClassLevel,
    /// Catalog standard (or the class label) and chapter count.
    pub catalog_label: String,
    pub catalog_notes: Option<String>,
    pub progress_label: String,
    pub progress_percent: u32,
    pub score_label: String,
    pub score_percent: u32,
    pub pool_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalVm {
    pub score_label: String,
    pub percentage_label: String,
    pub message: &'static str,
    pub elapsed_label: Option<String>,
}

#[must_use]
pub fn class_option_label(level: ClassLevel) -> String {
    match level {
        ClassLevel::Default => "Default".to_string(),
        ClassLevel::Class(n) => format!("Class {n}"),
    }
}

/// Presentation state for one loaded catalog and its running session.
pub struct QuizVm {
    loaded: LoadedCatalog,
    session: QuizSession,
}

impl QuizVm {
    #[must_use]
    pub fn new(loaded: LoadedCatalog, session: QuizSession) -> Self {
        Self { loaded, session }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn class_level(&self) -> ClassLevel {
        self.loaded.class_level
    }

    #[must_use]
    pub fn question(&self) -> Option<QuestionVm> {
        let question = self.session.current_question()?;
        let record = question.record();
        let pending = self.session.pending_answer();

        let options = question
            .options()
            .iter()
            .map(|text| {
                let state = match pending {
                    None => OptionState::Idle,
                    Some(_) if question.is_correct(text) => OptionState::Correct,
                    Some(answer) if answer.selected_option == *text => OptionState::Wrong,
                    Some(_) => OptionState::Muted,
                };
                OptionVm {
                    text: text.clone(),
                    state,
                }
            })
            .collect();

        let placeholder_note = match question.placeholders() {
            0 => None,
            1 => Some("1 option is a placeholder: this catalog is too small.".to_string()),
            n => Some(format!("{n} options are placeholders: this catalog is too small.")),
        };

        let hint = Some(record.hint().trim())
            .filter(|hint| !hint.is_empty())
            .map(str::to_string);

        Some(QuestionVm {
            number_label: format!(
                "Question {} / {}",
                self.session.position() + 1,
                self.session.total()
            ),
            kind_label: match record.kind() {
                QuestionKind::IdentifyFormula => "Identify the formula",
                QuestionKind::TermMeaning => "Term meaning",
            },
            chapter: record.chapter().to_string(),
            prompt: record.prompt(),
            hint,
            options,
            placeholder_note,
            locked: pending.is_some(),
        })
    }

    #[must_use]
    pub fn sidebar(&self) -> SidebarVm {
        let progress = self.session.progress();
        let catalog = &self.loaded.catalog;
        let standard = catalog
            .standard()
            .map_or_else(|| class_option_label(self.loaded.class_level), str::to_string);
        let chapters = catalog.chapters().len();
        let chapter_word = if chapters == 1 { "chapter" } else { "chapters" };
        SidebarVm {
            class_level: self.loaded.class_level,
            catalog_label: format!("{standard} · Loaded: {chapters} {chapter_word}"),
            catalog_notes: catalog.notes().map(str::to_string),
            progress_label: format!("{} / {}", progress.position.min(progress.total), progress.total),
            progress_percent: progress.progress_percent,
            score_label: format!("{} / {}", progress.score, progress.total),
            score_percent: progress.score_percent,
            pool_label: format!(
                "{} formulas · {} term questions",
                self.loaded.stats.identify_formula, self.loaded.stats.term_meaning
            ),
        }
    }

    #[must_use]
    pub fn final_screen(&self) -> Option<FinalVm> {
        let result = self.session.result()?;
        let elapsed_label = self
            .session
            .started_at()
            .zip(self.session.completed_at())
            .map(|(started, completed)| format_elapsed(completed - started));
        Some(FinalVm {
            score_label: format!("{} / {}", result.score, result.total),
            percentage_label: format!("{}%", result.percentage),
            message: result.verdict.message(),
            elapsed_label,
        })
    }

    /// Submit `option`; returns whether it was correct and the pending advance.
    pub fn submit(&mut self, option: &str) -> Option<(bool, AdvanceTicket)> {
        match self.session.submit_answer(option) {
            SubmitOutcome::Recorded { correct, ticket } => Some((correct, ticket)),
            SubmitOutcome::Ignored => None,
        }
    }

    /// Apply a pending advance. Stale tickets are ignored.
    pub fn advance(&mut self, quiz_loop: &QuizLoopService, ticket: AdvanceTicket) -> bool {
        quiz_loop.advance(&mut self.session, ticket).is_some()
    }

    /// # Errors
    ///
    /// Returns `ViewError::EmptyCatalog` if the pool has no questions.
    pub fn restart(&mut self, quiz_loop: &QuizLoopService) -> Result<(), ViewError> {
        quiz_loop
            .restart(&mut self.session, &self.loaded)
            .map_err(map_session_error)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if serialization fails.
    pub fn export(&self, format: ExportFormat) -> Result<String, ViewError> {
        ExportDocument::from_session(&self.session)
            .render(format)
            .map_err(|_| ViewError::Unknown)
    }
}

fn map_session_error(err: SessionError) -> ViewError {
    match err {
        SessionError::Empty => ViewError::EmptyCatalog,
        SessionError::Catalog(_) => ViewError::CatalogUnavailable,
        _ => ViewError::Unknown,
    }
}

/// Load the catalog for `class_level` and start a fresh session on it.
///
/// # Errors
///
/// Returns `ViewError::CatalogUnavailable` if the catalog cannot be loaded
/// and `ViewError::EmptyCatalog` if it yields no questions.
pub async fn load_quiz(
    quiz_loop: &QuizLoopService,
    class_level: ClassLevel,
) -> Result<QuizVm, ViewError> {
    let loaded = quiz_loop
        .load_catalog(class_level)
        .await
        .map_err(map_session_error)?;
    let session = quiz_loop.start_session(&loaded).map_err(map_session_error)?;
    Ok(QuizVm::new(loaded, session))
}
