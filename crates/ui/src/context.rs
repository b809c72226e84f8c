use std::path::{Path, PathBuf};
use std::sync::Arc;

use quiz_core::model::ClassLevel;
use services::{PreferencesService, QuizLoopService};

use crate::platform::FileOpenerRef;

pub trait UiApp: Send + Sync {
    /// Class selected at launch, from flags or stored preferences.
    fn initial_class(&self) -> ClassLevel;
    /// Directory exported results are written to.
    fn export_dir(&self) -> PathBuf;

    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn preferences(&self) -> Arc<PreferencesService>;
    fn file_opener(&self) -> FileOpenerRef;
}

#[derive(Clone)]
pub struct AppContext {
    initial_class: ClassLevel,
    export_dir: PathBuf,

    quiz_loop: Arc<QuizLoopService>,
    preferences: Arc<PreferencesService>,
    file_opener: FileOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            initial_class: app.initial_class(),
            export_dir: app.export_dir(),
            quiz_loop: app.quiz_loop(),
            preferences: app.preferences(),
            file_opener: app.file_opener(),
        }
    }

    #[must_use]
    pub fn initial_class(&self) -> ClassLevel {
        self.initial_class
    }

    #[must_use]
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }

    #[must_use]
    pub fn file_opener(&self) -> FileOpenerRef {
        Arc::clone(&self.file_opener)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
