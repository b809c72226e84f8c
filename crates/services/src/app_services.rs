use std::sync::Arc;

use quiz_core::QuizConfig;
use quiz_core::model::{ClassLevel, QuizPreferences};
use storage::repository::Storage;

use crate::Clock;
use crate::catalog::{CatalogService, CatalogSource};
use crate::error::AppServicesError;
use crate::preferences_service::PreferencesService;
use crate::sessions::QuizLoopService;

/// Launch-time overrides, typically from flags or the environment.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Takes precedence over a base URL stored in preferences.
    pub catalog_source: Option<CatalogSource>,
    /// Takes precedence over the stored class selection.
    pub class_level: Option<ClassLevel>,
}

/// Assembles app-facing services and resolves the initial class and source.
#[derive(Clone)]
pub struct AppServices {
    initial_class: ClassLevel,
    preferences_snapshot: QuizPreferences,
    quiz_loop: Arc<QuizLoopService>,
    preferences: Arc<PreferencesService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or preference
    /// loading fails, or if the stored catalog URL is unusable.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: QuizConfig,
        options: LaunchOptions,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, clock, config, options).await
    }

    /// Build services on top of an existing storage bundle.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if preference loading fails or the stored
    /// catalog URL is unusable.
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        config: QuizConfig,
        options: LaunchOptions,
    ) -> Result<Self, AppServicesError> {
        let preferences = Arc::new(PreferencesService::new(Arc::clone(&storage.preferences)));
        let snapshot = preferences.load().await?;

        let source = match options.catalog_source {
            Some(source) => source,
            None => CatalogSource::from_preferences(&snapshot, CatalogSource::Builtin)?,
        };
        let initial_class = options.class_level.unwrap_or(snapshot.class_level());

        let quiz_loop = Arc::new(QuizLoopService::new(
            clock,
            config,
            CatalogService::new(source),
        ));

        Ok(Self {
            initial_class,
            preferences_snapshot: snapshot,
            quiz_loop,
            preferences,
        })
    }

    #[must_use]
    pub fn initial_class(&self) -> ClassLevel {
        self.initial_class
    }

    /// Preferences as they were when the services were assembled.
    #[must_use]
    pub fn preferences_snapshot(&self) -> &QuizPreferences {
        &self.preferences_snapshot
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuizPreferencesDraft;
    use quiz_core::time::fixed_clock;
    use storage::repository::QuizPreferencesRepository;

    #[tokio::test]
    async fn stored_preferences_drive_class_and_source() {
        let storage = Storage::in_memory();
        let stored = QuizPreferencesDraft::new(ClassLevel::Class(9))
            .with_catalog_base_url("https://example.org/catalogs/")
            .validate()
            .unwrap();
        storage.preferences.save_preferences(&stored).await.unwrap();

        let services = AppServices::from_storage(
            storage,
            fixed_clock(),
            QuizConfig::standard(),
            LaunchOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(services.initial_class(), ClassLevel::Class(9));
        assert!(matches!(
            services.quiz_loop().catalogs().source(),
            CatalogSource::Http(_)
        ));
    }

    #[tokio::test]
    async fn launch_options_override_preferences() {
        let storage = Storage::in_memory();
        let options = LaunchOptions {
            catalog_source: Some(CatalogSource::Builtin),
            class_level: Some(ClassLevel::Class(11)),
        };

        let services =
            AppServices::from_storage(storage, fixed_clock(), QuizConfig::quick(), options)
                .await
                .unwrap();

        assert_eq!(services.initial_class(), ClassLevel::Class(11));
        assert_eq!(services.quiz_loop().config().question_count(), 12);
        assert_eq!(
            services.preferences_snapshot().class_level(),
            ClassLevel::Default
        );
    }
}
