use std::sync::Arc;

use quiz_core::model::{ClassLevel, QuizPreferences, QuizPreferencesDraft};
use storage::repository::QuizPreferencesRepository;
use tracing::debug;

use crate::error::PreferencesServiceError;

#[derive(Clone)]
pub struct PreferencesService {
    repo: Arc<dyn QuizPreferencesRepository>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(repo: Arc<dyn QuizPreferencesRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted preferences (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `PreferencesServiceError` on storage failures.
    pub async fn load(&self) -> Result<QuizPreferences, PreferencesServiceError> {
        let preferences = self.repo.get_preferences().await?;
        Ok(preferences.unwrap_or_default())
    }

    /// Validate and persist new preferences.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesServiceError` if validation fails or persistence fails.
    pub async fn save(
        &self,
        draft: QuizPreferencesDraft,
    ) -> Result<QuizPreferences, PreferencesServiceError> {
        let preferences = draft.validate()?;
        self.repo.save_preferences(&preferences).await?;
        Ok(preferences)
    }

    /// Remember `class_level` as the selected class, keeping other fields.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesServiceError` on storage failures.
    pub async fn select_class(
        &self,
        class_level: ClassLevel,
    ) -> Result<QuizPreferences, PreferencesServiceError> {
        let updated = self.load().await?.with_class_level(class_level);
        self.repo.save_preferences(&updated).await?;
        debug!(%class_level, "saved class selection");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::repository::{InMemoryRepository, StorageError};

    struct BrokenRepository;

    #[async_trait]
    impl QuizPreferencesRepository for BrokenRepository {
        async fn get_preferences(&self) -> Result<Option<QuizPreferences>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn save_preferences(&self, _: &QuizPreferences) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    #[tokio::test]
    async fn load_defaults_when_nothing_saved() {
        let service = PreferencesService::new(Arc::new(InMemoryRepository::new()));
        let prefs = service.load().await.unwrap();
        assert_eq!(prefs.class_level(), ClassLevel::Default);
        assert_eq!(prefs.catalog_base_url(), None);
    }

    #[tokio::test]
    async fn select_class_keeps_base_url() {
        let service = PreferencesService::new(Arc::new(InMemoryRepository::new()));
        service
            .save(
                QuizPreferencesDraft::new(ClassLevel::Class(6))
                    .with_catalog_base_url("https://example.org/catalogs/"),
            )
            .await
            .unwrap();

        let updated = service.select_class(ClassLevel::Class(10)).await.unwrap();
        assert_eq!(updated.class_level(), ClassLevel::Class(10));
        assert_eq!(
            updated.catalog_base_url(),
            Some("https://example.org/catalogs/")
        );
        assert_eq!(service.load().await.unwrap(), updated);
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_before_saving() {
        let service = PreferencesService::new(Arc::new(InMemoryRepository::new()));
        let err = service
            .save(QuizPreferencesDraft::new(ClassLevel::Default).with_catalog_base_url("not a url"))
            .await
            .unwrap_err();
        assert!(matches!(err, PreferencesServiceError::Validation(_)));
        assert_eq!(service.load().await.unwrap(), QuizPreferences::default());
    }

    #[tokio::test]
    async fn storage_failures_propagate() {
        let service = PreferencesService::new(Arc::new(BrokenRepository));
        assert!(matches!(
            service.load().await,
            Err(PreferencesServiceError::Storage(_))
        ));
    }
}
