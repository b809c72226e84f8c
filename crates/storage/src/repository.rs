use async_trait::async_trait;
use quiz_core::model::{ClassLevel, QuizPreferences, QuizPreferencesDraft};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of the quiz preferences row.
///
/// Keeps the class level as its string form so adapters never depend on
/// the enum layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesRecord {
    pub class_level: String,
    pub catalog_base_url: Option<String>,
}

impl PreferencesRecord {
    #[must_use]
    pub fn from_preferences(preferences: &QuizPreferences) -> Self {
        Self {
            class_level: preferences.class_level().to_string(),
            catalog_base_url: preferences.catalog_base_url().map(str::to_owned),
        }
    }

    /// Convert the record back into validated preferences.
    ///
    /// An unrecognised class level falls back to the default catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored base URL is invalid.
    pub fn into_preferences(self) -> Result<QuizPreferences, StorageError> {
        let draft = QuizPreferencesDraft {
            class_level: ClassLevel::from_stored(Some(&self.class_level)),
            catalog_base_url: self.catalog_base_url,
        };
        QuizPreferences::from_persisted(draft)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

/// Repository contract for the locally stored quiz preferences.
#[async_trait]
pub trait QuizPreferencesRepository: Send + Sync {
    /// Fetch the stored preferences, if any were saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_preferences(&self) -> Result<Option<QuizPreferences>, StorageError>;

    /// Persist preferences, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the preferences cannot be stored.
    async fn save_preferences(&self, preferences: &QuizPreferences) -> Result<(), StorageError>;
}

/// In-memory repository for tests and for running without a database file.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    preferences: Arc<Mutex<Option<PreferencesRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizPreferencesRepository for InMemoryRepository {
    async fn get_preferences(&self) -> Result<Option<QuizPreferences>, StorageError> {
        let guard = self
            .preferences
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .clone()
            .map(PreferencesRecord::into_preferences)
            .transpose()
    }

    async fn save_preferences(&self, preferences: &QuizPreferences) -> Result<(), StorageError> {
        let mut guard = self
            .preferences
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(PreferencesRecord::from_preferences(preferences));
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub preferences: Arc<dyn QuizPreferencesRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let preferences: Arc<dyn QuizPreferencesRepository> = Arc::new(InMemoryRepository::new());
        Self { preferences }
    }
}
