use thiserror::Error;
use url::Url;

use crate::model::ClassLevel;

/// Locally persisted quiz preferences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizPreferences {
    class_level: ClassLevel,
    catalog_base_url: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct QuizPreferencesDraft {
    pub class_level: ClassLevel,
    pub catalog_base_url: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PreferencesError {
    #[error("invalid catalog base URL")]
    InvalidBaseUrl,
}

impl QuizPreferencesDraft {
    #[must_use]
    pub fn new(class_level: ClassLevel) -> Self {
        Self {
            class_level,
            catalog_base_url: None,
        }
    }

    #[must_use]
    pub fn with_catalog_base_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_base_url = Some(url.into());
        self
    }

    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError::InvalidBaseUrl` if a base URL is present but
    /// does not parse.
    pub fn validate(self) -> Result<QuizPreferences, PreferencesError> {
        let catalog_base_url = self
            .catalog_base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        if let Some(url) = catalog_base_url.as_ref() {
            if Url::parse(url).is_err() {
                return Err(PreferencesError::InvalidBaseUrl);
            }
        }

        Ok(QuizPreferences {
            class_level: self.class_level,
            catalog_base_url,
        })
    }
}

impl QuizPreferences {
    /// Rehydrate preferences from storage.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError` if the stored values no longer validate.
    pub fn from_persisted(draft: QuizPreferencesDraft) -> Result<Self, PreferencesError> {
        draft.validate()
    }

    #[must_use]
    pub fn class_level(&self) -> ClassLevel {
        self.class_level
    }

    #[must_use]
    pub fn catalog_base_url(&self) -> Option<&str> {
        self.catalog_base_url.as_deref()
    }

    /// Same preferences with a different class selected.
    #[must_use]
    pub fn with_class_level(&self, class_level: ClassLevel) -> Self {
        Self {
            class_level,
            catalog_base_url: self.catalog_base_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_base_url_is_dropped() {
        let prefs = QuizPreferencesDraft::new(ClassLevel::Class(9))
            .with_catalog_base_url("   ")
            .validate()
            .unwrap();
        assert_eq!(prefs.catalog_base_url(), None);
        assert_eq!(prefs.class_level(), ClassLevel::Class(9));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = QuizPreferencesDraft::new(ClassLevel::Default)
            .with_catalog_base_url("not a url")
            .validate()
            .unwrap_err();
        assert_eq!(err, PreferencesError::InvalidBaseUrl);
    }

    #[test]
    fn switching_class_keeps_base_url() {
        let prefs = QuizPreferencesDraft::new(ClassLevel::Default)
            .with_catalog_base_url("https://example.org/catalogs/")
            .validate()
            .unwrap();
        let switched = prefs.with_class_level(ClassLevel::Class(11));
        assert_eq!(switched.class_level(), ClassLevel::Class(11));
        assert_eq!(
            switched.catalog_base_url(),
            Some("https://example.org/catalogs/")
        );
    }
}
