use std::path::PathBuf;
use std::time::Duration;

use quiz_core::model::{Catalog, ClassLevel, QuizPreferences};
use reqwest::{Client, Url};
use tracing::{error, info};

use crate::error::CatalogError;

const BUILTIN_CATALOG: &str = include_str!("../data/physics.json");
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Where catalog documents are fetched from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogSource {
    /// The Class 11 catalog compiled into the binary. Serves every class.
    #[default]
    Builtin,
    /// A local directory holding `physics*.json` files.
    Directory(PathBuf),
    /// A base URL; the class key is appended as the last path segment.
    Http(Url),
}

impl CatalogSource {
    /// Parse an HTTP base URL, making sure the key is joined under it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidUrl` if `base` is not an absolute URL.
    pub fn http(base: &str) -> Result<Self, CatalogError> {
        let trimmed = base.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_owned()
        } else {
            format!("{trimmed}/")
        };
        let url = Url::parse(&normalized).map_err(|_| CatalogError::InvalidUrl(base.to_owned()))?;
        Ok(Self::Http(url))
    }

    /// Source for stored preferences: their base URL if set, else `fallback`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidUrl` if the stored URL cannot be used.
    pub fn from_preferences(
        preferences: &QuizPreferences,
        fallback: CatalogSource,
    ) -> Result<Self, CatalogError> {
        match preferences.catalog_base_url() {
            Some(base) => Self::http(base),
            None => Ok(fallback),
        }
    }

    fn describe(&self, key: &str) -> String {
        match self {
            Self::Builtin => format!("builtin:{key}"),
            Self::Directory(dir) => dir.join(key).display().to_string(),
            Self::Http(base) => format!("{base}{key}"),
        }
    }
}

/// Loads the catalog document for a class level.
///
/// Loads are all-or-nothing: a failed read, a non-success status or a parse
/// error yields `CatalogError` and no partial catalog.
#[derive(Clone, Debug)]
pub struct CatalogService {
    client: Client,
    source: CatalogSource,
}

impl CatalogService {
    #[must_use]
    pub fn new(source: CatalogSource) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, source }
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self::new(CatalogSource::Builtin)
    }

    #[must_use]
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Load and parse the catalog for `class_level`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on I/O, HTTP or JSON failures.
    pub async fn load(&self, class_level: ClassLevel) -> Result<Catalog, CatalogError> {
        let key = class_level.catalog_key();
        let location = self.source.describe(&key);

        let result = match &self.source {
            CatalogSource::Builtin => builtin_catalog(),
            CatalogSource::Directory(dir) => {
                let path = dir.join(&key);
                match tokio::fs::read_to_string(&path).await {
                    Ok(text) => parse_catalog(&text),
                    Err(source) => Err(CatalogError::Io { path, source }),
                }
            }
            CatalogSource::Http(base) => self.fetch(base, &key).await,
        };

        match &result {
            Ok(catalog) => info!(
                %class_level,
                location = %location,
                chapters = catalog.chapters().len(),
                formulas = catalog.formula_count(),
                "loaded catalog"
            ),
            Err(err) => error!(%class_level, location = %location, error = %err, "catalog load failed"),
        }
        result
    }

    async fn fetch(&self, base: &Url, key: &str) -> Result<Catalog, CatalogError> {
        let url = base
            .join(key)
            .map_err(|_| CatalogError::InvalidUrl(format!("{base}{key}")))?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus(status));
        }
        let body = response.text().await?;
        parse_catalog(&body)
    }
}

/// The catalog compiled into the binary.
///
/// # Errors
///
/// Returns `CatalogError::Parse` if the embedded document is malformed.
pub fn builtin_catalog() -> Result<Catalog, CatalogError> {
    parse_catalog(BUILTIN_CATALOG)
}

/// Parse a catalog document.
///
/// # Errors
///
/// Returns `CatalogError::Parse` if `text` is not a catalog document.
pub fn parse_catalog(text: &str) -> Result<Catalog, CatalogError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::build_question_pool;
    use std::path::Path;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "formula-quiz-{name}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(dir: &Path, file: &str, body: &str) {
        std::fs::write(dir.join(file), body).unwrap();
    }

    #[test]
    fn builtin_catalog_parses_into_a_usable_pool() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(catalog.standard(), Some("Class 11"));
        assert_eq!(catalog.chapters().len(), 10);
        assert!(build_question_pool(&catalog).len() > 100);
    }

    #[test]
    fn http_source_normalizes_trailing_slash() {
        let CatalogSource::Http(url) = CatalogSource::http("https://example.org/catalogs").unwrap()
        else {
            panic!("expected http source");
        };
        assert_eq!(
            url.join("physics-9.json").unwrap().as_str(),
            "https://example.org/catalogs/physics-9.json"
        );
    }

    #[test]
    fn http_source_rejects_relative_urls() {
        assert!(matches!(
            CatalogSource::http("catalogs/"),
            Err(CatalogError::InvalidUrl(_))
        ));
    }

    #[test]
    fn preferences_url_overrides_fallback() {
        let prefs = quiz_core::model::QuizPreferencesDraft::new(ClassLevel::Class(7))
            .with_catalog_base_url("https://example.org/data/")
            .validate()
            .unwrap();
        let source = CatalogSource::from_preferences(&prefs, CatalogSource::Builtin).unwrap();
        assert!(matches!(source, CatalogSource::Http(_)));

        let plain = QuizPreferences::default();
        let source = CatalogSource::from_preferences(&plain, CatalogSource::Builtin).unwrap();
        assert_eq!(source, CatalogSource::Builtin);
    }

    #[tokio::test]
    async fn directory_source_reads_class_specific_file() {
        let dir = scratch_dir("dir-class");
        write(
            &dir,
            "physics-8.json",
            r#"{ "chapters": [ { "chapter": "Force", "formulas": [
                { "name": "Pressure", "formula": "P = F / A", "terms": { "P": "pressure" } }
            ] } ] }"#,
        );
        let service = CatalogService::new(CatalogSource::Directory(dir));

        let catalog = service.load(ClassLevel::Class(8)).await.unwrap();
        assert_eq!(catalog.chapters()[0].title(), "Force");
        assert_eq!(catalog.formula_count(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = scratch_dir("dir-missing");
        let service = CatalogService::new(CatalogSource::Directory(dir));

        let err = service.load(ClassLevel::Class(12)).await.unwrap_err();
        match err {
            CatalogError::Io { path, .. } => assert!(path.ends_with("physics-12.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_document_is_a_parse_error() {
        let dir = scratch_dir("dir-malformed");
        write(&dir, "physics.json", "{ not json");
        let service = CatalogService::new(CatalogSource::Directory(dir));

        let err = service.load(ClassLevel::Default).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
